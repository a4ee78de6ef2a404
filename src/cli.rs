//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Leanurls - a lean URL shortener with per-user analytics
#[derive(Parser)]
#[command(name = "leanurls")]
#[command(version)]
#[command(about = "A lean URL shortener with per-user analytics", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true, default_value = crate::config::DEFAULT_CONFIG_PATH)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Print a sample configuration file
    GenerateConfig {
        /// Write to this file instead of stdout
        output: Option<String>,
    },

    /// Issue an HS256 token for local testing (requires `auth.mode = "secret"`)
    IssueToken {
        /// Subject (user id) of the token
        subject: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_serve() {
        let cli = Cli::try_parse_from(["leanurls"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, crate::config::DEFAULT_CONFIG_PATH);
    }

    #[test]
    fn test_issue_token_args() {
        let cli = Cli::try_parse_from([
            "leanurls",
            "--config",
            "/etc/leanurls.toml",
            "issue-token",
            "user-1",
            "--email",
            "a@x.com",
        ])
        .unwrap();
        assert_eq!(cli.config, "/etc/leanurls.toml");
        match cli.command {
            Some(Commands::IssueToken {
                subject, email, name,
            }) => {
                assert_eq!(subject, "user-1");
                assert_eq!(email.as_deref(), Some("a@x.com"));
                assert!(name.is_none());
            }
            _ => panic!("expected issue-token"),
        }
    }
}
