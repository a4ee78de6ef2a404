use anyhow::{Context, Result};
use clap::Parser;

use leanurls::auth::{Identity, SecretVerifier};
use leanurls::cli::{Cli, Commands};
use leanurls::config::{StaticConfig, get_config, init_config_from};
use leanurls::runtime::modes::run_server;
use leanurls::system::logging::init_logging;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::GenerateConfig { output }) => {
            let sample = StaticConfig::generate_sample_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, sample)
                        .with_context(|| format!("Failed to write {}", path))?;
                    println!("Sample configuration written to {}", path);
                }
                None => print!("{}", sample),
            }
            Ok(())
        }
        Some(Commands::IssueToken {
            subject,
            name,
            email,
        }) => {
            init_config_from(&cli.config);
            let config = get_config();
            let verifier = SecretVerifier::new(&config.auth)?;
            let identity = Identity {
                name,
                email,
                ..Identity::new(subject)
            };
            println!("{}", verifier.issue_token(&identity)?);
            Ok(())
        }
        Some(Commands::Serve) | None => {
            init_config_from(&cli.config);
            let config = get_config();
            // 保持 guard 存活直到进程退出，否则文件日志会丢失
            let _log_guard = init_logging(&config.logging)?;
            run_server(&config).await
        }
    }
}
