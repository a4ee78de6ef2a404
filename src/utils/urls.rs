//! URL 校验与 alias 提取

use url::Url;

use crate::errors::LeanurlsError;

#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    DangerousProtocol(String),
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::DangerousProtocol(proto) => write!(f, "Dangerous protocol blocked: {}", proto),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

impl From<UrlValidationError> for LeanurlsError {
    fn from(err: UrlValidationError) -> Self {
        LeanurlsError::validation(err.to_string())
    }
}

/// Schemes refused outright, reported separately from merely unsupported ones.
const DANGEROUS_SCHEMES: &[&str] = &["javascript", "data", "file", "vbscript", "about", "blob"];

/// Accepts only absolute http(s) URLs with a host.
pub fn validate_url(input: &str) -> Result<Url, UrlValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let parsed = match Url::parse(input) {
        Ok(parsed) => parsed,
        Err(e) => {
            // "javascript:alert(1)" parses, but a bare "data:" prefix may not
            let lower = input.to_lowercase();
            if let Some(scheme) = DANGEROUS_SCHEMES
                .iter()
                .find(|s| lower.starts_with(&format!("{}:", s)))
            {
                return Err(UrlValidationError::DangerousProtocol(format!("{}:", scheme)));
            }
            return Err(UrlValidationError::InvalidFormat(e.to_string()));
        }
    };

    match parsed.scheme() {
        "http" | "https" => {}
        scheme if DANGEROUS_SCHEMES.contains(&scheme) => {
            return Err(UrlValidationError::DangerousProtocol(format!("{}:", scheme)));
        }
        scheme => return Err(UrlValidationError::InvalidProtocol(format!("{}:", scheme))),
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::InvalidFormat("missing host".to_string()));
    }

    Ok(parsed)
}

/// Takes the alias out of a full short URL, a path, or a bare alias: the
/// last non-empty path segment, with query string and fragment dropped.
///
/// A URL with a scheme but an empty path (`https://lean.ly/`) has no alias;
/// the host is never taken for one.
pub fn extract_alias(input: &str) -> Option<&str> {
    let input = input.trim();
    let without_fragment = input.split('#').next().unwrap_or(input);
    let without_query = without_fragment
        .split('?')
        .next()
        .unwrap_or(without_fragment);

    let path = match without_query.split_once("://") {
        Some((_, authority_and_path)) => authority_and_path.split_once('/')?.1,
        None => without_query,
    };

    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
}
