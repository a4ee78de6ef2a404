//! Bearer token verification
//!
//! A [`TokenVerifier`] turns the raw token of an `Authorization: Bearer`
//! header into a trusted [`Identity`]. Everything downstream scopes its
//! queries by `Identity::subject`.

mod jwks;
mod secret;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::Validation;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{AuthConfig, AuthMode};
use crate::errors::{LeanurlsError, Result};

pub use jwks::JwksVerifier;
pub use secret::SecretVerifier;

/// Caller identity established from a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub subject: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
}

impl Identity {
    /// Identity with only a subject, as used by tests and the CLI.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            name: None,
            email: None,
            picture: None,
        }
    }
}

/// Claims read from an ID token. `aud`, `iss` and `exp` are checked by
/// `jsonwebtoken` itself and not deserialized here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    /// Firebase repeats the subject here; when present it must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl TryFrom<TokenClaims> for Identity {
    type Error = LeanurlsError;

    fn try_from(claims: TokenClaims) -> Result<Self> {
        if claims.sub.trim().is_empty() {
            return Err(LeanurlsError::invalid_token("Token has an empty subject"));
        }
        if let Some(user_id) = &claims.user_id
            && user_id != &claims.sub
        {
            return Err(LeanurlsError::invalid_token(
                "Token user_id does not match its subject",
            ));
        }

        Ok(Identity {
            subject: claims.sub,
            name: claims.name,
            email: claims.email,
            picture: claims.picture,
        })
    }
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity>;
}

/// Applies the configured audience and issuer to a validation. Empty values
/// switch the corresponding check off.
pub(crate) fn apply_expectations(validation: &mut Validation, config: &AuthConfig) {
    if config.audience.is_empty() {
        validation.validate_aud = false;
    } else {
        validation.set_audience(&[config.audience.as_str()]);
    }
    if !config.issuer.is_empty() {
        validation.set_issuer(&[config.issuer.as_str()]);
    }
}

/// Extracts the token from an `Authorization` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str> {
    let header = header
        .ok_or_else(|| LeanurlsError::unauthenticated("Missing Authorization header"))?;

    let (scheme, token) = header
        .split_once(' ')
        .ok_or_else(|| LeanurlsError::unauthenticated("Authorization header must be 'Bearer <token>'"))?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(LeanurlsError::unauthenticated(
            "Authorization scheme must be Bearer",
        ));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(LeanurlsError::unauthenticated("Bearer token is empty"));
    }
    Ok(token)
}

/// Runs the verifier under a deadline. A timeout rejects the token.
pub async fn verify_with_timeout(
    verifier: &dyn TokenVerifier,
    token: &str,
    timeout: Duration,
) -> Result<Identity> {
    match tokio::time::timeout(timeout, verifier.verify(token)).await {
        Ok(Ok(identity)) => Ok(identity),
        Ok(Err(e)) => {
            debug!("Token rejected: {}", e);
            Err(e)
        }
        Err(_) => {
            warn!("Token verification timed out after {:?}", timeout);
            Err(LeanurlsError::invalid_token("Token verification timed out"))
        }
    }
}

/// Builds the verifier selected by `auth.mode`.
pub fn build_verifier(config: &AuthConfig) -> Result<Arc<dyn TokenVerifier>> {
    match config.mode {
        AuthMode::Jwks => Ok(Arc::new(JwksVerifier::new(config)?)),
        AuthMode::Secret => Ok(Arc::new(SecretVerifier::new(config)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(sub: &str, user_id: Option<&str>) -> TokenClaims {
        TokenClaims {
            sub: sub.to_string(),
            user_id: user_id.map(str::to_string),
            name: None,
            email: Some("a@x.com".to_string()),
            picture: None,
            iat: 0,
            exp: 0,
        }
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc.def")).unwrap(), "abc.def");
        assert_eq!(bearer_token(Some("bearer   abc ")).unwrap(), "abc");
        assert!(matches!(
            bearer_token(None),
            Err(LeanurlsError::Unauthenticated(_))
        ));
        assert!(matches!(
            bearer_token(Some("Basic dXNlcjpwYXNz")),
            Err(LeanurlsError::Unauthenticated(_))
        ));
        assert!(matches!(
            bearer_token(Some("Bearer ")),
            Err(LeanurlsError::Unauthenticated(_))
        ));
        assert!(matches!(
            bearer_token(Some("Bearer")),
            Err(LeanurlsError::Unauthenticated(_))
        ));
    }

    #[test]
    fn test_identity_requires_subject() {
        assert!(matches!(
            Identity::try_from(claims("  ", None)),
            Err(LeanurlsError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_identity_rejects_mismatched_user_id() {
        assert!(matches!(
            Identity::try_from(claims("abc", Some("xyz"))),
            Err(LeanurlsError::InvalidToken(_))
        ));
        let identity = Identity::try_from(claims("abc", Some("abc"))).unwrap();
        assert_eq!(identity.subject, "abc");
        assert_eq!(identity.email.as_deref(), Some("a@x.com"));
    }

    struct SlowVerifier;

    #[async_trait]
    impl TokenVerifier for SlowVerifier {
        async fn verify(&self, _token: &str) -> Result<Identity> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Identity::new("late"))
        }
    }

    #[tokio::test]
    async fn test_timeout_fails_closed() {
        let result = verify_with_timeout(&SlowVerifier, "t", Duration::from_millis(20)).await;
        assert!(matches!(result, Err(LeanurlsError::InvalidToken(_))));
    }
}
