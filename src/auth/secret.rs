//! HS256 verification with a shared secret, for local development and tests

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Serialize;

use super::{Identity, TokenClaims, TokenVerifier, apply_expectations};
use crate::config::AuthConfig;
use crate::errors::{LeanurlsError, Result};

#[derive(Serialize)]
struct IssuedClaims<'a> {
    #[serde(flatten)]
    claims: &'a TokenClaims,
    #[serde(skip_serializing_if = "Option::is_none")]
    aud: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    iss: Option<&'a str>,
}

pub struct SecretVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    audience: Option<String>,
    issuer: Option<String>,
    token_minutes: u64,
}

impl SecretVerifier {
    pub fn new(config: &AuthConfig) -> Result<Self> {
        if config.secret.is_empty() {
            return Err(LeanurlsError::configuration(
                "auth.secret must be set when auth.mode = \"secret\"",
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        apply_expectations(&mut validation, config);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            audience: Some(config.audience.clone()).filter(|a| !a.is_empty()),
            issuer: Some(config.issuer.clone()).filter(|i| !i.is_empty()),
            token_minutes: config.token_minutes,
        })
    }

    /// Signs a token for `identity` valid for `auth.token_minutes`.
    pub fn issue_token(&self, identity: &Identity) -> Result<String> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: identity.subject.clone(),
            user_id: Some(identity.subject.clone()),
            name: identity.name.clone(),
            email: identity.email.clone(),
            picture: identity.picture.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.token_minutes as i64)).timestamp(),
        };
        self.sign(&claims)
    }

    /// Signs arbitrary claims with the configured audience and issuer.
    pub fn sign(&self, claims: &TokenClaims) -> Result<String> {
        let issued = IssuedClaims {
            claims,
            aud: self.audience.as_deref(),
            iss: self.issuer.as_deref(),
        };
        encode(&Header::new(Algorithm::HS256), &issued, &self.encoding_key)
            .map_err(|e| LeanurlsError::internal(format!("Failed to sign token: {}", e)))
    }
}

#[async_trait]
impl TokenVerifier for SecretVerifier {
    async fn verify(&self, token: &str) -> Result<Identity> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;
        Identity::try_from(data.claims)
    }
}
