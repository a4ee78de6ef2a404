//! User service
//!
//! Profile upsert and maintenance for the authenticated caller. Listing all
//! users is exposed for the admin scope only.

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::auth::Identity;
use crate::errors::{LeanurlsError, Result};
use crate::storage::{SeaOrmStorage, User, UserField, UserProfile};

pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 128;
pub const MAX_EMAIL_LEN: usize = 150;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertUserRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateFieldRequest {
    pub field: String,
    pub value: String,
}

pub fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    let len = name.chars().count();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
        return Err(LeanurlsError::validation(format!(
            "Name must be between {} and {} characters",
            MIN_NAME_LEN, MAX_NAME_LEN
        )));
    }
    Ok(name)
}

pub fn validate_email(email: &str) -> Result<&str> {
    let email = email.trim();
    if email.chars().count() > MAX_EMAIL_LEN {
        return Err(LeanurlsError::validation(format!(
            "Email must be at most {} characters",
            MAX_EMAIL_LEN
        )));
    }

    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !well_formed {
        return Err(LeanurlsError::validation("Email address is not valid"));
    }
    Ok(email)
}

/// Gravatar URL for an address: SHA-256 of the trimmed, lower-cased email.
pub fn gravatar_url(email: &str) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    format!(
        "https://www.gravatar.com/avatar/{}?s=200&r=pg&d=mm",
        hex::encode(digest)
    )
}

pub struct UserService {
    storage: Arc<SeaOrmStorage>,
}

impl UserService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// Creates or refreshes the caller's profile and marks it active.
    ///
    /// The avatar comes from the token's `picture` claim, falling back to
    /// Gravatar.
    pub async fn upsert(&self, identity: &Identity, req: UpsertUserRequest) -> Result<User> {
        let name = validate_name(&req.name)?;
        let email = validate_email(&req.email)?;

        let avatar_url = identity
            .picture
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| gravatar_url(email));

        let profile = UserProfile {
            name: name.to_string(),
            email: email.to_string(),
            avatar_url,
        };
        self.storage.upsert_user(&identity.subject, &profile).await
    }

    /// Changes one field. Only `name` and `email` are accepted.
    pub async fn update_field(&self, identity: &Identity, key: &str, value: &str) -> Result<User> {
        let field = UserField::from_str(key).map_err(|_| {
            LeanurlsError::validation(format!(
                "Unknown user field '{}'; allowed: name, email",
                key
            ))
        })?;

        let value = match field {
            UserField::Name => validate_name(value)?,
            UserField::Email => validate_email(value)?,
        };

        let user = self
            .storage
            .update_user_field(&identity.subject, field, value)
            .await?;
        info!(
            "UserService: {} updated field '{}'",
            identity.subject,
            field.as_ref()
        );
        Ok(user)
    }

    pub async fn update_profile(&self, identity: &Identity, req: UpsertUserRequest) -> Result<User> {
        let name = validate_name(&req.name)?;
        let email = validate_email(&req.email)?;
        self.storage
            .update_user_profile(&identity.subject, name, email)
            .await
    }

    /// Deletes the caller's account with all links and hits.
    ///
    /// Idempotent: reports `true` whether or not an account existed.
    pub async fn delete(&self, identity: &Identity) -> Result<bool> {
        let existed = self.storage.delete_user(&identity.subject).await?;
        if !existed {
            debug!("UserService: no account to delete for {}", identity.subject);
        }
        Ok(true)
    }

    pub async fn find_me(&self, identity: &Identity) -> Result<Option<User>> {
        self.storage.find_user(&identity.subject).await
    }

    /// Every user. Callers must have passed the admin gate.
    pub async fn list_all(&self) -> Result<Vec<User>> {
        self.storage.list_users().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_bounds() {
        assert!(validate_name("A").is_err());
        assert_eq!(validate_name("  Al  ").unwrap(), "Al");
        assert!(validate_name(&"n".repeat(128)).is_ok());
        assert!(validate_name(&"n".repeat(129)).is_err());
    }

    #[test]
    fn test_email_shapes() {
        assert_eq!(validate_email(" a@x.com ").unwrap(), "a@x.com");
        for bad in ["", "a", "a@", "@x.com", "a@x", "a@@x.com", "a b@x.com", "a@.com"] {
            assert!(validate_email(bad).is_err(), "{:?} should be rejected", bad);
        }
        let long = format!("{}@x.com", "a".repeat(150));
        assert!(validate_email(&long).is_err());
    }

    #[test]
    fn test_gravatar_is_normalized_sha256() {
        let a = gravatar_url("A@X.com ");
        let b = gravatar_url("a@x.com");
        assert_eq!(a, b);
        assert!(a.starts_with("https://www.gravatar.com/avatar/"));
        assert!(a.ends_with("?s=200&r=pg&d=mm"));

        let hash = a
            .trim_start_matches("https://www.gravatar.com/avatar/")
            .split('?')
            .next()
            .unwrap();
        assert_eq!(hash.len(), 64);
    }
}
