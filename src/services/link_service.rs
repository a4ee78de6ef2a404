//! Link service
//!
//! Creation, owner-scoped deletion and public resolution of short links.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::alias::{
    ALIAS_TAKEN_MESSAGE, MAX_ALIAS_LEN, MAX_GENERATION_ATTEMPTS, ensure_requested_alias,
    generate_alias,
};
use crate::auth::Identity;
use crate::errors::{LeanurlsError, Result};
use crate::storage::{Link, SeaOrmStorage};
use crate::utils::{extract_alias, validate_url};

// ============ Request DTOs ============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLinkRequest {
    /// Destination URL
    pub url: String,
    /// Alias to claim; generated when absent
    #[serde(default)]
    pub alias: Option<String>,
}

pub struct LinkService {
    storage: Arc<SeaOrmStorage>,
}

impl LinkService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// Looks up the destination for a full short URL or bare alias and
    /// records a hit.
    ///
    /// The hit is best effort: a failed insert is logged and the URL is
    /// still returned.
    pub async fn resolve(&self, url_or_alias: &str) -> Result<Option<String>> {
        let Some(alias) = extract_alias(url_or_alias) else {
            return Ok(None);
        };
        if alias.chars().count() > MAX_ALIAS_LEN {
            return Ok(None);
        }

        let Some(link) = self.storage.find_link_by_alias(alias).await? else {
            debug!("LinkService: no link for alias '{}'", alias);
            return Ok(None);
        };

        if let Err(e) = self.storage.insert_hit(link.id).await {
            warn!("LinkService: failed to record hit for '{}': {}", alias, e);
        }

        Ok(Some(link.url))
    }

    /// Creates a link for the caller. The owner's user row is created on
    /// the fly when missing. A blank alias counts as no alias.
    pub async fn create_link(&self, owner: &Identity, req: CreateLinkRequest) -> Result<Link> {
        validate_url(&req.url)?;
        let url = req.url.trim();

        let requested = req.alias.as_deref().filter(|a| !a.trim().is_empty());
        let link = match requested {
            Some(alias) => self.create_with_requested_alias(owner, url, alias).await?,
            None => self.create_with_generated_alias(owner, url).await?,
        };

        info!(
            "LinkService: created link '{}' -> {} for {}",
            link.alias, link.url, owner.subject
        );
        Ok(link)
    }

    async fn create_with_requested_alias(
        &self,
        owner: &Identity,
        url: &str,
        alias: &str,
    ) -> Result<Link> {
        ensure_requested_alias(&self.storage, alias).await?;
        self.storage
            .insert_link(&owner.subject, url, alias)
            .await?
            .ok_or_else(|| LeanurlsError::validation(ALIAS_TAKEN_MESSAGE))
    }

    /// Each attempt draws a fresh alias; both a pre-check hit and a lost
    /// insert race consume one attempt.
    async fn create_with_generated_alias(&self, owner: &Identity, url: &str) -> Result<Link> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let alias = generate_alias();
            if self.storage.alias_exists(&alias).await? {
                debug!("LinkService: generated alias '{}' taken (attempt {})", alias, attempt);
                continue;
            }

            if let Some(link) = self.storage.insert_link(&owner.subject, url, &alias).await? {
                return Ok(link);
            }
            debug!(
                "LinkService: generated alias '{}' lost an insert race (attempt {})",
                alias, attempt
            );
        }

        Err(LeanurlsError::internal(format!(
            "No free alias found after {} attempts",
            MAX_GENERATION_ATTEMPTS
        )))
    }

    /// Deletes the link when the caller owns it.
    ///
    /// Always reports success so callers cannot learn which links other users own.
    pub async fn delete_owned(&self, owner: &Identity, link_id: i64) -> Result<bool> {
        let deleted = self
            .storage
            .delete_owned_link(&owner.subject, link_id)
            .await?;

        if deleted {
            info!("LinkService: deleted link {} for {}", link_id, owner.subject);
        } else {
            debug!(
                "LinkService: link {} not owned by {}, nothing deleted",
                link_id, owner.subject
            );
        }
        Ok(true)
    }
}
