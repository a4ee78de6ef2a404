//! Analytics service
//!
//! Every query is scoped to the caller's own links.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Identity;
use crate::errors::{LeanurlsError, Result};
use crate::storage::{ChartPoint, SeaOrmStorage, TableFilter, TableRow};

pub const MAX_TABLE_LIMIT: u64 = 100;

/// Headline numbers for a dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub links: u64,
    pub hits: u64,
    pub last_hit: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct TableViewRequest {
    pub limit: u64,
    pub offset: Option<u64>,
    pub filter: Option<TableFilter>,
}

pub struct AnalyticsService {
    storage: Arc<SeaOrmStorage>,
}

impl AnalyticsService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn count_links(&self, owner: &Identity) -> Result<u64> {
        self.storage.count_links(&owner.subject).await
    }

    pub async fn count_hits(&self, owner: &Identity) -> Result<u64> {
        self.storage.count_hits(&owner.subject).await
    }

    pub async fn last_hit_time(&self, owner: &Identity) -> Result<Option<DateTime<Utc>>> {
        self.storage.last_hit_time(&owner.subject).await
    }

    pub async fn summary(&self, owner: &Identity) -> Result<AnalyticsSummary> {
        let (links, hits, last_hit) = tokio::try_join!(
            self.count_links(owner),
            self.count_hits(owner),
            self.last_hit_time(owner),
        )?;
        Ok(AnalyticsSummary {
            links,
            hits,
            last_hit,
        })
    }

    pub async fn hit_series(&self, owner: &Identity) -> Result<Vec<ChartPoint>> {
        self.storage.hit_series(&owner.subject).await
    }

    /// Paginated link table. `limit` must be in `1..=MAX_TABLE_LIMIT`,
    /// `offset` defaults to 0.
    pub async fn table_view(&self, owner: &Identity, req: TableViewRequest) -> Result<Vec<TableRow>> {
        if req.limit == 0 || req.limit > MAX_TABLE_LIMIT {
            return Err(LeanurlsError::validation(format!(
                "limit must be between 1 and {}",
                MAX_TABLE_LIMIT
            )));
        }

        if let Some(TableFilter {
            from: Some(from),
            to: Some(to),
            ..
        }) = &req.filter
            && from > to
        {
            return Err(LeanurlsError::validation("'from' must not be after 'to'"));
        }

        self.storage
            .table_view(
                &owner.subject,
                req.limit,
                req.offset.unwrap_or(0),
                req.filter.as_ref(),
            )
            .await
    }
}
