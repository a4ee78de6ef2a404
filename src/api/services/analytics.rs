//! `/api/v1/analytics`

use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::helpers::{api_result, error_from_leanurls};
use crate::auth::Identity;
use crate::errors::LeanurlsError;
use crate::services::{AnalyticsService, TableViewRequest};
use crate::storage::{FilterField, TableFilter};

#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LastHitResponse {
    pub last_hit: Option<DateTime<Utc>>,
}

/// Query string of the table view. `field` only accepts `createdAt` or
/// `lastHit`; anything else fails deserialization.
#[derive(Debug, Deserialize)]
pub struct TableQuery {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub field: Option<FilterField>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TryFrom<TableQuery> for TableViewRequest {
    type Error = LeanurlsError;

    fn try_from(query: TableQuery) -> Result<Self, Self::Error> {
        let limit = query
            .limit
            .ok_or_else(|| LeanurlsError::validation("limit is required"))?;

        // 未指定 field 时按 createdAt 过滤
        let filter = match query.field {
            Some(field) => Some(TableFilter {
                field,
                from: query.from,
                to: query.to,
            }),
            None if query.from.is_some() || query.to.is_some() => Some(TableFilter {
                field: FilterField::CreatedAt,
                from: query.from,
                to: query.to,
            }),
            None => None,
        };

        Ok(TableViewRequest {
            limit,
            offset: query.offset,
            filter,
        })
    }
}

pub async fn count_links(identity: Identity, analytics: web::Data<AnalyticsService>) -> HttpResponse {
    api_result(
        analytics
            .count_links(&identity)
            .await
            .map(|count| CountResponse { count }),
    )
}

pub async fn count_hits(identity: Identity, analytics: web::Data<AnalyticsService>) -> HttpResponse {
    api_result(
        analytics
            .count_hits(&identity)
            .await
            .map(|count| CountResponse { count }),
    )
}

pub async fn last_hit(identity: Identity, analytics: web::Data<AnalyticsService>) -> HttpResponse {
    api_result(
        analytics
            .last_hit_time(&identity)
            .await
            .map(|last_hit| LastHitResponse { last_hit }),
    )
}

pub async fn summary(identity: Identity, analytics: web::Data<AnalyticsService>) -> HttpResponse {
    api_result(analytics.summary(&identity).await)
}

pub async fn chart(identity: Identity, analytics: web::Data<AnalyticsService>) -> HttpResponse {
    api_result(analytics.hit_series(&identity).await)
}

pub async fn table(
    identity: Identity,
    query: web::Query<TableQuery>,
    analytics: web::Data<AnalyticsService>,
) -> HttpResponse {
    let request = match TableViewRequest::try_from(query.into_inner()) {
        Ok(request) => request,
        Err(e) => return error_from_leanurls(&e),
    };
    api_result(analytics.table_view(&identity, request).await)
}

pub fn analytics_routes() -> actix_web::Scope {
    web::scope("/analytics")
        .route("/summary", web::get().to(summary))
        .route("/links/count", web::get().to(count_links))
        .route("/hits/count", web::get().to(count_hits))
        .route("/last-hit", web::get().to(last_hit))
        .route("/chart", web::get().to(chart))
        .route("/table", web::get().to(table))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: Option<u64>, field: Option<FilterField>, from: bool) -> TableQuery {
        TableQuery {
            limit,
            offset: None,
            field,
            from: from.then(Utc::now),
            to: None,
        }
    }

    #[test]
    fn test_limit_is_required() {
        assert!(matches!(
            TableViewRequest::try_from(query(None, None, false)),
            Err(LeanurlsError::Validation(_))
        ));
    }

    #[test]
    fn test_bounds_default_to_created_at() {
        let req = TableViewRequest::try_from(query(Some(10), None, true)).unwrap();
        let filter = req.filter.unwrap();
        assert_eq!(filter.field, FilterField::CreatedAt);
        assert!(filter.from.is_some());

        let req = TableViewRequest::try_from(query(Some(10), None, false)).unwrap();
        assert!(req.filter.is_none());

        let req = TableViewRequest::try_from(query(Some(10), Some(FilterField::LastHit), true))
            .unwrap();
        assert_eq!(req.filter.unwrap().field, FilterField::LastHit);
    }

    #[test]
    fn test_unknown_field_fails_to_parse() {
        let parsed = serde_urlencoded_like("limit=5&field=alias");
        assert!(parsed.is_err());
        let parsed = serde_urlencoded_like("limit=5&field=createdAt&from=2024-01-01T00:00:00Z");
        assert!(parsed.is_ok());
    }

    fn serde_urlencoded_like(qs: &str) -> Result<TableQuery, actix_web::error::QueryPayloadError> {
        web::Query::<TableQuery>::from_query(qs).map(web::Query::into_inner)
    }
}
