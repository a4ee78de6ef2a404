//! Analytics tests
//!
//! Counts, chart series and the paginated table view.

use std::sync::Arc;

use chrono::{Duration, Utc};
use leanurls::auth::Identity;
use leanurls::config::DatabaseConfig;
use leanurls::errors::LeanurlsError;
use leanurls::services::{AnalyticsService, CreateLinkRequest, LinkService, TableViewRequest};
use leanurls::storage::{ChartPoint, FilterField, SeaOrmStorage, TableFilter};
use tempfile::TempDir;

struct TestContext {
    links: LinkService,
    analytics: AnalyticsService,
    _temp: TempDir,
}

async fn create_test_context() -> TestContext {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("analytics.db");
    let config = DatabaseConfig::with_url(format!("sqlite://{}?mode=rwc", db_path.display()));
    let storage = Arc::new(
        SeaOrmStorage::new(&config)
            .await
            .expect("Failed to create storage"),
    );

    TestContext {
        links: LinkService::new(storage.clone()),
        analytics: AnalyticsService::new(storage),
        _temp: temp_dir,
    }
}

impl TestContext {
    async fn add_link(&self, owner: &Identity, alias: &str) -> i64 {
        self.links
            .create_link(
                owner,
                CreateLinkRequest {
                    url: format!("https://example.com/{}", alias),
                    alias: Some(alias.to_string()),
                },
            )
            .await
            .unwrap()
            .id
    }

    async fn hit(&self, alias: &str, times: usize) {
        for _ in 0..times {
            assert!(self.links.resolve(alias).await.unwrap().is_some());
        }
    }
}

fn table(limit: u64, offset: Option<u64>, filter: Option<TableFilter>) -> TableViewRequest {
    TableViewRequest {
        limit,
        offset,
        filter,
    }
}

#[cfg(test)]
mod count_tests {
    use super::*;

    #[tokio::test]
    async fn test_counts_for_unknown_owner_are_zero() {
        let ctx = create_test_context().await;
        let nobody = Identity::new("nobody");

        assert_eq!(ctx.analytics.count_links(&nobody).await.unwrap(), 0);
        assert_eq!(ctx.analytics.count_hits(&nobody).await.unwrap(), 0);
        assert!(ctx.analytics.last_hit_time(&nobody).await.unwrap().is_none());
        assert!(ctx.analytics.hit_series(&nobody).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_last_hit_time_tracks_latest_hit() {
        let ctx = create_test_context().await;
        let owner = Identity::new("owner");
        ctx.add_link(&owner, "one").await;

        assert!(ctx.analytics.last_hit_time(&owner).await.unwrap().is_none());

        let before = Utc::now() - Duration::seconds(1);
        ctx.hit("one", 2).await;
        let last = ctx.analytics.last_hit_time(&owner).await.unwrap().unwrap();
        assert!(last >= before);
        assert!(last <= Utc::now() + Duration::seconds(1));
    }

    #[tokio::test]
    async fn test_summary_matches_individual_counts() {
        let ctx = create_test_context().await;
        let owner = Identity::new("owner");
        ctx.add_link(&owner, "s1").await;
        ctx.add_link(&owner, "s2").await;
        ctx.hit("s1", 3).await;

        let summary = ctx.analytics.summary(&owner).await.unwrap();
        assert_eq!(summary.links, 2);
        assert_eq!(summary.hits, 3);
        assert!(summary.last_hit.is_some());
    }

    #[tokio::test]
    async fn test_generated_alias_scenario() {
        let ctx = create_test_context().await;
        let owner = Identity::new("abc");

        let link = ctx
            .links
            .create_link(
                &owner,
                CreateLinkRequest {
                    url: "https://example.com".to_string(),
                    alias: None,
                },
            )
            .await
            .unwrap();
        assert!(link.alias.len() <= 32);

        let resolved = ctx.links.resolve(&link.alias).await.unwrap();
        assert_eq!(resolved.as_deref(), Some("https://example.com"));
        assert_eq!(ctx.analytics.count_hits(&owner).await.unwrap(), 1);
    }
}

#[cfg(test)]
mod chart_tests {
    use super::*;

    #[tokio::test]
    async fn test_series_ordered_by_alias_with_zero_hits() {
        let ctx = create_test_context().await;
        let owner = Identity::new("owner");
        let other = Identity::new("other");
        ctx.add_link(&owner, "zeta").await;
        ctx.add_link(&owner, "alpha").await;
        ctx.add_link(&owner, "mid").await;
        ctx.add_link(&other, "foreign").await;
        ctx.hit("zeta", 2).await;
        ctx.hit("alpha", 1).await;
        ctx.hit("foreign", 5).await;

        let series = ctx.analytics.hit_series(&owner).await.unwrap();
        assert_eq!(
            series,
            vec![
                ChartPoint {
                    alias: "alpha".to_string(),
                    hits: 1
                },
                ChartPoint {
                    alias: "mid".to_string(),
                    hits: 0
                },
                ChartPoint {
                    alias: "zeta".to_string(),
                    hits: 2
                },
            ]
        );
    }
}

#[cfg(test)]
mod table_tests {
    use super::*;

    #[tokio::test]
    async fn test_rows_carry_hit_aggregates() {
        let ctx = create_test_context().await;
        let owner = Identity::new("owner");
        ctx.add_link(&owner, "visited").await;
        ctx.add_link(&owner, "quiet").await;
        ctx.hit("visited", 4).await;

        let rows = ctx.analytics.table_view(&owner, table(10, None, None)).await.unwrap();
        assert_eq!(rows.len(), 2);

        let visited = rows.iter().find(|r| r.alias == "visited").unwrap();
        assert_eq!(visited.number_of_hits, 4);
        assert!(visited.last_hit.is_some());
        assert_eq!(visited.url, "https://example.com/visited");

        let quiet = rows.iter().find(|r| r.alias == "quiet").unwrap();
        assert_eq!(quiet.number_of_hits, 0);
        assert!(quiet.last_hit.is_none());
    }

    #[tokio::test]
    async fn test_pagination_has_no_gaps_or_overlap() {
        let ctx = create_test_context().await;
        let owner = Identity::new("owner");
        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(ctx.add_link(&owner, &format!("page{}", i)).await);
        }

        let mut seen = Vec::new();
        for offset in [0, 2, 4] {
            let page = ctx
                .analytics
                .table_view(&owner, table(2, Some(offset), None))
                .await
                .unwrap();
            seen.extend(page.into_iter().map(|r| r.id));
        }

        // newest first
        ids.reverse();
        assert_eq!(seen, ids);

        let past_end = ctx
            .analytics
            .table_view(&owner, table(2, Some(10), None))
            .await
            .unwrap();
        assert!(past_end.is_empty());
    }

    #[tokio::test]
    async fn test_table_scoped_to_owner() {
        let ctx = create_test_context().await;
        ctx.add_link(&Identity::new("a"), "mine").await;
        ctx.add_link(&Identity::new("b"), "theirs").await;

        let rows = ctx
            .analytics
            .table_view(&Identity::new("a"), table(100, None, None))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].alias, "mine");
    }

    #[tokio::test]
    async fn test_created_at_window() {
        let ctx = create_test_context().await;
        let owner = Identity::new("owner");
        ctx.add_link(&owner, "w1").await;
        ctx.add_link(&owner, "w2").await;
        let now = Utc::now();

        let around = TableFilter {
            field: FilterField::CreatedAt,
            from: Some(now - Duration::hours(1)),
            to: Some(now + Duration::hours(1)),
        };
        let rows = ctx
            .analytics
            .table_view(&owner, table(10, None, Some(around)))
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);

        let future = TableFilter {
            field: FilterField::CreatedAt,
            from: Some(now + Duration::hours(1)),
            to: None,
        };
        let rows = ctx
            .analytics
            .table_view(&owner, table(10, None, Some(future)))
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_last_hit_window_skips_unvisited_links() {
        let ctx = create_test_context().await;
        let owner = Identity::new("owner");
        ctx.add_link(&owner, "hot").await;
        ctx.add_link(&owner, "cold").await;
        ctx.hit("hot", 1).await;

        let recent = TableFilter {
            field: FilterField::LastHit,
            from: Some(Utc::now() - Duration::hours(1)),
            to: None,
        };
        let rows = ctx
            .analytics
            .table_view(&owner, table(10, None, Some(recent)))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].alias, "hot");

        let old = TableFilter {
            field: FilterField::LastHit,
            from: None,
            to: Some(Utc::now() - Duration::hours(1)),
        };
        let rows = ctx
            .analytics
            .table_view(&owner, table(10, None, Some(old)))
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_requests_rejected() {
        let ctx = create_test_context().await;
        let owner = Identity::new("owner");

        for limit in [0, 101] {
            let result = ctx.analytics.table_view(&owner, table(limit, None, None)).await;
            assert!(matches!(result, Err(LeanurlsError::Validation(_))));
        }

        let now = Utc::now();
        let inverted = TableFilter {
            field: FilterField::CreatedAt,
            from: Some(now),
            to: Some(now - Duration::hours(1)),
        };
        let result = ctx
            .analytics
            .table_view(&owner, table(10, None, Some(inverted)))
            .await;
        assert!(matches!(result, Err(LeanurlsError::Validation(_))));
    }
}
