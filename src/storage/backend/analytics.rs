//! Owner-scoped aggregation queries over links and hits.

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, EntityTrait, ExprTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use super::{SeaOrmStorage, retry};
use crate::errors::Result;
use crate::storage::{ChartPoint, FilterField, TableFilter, TableRow};

use migration::entities::{hit, link};

// ============ 查询结果类型 ============

#[derive(Debug, FromQueryResult)]
struct ChartRow {
    alias: String,
    hits: i64,
}

#[derive(Debug, FromQueryResult)]
struct TableQueryRow {
    id: i64,
    url: String,
    alias: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    number_of_hits: i64,
    last_hit: Option<DateTime<Utc>>,
}

impl From<TableQueryRow> for TableRow {
    fn from(row: TableQueryRow) -> Self {
        TableRow {
            id: row.id,
            url: row.url,
            alias: row.alias,
            created_at: row.created_at,
            updated_at: row.updated_at,
            number_of_hits: u64::try_from(row.number_of_hits).unwrap_or(0),
            last_hit: row.last_hit,
        }
    }
}

impl SeaOrmStorage {
    pub async fn count_links(&self, owner_id: &str) -> Result<u64> {
        let db = &self.db;

        let count = retry::with_retry("count_links", self.retry_config, || async {
            link::Entity::find()
                .filter(link::Column::OwnerId.eq(owner_id))
                .count(db)
                .await
        })
        .await?;

        Ok(count)
    }

    /// 所有者名下全部链接的访问总数
    pub async fn count_hits(&self, owner_id: &str) -> Result<u64> {
        let db = &self.db;

        let count = retry::with_retry("count_hits", self.retry_config, || async {
            hit::Entity::find()
                .inner_join(link::Entity)
                .filter(link::Column::OwnerId.eq(owner_id))
                .count(db)
                .await
        })
        .await?;

        Ok(count)
    }

    /// Most recent hit on any of the owner's links, `None` without hits.
    pub async fn last_hit_time(&self, owner_id: &str) -> Result<Option<DateTime<Utc>>> {
        let db = &self.db;

        let latest = retry::with_retry("last_hit_time", self.retry_config, || async {
            hit::Entity::find()
                .select_only()
                .column(hit::Column::CreatedAt)
                .inner_join(link::Entity)
                .filter(link::Column::OwnerId.eq(owner_id))
                .order_by_desc(hit::Column::CreatedAt)
                .limit(1)
                .into_tuple::<DateTime<Utc>>()
                .one(db)
                .await
        })
        .await?;

        Ok(latest)
    }

    /// Hits per alias ordered by alias. Links without hits are reported
    /// with zero.
    pub async fn hit_series(&self, owner_id: &str) -> Result<Vec<ChartPoint>> {
        let db = &self.db;

        let rows = retry::with_retry("hit_series", self.retry_config, || async {
            link::Entity::find()
                .select_only()
                .column(link::Column::Alias)
                .column_as(hit::Column::Id.count(), "hits")
                .left_join(hit::Entity)
                .filter(link::Column::OwnerId.eq(owner_id))
                .group_by(link::Column::Alias)
                .order_by_asc(link::Column::Alias)
                .into_model::<ChartRow>()
                .all(db)
                .await
        })
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ChartPoint {
                alias: row.alias,
                hits: u64::try_from(row.hits).unwrap_or(0),
            })
            .collect())
    }

    /// Links joined with their hit count and latest hit, newest link first.
    ///
    /// A `createdAt` window filters rows before grouping; a `lastHit` window
    /// applies to the aggregate and therefore never matches unvisited links.
    /// Bounds are bound parameters.
    pub async fn table_view(
        &self,
        owner_id: &str,
        limit: u64,
        offset: u64,
        filter: Option<&TableFilter>,
    ) -> Result<Vec<TableRow>> {
        let db = &self.db;

        let rows = retry::with_retry("table_view", self.retry_config, || async {
            let mut query = link::Entity::find()
                .select_only()
                .columns([
                    link::Column::Id,
                    link::Column::Url,
                    link::Column::Alias,
                    link::Column::CreatedAt,
                    link::Column::UpdatedAt,
                ])
                .column_as(hit::Column::Id.count(), "number_of_hits")
                .column_as(hit::Column::CreatedAt.max(), "last_hit")
                .left_join(hit::Entity)
                .filter(link::Column::OwnerId.eq(owner_id));

            if let Some(filter) = filter {
                match filter.field {
                    FilterField::CreatedAt => {
                        if let Some(from) = filter.from {
                            query = query.filter(link::Column::CreatedAt.gt(from));
                        }
                        if let Some(to) = filter.to {
                            query = query.filter(link::Column::CreatedAt.lt(to));
                        }
                    }
                    FilterField::LastHit => {
                        if let Some(from) = filter.from {
                            query = query.having(hit::Column::CreatedAt.max().gt(from));
                        }
                        if let Some(to) = filter.to {
                            query = query.having(hit::Column::CreatedAt.max().lt(to));
                        }
                    }
                }
            }

            query
                .group_by(link::Column::Id)
                .group_by(link::Column::Url)
                .group_by(link::Column::Alias)
                .group_by(link::Column::CreatedAt)
                .group_by(link::Column::UpdatedAt)
                .order_by_desc(link::Column::CreatedAt)
                .order_by_desc(link::Column::Id)
                .limit(limit)
                .offset(offset)
                .into_model::<TableQueryRow>()
                .all(db)
                .await
        })
        .await?;

        Ok(rows.into_iter().map(TableRow::from).collect())
    }
}
