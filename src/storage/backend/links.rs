//! Link reads and writes
//!
//! Every write is scoped by owner; only the alias lookup used by
//! resolution is global.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    TransactionTrait, sea_query::OnConflict,
};
use tracing::{debug, error, info};

use super::converters::model_to_link;
use super::{SeaOrmStorage, is_unique_violation, retry};
use crate::errors::Result;
use crate::storage::Link;

use migration::entities::{link, user};

impl SeaOrmStorage {
    /// 按 alias 精确查找（区分大小写）
    pub async fn find_link_by_alias(&self, alias: &str) -> Result<Option<Link>> {
        let db = &self.db;

        let model = retry::with_retry(
            &format!("find_link_by_alias({})", alias),
            self.retry_config,
            || async {
                link::Entity::find()
                    .filter(link::Column::Alias.eq(alias))
                    .one(db)
                    .await
            },
        )
        .await?;

        Ok(model.map(model_to_link))
    }

    pub async fn alias_exists(&self, alias: &str) -> Result<bool> {
        let db = &self.db;

        let count = retry::with_retry(
            &format!("alias_exists({})", alias),
            self.retry_config,
            || async {
                link::Entity::find()
                    .filter(link::Column::Alias.eq(alias))
                    .count(db)
                    .await
            },
        )
        .await?;

        Ok(count > 0)
    }

    /// Inserts a link, creating an empty inactive user row for the owner
    /// first if none exists. Both statements share one transaction.
    ///
    /// Returns `Ok(None)` when the alias unique index rejects the row, so the
    /// caller decides between reporting the conflict and picking another alias.
    pub async fn insert_link(
        &self,
        owner_id: &str,
        url: &str,
        alias: &str,
    ) -> Result<Option<Link>> {
        let now = Utc::now();
        let txn = self.db.begin().await?;

        let owner = user::ActiveModel {
            id: Set(owner_id.to_string()),
            name: Set(None),
            email: Set(None),
            avatar_url: Set(None),
            is_active: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };
        user::Entity::insert(owner)
            .on_conflict(
                OnConflict::column(user::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;

        let inserted = link::ActiveModel {
            url: Set(url.to_string()),
            alias: Set(alias.to_string()),
            owner_id: Set(owner_id.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await;

        let model = match inserted {
            Ok(model) => model,
            Err(e) if is_unique_violation(&e) => {
                debug!("Alias '{}' lost an insert race: {}", alias, e);
                txn.rollback().await?;
                return Ok(None);
            }
            Err(e) => {
                error!("Failed to insert link '{}': {}", alias, e);
                txn.rollback().await?;
                return Err(e.into());
            }
        };

        txn.commit().await?;
        info!("Link created: {} (owner {})", model.alias, owner_id);
        Ok(Some(model_to_link(model)))
    }

    /// Deletes the link only when `owner_id` owns it. Returns whether a row
    /// was removed; hits go with it through the cascading foreign key.
    pub async fn delete_owned_link(&self, owner_id: &str, link_id: i64) -> Result<bool> {
        let db = &self.db;

        let result = retry::with_retry(
            &format!("delete_owned_link({})", link_id),
            self.retry_config,
            || async {
                link::Entity::delete_many()
                    .filter(link::Column::Id.eq(link_id))
                    .filter(link::Column::OwnerId.eq(owner_id))
                    .exec(db)
                    .await
            },
        )
        .await?;

        Ok(result.rows_affected > 0)
    }
}
