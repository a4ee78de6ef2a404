//! User reads and writes

use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait, sea_query::Expr,
};
use tracing::info;

use super::converters::model_to_user;
use super::{SeaOrmStorage, is_unique_violation, retry};
use crate::errors::{LeanurlsError, Result};
use crate::storage::{User, UserField, UserProfile};

use migration::entities::user;

pub const EMAIL_TAKEN_MESSAGE: &str = "The email address is already used by another account";

/// Unique violations on `users.email` are caller errors, the rest are not.
fn map_write_error(err: DbErr) -> LeanurlsError {
    if is_unique_violation(&err) {
        LeanurlsError::validation(EMAIL_TAKEN_MESSAGE)
    } else {
        err.into()
    }
}

async fn load_in_txn(txn: &DatabaseTransaction, user_id: &str) -> Result<User> {
    user::Entity::find_by_id(user_id.to_string())
        .one(txn)
        .await?
        .map(model_to_user)
        .ok_or_else(|| LeanurlsError::not_found(format!("User not found: {}", user_id)))
}

impl SeaOrmStorage {
    /// Inserts the user or overwrites their profile, marking them active.
    ///
    /// No upsert clause here: MySQL's `ON DUPLICATE KEY` also fires on the
    /// email index and would rewrite another user's row.
    pub async fn upsert_user(&self, user_id: &str, profile: &UserProfile) -> Result<User> {
        let now = Utc::now();
        let txn = self.db.begin().await?;

        let exists = user::Entity::find_by_id(user_id.to_string())
            .one(&txn)
            .await?
            .is_some();

        let written = if exists {
            user::Entity::update_many()
                .col_expr(user::Column::Name, Expr::val(profile.name.clone()).into())
                .col_expr(user::Column::Email, Expr::val(profile.email.clone()).into())
                .col_expr(
                    user::Column::AvatarUrl,
                    Expr::val(profile.avatar_url.clone()).into(),
                )
                .col_expr(user::Column::IsActive, Expr::val(true).into())
                .col_expr(user::Column::UpdatedAt, Expr::val(now).into())
                .filter(user::Column::Id.eq(user_id))
                .exec(&txn)
                .await
                .map(|_| ())
        } else {
            let model = user::ActiveModel {
                id: Set(user_id.to_string()),
                name: Set(Some(profile.name.clone())),
                email: Set(Some(profile.email.clone())),
                avatar_url: Set(Some(profile.avatar_url.clone())),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
            };
            user::Entity::insert(model)
                .exec_without_returning(&txn)
                .await
                .map(|_| ())
        };

        if let Err(e) = written {
            txn.rollback().await?;
            return Err(map_write_error(e));
        }

        let user = load_in_txn(&txn, user_id).await?;
        txn.commit().await?;

        info!("User upserted: {}", user_id);
        Ok(user)
    }

    /// Sets a single allow-listed column.
    pub async fn update_user_field(
        &self,
        user_id: &str,
        field: UserField,
        value: &str,
    ) -> Result<User> {
        let column = match field {
            UserField::Name => user::Column::Name,
            UserField::Email => user::Column::Email,
        };

        let txn = self.db.begin().await?;
        let updated = user::Entity::update_many()
            .col_expr(column, Expr::val(value.to_string()).into())
            .col_expr(user::Column::UpdatedAt, Expr::val(Utc::now()).into())
            .filter(user::Column::Id.eq(user_id))
            .exec(&txn)
            .await;

        self.finish_update(txn, user_id, updated).await
    }

    /// Sets name and email together.
    pub async fn update_user_profile(&self, user_id: &str, name: &str, email: &str) -> Result<User> {
        let txn = self.db.begin().await?;
        let updated = user::Entity::update_many()
            .col_expr(user::Column::Name, Expr::val(name.to_string()).into())
            .col_expr(user::Column::Email, Expr::val(email.to_string()).into())
            .col_expr(user::Column::UpdatedAt, Expr::val(Utc::now()).into())
            .filter(user::Column::Id.eq(user_id))
            .exec(&txn)
            .await;

        self.finish_update(txn, user_id, updated).await
    }

    async fn finish_update(
        &self,
        txn: DatabaseTransaction,
        user_id: &str,
        updated: std::result::Result<sea_orm::UpdateResult, DbErr>,
    ) -> Result<User> {
        match updated {
            Ok(res) if res.rows_affected == 0 => {
                txn.rollback().await?;
                Err(LeanurlsError::not_found(format!("User not found: {}", user_id)))
            }
            Ok(_) => {
                let user = load_in_txn(&txn, user_id).await?;
                txn.commit().await?;
                Ok(user)
            }
            Err(e) => {
                txn.rollback().await?;
                Err(map_write_error(e))
            }
        }
    }

    /// Removes the user together with their links and hits.
    pub async fn delete_user(&self, user_id: &str) -> Result<bool> {
        let db = &self.db;

        let result = retry::with_retry(
            &format!("delete_user({})", user_id),
            self.retry_config,
            || async {
                user::Entity::delete_many()
                    .filter(user::Column::Id.eq(user_id))
                    .exec(db)
                    .await
            },
        )
        .await?;

        if result.rows_affected > 0 {
            info!("User deleted: {}", user_id);
        }
        Ok(result.rows_affected > 0)
    }

    pub async fn find_user(&self, user_id: &str) -> Result<Option<User>> {
        let db = &self.db;

        let model = retry::with_retry(
            &format!("find_user({})", user_id),
            self.retry_config,
            || async { user::Entity::find_by_id(user_id.to_string()).one(db).await },
        )
        .await?;

        Ok(model.map(model_to_user))
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        let db = &self.db;

        let models = retry::with_retry("list_users", self.retry_config, || async {
            user::Entity::find()
                .order_by_asc(user::Column::CreatedAt)
                .order_by_asc(user::Column::Id)
                .all(db)
                .await
        })
        .await?;

        Ok(models.into_iter().map(model_to_user).collect())
    }
}
