use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set};

use super::SeaOrmStorage;
use super::converters::model_to_hit;
use crate::errors::Result;
use crate::storage::Hit;

use migration::entities::hit;

impl SeaOrmStorage {
    /// 追加一条访问记录（不去重、不限流）
    pub async fn insert_hit(&self, link_id: i64) -> Result<Hit> {
        let model = hit::ActiveModel {
            link_id: Set(link_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(model_to_hit(model))
    }
}
