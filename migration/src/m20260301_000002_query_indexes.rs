//! Indexes backing the owner-scoped listing and the hit aggregations

use sea_orm_migration::prelude::*;

use crate::m20260301_000001_initial_tables::{Hit, Link};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 表格视图：按 owner 过滤、按 created_at 倒序
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_links_owner_created")
                    .table(Link::Table)
                    .col(Link::OwnerId)
                    .col(Link::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // 计数 / 最近访问时间
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_hits_link_created")
                    .table(Hit::Table)
                    .col(Hit::LinkId)
                    .col(Hit::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_hits_link_created")
                    .table(Hit::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_links_owner_created")
                    .table(Link::Table)
                    .to_owned(),
            )
            .await
    }
}
