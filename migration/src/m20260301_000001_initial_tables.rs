use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 短链别名区分大小写；MySQL 默认排序规则不区分，需显式使用二进制排序
fn alias_column(backend: DatabaseBackend) -> ColumnDef {
    let mut column = ColumnDef::new(Link::Alias);
    column.string_len(32).not_null().unique_key();
    if backend == DatabaseBackend::MySql {
        column.extra("COLLATE utf8mb4_bin");
    }
    column
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users：主键为身份提供方的 subject，不自增
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(User::Id)
                            .string_len(128)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(User::Name).string_len(128).null())
                    .col(
                        ColumnDef::new(User::Email)
                            .string_len(150)
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(User::AvatarUrl).text().null())
                    .col(
                        ColumnDef::new(User::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(User::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Link::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Link::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Link::Url).text().not_null())
                    .col(&mut alias_column(manager.get_database_backend()))
                    .col(ColumnDef::new(Link::OwnerId).string_len(128).not_null())
                    .col(
                        ColumnDef::new(Link::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Link::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_links_owner")
                            .from(Link::Table, Link::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Hit::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Hit::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Hit::LinkId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Hit::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hits_link")
                            .from(Hit::Table, Hit::LinkId)
                            .to(Link::Table, Link::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按依赖逆序删除
        manager
            .drop_table(Table::drop().table(Hit::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Link::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum User {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Name,
    Email,
    AvatarUrl,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Link {
    #[sea_orm(iden = "links")]
    Table,
    Id,
    Url,
    Alias,
    OwnerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Hit {
    #[sea_orm(iden = "hits")]
    Table,
    Id,
    LinkId,
    CreatedAt,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links_table_sql(backend: DatabaseBackend) -> String {
        let stmt = Table::create()
            .table(Link::Table)
            .col(&mut alias_column(backend))
            .to_owned();
        match backend {
            DatabaseBackend::MySql => stmt.to_string(MysqlQueryBuilder),
            DatabaseBackend::Postgres => stmt.to_string(PostgresQueryBuilder),
            _ => stmt.to_string(SqliteQueryBuilder),
        }
    }

    #[test]
    fn test_alias_binary_collation_on_mysql_only() {
        assert!(links_table_sql(DatabaseBackend::MySql).contains("COLLATE utf8mb4_bin"));
        assert!(!links_table_sql(DatabaseBackend::Sqlite).contains("COLLATE"));
        assert!(!links_table_sql(DatabaseBackend::Postgres).contains("COLLATE"));
    }
}
