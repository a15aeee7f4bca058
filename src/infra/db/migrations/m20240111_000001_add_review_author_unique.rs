//! Migration: Enforce one review per (user, service) at the store level.
//!
//! The application also checks before inserting, but only this index
//! makes the invariant hold under concurrent creates.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_user_id_service_id")
                    .table(Reviews::Table)
                    .col(Reviews::UserId)
                    .col(Reviews::ServiceId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_reviews_user_id_service_id")
                    .table(Reviews::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum Reviews {
    Table,
    UserId,
    ServiceId,
}
