//! Create `requests` table: descriptions of items somebody wants to borrow.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Requests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Requests::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(big_integer(Requests::RequesterId).not_null())
                    .col(string_len(Requests::Description, 1024).not_null())
                    .col(date_time(Requests::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_requests_requester")
                            .from(Requests::Table, Requests::RequesterId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Requests::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Requests { Table, Id, RequesterId, Description, CreatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }
