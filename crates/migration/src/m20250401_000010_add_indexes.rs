use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Items: lookups by owner and by originating request
        manager
            .create_index(
                Index::create()
                    .name("idx_items_owner")
                    .table(Items::Table)
                    .col(Items::OwnerId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_items_request")
                    .table(Items::Table)
                    .col(Items::RequestId)
                    .to_owned(),
            )
            .await?;

        // Bookings: per booker and per item listings
        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_booker")
                    .table(Bookings::Table)
                    .col(Bookings::BookerId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_item")
                    .table(Bookings::Table)
                    .col(Bookings::ItemId)
                    .to_owned(),
            )
            .await?;

        // Comments: per item
        manager
            .create_index(
                Index::create()
                    .name("idx_comments_item")
                    .table(Comments::Table)
                    .col(Comments::ItemId)
                    .to_owned(),
            )
            .await?;

        // Requests: per requester
        manager
            .create_index(
                Index::create()
                    .name("idx_requests_requester")
                    .table(Requests::Table)
                    .col(Requests::RequesterId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_items_owner").table(Items::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_items_request").table(Items::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_bookings_booker").table(Bookings::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_bookings_item").table(Bookings::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_comments_item").table(Comments::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_requests_requester").table(Requests::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Items { Table, OwnerId, RequestId }

#[derive(DeriveIden)]
enum Bookings { Table, BookerId, ItemId }

#[derive(DeriveIden)]
enum Comments { Table, ItemId }

#[derive(DeriveIden)]
enum Requests { Table, RequesterId }
