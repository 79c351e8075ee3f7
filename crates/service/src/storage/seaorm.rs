use async_trait::async_trait;
use common::BookingStatus;
use models::{booking, comment, item, request, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, JoinType, Set,
};

use crate::booking::{domain::{Booking, BookingDraft}, repository::BookingRepository};
use crate::errors::ServiceError;
use crate::item::{
    domain::{Comment, CommentDraft, Item, ItemDraft},
    repository::{CommentRepository, ItemRepository},
};
use crate::request::{domain::{Request, RequestDraft}, repository::RequestRepository};
use crate::user::{domain::{NewUser, User}, repository::UserRepository};

/// Relational storage over the `models` entities.
#[derive(Clone)]
pub struct SeaOrmStore {
    pub db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn bookings(rows: Vec<booking::Model>) -> Result<Vec<Booking>, ServiceError> {
    rows.into_iter().map(Booking::try_from).collect()
}

fn comment_from(row: comment::Model, author: Option<user::Model>) -> Comment {
    Comment {
        id: row.id,
        item_id: row.item_id,
        author_id: row.author_id,
        author_name: author.map(|u| u.name).unwrap_or_default(),
        text: row.text,
        created: row.created_at,
    }
}

#[async_trait]
impl UserRepository for SeaOrmStore {
    async fn create(&self, input: &NewUser) -> Result<User, ServiceError> {
        let am = user::ActiveModel {
            name: Set(input.name.clone()),
            email: Set(input.email.clone()),
            ..Default::default()
        };
        Ok(am.insert(&self.db).await?.into())
    }

    async fn find(&self, id: i64) -> Result<Option<User>, ServiceError> {
        Ok(user::Entity::find_by_id(id).one(&self.db).await?.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        Ok(user::find_by_email(&self.db, email).await?.map(User::from))
    }

    async fn list(&self) -> Result<Vec<User>, ServiceError> {
        let rows = user::Entity::find().order_by_asc(user::Column::Id).all(&self.db).await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn update(&self, u: &User) -> Result<User, ServiceError> {
        let existing = user::Entity::find_by_id(u.id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", u.id))?;
        let mut am: user::ActiveModel = existing.into();
        am.name = Set(u.name.clone());
        am.email = Set(u.email.clone());
        Ok(am.update(&self.db).await?.into())
    }

    async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        let res = user::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}

#[async_trait]
impl ItemRepository for SeaOrmStore {
    async fn create(&self, draft: &ItemDraft) -> Result<Item, ServiceError> {
        let created = item::create(
            &self.db,
            draft.owner_id,
            draft.request_id,
            &draft.name,
            &draft.description,
            draft.available,
        )
        .await?;
        Ok(created.into())
    }

    async fn find(&self, id: i64) -> Result<Option<Item>, ServiceError> {
        Ok(item::Entity::find_by_id(id).one(&self.db).await?.map(Item::from))
    }

    async fn update(&self, i: &Item) -> Result<Item, ServiceError> {
        let existing = item::Entity::find_by_id(i.id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Item", i.id))?;
        let mut am: item::ActiveModel = existing.into();
        am.name = Set(i.name.clone());
        am.description = Set(i.description.clone());
        am.available = Set(i.available);
        Ok(am.update(&self.db).await?.into())
    }

    async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        let res = item::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Item>, ServiceError> {
        let rows = item::Entity::find()
            .filter(item::Column::OwnerId.eq(owner_id))
            .order_by_asc(item::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn search_available(&self, text: &str) -> Result<Vec<Item>, ServiceError> {
        let rows = item::search_available(&self.db, text).await?;
        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn list_by_requests(&self, request_ids: &[i64]) -> Result<Vec<Item>, ServiceError> {
        if request_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = item::Entity::find()
            .filter(item::Column::RequestId.is_in(request_ids.to_vec()))
            .order_by_asc(item::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Item::from).collect())
    }
}

#[async_trait]
impl CommentRepository for SeaOrmStore {
    async fn create(&self, draft: &CommentDraft) -> Result<Comment, ServiceError> {
        let row = comment::create(&self.db, draft.author_id, draft.item_id, &draft.text, draft.created).await?;
        let author = user::Entity::find_by_id(row.author_id).one(&self.db).await?;
        Ok(comment_from(row, author))
    }

    async fn list_by_items(&self, item_ids: &[i64]) -> Result<Vec<Comment>, ServiceError> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = comment::Entity::find()
            .filter(comment::Column::ItemId.is_in(item_ids.to_vec()))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .find_also_related(user::Entity)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|(c, u)| comment_from(c, u)).collect())
    }
}

#[async_trait]
impl BookingRepository for SeaOrmStore {
    async fn create(&self, draft: &BookingDraft) -> Result<Booking, ServiceError> {
        let row = booking::create(
            &self.db,
            draft.booker_id,
            draft.item_id,
            draft.start,
            draft.end,
            draft.status.as_str(),
        )
        .await?;
        Booking::try_from(row)
    }

    async fn find(&self, id: i64) -> Result<Option<Booking>, ServiceError> {
        booking::Entity::find_by_id(id).one(&self.db).await?.map(Booking::try_from).transpose()
    }

    async fn set_status(&self, id: i64, status: BookingStatus) -> Result<Booking, ServiceError> {
        let existing = booking::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Booking", id))?;
        let mut am: booking::ActiveModel = existing.into();
        am.status = Set(status.as_str().to_string());
        Booking::try_from(am.update(&self.db).await?)
    }

    async fn list_by_booker(&self, booker_id: i64) -> Result<Vec<Booking>, ServiceError> {
        let rows = booking::Entity::find()
            .filter(booking::Column::BookerId.eq(booker_id))
            .order_by_desc(booking::Column::StartDate)
            .all(&self.db)
            .await?;
        bookings(rows)
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Booking>, ServiceError> {
        let rows = booking::Entity::find()
            .join(JoinType::InnerJoin, booking::Relation::Item.def())
            .filter(item::Column::OwnerId.eq(owner_id))
            .order_by_desc(booking::Column::StartDate)
            .all(&self.db)
            .await?;
        bookings(rows)
    }

    async fn list_by_items(&self, item_ids: &[i64]) -> Result<Vec<Booking>, ServiceError> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = booking::Entity::find()
            .filter(booking::Column::ItemId.is_in(item_ids.to_vec()))
            .all(&self.db)
            .await?;
        bookings(rows)
    }
}

#[async_trait]
impl RequestRepository for SeaOrmStore {
    async fn create(&self, draft: &RequestDraft) -> Result<Request, ServiceError> {
        let row = request::create(&self.db, draft.requester_id, &draft.description, draft.created).await?;
        Ok(row.into())
    }

    async fn find(&self, id: i64) -> Result<Option<Request>, ServiceError> {
        Ok(request::Entity::find_by_id(id).one(&self.db).await?.map(Request::from))
    }

    async fn list_by_requester(&self, requester_id: i64) -> Result<Vec<Request>, ServiceError> {
        let rows = request::Entity::find()
            .filter(request::Column::RequesterId.eq(requester_id))
            .order_by_desc(request::Column::CreatedAt)
            .order_by_desc(request::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Request::from).collect())
    }

    async fn list_excluding_requester(&self, requester_id: i64) -> Result<Vec<Request>, ServiceError> {
        let rows = request::Entity::find()
            .filter(request::Column::RequesterId.ne(requester_id))
            .order_by_desc(request::Column::CreatedAt)
            .order_by_desc(request::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Request::from).collect())
    }
}
