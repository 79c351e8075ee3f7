use chrono::{Duration, NaiveDate, NaiveDateTime};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, ColumnTrait, JoinType, QuerySelect, RelationTrait, ModelTrait};

use crate::{booking, comment, db, item, request, user};

async fn fresh_db() -> DatabaseConnection {
    let db = db::connect_with_config(&db::DatabaseConfig::sqlite_memory()).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

fn at(h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 4, 24).unwrap().and_hms_opt(h, 0, 0).unwrap()
}

#[tokio::test]
async fn memory_url_opens_single_sqlite_connection() {
    let cfg = db::DatabaseConfig { max_connections: 8, min_connections: 2, ..db::DatabaseConfig::sqlite_memory() };
    let conn = db::connect_with_config(&cfg).await.unwrap();
    assert_eq!(conn.get_database_backend(), sea_orm::DatabaseBackend::Sqlite);
    // tables created through one handle are visible to the next query
    Migrator::up(&conn, None).await.unwrap();
    user::create(&conn, "Ann", "ann@example.com").await.unwrap();
    assert!(user::find_by_email(&conn, "ann@example.com").await.unwrap().is_some());
}

#[tokio::test]
async fn user_email_is_unique() {
    let db = fresh_db().await;
    user::create(&db, "Ann", "ann@example.com").await.unwrap();
    let dup = user::create(&db, "Other", "ann@example.com").await;
    assert!(matches!(dup, Err(crate::errors::ModelError::Db(_))));
    let found = user::find_by_email(&db, "ann@example.com").await.unwrap();
    assert_eq!(found.map(|u| u.name), Some("Ann".to_string()));
}

#[tokio::test]
async fn search_is_case_insensitive_and_skips_unavailable() {
    let db = fresh_db().await;
    let owner = user::create(&db, "Owner", "owner@example.com").await.unwrap();
    item::create(&db, owner.id, None, "Power Drill", "cordless", true).await.unwrap();
    item::create(&db, owner.id, None, "Saw", "a DRILL-free tool", true).await.unwrap();
    item::create(&db, owner.id, None, "Old drill", "broken", false).await.unwrap();

    let found = item::search_available(&db, "dRiLl").await.unwrap();
    let names: Vec<_> = found.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Power Drill", "Saw"]);
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
    let db = fresh_db().await;
    let owner = user::create(&db, "Owner", "owner@example.com").await.unwrap();
    item::create(&db, owner.id, None, "Drill", "cordless", true).await.unwrap();
    item::create(&db, owner.id, None, "Tent", "two person", true).await.unwrap();

    assert!(item::search_available(&db, "%").await.unwrap().is_empty());
    assert!(item::search_available(&db, "_").await.unwrap().is_empty());
    assert!(item::search_available(&db, "d_ill").await.unwrap().is_empty());

    item::create(&db, owner.id, None, "Sale_tag", "100% cotton", true).await.unwrap();
    let pct: Vec<_> = item::search_available(&db, "0%").await.unwrap().into_iter().map(|i| i.name).collect();
    assert_eq!(pct, vec!["Sale_tag"]);
    let underscore: Vec<_> = item::search_available(&db, "E_T").await.unwrap().into_iter().map(|i| i.name).collect();
    assert_eq!(underscore, vec!["Sale_tag"]);
}

#[tokio::test]
async fn bookings_join_their_items() {
    let db = fresh_db().await;
    let owner = user::create(&db, "Owner", "o@example.com").await.unwrap();
    let booker = user::create(&db, "Booker", "b@example.com").await.unwrap();
    let it = item::create(&db, owner.id, None, "Tent", "two person", true).await.unwrap();
    booking::create(&db, booker.id, it.id, at(10), at(12), "WAITING").await.unwrap();

    let owned = booking::Entity::find()
        .join(JoinType::InnerJoin, booking::Relation::Item.def())
        .filter(item::Column::OwnerId.eq(owner.id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].start_date + Duration::hours(2), owned[0].end_date);
    let linked = owned[0].find_related(item::Entity).one(&db).await.unwrap();
    assert_eq!(linked.map(|i| i.id), Some(it.id));
}

#[tokio::test]
async fn booking_rejects_bad_period_and_status() {
    let db = fresh_db().await;
    let owner = user::create(&db, "Owner", "o2@example.com").await.unwrap();
    let it = item::create(&db, owner.id, None, "Kayak", "single", true).await.unwrap();
    assert!(booking::create(&db, owner.id, it.id, at(12), at(12), "WAITING").await.is_err());
    assert!(booking::create(&db, owner.id, it.id, at(10), at(12), "LOST").await.is_err());
}

#[tokio::test]
async fn deleting_user_cascades() {
    let db = fresh_db().await;
    let owner = user::create(&db, "Owner", "o3@example.com").await.unwrap();
    let req = request::create(&db, owner.id, "need a ladder", at(9)).await.unwrap();
    let it = item::create(&db, owner.id, Some(req.id), "Ladder", "3m", true).await.unwrap();
    comment::create(&db, owner.id, it.id, "sturdy", at(11)).await.unwrap();

    user::Entity::delete_by_id(owner.id).exec(&db).await.unwrap();
    assert!(item::Entity::find_by_id(it.id).one(&db).await.unwrap().is_none());
    assert!(comment::Entity::find().all(&db).await.unwrap().is_empty());
    assert!(request::Entity::find().all(&db).await.unwrap().is_empty());
}
