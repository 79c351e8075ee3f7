use utoipa::OpenApi;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(ToSchema, Serialize)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema, Serialize)]
pub struct ErrorDoc { pub error: String, pub message: Option<String> }

#[derive(ToSchema, Serialize)]
pub struct UserDoc { pub id: i64, pub name: String, pub email: String }

#[derive(ToSchema, Serialize)]
pub struct NewUserDoc { pub name: String, pub email: String }

#[derive(ToSchema, Serialize)]
pub struct UserPatchDoc { pub name: Option<String>, pub email: Option<String> }

#[derive(ToSchema, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDoc {
    pub id: i64,
    pub owner_id: i64,
    pub request_id: Option<i64>,
    pub name: String,
    pub description: String,
    pub available: bool,
}

#[derive(ToSchema, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItemDoc {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<i64>,
}

#[derive(ToSchema, Serialize)]
pub struct ItemPatchDoc { pub name: Option<String>, pub description: Option<String>, pub available: Option<bool> }

#[derive(ToSchema, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDoc {
    pub id: i64,
    pub item_id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub text: String,
    /// `2025-04-24T20:15:47`
    pub created: String,
}

#[derive(ToSchema, Serialize)]
pub struct NewCommentDoc { pub text: String }

#[derive(ToSchema, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetailsDoc {
    pub id: i64,
    pub owner_id: i64,
    pub request_id: Option<i64>,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub last_booking: Option<String>,
    pub next_booking: Option<String>,
    pub comments: Vec<CommentDoc>,
}

#[derive(ToSchema, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummaryDoc {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<i64>,
}

#[derive(ToSchema, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBookingDoc { pub item_id: i64, pub start: String, pub end: String }

#[derive(ToSchema, Serialize)]
pub struct BookingDoc {
    pub id: i64,
    pub start: String,
    pub end: String,
    /// WAITING, APPROVED, REJECTED or CANCELED
    pub status: String,
    /// WAITING, REJECTED, CURRENT, PAST or FUTURE
    pub state: String,
    pub booker: UserDoc,
    pub item: ItemSummaryDoc,
}

#[derive(ToSchema, Serialize)]
pub struct NewRequestDoc { pub description: String }

#[derive(ToSchema, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDoc { pub id: i64, pub requester_id: i64, pub description: String, pub created: String }

#[derive(ToSchema, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDoc { pub item_id: i64, pub owner_id: i64, pub name: String }

#[derive(ToSchema, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestWithAnswersDoc {
    pub id: i64,
    pub requester_id: i64,
    pub description: String,
    pub created: String,
    pub items: Vec<AnswerDoc>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::users::create,
        crate::routes::users::list,
        crate::routes::users::get_one,
        crate::routes::users::update,
        crate::routes::users::remove,
        crate::routes::items::create,
        crate::routes::items::update,
        crate::routes::items::get_one,
        crate::routes::items::list_own,
        crate::routes::items::search,
        crate::routes::items::remove,
        crate::routes::items::add_comment,
        crate::routes::bookings::create,
        crate::routes::bookings::decide,
        crate::routes::bookings::get_one,
        crate::routes::bookings::list_by_booker,
        crate::routes::bookings::list_by_owner,
        crate::routes::requests::create,
        crate::routes::requests::list_own,
        crate::routes::requests::list_others,
        crate::routes::requests::get_one,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorDoc,
            UserDoc,
            NewUserDoc,
            UserPatchDoc,
            ItemDoc,
            NewItemDoc,
            ItemPatchDoc,
            CommentDoc,
            NewCommentDoc,
            ItemDetailsDoc,
            ItemSummaryDoc,
            NewBookingDoc,
            BookingDoc,
            NewRequestDoc,
            RequestDoc,
            AnswerDoc,
            RequestWithAnswersDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "users"),
        (name = "items"),
        (name = "bookings"),
        (name = "requests")
    )
)]
pub struct ApiDoc;
