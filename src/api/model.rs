//! Wire types.
//!
//! Field names are camelCase. Timestamps travel as ISO-8601 date-times
//! without an offset and are read and written as UTC.

use crate::{
    core::{booking::BookingView, comment::CommentView, item::ItemView, request::RequestView},
    entities::{BookingModel, BookingStatus, ItemModel, ItemRequestModel, UserModel},
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

pub(crate) fn to_wire(time: DateTime<Utc>) -> NaiveDateTime {
    time.naive_utc()
}

pub(crate) fn from_wire(time: NaiveDateTime) -> DateTime<Utc> {
    time.and_utc()
}

// -------------------------------------------------------------------------
// Users
// -------------------------------------------------------------------------

/// Body of `POST /users`
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

/// Body of `PATCH /users/:id`; absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
/// A user as returned by every `/users` route
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<UserModel> for UserResponse {
    fn from(value: UserModel) -> Self {
        let UserModel { id, name, email } = value;
        Self { id, name, email }
    }
}

// -------------------------------------------------------------------------
// Items and comments
// -------------------------------------------------------------------------

/// Body of `POST /items`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub name: String,
    pub description: String,
    pub available: bool,
    /// Request this item answers
    pub request_id: Option<i64>,
}

/// Body of `PATCH /items/:id`
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

/// Item fields without the owner-only overview
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: i64,
    pub request_id: Option<i64>,
}

impl From<ItemModel> for ItemResponse {
    fn from(value: ItemModel) -> Self {
        let ItemModel {
            id,
            name,
            description,
            available,
            owner_id,
            request_id,
        } = value;
        Self {
            id,
            name,
            description,
            available,
            owner_id,
            request_id,
        }
    }
}

/// Short form of a booking shown in the owner's item overview
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookingShort {
    pub id: i64,
    pub booker_id: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl From<BookingModel> for BookingShort {
    fn from(value: BookingModel) -> Self {
        Self {
            id: value.id,
            booker_id: value.booker_id,
            start: to_wire(value.start),
            end: to_wire(value.end),
        }
    }
}

/// Body of `POST /items/:id/comment`
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i64,
    pub text: String,
    /// Name of the user who wrote it
    pub author_name: String,
    pub created: NaiveDateTime,
}

impl From<CommentView> for CommentResponse {
    fn from(value: CommentView) -> Self {
        Self {
            id: value.comment.id,
            text: value.comment.text,
            author_name: value.author_name,
            created: to_wire(value.comment.created),
        }
    }
}

/// `GET /items/:id` and the owner's listing.
///
/// `last_booking` and `next_booking` are only filled in for the owner.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetailsResponse {
    #[serde(flatten)]
    pub item: ItemResponse,
    pub last_booking: Option<BookingShort>,
    pub next_booking: Option<BookingShort>,
    pub comments: Vec<CommentResponse>,
}

impl From<ItemView> for ItemDetailsResponse {
    fn from(value: ItemView) -> Self {
        Self {
            item: value.item.into(),
            last_booking: value.last_booking.map(Into::into),
            next_booking: value.next_booking.map(Into::into),
            comments: value.comments.into_iter().map(Into::into).collect(),
        }
    }
}

// -------------------------------------------------------------------------
// Item requests
// -------------------------------------------------------------------------

/// Body of `POST /requests`
#[derive(Debug, Deserialize)]
pub struct CreateItemRequestRequest {
    pub description: String,
}

/// An item request with the items offered in answer
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequestResponse {
    pub id: i64,
    pub description: String,
    pub requester_id: i64,
    pub created: NaiveDateTime,
    pub items: Vec<ItemResponse>,
}

impl From<ItemRequestModel> for ItemRequestResponse {
    fn from(value: ItemRequestModel) -> Self {
        Self {
            id: value.id,
            description: value.description,
            requester_id: value.requester_id,
            created: to_wire(value.created),
            items: Vec::new(),
        }
    }
}

impl From<RequestView> for ItemRequestResponse {
    fn from(value: RequestView) -> Self {
        Self {
            items: value.items.into_iter().map(Into::into).collect(),
            ..value.request.into()
        }
    }
}

// -------------------------------------------------------------------------
// Bookings
// -------------------------------------------------------------------------

/// Body of `POST /bookings`. Missing bounds are rejected by the core.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub item_id: i64,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
/// Booker reference inside [`BookingResponse`]
pub struct BookerRef {
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
/// Item reference inside [`BookingResponse`]
pub struct ItemRef {
    pub id: i64,
    pub name: String,
}

/// A booking with its booker and item
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingResponse {
    pub id: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: BookingStatus,
    pub booker: BookerRef,
    pub item: ItemRef,
}

impl From<BookingView> for BookingResponse {
    fn from(value: BookingView) -> Self {
        let BookingView { booking, item } = value;
        Self {
            id: booking.id,
            start: to_wire(booking.start),
            end: to_wire(booking.end),
            status: booking.status,
            booker: BookerRef {
                id: booking.booker_id,
            },
            item: ItemRef {
                id: item.id,
                name: item.name,
            },
        }
    }
}
