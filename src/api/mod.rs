//! JSON-over-HTTP surface.
//!
//! Handlers are thin: they pull the acting user from `X-Sharer-User-Id`,
//! convert wire types, call into [`crate::core`] with the current time, and
//! let [`error::ApiError`] turn failures into status codes.

mod bookings;
pub mod error;
pub mod extractor;
mod items;
pub mod model;
mod requests;
mod users;

use axum::{
    Router,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Connection shared by every handler
    pub db: Arc<DatabaseConnection>,
    /// Page size used when a listing request omits `size`
    pub default_page_size: u64,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let users = Router::new()
        .route("/", post(users::create_user).get(users::list_users))
        .route(
            "/:id",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        );

    let items = Router::new()
        .route("/", post(items::create_item).get(items::list_owner_items))
        .route("/search", get(items::search_items))
        .route("/:id", get(items::get_item).patch(items::update_item))
        .route("/:id/comment", post(items::add_comment));

    let requests = Router::new()
        .route(
            "/",
            post(requests::create_request).get(requests::list_own_requests),
        )
        .route("/all", get(requests::list_other_requests))
        .route("/:id", get(requests::get_request));

    let bookings = Router::new()
        .route(
            "/",
            post(bookings::create_booking).get(bookings::list_for_booker),
        )
        .route("/owner", get(bookings::list_for_owner))
        .route(
            "/:id",
            get(bookings::get_booking).patch(bookings::decide_booking),
        );

    Router::new()
        .nest("/users", users)
        .nest("/items", items)
        .nest("/requests", requests)
        .nest("/bookings", bookings)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
