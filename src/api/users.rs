//! `/users` handlers.

use super::{
    AppState,
    error::ApiError,
    model::{CreateUserRequest, UpdateUserRequest, UserResponse},
};
use crate::core::user::{self, UserUpdate};
use axum::{
    Json,
    extract::{Path, State},
};

/// `POST /users`
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = user::create_user(&state.db, &req.name, &req.email).await?;
    Ok(Json(user.into()))
}

/// `GET /users`
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = user::list_users(&state.db).await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// `GET /users/:id`
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = user::get_user(&state.db, user_id).await?;
    Ok(Json(user.into()))
}

/// `PATCH /users/:id`
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let update = UserUpdate {
        name: req.name,
        email: req.email,
    };
    let user = user::update_user(&state.db, user_id, update).await?;
    Ok(Json(user.into()))
}

/// `DELETE /users/:id`
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<(), ApiError> {
    user::delete_user(&state.db, user_id).await?;
    Ok(())
}
