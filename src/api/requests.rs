//! `/requests` handlers.

use super::{
    AppState,
    error::ApiError,
    extractor::{PageParams, SharerId},
    model::{CreateItemRequestRequest, ItemRequestResponse},
};
use crate::core::request;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;

/// `POST /requests`
pub async fn create_request(
    State(state): State<AppState>,
    SharerId(requester_id): SharerId,
    Json(req): Json<CreateItemRequestRequest>,
) -> Result<Json<ItemRequestResponse>, ApiError> {
    let created =
        request::create_request(&state.db, requester_id, &req.description, Utc::now()).await?;
    Ok(Json(created.into()))
}

/// `GET /requests`
pub async fn list_own_requests(
    State(state): State<AppState>,
    SharerId(requester_id): SharerId,
) -> Result<Json<Vec<ItemRequestResponse>>, ApiError> {
    let views = request::list_own_requests(&state.db, requester_id).await?;
    Ok(Json(views.into_iter().map(Into::into).collect()))
}

/// `GET /requests/all` - other users' requests.
pub async fn list_other_requests(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<ItemRequestResponse>>, ApiError> {
    let page = params.page(&state)?;
    let views = request::list_other_requests(&state.db, user_id, page).await?;
    Ok(Json(views.into_iter().map(Into::into).collect()))
}

/// `GET /requests/:id`
pub async fn get_request(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    Path(request_id): Path<i64>,
) -> Result<Json<ItemRequestResponse>, ApiError> {
    let view = request::get_request(&state.db, user_id, request_id).await?;
    Ok(Json(view.into()))
}
