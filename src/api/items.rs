//! `/items` handlers, including comments.

use super::{
    AppState,
    error::ApiError,
    extractor::{PageParams, SharerId},
    model::{
        CommentResponse, CreateCommentRequest, CreateItemRequest, ItemDetailsResponse,
        ItemResponse, UpdateItemRequest,
    },
};
use crate::core::{
    comment,
    item::{self, ItemUpdate, NewItem},
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use serde::Deserialize;

/// `?text=&from=&size=` parameters of the item search.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub text: String,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

/// `POST /items` - the acting user becomes the owner.
pub async fn create_item(
    State(state): State<AppState>,
    SharerId(owner_id): SharerId,
    Json(req): Json<CreateItemRequest>,
) -> Result<Json<ItemResponse>, ApiError> {
    let new_item = NewItem {
        name: req.name,
        description: req.description,
        available: req.available,
        request_id: req.request_id,
    };
    let item = item::create_item(&state.db, owner_id, new_item).await?;
    Ok(Json(item.into()))
}

/// `PATCH /items/:id`
pub async fn update_item(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    Path(item_id): Path<i64>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<Json<ItemResponse>, ApiError> {
    let update = ItemUpdate {
        name: req.name,
        description: req.description,
        available: req.available,
    };
    let item = item::update_item(&state.db, user_id, item_id, update).await?;
    Ok(Json(item.into()))
}

/// `GET /items/:id`
pub async fn get_item(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    Path(item_id): Path<i64>,
) -> Result<Json<ItemDetailsResponse>, ApiError> {
    let view = item::get_item(&state.db, user_id, item_id, Utc::now()).await?;
    Ok(Json(view.into()))
}

/// `GET /items` - the acting user's own items.
pub async fn list_owner_items(
    State(state): State<AppState>,
    SharerId(owner_id): SharerId,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<ItemDetailsResponse>>, ApiError> {
    let page = params.page(&state)?;
    let views = item::list_owner_items(&state.db, owner_id, page, Utc::now()).await?;
    Ok(Json(views.into_iter().map(Into::into).collect()))
}

/// `GET /items/search?text=`
pub async fn search_items(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<ItemResponse>>, ApiError> {
    let page = PageParams {
        from: params.from,
        size: params.size,
    }
    .page(&state)?;
    let items = item::search_items(&state.db, &params.text, page).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

/// `POST /items/:id/comment`
pub async fn add_comment(
    State(state): State<AppState>,
    SharerId(author_id): SharerId,
    Path(item_id): Path<i64>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<Json<CommentResponse>, ApiError> {
    let view = comment::add_comment(&state.db, author_id, item_id, &req.text, Utc::now()).await?;
    Ok(Json(view.into()))
}
