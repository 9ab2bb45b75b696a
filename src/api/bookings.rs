//! `/bookings` handlers.

use super::{
    AppState,
    error::ApiError,
    extractor::{BookingListParams, SharerId},
    model::{BookingResponse, CreateBookingRequest, from_wire},
};
use crate::core::{
    booking::{self, Decision, NewBooking},
    classifier,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use serde::Deserialize;

/// `?approved=` parameter of the owner's decision.
#[derive(Debug, Deserialize)]
pub struct DecisionParams {
    /// `true` or `false`, case-insensitive
    pub approved: Option<String>,
}

/// `POST /bookings`
pub async fn create_booking(
    State(state): State<AppState>,
    SharerId(booker_id): SharerId,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<BookingResponse>, ApiError> {
    let new_booking = NewBooking {
        item_id: req.item_id,
        start: req.start.map(from_wire),
        end: req.end.map(from_wire),
    };
    let view = booking::create_booking(&state.db, booker_id, new_booking, Utc::now()).await?;
    Ok(Json(view.into()))
}

/// `PATCH /bookings/:id?approved=true|false`
pub async fn decide_booking(
    State(state): State<AppState>,
    SharerId(owner_id): SharerId,
    Path(booking_id): Path<i64>,
    Query(params): Query<DecisionParams>,
) -> Result<Json<BookingResponse>, ApiError> {
    let decision: Decision = params
        .approved
        .as_deref()
        .ok_or_else(|| ApiError::bad_request("Missing 'approved' parameter"))?
        .parse()?;
    let view = booking::decide_booking(&state.db, booking_id, owner_id, decision).await?;
    Ok(Json(view.into()))
}

/// `GET /bookings/:id`
pub async fn get_booking(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    Path(booking_id): Path<i64>,
) -> Result<Json<BookingResponse>, ApiError> {
    let view = booking::get_booking(&state.db, booking_id, user_id).await?;
    Ok(Json(view.into()))
}

/// `GET /bookings?state=`
pub async fn list_for_booker(
    State(state): State<AppState>,
    SharerId(booker_id): SharerId,
    Query(params): Query<BookingListParams>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let booking_state = params.state()?;
    let page = params.page(&state)?;
    let views =
        classifier::list_for_booker(&state.db, booker_id, booking_state, page, Utc::now()).await?;
    Ok(Json(views.into_iter().map(Into::into).collect()))
}

/// `GET /bookings/owner?state=`
pub async fn list_for_owner(
    State(state): State<AppState>,
    SharerId(owner_id): SharerId,
    Query(params): Query<BookingListParams>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let booking_state = params.state()?;
    let page = params.page(&state)?;
    let views =
        classifier::list_for_owner(&state.db, owner_id, booking_state, page, Utc::now()).await?;
    Ok(Json(views.into_iter().map(Into::into).collect()))
}
