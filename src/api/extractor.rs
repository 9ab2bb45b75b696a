//! Request extractors shared by the handlers.

use super::{AppState, error::ApiError};
use crate::core::{classifier::BookingState, page::Page};
use axum::{extract::FromRequestParts, http::request::Parts};
use serde::Deserialize;

/// Header carrying the id of the acting user
pub const SHARER_HEADER: &str = "X-Sharer-User-Id";

/// The acting user, taken from [`SHARER_HEADER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharerId(pub i64);

#[axum::async_trait]
impl<S> FromRequestParts<S> for SharerId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(SHARER_HEADER)
            .ok_or_else(|| ApiError::bad_request(format!("Missing {SHARER_HEADER} header")))?;

        value
            .to_str()
            .ok()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .map(Self)
            .ok_or_else(|| ApiError::bad_request(format!("Malformed {SHARER_HEADER} header")))
    }
}

/// `?from=&size=` listing parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    /// Index of the first element
    pub from: Option<i64>,
    /// Window size
    pub size: Option<i64>,
}

impl PageParams {
    /// Resolves the window, falling back to offset 0 and the configured size.
    pub fn page(&self, state: &AppState) -> Result<Page, ApiError> {
        let from = self.from.unwrap_or(0);
        let size = self.size.map_or(Ok(state.default_page_size), u64::try_from);
        match (u64::try_from(from), size) {
            (Ok(from), Ok(size)) => Ok(Page::new(from, size)?),
            _ => Err(ApiError::bad_request(
                "Paging parameters must not be negative",
            )),
        }
    }
}

/// `?state=&from=&size=` parameters of the booking listings.
#[derive(Debug, Default, Deserialize)]
pub struct BookingListParams {
    /// Classifier token, case-insensitive
    pub state: Option<String>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

impl BookingListParams {
    /// Parses `state`, defaulting to `ALL`.
    pub fn state(&self) -> Result<BookingState, ApiError> {
        self.state
            .as_deref()
            .map_or(Ok(BookingState::All), str::parse)
            .map_err(ApiError::from)
    }

    /// Resolves the listing window like [`PageParams::page`].
    pub fn page(&self, state: &AppState) -> Result<Page, ApiError> {
        PageParams {
            from: self.from,
            size: self.size,
        }
        .page(state)
    }
}
