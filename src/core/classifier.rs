//! Temporal classifier - filters booking listings by time and status.
//!
//! A [`BookingState`] is either a time predicate evaluated against "now"
//! (`CURRENT`, `PAST`, `FUTURE`), a status predicate (`WAITING`, `REJECTED`)
//! or no filter at all (`ALL`). The same predicate is available in two forms:
//! [`BookingState::matches`] for a loaded booking and [`BookingState::condition`]
//! for pushing the filter into a store query.
//!
//! Listings are scoped to a subject: the booker ([`list_for_booker`]) or the
//! owner of the booked items ([`list_for_owner`]).

use crate::{
    core::{booking::BookingView, page::Page, store},
    entities::{BookingStatus, booking},
    errors::{Error, Result},
};
use sea_orm::{Condition, DatabaseConnection, prelude::*};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, instrument};

/// Classification kinds accepted by the listing endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingState {
    /// No filter
    #[default]
    All,
    /// `start <= now <= end`
    Current,
    /// `end < now`
    Past,
    /// `start > now`
    Future,
    /// Status is `WAITING`
    Waiting,
    /// Status is `REJECTED` or `CANCELED`
    Rejected,
}

impl BookingState {
    /// Whether `booking` falls in this class at `now`.
    #[must_use]
    pub fn matches(self, booking: &booking::Model, now: DateTimeUtc) -> bool {
        match self {
            Self::All => true,
            Self::Current => booking.start <= now && now <= booking.end,
            Self::Past => booking.end < now,
            Self::Future => booking.start > now,
            Self::Waiting => booking.status == BookingStatus::Waiting,
            Self::Rejected => matches!(
                booking.status,
                BookingStatus::Rejected | BookingStatus::Canceled
            ),
        }
    }

    /// The same predicate as [`Self::matches`], as a query condition on `bookings`.
    #[must_use]
    pub fn condition(self, now: DateTimeUtc) -> Condition {
        match self {
            Self::All => Condition::all(),
            Self::Current => Condition::all()
                .add(booking::Column::Start.lte(now))
                .add(booking::Column::End.gte(now)),
            Self::Past => Condition::all().add(booking::Column::End.lt(now)),
            Self::Future => Condition::all().add(booking::Column::Start.gt(now)),
            Self::Waiting => {
                Condition::all().add(booking::Column::Status.eq(BookingStatus::Waiting))
            }
            Self::Rejected => Condition::all().add(
                booking::Column::Status.is_in([BookingStatus::Rejected, BookingStatus::Canceled]),
            ),
        }
    }

    /// Upper-case token, the same one [`FromStr`] accepts.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Current => "CURRENT",
            Self::Past => "PAST",
            Self::Future => "FUTURE",
            Self::Waiting => "WAITING",
            Self::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for BookingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingState {
    type Err = Error;

    /// Parses a classification token case-insensitively.
    fn from_str(token: &str) -> Result<Self> {
        match token.to_ascii_uppercase().as_str() {
            "ALL" => Ok(Self::All),
            "CURRENT" => Ok(Self::Current),
            "PAST" => Ok(Self::Past),
            "FUTURE" => Ok(Self::Future),
            "WAITING" => Ok(Self::Waiting),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(Error::UnsupportedState {
                state: token.to_string(),
            }),
        }
    }
}

/// Bookings submitted by `booker_id` in class `state`, newest start first.
///
/// A booker without bookings gets an empty list.
#[instrument(skip(db))]
pub async fn list_for_booker(
    db: &DatabaseConnection,
    booker_id: i64,
    state: BookingState,
    page: Page,
    now: DateTimeUtc,
) -> Result<Vec<BookingView>> {
    store::require_user(db, booker_id).await?;
    let bookings = store::find_bookings_by_booker(db, booker_id, state, now, page).await?;
    debug!(count = bookings.len(), "Listed bookings for booker");
    Ok(bookings)
}

/// Bookings of items owned by `owner_id` in class `state`, newest start first.
///
/// Unlike [`list_for_booker`], an owner with no items at all is an
/// `Error::InvalidState` rather than an empty list.
#[instrument(skip(db))]
pub async fn list_for_owner(
    db: &DatabaseConnection,
    owner_id: i64,
    state: BookingState,
    page: Page,
    now: DateTimeUtc,
) -> Result<Vec<BookingView>> {
    store::require_user(db, owner_id).await?;

    let item_ids = store::owned_item_ids(db, owner_id).await?;
    if item_ids.is_empty() {
        return Err(Error::invalid_state(format!("User {owner_id} has no items")));
    }

    let bookings = store::find_bookings_by_items(db, &item_ids, state, now, page).await?;
    debug!(count = bookings.len(), "Listed bookings for owner");
    Ok(bookings)
}
