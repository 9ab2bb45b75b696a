//! Booking state machine - creation, owner decisions and guarded reads.
//!
//! A booking starts in `WAITING`. Only the owner of the booked item can move it
//! to `APPROVED` or `REJECTED`, and approving a booking that is already
//! `APPROVED` is refused. Every write runs inside a single database
//! transaction: the lookups, the checks and the save either all commit or the
//! transaction is dropped and rolled back, so a failed call leaves no rows behind.

use crate::{
    core::{access, store},
    entities::{BookingStatus, booking, item},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, Set, TransactionTrait, prelude::*};
use std::str::FromStr;
use tracing::{info, instrument};

/// A booking together with the item it targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingView {
    pub booking: booking::Model,
    pub item: item::Model,
}

/// A booking request as submitted by the booker.
///
/// `start` and `end` are optional because the wire format allows them to be
/// missing; a missing bound is an `Error::InvalidInterval`.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub item_id: i64,
    pub start: Option<DateTimeUtc>,
    pub end: Option<DateTimeUtc>,
}

/// The owner's verdict on a waiting booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// Status the booking ends up in.
    #[must_use]
    pub const fn status(self) -> BookingStatus {
        match self {
            Self::Approve => BookingStatus::Approved,
            Self::Reject => BookingStatus::Rejected,
        }
    }
}

impl FromStr for Decision {
    type Err = Error;

    /// Accepts `true` (approve) or `false` (reject), ignoring case.
    fn from_str(token: &str) -> Result<Self> {
        if token.eq_ignore_ascii_case("true") {
            Ok(Self::Approve)
        } else if token.eq_ignore_ascii_case("false") {
            Ok(Self::Reject)
        } else {
            Err(Error::InvalidArgument {
                message: format!("Approval must be 'true' or 'false', got '{token}'"),
            })
        }
    }
}

/// Checks the requested interval against `now` and returns the bounds.
///
/// Both bounds must be present, `start` must be strictly before `end`, and
/// neither may lie before `now`. Starting exactly at `now` is allowed.
pub fn validate_interval(
    start: Option<DateTimeUtc>,
    end: Option<DateTimeUtc>,
    now: DateTimeUtc,
) -> Result<(DateTimeUtc, DateTimeUtc)> {
    let (Some(start), Some(end)) = (start, end) else {
        return Err(Error::InvalidInterval {
            message: "start and end are required".to_string(),
        });
    };

    if start >= end {
        return Err(Error::InvalidInterval {
            message: format!("start {start} must be before end {end}"),
        });
    }

    if start < now || end < now {
        return Err(Error::InvalidInterval {
            message: "booking cannot begin or end in the past".to_string(),
        });
    }

    Ok((start, end))
}

/// Creates a `WAITING` booking of `new_booking.item_id` by `booker_id`.
///
/// # Errors
/// - `NotFound` if the booker or the item does not exist
/// - `Forbidden` if the booker owns the item
/// - `InvalidState` if the item is not available
/// - `InvalidInterval` if a bound is missing, the bounds are inverted, or
///   either bound lies before `now`
#[instrument(skip(db))]
pub async fn create_booking(
    db: &DatabaseConnection,
    booker_id: i64,
    new_booking: NewBooking,
    now: DateTimeUtc,
) -> Result<BookingView> {
    let txn = db.begin().await?;

    store::require_user(&txn, booker_id).await?;
    let item = store::require_item(&txn, new_booking.item_id).await?;

    if access::is_self_booking(booker_id, &item) {
        return Err(Error::forbidden(format!(
            "User {booker_id} owns item {} and cannot book it",
            item.id
        )));
    }

    if !item.available {
        return Err(Error::invalid_state(format!(
            "Item {} is not available for booking",
            item.id
        )));
    }

    let (start, end) = validate_interval(new_booking.start, new_booking.end, now)?;

    let booking = store::save_booking(
        &txn,
        booking::ActiveModel {
            start: Set(start),
            end: Set(end),
            item_id: Set(item.id),
            booker_id: Set(booker_id),
            status: Set(BookingStatus::Waiting),
            ..Default::default()
        },
    )
    .await?;

    txn.commit().await?;

    info!(booking_id = booking.id, item_id = item.id, "Booking created");
    Ok(BookingView { booking, item })
}

/// Applies the owner's `decision` to booking `booking_id`.
///
/// # Errors
/// - `NotFound` if the acting user or the booking does not exist
/// - `Forbidden` if the acting user does not own the booked item
/// - `InvalidState` when approving a booking that is already approved
#[instrument(skip(db))]
pub async fn decide_booking(
    db: &DatabaseConnection,
    booking_id: i64,
    acting_user_id: i64,
    decision: Decision,
) -> Result<BookingView> {
    let txn = db.begin().await?;

    store::require_user(&txn, acting_user_id).await?;
    let booking = store::require_booking(&txn, booking_id).await?;
    let item = store::require_item(&txn, booking.item_id).await?;

    if !access::is_owner(acting_user_id, &item) {
        return Err(Error::forbidden(format!(
            "User {acting_user_id} is not the owner of item {}",
            item.id
        )));
    }

    if decision == Decision::Approve && booking.status == BookingStatus::Approved {
        return Err(Error::invalid_state(format!(
            "Booking {booking_id} is already approved"
        )));
    }

    let mut active: booking::ActiveModel = booking.into();
    active.status = Set(decision.status());
    let booking = store::save_booking(&txn, active).await?;

    txn.commit().await?;

    info!(booking_id, status = ?booking.status, "Booking decided");
    Ok(BookingView { booking, item })
}

/// Reads a booking on behalf of its booker or the item owner.
///
/// # Errors
/// - `NotFound` if the acting user or the booking does not exist
/// - `Forbidden` for anyone else
#[instrument(skip(db))]
pub async fn get_booking(
    db: &DatabaseConnection,
    booking_id: i64,
    acting_user_id: i64,
) -> Result<BookingView> {
    store::require_user(db, acting_user_id).await?;
    let booking = store::require_booking(db, booking_id).await?;
    let item = store::require_item(db, booking.item_id).await?;

    if !access::is_booker_or_owner(acting_user_id, &booking, &item) {
        return Err(Error::forbidden(format!(
            "User {acting_user_id} may not view booking {booking_id}"
        )));
    }

    Ok(BookingView { booking, item })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{Booking, user};
    use crate::test_utils::*;
    use chrono::{Duration, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn request(item_id: i64, now: DateTimeUtc, start_h: i64, end_h: i64) -> NewBooking {
        NewBooking {
            item_id,
            start: Some(now + Duration::hours(start_h)),
            end: Some(now + Duration::hours(end_h)),
        }
    }

    async fn booking_count(db: &DatabaseConnection) -> Result<usize> {
        Ok(Booking::find().all(db).await?.len())
    }

    #[test]
    fn test_decision_parsing() {
        assert_eq!("true".parse::<Decision>().unwrap(), Decision::Approve);
        assert_eq!("TRUE".parse::<Decision>().unwrap(), Decision::Approve);
        assert_eq!("False".parse::<Decision>().unwrap(), Decision::Reject);
        for token in ["yes", "1", "", "truee", " true"] {
            assert!(matches!(
                token.parse::<Decision>().unwrap_err(),
                Error::InvalidArgument { .. }
            ));
        }
    }

    #[test]
    fn test_validate_interval() {
        let now = Utc::now();
        let hour = Duration::hours(1);

        assert!(validate_interval(Some(now + hour), Some(now + hour * 2), now).is_ok());
        assert_eq!(
            validate_interval(Some(now), Some(now + hour), now).unwrap(),
            (now, now + hour)
        );

        let invalid = [
            (None, Some(now + hour)),
            (Some(now + hour), None),
            (None, None),
            (Some(now + hour * 2), Some(now + hour)),
            (Some(now + hour), Some(now + hour)),
            (Some(now - hour), Some(now + hour)),
            (Some(now - hour * 2), Some(now - hour)),
        ];
        for (start, end) in invalid {
            assert!(matches!(
                validate_interval(start, end, now).unwrap_err(),
                Error::InvalidInterval { .. }
            ));
        }
    }

    #[tokio::test]
    async fn test_create_booking_unknown_booker() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let result = create_booking(&db, 1, request(1, Utc::now(), 1, 2), Utc::now()).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "User", .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_booking_starts_waiting() -> Result<()> {
        let (db, _owner, booker, item) = setup_with_item().await?;
        let now = Utc::now();

        let view = create_booking(&db, booker.id, request(item.id, now, 24, 48), now).await?;

        assert_eq!(view.booking.status, BookingStatus::Waiting);
        assert_eq!(view.booking.booker_id, booker.id);
        assert_eq!(view.booking.item_id, item.id);
        assert_eq!(view.item, item);

        let stored = Booking::find_by_id(view.booking.id).one(&db).await?.unwrap();
        assert_eq!(stored, view.booking);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_booking_starting_now() -> Result<()> {
        let (db, _owner, booker, item) = setup_with_item().await?;
        let now = Utc::now();

        let view = create_booking(&db, booker.id, request(item.id, now, 0, 1), now).await?;
        assert_eq!(view.booking.start, now);
        assert_eq!(view.booking.status, BookingStatus::Waiting);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_booking_unknown_item() -> Result<()> {
        let (db, _owner, booker, _item) = setup_with_item().await?;
        let now = Utc::now();

        let result = create_booking(&db, booker.id, request(999, now, 1, 2), now).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "Item", id: 999 }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_self_booking_forbidden_regardless_of_other_fields() -> Result<()> {
        let (db, owner, _booker, item) = setup_with_item().await?;
        let now = Utc::now();

        // Valid interval
        let result = create_booking(&db, owner.id, request(item.id, now, 1, 2), now).await;
        assert!(matches!(result.unwrap_err(), Error::Forbidden { .. }));

        // Inverted interval and missing bounds are still reported as Forbidden
        let result = create_booking(&db, owner.id, request(item.id, now, 5, 1), now).await;
        assert!(matches!(result.unwrap_err(), Error::Forbidden { .. }));

        let missing = NewBooking {
            item_id: item.id,
            start: None,
            end: None,
        };
        let result = create_booking(&db, owner.id, missing, now).await;
        assert!(matches!(result.unwrap_err(), Error::Forbidden { .. }));

        // Unavailable item is still Forbidden for its owner
        set_item_available(&db, &item, false).await?;
        let result = create_booking(&db, owner.id, request(item.id, now, 1, 2), now).await;
        assert!(matches!(result.unwrap_err(), Error::Forbidden { .. }));

        assert_eq!(booking_count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_booking_unavailable_item() -> Result<()> {
        let (db, _owner, booker, item) = setup_with_item().await?;
        set_item_available(&db, &item, false).await?;
        let now = Utc::now();

        let result = create_booking(&db, booker.id, request(item.id, now, 1, 2), now).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidState { .. }));
        assert_eq!(booking_count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_end_before_start_persists_nothing() -> Result<()> {
        let (db, _owner, booker, item) = setup_with_item().await?;
        let now = Utc::now();

        // start = now + 1d, end = now
        let result = create_booking(&db, booker.id, request(item.id, now, 24, 0), now).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInterval { .. }));

        let result = create_booking(&db, booker.id, request(item.id, now, -2, -1), now).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInterval { .. }));

        assert_eq!(booking_count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_approve_then_reapprove_fails() -> Result<()> {
        let (db, owner, booker, item) = setup_with_item().await?;
        let now = Utc::now();
        let created = create_booking(&db, booker.id, request(item.id, now, 24, 48), now).await?;

        let approved = decide_booking(&db, created.booking.id, owner.id, Decision::Approve).await?;
        assert_eq!(approved.booking.status, BookingStatus::Approved);

        let again = decide_booking(&db, created.booking.id, owner.id, Decision::Approve).await;
        assert!(matches!(again.unwrap_err(), Error::InvalidState { .. }));

        let stored = Booking::find_by_id(created.booking.id).one(&db).await?.unwrap();
        assert_eq!(stored.status, BookingStatus::Approved);
        Ok(())
    }

    #[tokio::test]
    async fn test_reject_sets_rejected() -> Result<()> {
        let (db, owner, booker, item) = setup_with_item().await?;
        let now = Utc::now();
        let created = create_booking(&db, booker.id, request(item.id, now, 24, 48), now).await?;

        let rejected = decide_booking(&db, created.booking.id, owner.id, Decision::Reject).await?;
        assert_eq!(rejected.booking.status, BookingStatus::Rejected);
        Ok(())
    }

    #[tokio::test]
    async fn test_decide_by_non_owner_forbidden() -> Result<()> {
        let (db, _owner, booker, item) = setup_with_item().await?;
        let stranger = create_test_user(&db, "stranger").await?;
        let now = Utc::now();
        let created = create_booking(&db, booker.id, request(item.id, now, 24, 48), now).await?;

        for actor in [booker.id, stranger.id] {
            for decision in [Decision::Approve, Decision::Reject] {
                let result = decide_booking(&db, created.booking.id, actor, decision).await;
                assert!(matches!(result.unwrap_err(), Error::Forbidden { .. }));
            }
        }

        let stored = Booking::find_by_id(created.booking.id).one(&db).await?.unwrap();
        assert_eq!(stored.status, BookingStatus::Waiting);
        Ok(())
    }

    #[tokio::test]
    async fn test_decide_unknown_booking_or_user() -> Result<()> {
        let (db, owner, _booker, _item) = setup_with_item().await?;

        let result = decide_booking(&db, 999, owner.id, Decision::Approve).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "Booking", .. }
        ));

        let result = decide_booking(&db, 1, 999, Decision::Approve).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "User", .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_booking_lifecycle_scenario() -> Result<()> {
        let db = setup_test_db().await?;
        let a = create_test_user(&db, "a").await?;
        let b = create_test_user(&db, "b").await?;
        let c = create_test_user(&db, "c").await?;
        let item = create_test_item(&db, a.id, "ladder").await?;
        let now = Utc::now();

        let created = create_booking(&db, b.id, request(item.id, now, 24, 48), now).await?;
        assert_eq!(created.booking.status, BookingStatus::Waiting);

        let approved = decide_booking(&db, created.booking.id, a.id, "true".parse()?).await?;
        assert_eq!(approved.booking.status, BookingStatus::Approved);

        let seen_by_booker = get_booking(&db, created.booking.id, b.id).await?;
        assert_eq!(seen_by_booker.booking.status, BookingStatus::Approved);

        let seen_by_owner = get_booking(&db, created.booking.id, a.id).await?;
        assert_eq!(seen_by_owner, seen_by_booker);

        let result = get_booking(&db, created.booking.id, c.id).await;
        assert!(matches!(result.unwrap_err(), Error::Forbidden { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_get_unknown_booking() -> Result<()> {
        let (db, owner, _booker, _item) = setup_with_item().await?;

        let result = get_booking(&db, 12345, owner.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound {
                entity: "Booking",
                id: 12345
            }
        ));
        Ok(())
    }
}
