//! Authorization guard - who may act on an item or booking.
//!
//! Stateless predicates over entities the caller has already loaded. The
//! callers turn a `false` into `Error::Forbidden`.

use crate::entities::{booking, item};

/// The actor owns the item.
#[must_use]
pub const fn is_owner(actor_id: i64, item: &item::Model) -> bool {
    item.owner_id == actor_id
}

/// The actor either submitted the booking or owns the booked item.
#[must_use]
pub const fn is_booker_or_owner(
    actor_id: i64,
    booking: &booking::Model,
    item: &item::Model,
) -> bool {
    booking.booker_id == actor_id || is_owner(actor_id, item)
}

/// The would-be booker owns the item they are trying to book.
#[must_use]
pub const fn is_self_booking(booker_id: i64, item: &item::Model) -> bool {
    is_owner(booker_id, item)
}
