/// Ownership and participation checks
pub mod access;

/// Booking creation, owner decisions and guarded reads
pub mod booking;

/// Time-relative booking states and the per-booker / per-owner listings
pub mod classifier;

/// Comments gated on a finished rental
pub mod comment;

/// Item listing, search and booking overview
pub mod item;

/// `from`/`size` listing window
pub mod page;

/// Item requests and the items answering them
pub mod request;

/// Entity lookups and predicate queries shared by the modules above
pub mod store;

/// User accounts
pub mod user;
