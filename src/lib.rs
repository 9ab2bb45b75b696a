//! `ShareIt` - A rental marketplace backend
//!
//! Users list items, other users book them for a time window, and owners
//! approve or reject those bookings. Users can also ask for items nobody has
//! listed yet and comment on items they have rented.

#![deny(unsafe_code, unused_must_use)]
#![deny(rustdoc::broken_intra_doc_links, rustdoc::private_intra_doc_links)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    future_incompatible,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    // Restriction lints picked individually
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
)]
// Handlers and core functions share names with their modules, and most
// fallible functions return the crate-wide `Error`.
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

/// HTTP interface - routes, handlers, wire types and error mapping
pub mod api;
/// Configuration management for database and application settings
pub mod config;
/// Core business logic - framework-agnostic booking, item, request and user operations
pub mod core;
/// SeaORM entity definitions for database tables
pub mod entities;
/// Unified error types and result handling
pub mod errors;

#[cfg(test)]
pub mod test_utils;
