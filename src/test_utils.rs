//! Shared test utilities for `ShareIt`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        item::{self, NewItem},
        user,
    },
    entities::{self, BookingStatus},
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test user named `name` with email `<name>@example.com`.
pub async fn create_test_user(db: &DatabaseConnection, name: &str) -> Result<entities::UserModel> {
    user::create_user(db, name, &format!("{name}@example.com")).await
}

/// Creates an available test item owned by `owner_id`.
///
/// # Defaults
/// * `description`: `"Test item"`
/// * `available`: true
/// * `request_id`: None
pub async fn create_test_item(
    db: &DatabaseConnection,
    owner_id: i64,
    name: &str,
) -> Result<entities::ItemModel> {
    item::create_item(
        db,
        owner_id,
        NewItem {
            name: name.to_string(),
            description: "Test item".to_string(),
            available: true,
            request_id: None,
        },
    )
    .await
}

/// Inserts a booking row directly, bypassing the interval checks so tests can
/// place bookings in the past.
pub async fn insert_booking(
    db: &DatabaseConnection,
    item_id: i64,
    booker_id: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    status: BookingStatus,
) -> Result<entities::BookingModel> {
    entities::booking::ActiveModel {
        start: Set(start),
        end: Set(end),
        item_id: Set(item_id),
        booker_id: Set(booker_id),
        status: Set(status),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Flips the `available` flag of an item.
pub async fn set_item_available(
    db: &DatabaseConnection,
    item: &entities::ItemModel,
    available: bool,
) -> Result<entities::ItemModel> {
    let mut active: entities::item::ActiveModel = item.clone().into();
    active.available = Set(available);
    active.update(db).await.map_err(Into::into)
}

/// Sets up a complete test environment with an owner, a second user and one
/// available item.
/// Returns (db, owner, booker, item) for booking-related tests.
pub async fn setup_with_item() -> Result<(
    DatabaseConnection,
    entities::UserModel,
    entities::UserModel,
    entities::ItemModel,
)> {
    let db = setup_test_db().await?;
    let owner = create_test_user(&db, "owner").await?;
    let booker = create_test_user(&db, "booker").await?;
    let item = create_test_item(&db, owner.id, "Test Item").await?;
    Ok((db, owner, booker, item))
}
