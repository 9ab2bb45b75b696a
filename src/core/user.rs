//! User account management.
//!
//! Emails are unique. The pre-check gives a readable `Conflict`; the unique
//! index on `users.email` catches whatever slips past it.

use crate::{
    core::store,
    entities::{User, user},
    errors::{Error, Result},
};
use sea_orm::{
    DatabaseConnection, DbErr, QueryOrder, Set, SqlErr, TransactionTrait, prelude::*,
};
use tracing::{info, instrument};

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

fn email_taken(email: &str) -> Error {
    Error::Conflict {
        message: format!("User with email {email} already exists"),
    }
}

fn map_unique_violation(err: DbErr, email: &str) -> Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => email_taken(email),
        _ => err.into(),
    }
}

async fn find_by_email<C>(db: &C, email: &str) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Registers a new user.
///
/// # Errors
/// Returns `Conflict` if the email is already registered.
#[instrument(skip(db))]
pub async fn create_user(db: &DatabaseConnection, name: &str, email: &str) -> Result<user::Model> {
    let txn = db.begin().await?;

    if find_by_email(&txn, email).await?.is_some() {
        return Err(email_taken(email));
    }

    let user = user::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| map_unique_violation(e, email))?;

    txn.commit().await?;

    info!(user_id = user.id, "User created");
    Ok(user)
}

/// Loads a user by id.
///
/// # Errors
/// Returns `NotFound` if the user does not exist.
pub async fn get_user(db: &DatabaseConnection, user_id: i64) -> Result<user::Model> {
    store::require_user(db, user_id).await
}

/// All users ordered by id.
pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .order_by_asc(user::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies a partial update to a user.
///
/// Keeping one's own email is not a conflict.
///
/// # Errors
/// - `NotFound` if the user does not exist
/// - `Conflict` if the new email belongs to someone else
#[instrument(skip(db))]
pub async fn update_user(
    db: &DatabaseConnection,
    user_id: i64,
    update: UserUpdate,
) -> Result<user::Model> {
    let txn = db.begin().await?;

    let existing = store::require_user(&txn, user_id).await?;
    let mut active: user::ActiveModel = existing.clone().into();

    if let Some(name) = update.name {
        active.name = Set(name);
    }

    let mut new_email = None;
    if let Some(email) = update.email.filter(|email| *email != existing.email) {
        if let Some(owner) = find_by_email(&txn, &email).await? {
            if owner.id != user_id {
                return Err(email_taken(&email));
            }
        }
        active.email = Set(email.clone());
        new_email = Some(email);
    }

    if !active.is_changed() {
        return Ok(existing);
    }

    let user = active.update(&txn).await.map_err(|e| {
        map_unique_violation(e, new_email.as_deref().unwrap_or(&existing.email))
    })?;

    txn.commit().await?;

    info!(user_id, "User updated");
    Ok(user)
}

/// Deletes a user; their items, bookings, requests and comments go with them.
///
/// # Errors
/// Returns `NotFound` if no user was deleted.
#[instrument(skip(db))]
pub async fn delete_user(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    let result = User::delete_by_id(user_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found("User", user_id));
    }
    info!(user_id, "User deleted");
    Ok(())
}
