//! Comment eligibility gate.
//!
//! A user may comment on an item only after at least one of their bookings of
//! that item has ended. Booking status plays no part in the check.

use crate::{
    core::store,
    entities::{Comment, User, comment},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;
use tracing::{info, instrument};

/// A comment with its author's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    pub comment: comment::Model,
    pub author_name: String,
}

/// Stores a comment by `author_id` on `item_id`, stamped with `now`.
///
/// # Errors
/// - `InvalidArgument` if `text` is blank
/// - `NotFound` if the author or the item does not exist
/// - `InvalidState` if the author has no booking of the item that ended before `now`
#[instrument(skip(db, text))]
pub async fn add_comment(
    db: &DatabaseConnection,
    author_id: i64,
    item_id: i64,
    text: &str,
    now: DateTimeUtc,
) -> Result<CommentView> {
    if text.trim().is_empty() {
        return Err(Error::InvalidArgument {
            message: "Comment text must not be empty".to_string(),
        });
    }

    let txn = db.begin().await?;

    let author = store::require_user(&txn, author_id).await?;

    let finished = store::find_finished_bookings(&txn, author_id, item_id, now).await?;
    if finished.is_empty() {
        return Err(Error::invalid_state(format!(
            "User {author_id} has never booked item {item_id}"
        )));
    }

    let item = store::require_item(&txn, item_id).await?;

    let comment = comment::ActiveModel {
        text: Set(text.to_string()),
        item_id: Set(item.id),
        author_id: Set(author.id),
        created: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(comment_id = comment.id, item_id, author_id, "Comment added");
    Ok(CommentView {
        comment,
        author_name: author.name,
    })
}

/// Comments on any of `item_ids`, grouped by item id, oldest first.
pub async fn comments_for_items<C>(
    db: &C,
    item_ids: &[i64],
) -> Result<HashMap<i64, Vec<CommentView>>>
where
    C: ConnectionTrait,
{
    let rows = Comment::find()
        .find_also_related(User)
        .filter(comment::Column::ItemId.is_in(item_ids.iter().copied()))
        .order_by_asc(comment::Column::Created)
        .order_by_asc(comment::Column::Id)
        .all(db)
        .await?;

    let mut grouped: HashMap<i64, Vec<CommentView>> = HashMap::new();
    for (comment, author) in rows {
        let author = author.ok_or_else(|| Error::not_found("User", comment.author_id))?;
        grouped.entry(comment.item_id).or_default().push(CommentView {
            comment,
            author_name: author.name,
        });
    }
    Ok(grouped)
}
