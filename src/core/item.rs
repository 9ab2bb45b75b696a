//! Item listing, search and the owner's booking overview.

use crate::{
    core::{
        access,
        comment::{CommentView, comments_for_items},
        page::Page,
        store,
    },
    entities::{Booking, BookingStatus, Item, booking, item},
    errors::{Error, Result},
};
use sea_orm::{Condition, DatabaseConnection, QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;
use tracing::{info, instrument};

/// Fields of a new listing.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<i64>,
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

/// An item as presented to a viewer.
///
/// `last_booking` and `next_booking` are only filled in for the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub item: item::Model,
    pub last_booking: Option<booking::Model>,
    pub next_booking: Option<booking::Model>,
    pub comments: Vec<CommentView>,
}

/// Lists a new item owned by `owner_id`.
///
/// # Errors
/// Returns `NotFound` if the owner or the referenced item request does not exist.
#[instrument(skip(db))]
pub async fn create_item(
    db: &DatabaseConnection,
    owner_id: i64,
    new_item: NewItem,
) -> Result<item::Model> {
    let txn = db.begin().await?;

    store::require_user(&txn, owner_id).await?;
    if let Some(request_id) = new_item.request_id {
        store::require_request(&txn, request_id).await?;
    }

    let item = item::ActiveModel {
        name: Set(new_item.name),
        description: Set(new_item.description),
        available: Set(new_item.available),
        owner_id: Set(owner_id),
        request_id: Set(new_item.request_id),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(item_id = item.id, owner_id, "Item created");
    Ok(item)
}

/// Applies a partial update on behalf of the owner.
///
/// # Errors
/// - `NotFound` if the acting user or the item does not exist
/// - `Forbidden` if the acting user does not own the item
#[instrument(skip(db))]
pub async fn update_item(
    db: &DatabaseConnection,
    acting_user_id: i64,
    item_id: i64,
    update: ItemUpdate,
) -> Result<item::Model> {
    let txn = db.begin().await?;

    store::require_user(&txn, acting_user_id).await?;
    let existing = store::require_item(&txn, item_id).await?;
    if !access::is_owner(acting_user_id, &existing) {
        return Err(Error::forbidden(format!(
            "User {acting_user_id} does not own item {item_id}"
        )));
    }

    let mut active: item::ActiveModel = existing.clone().into();
    if let Some(name) = update.name {
        active.name = Set(name);
    }
    if let Some(description) = update.description {
        active.description = Set(description);
    }
    if let Some(available) = update.available {
        active.available = Set(available);
    }

    if !active.is_changed() {
        return Ok(existing);
    }

    let item = active.update(&txn).await?;
    txn.commit().await?;

    info!(item_id, "Item updated");
    Ok(item)
}

/// Reads one item with its comments, plus the booking overview for the owner.
///
/// # Errors
/// Returns `NotFound` if the acting user or the item does not exist.
#[instrument(skip(db))]
pub async fn get_item(
    db: &DatabaseConnection,
    acting_user_id: i64,
    item_id: i64,
    now: DateTimeUtc,
) -> Result<ItemView> {
    store::require_user(db, acting_user_id).await?;
    let item = store::require_item(db, item_id).await?;
    let is_owner = access::is_owner(acting_user_id, &item);

    let mut views = enrich(db, vec![item], is_owner, now).await?;
    views
        .pop()
        .ok_or_else(|| Error::not_found("Item", item_id))
}

/// The owner's items ordered by id, each with comments and booking overview.
///
/// # Errors
/// Returns `NotFound` if the owner does not exist.
#[instrument(skip(db))]
pub async fn list_owner_items(
    db: &DatabaseConnection,
    owner_id: i64,
    page: Page,
    now: DateTimeUtc,
) -> Result<Vec<ItemView>> {
    store::require_user(db, owner_id).await?;
    let items = store::owned_items(db, owner_id, Some(page)).await?;
    enrich(db, items, true, now).await
}

/// Available items whose name or description contains `text`.
///
/// Blank `text` matches nothing. Matching ignores ASCII case.
#[instrument(skip(db))]
pub async fn search_items(
    db: &DatabaseConnection,
    text: &str,
    page: Page,
) -> Result<Vec<item::Model>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let query = Item::find()
        .filter(item::Column::Available.eq(true))
        .filter(
            Condition::any()
                .add(item::Column::Name.contains(text))
                .add(item::Column::Description.contains(text)),
        )
        .order_by_asc(item::Column::Id);

    page.apply(query).all(db).await.map_err(Into::into)
}

/// Attaches comments to every item and, when `with_bookings`, the owner's
/// last and next approved bookings.
async fn enrich<C>(
    db: &C,
    items: Vec<item::Model>,
    with_bookings: bool,
    now: DateTimeUtc,
) -> Result<Vec<ItemView>>
where
    C: ConnectionTrait,
{
    let item_ids: Vec<i64> = items.iter().map(|item| item.id).collect();
    let mut comments = comments_for_items(db, &item_ids).await?;
    let mut bookings = if with_bookings {
        approved_bookings_by_item(db, &item_ids).await?
    } else {
        HashMap::new()
    };

    Ok(items
        .into_iter()
        .map(|item| {
            let (last_booking, next_booking) = bookings
                .remove(&item.id)
                .map(|bookings| nearest_bookings(bookings, now))
                .unwrap_or_default();
            ItemView {
                comments: comments.remove(&item.id).unwrap_or_default(),
                last_booking,
                next_booking,
                item,
            }
        })
        .collect())
}

async fn approved_bookings_by_item<C>(
    db: &C,
    item_ids: &[i64],
) -> Result<HashMap<i64, Vec<booking::Model>>>
where
    C: ConnectionTrait,
{
    let bookings = Booking::find()
        .filter(booking::Column::ItemId.is_in(item_ids.iter().copied()))
        .filter(booking::Column::Status.eq(BookingStatus::Approved))
        .all(db)
        .await?;

    let mut grouped: HashMap<i64, Vec<booking::Model>> = HashMap::new();
    for booking in bookings {
        grouped.entry(booking.item_id).or_default().push(booking);
    }
    Ok(grouped)
}

/// Splits bookings around `now`: the latest one that has started and the
/// earliest one that has not.
fn nearest_bookings(
    bookings: Vec<booking::Model>,
    now: DateTimeUtc,
) -> (Option<booking::Model>, Option<booking::Model>) {
    let (upcoming, started): (Vec<_>, Vec<_>) =
        bookings.into_iter().partition(|booking| booking.start > now);

    let last = started.into_iter().max_by_key(|booking| (booking.start, booking.id));
    let next = upcoming
        .into_iter()
        .min_by_key(|booking| (booking.start, booking.id));
    (last, next)
}
