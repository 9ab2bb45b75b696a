//! Entity store - lookups and predicate queries the booking engine depends on.
//!
//! Every function is generic over [`ConnectionTrait`] so the same query runs on
//! the plain connection for reads and inside a `DatabaseTransaction` for the
//! read-validate-write sequences of the state machine. Ids are always assigned
//! by the database; nothing here mints one.

use crate::{
    core::{booking::BookingView, classifier::BookingState, page::Page},
    entities::{Booking, Item, ItemRequest, User, booking, item, item_request, user},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Select, SelectTwo, TryIntoModel, prelude::*};

/// Finds a user by id.
pub async fn find_user_by_id<C>(db: &C, user_id: i64) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Like [`find_user_by_id`] but a missing user is an `Error::NotFound`.
pub async fn require_user<C>(db: &C, user_id: i64) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    find_user_by_id(db, user_id)
        .await?
        .ok_or_else(|| Error::not_found("User", user_id))
}

/// Finds an item by id.
pub async fn find_item_by_id<C>(db: &C, item_id: i64) -> Result<Option<item::Model>>
where
    C: ConnectionTrait,
{
    Item::find_by_id(item_id).one(db).await.map_err(Into::into)
}

/// Like [`find_item_by_id`] but a missing item is an `Error::NotFound`.
pub async fn require_item<C>(db: &C, item_id: i64) -> Result<item::Model>
where
    C: ConnectionTrait,
{
    find_item_by_id(db, item_id)
        .await?
        .ok_or_else(|| Error::not_found("Item", item_id))
}

/// Loads an item request; a missing one is an `Error::NotFound`.
pub async fn require_request<C>(db: &C, request_id: i64) -> Result<item_request::Model>
where
    C: ConnectionTrait,
{
    ItemRequest::find_by_id(request_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Item request", request_id))
}

/// Finds a booking by id.
pub async fn find_booking_by_id<C>(db: &C, booking_id: i64) -> Result<Option<booking::Model>>
where
    C: ConnectionTrait,
{
    Booking::find_by_id(booking_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`find_booking_by_id`] but a missing booking is an `Error::NotFound`.
pub async fn require_booking<C>(db: &C, booking_id: i64) -> Result<booking::Model>
where
    C: ConnectionTrait,
{
    find_booking_by_id(db, booking_id)
        .await?
        .ok_or_else(|| Error::not_found("Booking", booking_id))
}

/// Inserts a new booking (primary key not set) or updates an existing one.
pub async fn save_booking<C>(db: &C, booking: booking::ActiveModel) -> Result<booking::Model>
where
    C: ConnectionTrait,
{
    let saved = booking.save(db).await?;
    saved.try_into_model().map_err(Into::into)
}

/// Items owned by `owner_id`, ordered by id, optionally restricted to a page.
///
/// Pass `None` whenever the answer must cover every owned item, e.g. when
/// deciding whether the owner has any items at all.
pub async fn owned_items<C>(db: &C, owner_id: i64, page: Option<Page>) -> Result<Vec<item::Model>>
where
    C: ConnectionTrait,
{
    let query = Item::find()
        .filter(item::Column::OwnerId.eq(owner_id))
        .order_by_asc(item::Column::Id);
    let query = match page {
        Some(page) => page.apply(query),
        None => query,
    };
    query.all(db).await.map_err(Into::into)
}

/// Ids of every item owned by `owner_id`.
pub async fn owned_item_ids<C>(db: &C, owner_id: i64) -> Result<Vec<i64>>
where
    C: ConnectionTrait,
{
    Ok(owned_items(db, owner_id, None)
        .await?
        .into_iter()
        .map(|item| item.id)
        .collect())
}

fn bookings_matching(state: BookingState, now: DateTimeUtc) -> SelectTwo<Booking, Item> {
    Booking::find()
        .find_also_related(Item)
        .filter(state.condition(now))
        .order_by_desc(booking::Column::Start)
        .order_by_desc(booking::Column::Id)
}

async fn load_views<C>(db: &C, query: SelectTwo<Booking, Item>) -> Result<Vec<BookingView>>
where
    C: ConnectionTrait,
{
    query
        .all(db)
        .await?
        .into_iter()
        .map(|(booking, item)| {
            let item = item.ok_or_else(|| Error::not_found("Item", booking.item_id))?;
            Ok(BookingView { booking, item })
        })
        .collect()
}

/// Bookings submitted by `booker_id` that match `state` at `now`, newest start first.
pub async fn find_bookings_by_booker<C>(
    db: &C,
    booker_id: i64,
    state: BookingState,
    now: DateTimeUtc,
    page: Page,
) -> Result<Vec<BookingView>>
where
    C: ConnectionTrait,
{
    let query = bookings_matching(state, now).filter(booking::Column::BookerId.eq(booker_id));
    load_views(db, page.apply(query)).await
}

/// Bookings of any of `item_ids` that match `state` at `now`, newest start first.
pub async fn find_bookings_by_items<C>(
    db: &C,
    item_ids: &[i64],
    state: BookingState,
    now: DateTimeUtc,
    page: Page,
) -> Result<Vec<BookingView>>
where
    C: ConnectionTrait,
{
    let query = bookings_matching(state, now)
        .filter(booking::Column::ItemId.is_in(item_ids.iter().copied()));
    load_views(db, page.apply(query)).await
}

/// Bookings of `booker_id` on `item_id` that ended strictly before `now`.
pub async fn find_finished_bookings<C>(
    db: &C,
    booker_id: i64,
    item_id: i64,
    now: DateTimeUtc,
) -> Result<Vec<booking::Model>>
where
    C: ConnectionTrait,
{
    finished_bookings_query(booker_id, item_id, now)
        .all(db)
        .await
        .map_err(Into::into)
}

fn finished_bookings_query(booker_id: i64, item_id: i64, now: DateTimeUtc) -> Select<Booking> {
    Booking::find()
        .filter(booking::Column::BookerId.eq(booker_id))
        .filter(booking::Column::ItemId.eq(item_id))
        .filter(booking::Column::End.lt(now))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::BookingStatus;
    use crate::test_utils::*;
    use chrono::{Duration, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, QueryTrait};

    #[tokio::test]
    async fn test_require_user_not_found() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let result = require_user(&db, 42).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound {
                entity: "User",
                id: 42
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_require_booking_not_found() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<booking::Model>::new()])
            .into_connection();

        let result = require_booking(&db, 9).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound {
                entity: "Booking",
                id: 9
            }
        ));
        Ok(())
    }

    #[test]
    fn test_finished_bookings_query_filters_on_end() {
        let now = Utc::now();
        let sql = finished_bookings_query(1, 2, now)
            .build(DatabaseBackend::Sqlite)
            .to_string();
        assert!(sql.contains(r#""bookings"."booker_id" = 1"#));
        assert!(sql.contains(r#""bookings"."item_id" = 2"#));
        assert!(sql.contains(r#""bookings"."end" <"#));
    }

    #[tokio::test]
    async fn test_save_booking_inserts_then_updates() -> Result<()> {
        let (db, _owner, booker, item) = setup_with_item().await?;
        let now = Utc::now();

        let inserted = save_booking(
            &db,
            booking::ActiveModel {
                start: sea_orm::Set(now + Duration::days(1)),
                end: sea_orm::Set(now + Duration::days(2)),
                item_id: sea_orm::Set(item.id),
                booker_id: sea_orm::Set(booker.id),
                status: sea_orm::Set(BookingStatus::Waiting),
                ..Default::default()
            },
        )
        .await?;
        assert!(inserted.id > 0);

        let mut active: booking::ActiveModel = inserted.clone().into();
        active.status = sea_orm::Set(BookingStatus::Approved);
        let updated = save_booking(&db, active).await?;
        assert_eq!(updated.id, inserted.id);
        assert_eq!(updated.status, BookingStatus::Approved);

        assert_eq!(Booking::find().all(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_owned_items_paged_and_unpaged() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_user(&db, "owner").await?;
        let other = create_test_user(&db, "other").await?;
        for name in ["a", "b", "c"] {
            create_test_item(&db, owner.id, name).await?;
        }
        create_test_item(&db, other.id, "d").await?;

        let all = owned_items(&db, owner.id, None).await?;
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|pair| pair[0].id < pair[1].id));

        let second_page = owned_items(&db, owner.id, Some(Page::new(2, 2)?)).await?;
        assert_eq!(second_page.len(), 1);
        assert_eq!(second_page[0].id, all[2].id);

        let ids = owned_item_ids(&db, owner.id).await?;
        assert_eq!(ids, all.iter().map(|item| item.id).collect::<Vec<_>>());

        assert!(owned_item_ids(&db, 999).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_find_finished_bookings() -> Result<()> {
        let (db, _owner, booker, item) = setup_with_item().await?;
        let now = Utc::now();

        let finished = insert_booking(
            &db,
            item.id,
            booker.id,
            now - Duration::days(3),
            now - Duration::days(2),
            BookingStatus::Approved,
        )
        .await?;
        insert_booking(
            &db,
            item.id,
            booker.id,
            now - Duration::hours(1),
            now + Duration::hours(1),
            BookingStatus::Approved,
        )
        .await?;

        let found = find_finished_bookings(&db, booker.id, item.id, now).await?;
        assert_eq!(found, vec![finished]);

        let none = find_finished_bookings(&db, booker.id, item.id + 1, now).await?;
        assert!(none.is_empty());
        Ok(())
    }
}
