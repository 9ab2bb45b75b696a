//! Item requests - asks for things nobody has listed yet, and the items
//! listed in answer to them.

use crate::{
    core::{page::Page, store},
    entities::{Item, ItemRequest, item, item_request},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, QueryOrder, Select, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;
use tracing::{info, instrument};

/// A request with the items listed in answer to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestView {
    pub request: item_request::Model,
    pub items: Vec<item::Model>,
}

/// Records a new request by `requester_id`, stamped with `now`.
///
/// # Errors
/// - `InvalidArgument` if `description` is blank
/// - `NotFound` if the requester does not exist
#[instrument(skip(db, description))]
pub async fn create_request(
    db: &DatabaseConnection,
    requester_id: i64,
    description: &str,
    now: DateTimeUtc,
) -> Result<item_request::Model> {
    if description.trim().is_empty() {
        return Err(Error::InvalidArgument {
            message: "Request description must not be empty".to_string(),
        });
    }

    let txn = db.begin().await?;
    store::require_user(&txn, requester_id).await?;

    let request = item_request::ActiveModel {
        description: Set(description.to_string()),
        requester_id: Set(requester_id),
        created: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(request_id = request.id, requester_id, "Item request created");
    Ok(request)
}

fn newest_first(query: Select<ItemRequest>) -> Select<ItemRequest> {
    query
        .order_by_desc(item_request::Column::Created)
        .order_by_desc(item_request::Column::Id)
}

/// The user's own requests, newest first.
pub async fn list_own_requests(
    db: &DatabaseConnection,
    requester_id: i64,
) -> Result<Vec<RequestView>> {
    store::require_user(db, requester_id).await?;
    let requests = newest_first(
        ItemRequest::find().filter(item_request::Column::RequesterId.eq(requester_id)),
    )
    .all(db)
    .await?;
    attach_items(db, requests).await
}

/// Requests of every other user, newest first.
pub async fn list_other_requests(
    db: &DatabaseConnection,
    user_id: i64,
    page: Page,
) -> Result<Vec<RequestView>> {
    store::require_user(db, user_id).await?;
    let query =
        newest_first(ItemRequest::find().filter(item_request::Column::RequesterId.ne(user_id)));
    let requests = page.apply(query).all(db).await?;
    attach_items(db, requests).await
}

/// A single request, visible to any registered user.
pub async fn get_request(
    db: &DatabaseConnection,
    user_id: i64,
    request_id: i64,
) -> Result<RequestView> {
    store::require_user(db, user_id).await?;
    let request = store::require_request(db, request_id).await?;
    let mut views = attach_items(db, vec![request]).await?;
    views
        .pop()
        .ok_or_else(|| Error::not_found("Item request", request_id))
}

async fn attach_items<C>(db: &C, requests: Vec<item_request::Model>) -> Result<Vec<RequestView>>
where
    C: ConnectionTrait,
{
    let request_ids: Vec<i64> = requests.iter().map(|request| request.id).collect();
    let items = Item::find()
        .filter(item::Column::RequestId.is_in(request_ids))
        .order_by_asc(item::Column::Id)
        .all(db)
        .await?;

    let mut grouped: HashMap<i64, Vec<item::Model>> = HashMap::new();
    for item in items {
        if let Some(request_id) = item.request_id {
            grouped.entry(request_id).or_default().push(item);
        }
    }

    Ok(requests
        .into_iter()
        .map(|request| RequestView {
            items: grouped.remove(&request.id).unwrap_or_default(),
            request,
        })
        .collect())
}
