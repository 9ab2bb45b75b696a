//! Booking entity - A time-bounded request by a booker to rent an item.
//!
//! Each booking has a start and end instant, the booked item, the booker and a
//! [`BookingStatus`]. The interval invariants are enforced once, when the booking
//! is created by `core::booking::create_booking`, and never re-checked on reads.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a booking, stored as its upper-case name.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Submitted, awaiting the owner's decision
    #[sea_orm(string_value = "WAITING")]
    Waiting,
    /// Accepted by the owner
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    /// Declined by the owner
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
    /// Withdrawn; no operation produces it, it only arrives through the data
    #[sea_orm(string_value = "CANCELED")]
    Canceled,
}

/// Booking database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    /// Store-assigned identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// First instant of the rental
    pub start: DateTimeUtc,
    /// Last instant of the rental
    pub end: DateTimeUtc,
    /// ID of the booked item
    #[sea_orm(indexed)]
    pub item_id: i64,
    /// ID of the user who submitted the booking
    #[sea_orm(indexed)]
    pub booker_id: i64,
    /// Current lifecycle status
    pub status: BookingStatus,
}

/// Defines relationships between Booking and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each booking targets one item
    #[sea_orm(
        belongs_to = "super::item::Entity",
        from = "Column::ItemId",
        to = "super::item::Column::Id",
        on_delete = "Cascade"
    )]
    Item,
    /// Each booking has one booker
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::BookerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Booker,
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booker.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
