//! Ordering records: statuses, orders, order items, and the guest cart.
//!
//! # Key invariants
//! - An order's `total_cents` is the sum of its items' `price_cents`.
//! - An item's `price_cents` is the dish unit price times the quantity, fixed
//!   when the item is written.
//! - A customer's active order is their newest order still in
//!   [`STATUS_CREATED`].
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trattoria_authz::{OwnershipField, Resource, ResourceKind, ResourceType};
use utoipa::ToSchema;

/// Id of the initial order status seeded by every store.
pub const STATUS_CREATED: i64 = 1;

/// Largest quantity accepted on one order item or cart line.
pub const MAX_LINE_QUANTITY: u32 = 999;

/// Price of `quantity` units, or `None` when it does not fit in an `i64`.
pub fn line_price_cents(unit_price_cents: i64, quantity: u32) -> Option<i64> {
    unit_price_cents.checked_mul(i64::from(quantity))
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Status {
    pub id: i64,
    pub name: String,
}

impl Resource for Status {
    fn kind(&self) -> ResourceKind {
        Self::KIND
    }

    fn field(&self, field: OwnershipField) -> Option<i64> {
        match field {
            OwnershipField::Id => Some(self.id),
            _ => None,
        }
    }
}

impl ResourceType for Status {
    const KIND: ResourceKind = ResourceKind::Status;
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Order {
    pub id: i64,
    pub customer_id: Option<i64>,
    pub address_id: Option<i64>,
    pub status_id: i64,
    pub comment: Option<String>,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl Resource for Order {
    fn kind(&self) -> ResourceKind {
        Self::KIND
    }

    fn field(&self, field: OwnershipField) -> Option<i64> {
        match field {
            OwnershipField::Id => Some(self.id),
            OwnershipField::CustomerId => self.customer_id,
            _ => None,
        }
    }
}

impl ResourceType for Order {
    const KIND: ResourceKind = ResourceKind::Order;
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct OrderPatch {
    pub status_id: Option<i64>,
    pub address_id: Option<i64>,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: Option<i64>,
    pub dish_id: i64,
    pub quantity: u32,
    pub price_cents: i64,
}

impl Resource for OrderItem {
    fn kind(&self) -> ResourceKind {
        Self::KIND
    }

    fn field(&self, field: OwnershipField) -> Option<i64> {
        match field {
            OwnershipField::Id => Some(self.id),
            OwnershipField::OrderId => self.order_id,
            _ => None,
        }
    }
}

impl ResourceType for OrderItem {
    const KIND: ResourceKind = ResourceKind::OrderItem;
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrderItemPatch {
    pub quantity: u32,
}

/// Item submission payload naming the order it should land in.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrderItemCreate {
    pub order: Option<i64>,
    pub dish: i64,
    pub quantity: u32,
}

impl Resource for OrderItemCreate {
    fn kind(&self) -> ResourceKind {
        Self::KIND
    }

    fn field(&self, field: OwnershipField) -> Option<i64> {
        match field {
            OwnershipField::OrderId => self.order,
            _ => None,
        }
    }
}

impl ResourceType for OrderItemCreate {
    const KIND: ResourceKind = ResourceKind::OrderItemCreate;
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CartLine {
    pub dish: i64,
    pub quantity: u32,
}

/// Client-held cart. Carts are never persisted and carry no owner.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct Cart {
    pub items: Vec<CartLine>,
}

impl Resource for Cart {
    fn kind(&self) -> ResourceKind {
        Self::KIND
    }

    fn field(&self, _field: OwnershipField) -> Option<i64> {
        None
    }
}

impl ResourceType for Cart {
    const KIND: ResourceKind = ResourceKind::Cart;
}
