//! Declarative ownership predicates.
//!
//! An [`Ownership`] compares one field of a resource instance with one
//! attribute of the principal, e.g. `customer.id == principal.id`. Both sides
//! must be present and equal for the predicate to hold.
use crate::{Principal, Resource};
use serde::{Deserialize, Serialize};

/// Resource-side field an ownership predicate reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipField {
    /// The resource's own identifier (a user checked against itself).
    Id,
    /// The owning user (`address.user`, `review.user`).
    UserId,
    /// The customer relation (`order.customer.id`, `reservation.customer`).
    CustomerId,
    /// The parent order (`order_item.order.id`, `dto.order`).
    OrderId,
}

impl OwnershipField {
    pub fn as_str(self) -> &'static str {
        match self {
            OwnershipField::Id => "id",
            OwnershipField::UserId => "user.id",
            OwnershipField::CustomerId => "customer.id",
            OwnershipField::OrderId => "order.id",
        }
    }
}

/// Principal-side attribute an ownership predicate compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalField {
    Id,
    ActiveOrder,
}

impl PrincipalField {
    pub fn as_str(self) -> &'static str {
        match self {
            PrincipalField::Id => "principal.id",
            PrincipalField::ActiveOrder => "principal.active_order",
        }
    }

    fn value(self, principal: &Principal) -> Option<i64> {
        match self {
            PrincipalField::Id => principal.id,
            PrincipalField::ActiveOrder => principal.active_order,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ownership {
    pub field: OwnershipField,
    pub equals: PrincipalField,
}

impl Ownership {
    pub const fn new(field: OwnershipField, equals: PrincipalField) -> Self {
        Self { field, equals }
    }

    /// The resource is the principal itself.
    pub const SELF: Ownership = Ownership::new(OwnershipField::Id, PrincipalField::Id);
    /// The resource belongs to the principal's user account.
    pub const OWN_USER: Ownership = Ownership::new(OwnershipField::UserId, PrincipalField::Id);
    /// The principal is the resource's customer.
    pub const CUSTOMER: Ownership = Ownership::new(OwnershipField::CustomerId, PrincipalField::Id);
    /// The resource hangs off the principal's active order.
    pub const ACTIVE_ORDER: Ownership =
        Ownership::new(OwnershipField::OrderId, PrincipalField::ActiveOrder);

    pub fn holds(&self, resource: &dyn Resource, principal: &Principal) -> bool {
        match (resource.field(self.field), self.equals.value(principal)) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        }
    }
}

impl std::fmt::Display for Ownership {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} == {}", self.field.as_str(), self.equals.as_str())
    }
}
