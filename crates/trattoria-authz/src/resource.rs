//! Resource kinds and the subject of an authorization check.
//!
//! # Purpose
//! Names every kind of thing the rule table talks about and lets callers hand
//! the engine either a concrete instance or just its kind.
//!
//! # Key invariants
//! - The kind of an instance and the kind of its type agree: for any `T:
//!   ResourceType`, `value.kind() == T::KIND`.
//! - Ownership fields are exposed as they are loaded; missing relations are
//!   reported as `None`, never fetched.
use crate::{AuthzError, OwnershipField};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    User,
    Role,
    Address,
    Dish,
    Category,
    Order,
    Status,
    OrderItem,
    Review,
    Table,
    Reservation,
    Cart,
    OrderItemCreate,
    ReviewCreate,
    ReservationCreate,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 15] = [
        ResourceKind::User,
        ResourceKind::Role,
        ResourceKind::Address,
        ResourceKind::Dish,
        ResourceKind::Category,
        ResourceKind::Order,
        ResourceKind::Status,
        ResourceKind::OrderItem,
        ResourceKind::Review,
        ResourceKind::Table,
        ResourceKind::Reservation,
        ResourceKind::Cart,
        ResourceKind::OrderItemCreate,
        ResourceKind::ReviewCreate,
        ResourceKind::ReservationCreate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::User => "user",
            ResourceKind::Role => "role",
            ResourceKind::Address => "address",
            ResourceKind::Dish => "dish",
            ResourceKind::Category => "category",
            ResourceKind::Order => "order",
            ResourceKind::Status => "status",
            ResourceKind::OrderItem => "order_item",
            ResourceKind::Review => "review",
            ResourceKind::Table => "table",
            ResourceKind::Reservation => "reservation",
            ResourceKind::Cart => "cart",
            ResourceKind::OrderItemCreate => "order_item_create",
            ResourceKind::ReviewCreate => "review_create",
            ResourceKind::ReservationCreate => "reservation_create",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| AuthzError::InvalidResourceKind(value.to_string()))
    }
}

/// A concrete value the engine can inspect.
pub trait Resource {
    fn kind(&self) -> ResourceKind;

    /// Current value of an ownership field, or `None` when the resource has no
    /// such field or the relation was not populated.
    fn field(&self, field: OwnershipField) -> Option<i64>;
}

/// Static kind of a resource type, used for checks made before any instance
/// exists.
pub trait ResourceType: Resource {
    const KIND: ResourceKind;
}

/// What an authorization check is about.
#[derive(Clone, Copy)]
pub enum Subject<'a> {
    /// A loaded instance (or an incoming creation payload).
    Instance(&'a dyn Resource),
    /// Only the kind; ownership predicates cannot run against it.
    Type(ResourceKind),
}

impl<'a> Subject<'a> {
    pub fn of<T: ResourceType>() -> Subject<'static> {
        Subject::Type(T::KIND)
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            Subject::Instance(resource) => resource.kind(),
            Subject::Type(kind) => *kind,
        }
    }

    pub fn instance(&self) -> Option<&'a dyn Resource> {
        match self {
            Subject::Instance(resource) => Some(*resource),
            Subject::Type(_) => None,
        }
    }
}

impl std::fmt::Debug for Subject<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Subject::Instance(resource) => {
                f.debug_tuple("Instance").field(&resource.kind()).finish()
            }
            Subject::Type(kind) => f.debug_tuple("Type").field(kind).finish(),
        }
    }
}

impl<'a, R: Resource> From<&'a R> for Subject<'a> {
    fn from(resource: &'a R) -> Self {
        Subject::Instance(resource)
    }
}

impl From<ResourceKind> for Subject<'static> {
    fn from(kind: ResourceKind) -> Self {
        Subject::Type(kind)
    }
}
