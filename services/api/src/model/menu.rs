//! Menu records: categories, dishes, and reviews.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trattoria_authz::{OwnershipField, Resource, ResourceKind, ResourceType};
use utoipa::ToSchema;

/// Highest unit price a dish may carry.
pub const MAX_PRICE_CENTS: i64 = 10_000_000;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl Resource for Category {
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

impl ResourceType for Category {
    const KIND: ResourceKind = ResourceKind::Category;
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Dish {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Unit price in cents.
    pub price_cents: i64,
    pub category_id: Option<i64>,
    pub available: bool,
}

impl Resource for Dish {
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

impl ResourceType for Dish {
    const KIND: ResourceKind = ResourceKind::Dish;
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct DishPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub category_id: Option<i64>,
    pub available: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Review {
    pub id: i64,
    pub user_id: Option<i64>,
    pub dish_id: i64,
    pub rating: u8,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Resource for Review {
    fn kind(&self) -> ResourceKind {
        Self::KIND
    }

    fn field(&self, field: OwnershipField) -> Option<i64> {
        match field {
            OwnershipField::Id => Some(self.id),
            OwnershipField::UserId => self.user_id,
            _ => None,
        }
    }
}

impl ResourceType for Review {
    const KIND: ResourceKind = ResourceKind::Review;
}

/// Review submission payload. The author is named in the body and must be the
/// caller for client and admin roles.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ReviewCreate {
    pub user: Option<i64>,
    pub dish: i64,
    pub rating: u8,
    pub comment: Option<String>,
}

impl Resource for ReviewCreate {
    fn kind(&self) -> ResourceKind {
        Self::KIND
    }

    fn field(&self, field: OwnershipField) -> Option<i64> {
        match field {
            OwnershipField::UserId => self.user,
            _ => None,
        }
    }
}

impl ResourceType for ReviewCreate {
    const KIND: ResourceKind = ResourceKind::ReviewCreate;
}
