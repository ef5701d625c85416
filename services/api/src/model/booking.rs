//! Booking records: dining tables and reservations.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trattoria_authz::{OwnershipField, Resource, ResourceKind, ResourceType};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Table {
    pub id: i64,
    /// Number shown on the floor plan; unique.
    pub number: u32,
    pub seats: u32,
}

impl Resource for Table {
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

impl ResourceType for Table {
    const KIND: ResourceKind = ResourceKind::Table;
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct TablePatch {
    pub number: Option<u32>,
    pub seats: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Reservation {
    pub id: i64,
    pub customer_id: Option<i64>,
    pub table_id: i64,
    pub reserved_at: DateTime<Utc>,
    pub guests: u32,
}

impl Resource for Reservation {
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

impl ResourceType for Reservation {
    const KIND: ResourceKind = ResourceKind::Reservation;
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ReservationCreate {
    pub customer: Option<i64>,
    pub table: i64,
    pub reserved_at: DateTime<Utc>,
    pub guests: u32,
}

impl Resource for ReservationCreate {
    fn kind(&self) -> ResourceKind {
        Self::KIND
    }

    fn field(&self, field: OwnershipField) -> Option<i64> {
        match field {
            OwnershipField::CustomerId => self.customer,
            _ => None,
        }
    }
}

impl ResourceType for ReservationCreate {
    const KIND: ResourceKind = ResourceKind::ReservationCreate;
}
