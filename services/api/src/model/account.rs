//! Account records: users, role catalog entries, and delivery addresses.
use serde::{Deserialize, Serialize};
use trattoria_authz::{OwnershipField, Resource, ResourceKind, ResourceType, Role};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    #[schema(value_type = String, example = "client")]
    pub role: Role,
    #[serde(skip)]
    pub password_hash: String,
}

impl Resource for User {
    fn kind(&self) -> ResourceKind {
        Self::KIND
    }

    fn field(&self, field: OwnershipField) -> Option<i64> {
        match field {
            OwnershipField::Id | OwnershipField::UserId => Some(self.id),
            _ => None,
        }
    }
}

impl ResourceType for User {
    const KIND: ResourceKind = ResourceKind::User;
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    #[schema(value_type = Option<String>)]
    pub role: Option<Role>,
}

/// Entry of the role catalog exposed to clients.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct RoleRecord {
    pub id: i64,
    #[schema(value_type = String, example = "manager")]
    pub name: Role,
}

impl Resource for RoleRecord {
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

impl ResourceType for RoleRecord {
    const KIND: ResourceKind = ResourceKind::Role;
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Address {
    pub id: i64,
    pub user_id: Option<i64>,
    pub street: String,
    pub city: String,
    pub postal_code: String,
}

impl Resource for Address {
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

impl ResourceType for Address {
    const KIND: ResourceKind = ResourceKind::Address;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serialization_omits_password_hash() {
        let user = User {
            id: 1,
            email: "ana@example.com".to_string(),
            name: "Ana".to_string(),
            phone: None,
            role: Role::Client,
            password_hash: "$argon2id$secret".to_string(),
        };
        let value = serde_json::to_value(&user).expect("json");
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["role"], "client");
    }

    #[test]
    fn user_owns_itself() {
        let user = User {
            id: 9,
            email: "bo@example.com".to_string(),
            name: "Bo".to_string(),
            phone: None,
            role: Role::Client,
            password_hash: String::new(),
        };
        assert_eq!(user.field(OwnershipField::Id), Some(9));
        assert_eq!(user.field(OwnershipField::OrderId), None);
    }
}
