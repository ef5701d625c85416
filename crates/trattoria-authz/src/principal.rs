//! Caller identity as seen by the decision engine.
//!
//! # Purpose
//! Defines the closed set of roles, the raw role name carried by a caller, and
//! the per-request [`Principal`].
//!
//! # Key invariants
//! - A principal is immutable for the lifetime of a request.
//! - The role is kept as the raw name presented by the identity resolver; a
//!   name outside the closed set resolves to no role and is denied everything.
use crate::AuthzError;
use serde::{Deserialize, Serialize};

/// Roles in ascending privilege order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Guest,
    Client,
    Manager,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Guest, Role::Client, Role::Manager, Role::Admin];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::Client => "client",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "guest" => Ok(Role::Guest),
            "client" => Ok(Role::Client),
            "manager" => Ok(Role::Manager),
            "admin" => Ok(Role::Admin),
            other => Err(AuthzError::InvalidRole(other.to_string())),
        }
    }
}

/// Role name wrapper as presented by the caller.
///
/// # Example
/// ```rust
/// use trattoria_authz::{Role, RoleName};
///
/// assert_eq!(RoleName::from(Role::Client).role(), Some(Role::Client));
/// assert_eq!(RoleName::new("waiter").role(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleName(String);

impl RoleName {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve to a known role, or `None` when the name is not recognized.
    pub fn role(&self) -> Option<Role> {
        self.0.parse().ok()
    }
}

impl From<Role> for RoleName {
    fn from(role: Role) -> Self {
        Self(role.as_str().to_string())
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The authenticated (or anonymous) caller of a request.
///
/// `id` is `None` for guests. `active_order` is the order the caller is
/// currently building through cart and order-item flows, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Option<i64>,
    pub role: RoleName,
    pub active_order: Option<i64>,
}

impl Principal {
    pub fn new(id: Option<i64>, role: Role, active_order: Option<i64>) -> Self {
        Self {
            id,
            role: role.into(),
            active_order,
        }
    }

    /// Anonymous caller with no identifier and no active order.
    pub fn guest() -> Self {
        Self::new(None, Role::Guest, None)
    }

    pub fn role(&self) -> Option<Role> {
        self.role.role()
    }

    pub fn with_active_order(mut self, active_order: Option<i64>) -> Self {
        self.active_order = active_order;
        self
    }
}
