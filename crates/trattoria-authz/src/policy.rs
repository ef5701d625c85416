//! The capability rule table.
//!
//! # Purpose and responsibility
//! Declares, per role, which `(action, kind)` pairs are granted and under which
//! ownership condition. This is the security policy of the service; every
//! asymmetry below is deliberate and covered by tests.
//!
//! # Key invariants
//! - Rules are static data, fully determined by role.
//! - Roles ascend in privilege but do not inherit from each other except where
//!   written out (Manager extends Client).
//! - Anything not listed is denied.
use crate::Action::{Create, Delete, Manage, Read, Update};
use crate::ResourceKind::{
    Address, Cart, Category, Dish, Order, OrderItem, OrderItemCreate, Reservation,
    ReservationCreate, Review, ReviewCreate, Status, Table, User,
};
use crate::{Ownership, ResourceKind, Role, Rule};
use std::collections::HashMap;

static GUEST: &[Rule] = &[
    Rule::allow(Read, ResourceKind::Role),
    Rule::allow(Read, Dish),
    Rule::allow(Read, Category),
    Rule::allow(Read, Status),
    Rule::allow(Read, Review),
    Rule::allow(Read, Table),
    // Guest carts live client-side and are not row-owned.
    Rule::allow(Manage, Cart),
];

static CLIENT: &[Rule] = &[
    Rule::allow(Read, User),
    Rule::allow(Read, ResourceKind::Role),
    Rule::allow(Read, Address),
    Rule::allow(Read, Dish),
    Rule::allow(Read, Category),
    Rule::allow(Read, Status),
    Rule::allow(Read, Review),
    Rule::allow(Read, Table),
    Rule::owned(Create, User, Ownership::SELF),
    Rule::owned(Create, Address, Ownership::OWN_USER),
    Rule::owned(Create, Review, Ownership::OWN_USER),
    Rule::owned(Create, ReviewCreate, Ownership::OWN_USER),
    Rule::owned(Read, Order, Ownership::CUSTOMER),
    Rule::owned(Create, Order, Ownership::CUSTOMER),
    Rule::owned(Delete, Order, Ownership::CUSTOMER),
    Rule::owned(Read, OrderItem, Ownership::ACTIVE_ORDER),
    Rule::owned(Update, OrderItem, Ownership::ACTIVE_ORDER),
    Rule::owned(Delete, OrderItem, Ownership::ACTIVE_ORDER),
    Rule::owned(Create, OrderItemCreate, Ownership::ACTIVE_ORDER),
    Rule::owned(Create, ReservationCreate, Ownership::CUSTOMER),
];

// Applied on top of CLIENT.
static MANAGER: &[Rule] = &[Rule::allow(Update, Order)];

static ADMIN: &[Rule] = &[
    Rule::allow(Read, User),
    Rule::allow(Update, User),
    Rule::owned(Create, User, Ownership::SELF),
    Rule::allow(Read, ResourceKind::Role),
    Rule::allow(Read, Address),
    Rule::allow(Read, Order),
    Rule::allow(Read, Status),
    Rule::allow(Read, OrderItem),
    Rule::allow(Read, Review),
    Rule::allow(Read, Reservation),
    Rule::allow(Manage, Dish),
    Rule::allow(Manage, Category),
    Rule::owned(Create, OrderItem, Ownership::ACTIVE_ORDER),
    Rule::owned(Update, OrderItem, Ownership::ACTIVE_ORDER),
    Rule::owned(Delete, OrderItem, Ownership::ACTIVE_ORDER),
    Rule::owned(Create, ReviewCreate, Ownership::OWN_USER),
    Rule::allow(Delete, Review),
    Rule::allow(Manage, Table),
    Rule::owned(Create, ReservationCreate, Ownership::CUSTOMER),
];

/// Ordered rule list for a role.
pub fn rules_for(role: Role) -> Vec<Rule> {
    match role {
        Role::Guest => GUEST.to_vec(),
        Role::Client => CLIENT.to_vec(),
        Role::Manager => CLIENT.iter().chain(MANAGER).copied().collect(),
        Role::Admin => ADMIN.to_vec(),
    }
}

/// Rules indexed by `(role, kind)`, built once and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: HashMap<(Role, ResourceKind), Vec<Rule>>,
}

impl RuleTable {
    /// The service policy for every role.
    pub fn standard() -> Self {
        Self::from_rules(
            Role::ALL
                .into_iter()
                .flat_map(|role| rules_for(role).into_iter().map(move |rule| (role, rule))),
        )
    }

    pub fn from_rules(rules: impl IntoIterator<Item = (Role, Rule)>) -> Self {
        let mut indexed: HashMap<(Role, ResourceKind), Vec<Rule>> = HashMap::new();
        for (role, rule) in rules {
            indexed.entry((role, rule.kind)).or_default().push(rule);
        }
        Self { rules: indexed }
    }

    /// Rules declared for `role` on `kind`, in declaration order.
    pub fn rules(&self, role: Role, kind: ResourceKind) -> &[Rule] {
        self.rules
            .get(&(role, kind))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
