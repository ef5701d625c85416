//! Authorization decision engine.
//!
//! # Purpose and responsibility
//! Answers "may this principal perform this action on this subject?" by
//! evaluating the [`RuleTable`].
//!
//! # Where it fits
//! Request handlers call [`Authorizer::authorize`] once per loaded instance
//! (or once per list item through [`Authorizer::authorize_all`]) and turn a
//! `false` into a forbidden response.
//!
//! # Key invariants and assumptions
//! - Evaluation is pure and bounded by the rules of one `(role, kind)` bucket.
//! - Unknown role names have no rules and are denied.
//! - The engine never loads data; relations must be populated by the caller.
//!
//! # Concurrency
//! `Authorizer` is immutable after construction and safe to share behind an
//! `Arc` across any number of concurrent requests.
use crate::{Action, Principal, Resource, ResourceKind, Rule, RuleTable, Subject};

/// Outcome of a single check, with the rule that granted it.
///
/// The granting rule is for server-side diagnostics only and must never be
/// echoed back to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    pub kind: ResourceKind,
    pub granted_by: Option<Rule>,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        self.granted_by.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Authorizer {
    table: RuleTable,
}

impl Default for Authorizer {
    fn default() -> Self {
        Self::standard()
    }
}

impl Authorizer {
    pub fn new(table: RuleTable) -> Self {
        Self { table }
    }

    /// Authorizer over the service policy.
    pub fn standard() -> Self {
        Self::new(RuleTable::standard())
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Evaluate a check and report which rule, if any, granted it.
    pub fn decide(&self, principal: &Principal, action: Action, subject: Subject<'_>) -> Decision {
        let kind = subject.kind();
        // Step 1: Unknown roles carry no rules.
        let Some(role) = principal.role() else {
            return Decision {
                action,
                kind,
                granted_by: None,
            };
        };
        // Step 2: Candidates share the kind and either match the action or
        // manage the kind; the first satisfied one grants.
        let granted_by = self
            .table
            .rules(role, kind)
            .iter()
            .filter(|rule| rule.applies_to(action, kind))
            .find(|rule| rule.is_satisfied(&subject, principal))
            .copied();
        Decision {
            action,
            kind,
            granted_by,
        }
    }

    pub fn authorize<'a>(
        &self,
        principal: &Principal,
        action: Action,
        subject: impl Into<Subject<'a>>,
    ) -> bool {
        self.decide(principal, action, subject.into()).is_allowed()
    }

    /// All-or-nothing check over a result set.
    ///
    /// Returns `false` as soon as one item is denied; callers fail the whole
    /// request rather than filtering. An empty set is allowed.
    pub fn authorize_all<'a, R, I>(&self, principal: &Principal, action: Action, items: I) -> bool
    where
        R: Resource + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        items
            .into_iter()
            .all(|item| self.authorize(principal, action, Subject::Instance(item)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ownership, OwnershipField, ResourceType, Role, RoleName};

    struct Order {
        id: i64,
        customer: Option<i64>,
    }

    impl Resource for Order {
        fn kind(&self) -> ResourceKind {
            Self::KIND
        }

        fn field(&self, field: OwnershipField) -> Option<i64> {
            match field {
                OwnershipField::Id => Some(self.id),
                OwnershipField::CustomerId => self.customer,
                _ => None,
            }
        }
    }

    impl ResourceType for Order {
        const KIND: ResourceKind = ResourceKind::Order;
    }

    #[test]
    fn decision_reports_granting_rule() {
        let authorizer = Authorizer::standard();
        let client = Principal::new(Some(5), Role::Client, None);
        let order = Order {
            id: 1,
            customer: Some(5),
        };
        let decision = authorizer.decide(&client, Action::Read, Subject::from(&order));
        assert!(decision.is_allowed());
        assert_eq!(
            decision.granted_by,
            Some(Rule::owned(Action::Read, ResourceKind::Order, Ownership::CUSTOMER))
        );
        assert_eq!(decision.kind, ResourceKind::Order);
    }

    #[test]
    fn unknown_role_is_denied_everything() {
        let authorizer = Authorizer::standard();
        let principal = Principal {
            id: Some(1),
            role: RoleName::new("owner"),
            active_order: None,
        };
        for kind in ResourceKind::ALL {
            for action in Action::ALL {
                assert!(!authorizer.authorize(&principal, action, kind));
            }
        }
    }

    #[test]
    fn empty_table_denies_everything() {
        let authorizer = Authorizer::new(RuleTable::default());
        let admin = Principal::new(Some(1), Role::Admin, None);
        assert!(!authorizer.authorize(&admin, Action::Read, ResourceKind::Dish));
    }

    #[test]
    fn bare_type_skips_predicate_rules() {
        let authorizer = Authorizer::standard();
        let client = Principal::new(Some(5), Role::Client, None);
        assert!(!authorizer.authorize(&client, Action::Create, Subject::of::<Order>()));
        let order = Order {
            id: 0,
            customer: Some(5),
        };
        assert!(authorizer.authorize(&client, Action::Create, &order));
    }

    #[test]
    fn manage_request_needs_manage_rule() {
        let table = RuleTable::from_rules([(
            Role::Client,
            Rule::allow(Action::Read, ResourceKind::Dish),
        )]);
        let authorizer = Authorizer::new(table);
        let client = Principal::new(Some(5), Role::Client, None);
        assert!(authorizer.authorize(&client, Action::Read, ResourceKind::Dish));
        assert!(!authorizer.authorize(&client, Action::Manage, ResourceKind::Dish));
    }

    #[test]
    fn any_satisfied_rule_grants() {
        let table = RuleTable::from_rules([
            (
                Role::Client,
                Rule::owned(Action::Read, ResourceKind::Order, Ownership::CUSTOMER),
            ),
            (Role::Client, Rule::allow(Action::Manage, ResourceKind::Order)),
        ]);
        let authorizer = Authorizer::new(table);
        let client = Principal::new(Some(5), Role::Client, None);
        let theirs = Order {
            id: 3,
            customer: Some(9),
        };
        assert!(authorizer.authorize(&client, Action::Read, &theirs));
        assert!(authorizer.authorize(&client, Action::Read, Subject::of::<Order>()));
    }

    #[test]
    fn list_check_is_all_or_nothing() {
        let authorizer = Authorizer::standard();
        let client = Principal::new(Some(5), Role::Client, None);
        let mine = Order {
            id: 1,
            customer: Some(5),
        };
        let theirs = Order {
            id: 2,
            customer: Some(7),
        };
        assert!(authorizer.authorize_all(&client, Action::Read, [&mine]));
        assert!(!authorizer.authorize_all(&client, Action::Read, [&mine, &theirs]));
        assert!(!authorizer.authorize_all(&client, Action::Read, &vec![theirs]));
        assert!(authorizer.authorize_all(&client, Action::Read, &Vec::<Order>::new()));
    }
}
