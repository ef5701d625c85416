use crate::{Action, Ownership, Principal, ResourceKind, Subject};
use serde::{Deserialize, Serialize};

/// One grant in the capability table: `action` on `kind`, optionally only
/// when `ownership` holds for the instance being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    pub action: Action,
    pub kind: ResourceKind,
    pub ownership: Option<Ownership>,
}

impl Rule {
    pub const fn allow(action: Action, kind: ResourceKind) -> Self {
        Self {
            action,
            kind,
            ownership: None,
        }
    }

    pub const fn owned(action: Action, kind: ResourceKind, ownership: Ownership) -> Self {
        Self {
            action,
            kind,
            ownership: Some(ownership),
        }
    }

    /// Whether this rule is a candidate for `(action, kind)`.
    pub fn applies_to(&self, action: Action, kind: ResourceKind) -> bool {
        self.kind == kind && self.action.grants(action)
    }

    /// Whether this rule grants access to `subject` for `principal`.
    ///
    /// A predicate-bearing rule needs an instance to inspect; a bare kind
    /// never satisfies it.
    pub fn is_satisfied(&self, subject: &Subject<'_>, principal: &Principal) -> bool {
        match (self.ownership, subject.instance()) {
            (None, _) => true,
            (Some(ownership), Some(resource)) => ownership.holds(resource, principal),
            (Some(_), None) => false,
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.ownership {
            Some(ownership) => write!(f, "{} {} where {}", self.action, self.kind, ownership),
            None => write!(f, "{} {}", self.action, self.kind),
        }
    }
}
