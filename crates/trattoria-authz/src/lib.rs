//! Trattoria authorization primitives shared by the API service and its tests.
//!
//! # Purpose
//! Centralizes the capability rule table (who may do what to which resource
//! kind, and under which ownership condition) and the decision engine that
//! evaluates it for a principal.
//!
//! # How it fits
//! The API service resolves a [`Principal`] per request, loads the resource
//! instances it is about to touch, and asks an [`Authorizer`] for a yes/no
//! answer before doing anything else. Failure signaling (403/404) is the
//! caller's job; this crate only answers questions.
//!
//! # Key invariants
//! - Decisions are pure, synchronous, and never fail; unknown roles and kinds
//!   without rules are denied.
//! - A rule carrying an ownership predicate is only satisfied by a concrete
//!   instance whose fields satisfy the predicate, never by a bare kind.
//! - `Manage` implies `Read`, `Create`, `Update`, and `Delete` for its kind.
//!
//! # Examples
//! ```rust
//! use trattoria_authz::{Action, Authorizer, Principal, ResourceKind, Role, Subject};
//!
//! let authorizer = Authorizer::standard();
//! let guest = Principal::guest();
//! assert!(authorizer.authorize(&guest, Action::Read, Subject::Type(ResourceKind::Dish)));
//! assert!(!authorizer.authorize(&guest, Action::Create, Subject::Type(ResourceKind::Dish)));
//!
//! let admin = Principal::new(Some(1), Role::Admin, None);
//! assert!(authorizer.authorize(&admin, Action::Delete, Subject::Type(ResourceKind::Dish)));
//! ```
//!
//! # Common pitfalls
//! - Checking a bare kind where the policy needs a payload field (order item
//!   creation, reviews, reservations) always denies; build the payload first.
//! - Relations must be populated before the check; the engine never loads.

mod action;
mod engine;
mod errors;
mod ownership;
mod policy;
mod principal;
mod resource;
mod rule;

pub use action::Action;
pub use engine::{Authorizer, Decision};
pub use errors::{AuthzError, AuthzResult};
pub use ownership::{Ownership, OwnershipField, PrincipalField};
pub use policy::{RuleTable, rules_for};
pub use principal::{Principal, Role, RoleName};
pub use resource::{Resource, ResourceKind, ResourceType, Subject};
pub use rule::Rule;
