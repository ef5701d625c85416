//! Authorization checks used by handlers.
//!
//! # Purpose
//! Wraps the [`trattoria_authz::Authorizer`] with the HTTP failure mapping,
//! the decision counter, and debug logging.
//!
//! # Security considerations
//! A denial is always a bare 403 `forbidden`. The evaluated rule, role, and
//! ownership fields are only logged at debug level.
use crate::api::error::{ApiError, api_forbidden};
use crate::app::AppState;
use trattoria_authz::{Action, Decision, Principal, ResourceKind, ResourceType, Subject};

/// Require that `principal` may perform `action` on `subject`.
pub fn require<'a>(
    state: &AppState,
    principal: &Principal,
    action: Action,
    subject: impl Into<Subject<'a>>,
) -> Result<(), ApiError> {
    let decision = state.authorizer.decide(principal, action, subject.into());
    record(principal, &decision);
    if decision.is_allowed() {
        Ok(())
    } else {
        Err(api_forbidden("forbidden"))
    }
}

/// Require that `principal` may perform `action` on every item.
///
/// One denied item fails the whole request; nothing is filtered. An empty set
/// passes.
pub fn require_all<'a, R: ResourceType + 'a>(
    state: &AppState,
    principal: &Principal,
    action: Action,
    items: impl IntoIterator<Item = &'a R>,
) -> Result<(), ApiError> {
    let allowed = state.authorizer.authorize_all(principal, action, items);
    count(action, R::KIND, allowed);
    if allowed {
        Ok(())
    } else {
        tracing::debug!(
            role = %principal.role,
            action = %action,
            kind = %R::KIND,
            "authorization denied for result set"
        );
        Err(api_forbidden("forbidden"))
    }
}

fn record(principal: &Principal, decision: &Decision) {
    count(decision.action, decision.kind, decision.is_allowed());
    match &decision.granted_by {
        Some(rule) => {
            tracing::trace!(role = %principal.role, rule = %rule, "authorization granted")
        }
        None => tracing::debug!(
            role = %principal.role,
            action = %decision.action,
            kind = %decision.kind,
            "authorization denied"
        ),
    }
}

fn count(action: Action, kind: ResourceKind, allowed: bool) {
    let outcome = if allowed { "allow" } else { "deny" };
    metrics::counter!(
        "trattoria_authz_decisions_total",
        "action" => action.as_str(),
        "kind" => kind.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}
