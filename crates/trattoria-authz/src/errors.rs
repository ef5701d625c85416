use thiserror::Error;

/// Errors raised while parsing authorization vocabulary from untrusted input.
///
/// Decisions themselves never fail; these only surface at boundaries such as
/// token claims or configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthzError {
    #[error("invalid action: {0}")]
    InvalidAction(String),
    #[error("invalid role: {0}")]
    InvalidRole(String),
    #[error("invalid resource kind: {0}")]
    InvalidResourceKind(String),
}

pub type AuthzResult<T> = Result<T, AuthzError>;
