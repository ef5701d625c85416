//! Authentication and authorization plumbing.
//!
//! # Purpose
//! Groups session token handling, password hashing, caller resolution, and
//! the guard that applies the rule table to each request.
pub mod guard;
pub mod identity;
pub mod keys;
pub mod password;
pub mod session;
pub mod token;
