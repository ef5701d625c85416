//! Trattoria ordering API library crate.
//!
//! # Purpose
//! Exposes the HTTP handlers, session authentication, configuration, and the
//! restaurant store for use by the binary and integration tests.
//!
//! # Notes
//! Every handler consults the `trattoria-authz` rule table before touching a
//! record; see [`auth::guard`].
pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod model;
pub mod observability;
pub mod store;
