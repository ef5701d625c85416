//! HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures request tracing, and defines the shared
//! state injected into handlers.
use crate::api;
use crate::api::openapi::ApiDoc;
use crate::auth;
use crate::auth::token::SigningKeys;
use crate::observability;
use crate::store::RestaurantStore;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use trattoria_authz::Authorizer;
use utoipa::OpenApi;

#[derive(Clone)]
pub struct AppState {
    pub api_version: String,
    pub store: Arc<dyn RestaurantStore + Send + Sync>,
    pub authorizer: Arc<Authorizer>,
    pub signing_keys: Arc<SigningKeys>,
    pub token_ttl: Duration,
    pub token_leeway_secs: u64,
    pub default_page_size: u32,
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            let parent = observability::trace_context_from_headers(request.headers());
            let span = tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            );
            span.set_parent(parent);
            span
        });

    Router::new()
        .route("/v1/system/info", get(api::system::system_info))
        .route("/v1/system/health", get(api::system::system_health))
        .route("/v1/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .route("/v1/auth/register", post(auth::session::register))
        .route("/v1/auth/login", post(auth::session::login))
        .route("/v1/users", get(api::users::list_users))
        .route(
            "/v1/users/:id",
            get(api::users::get_user).patch(api::users::patch_user),
        )
        .route("/v1/roles", get(api::roles::list_roles))
        .route("/v1/roles/:id", get(api::roles::get_role))
        .route(
            "/v1/addresses",
            get(api::addresses::list_addresses).post(api::addresses::create_address),
        )
        .route("/v1/addresses/:id", get(api::addresses::get_address))
        .route(
            "/v1/categories",
            get(api::categories::list_categories).post(api::categories::create_category),
        )
        .route(
            "/v1/categories/:id",
            get(api::categories::get_category)
                .patch(api::categories::patch_category)
                .delete(api::categories::delete_category),
        )
        .route(
            "/v1/dishes",
            get(api::dishes::list_dishes).post(api::dishes::create_dish),
        )
        .route(
            "/v1/dishes/:id",
            get(api::dishes::get_dish)
                .patch(api::dishes::patch_dish)
                .delete(api::dishes::delete_dish),
        )
        .route(
            "/v1/reviews",
            get(api::reviews::list_reviews).post(api::reviews::create_review),
        )
        .route(
            "/v1/reviews/:id",
            get(api::reviews::get_review).delete(api::reviews::delete_review),
        )
        .route("/v1/statuses", get(api::statuses::list_statuses))
        .route("/v1/statuses/:id", get(api::statuses::get_status))
        .route(
            "/v1/orders",
            get(api::orders::list_orders).post(api::orders::create_order),
        )
        .route(
            "/v1/orders/:id",
            get(api::orders::get_order)
                .patch(api::orders::patch_order)
                .delete(api::orders::delete_order),
        )
        .route(
            "/v1/order-items",
            get(api::order_items::list_order_items).post(api::order_items::create_order_item),
        )
        .route(
            "/v1/order-items/:id",
            get(api::order_items::get_order_item)
                .patch(api::order_items::patch_order_item)
                .delete(api::order_items::delete_order_item),
        )
        .route("/v1/cart/quote", post(api::cart::quote_cart))
        .route(
            "/v1/tables",
            get(api::tables::list_tables).post(api::tables::create_table),
        )
        .route(
            "/v1/tables/:id",
            get(api::tables::get_table)
                .patch(api::tables::patch_table)
                .delete(api::tables::delete_table),
        )
        .route(
            "/v1/reservations",
            get(api::reservations::list_reservations).post(api::reservations::create_reservation),
        )
        .route(
            "/v1/reservations/:id",
            get(api::reservations::get_reservation),
        )
        .layer(trace_layer)
        .with_state(state)
}
