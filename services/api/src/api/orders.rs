//! Order handlers.
//!
//! Clients see and cancel only their own orders. Updating foreign orders is a
//! manager capability; admins have read-only access to orders.
use crate::api::error::{ApiError, api_internal, api_lookup_failed};
use crate::api::paginate;
use crate::api::types::{CustomerFilter, OrderCreateRequest, Page};
use crate::app::AppState;
use crate::auth::guard::{require, require_all};
use crate::auth::identity::Caller;
use crate::model::{Order, OrderPatch, STATUS_CREATED};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use trattoria_authz::Action;

#[utoipa::path(
    get,
    path = "/v1/orders",
    tag = "orders",
    params(CustomerFilter),
    responses(
        (status = 200, description = "List orders", body = Page<Order>),
        (status = 403, description = "A listed order is not readable by the caller", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_orders(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Query(query): Query<CustomerFilter>,
) -> Result<Json<Page<Order>>, ApiError> {
    let orders = state
        .store
        .list_orders(query.customer)
        .await
        .map_err(|err| api_internal("failed to list orders", &err))?;
    let page = paginate(orders, query.page, query.limit, state.default_page_size);
    require_all(&state, &principal, Action::Read, &page.items)?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/v1/orders/{id}",
    tag = "orders",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Fetch order", body = Order),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_order(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Caller(principal): Caller,
) -> Result<Json<Order>, ApiError> {
    let order = state
        .store
        .get_order(id)
        .await
        .map_err(|err| api_lookup_failed("order", err))?;
    require(&state, &principal, Action::Read, &order)?;
    Ok(Json(order))
}

#[utoipa::path(
    post,
    path = "/v1/orders",
    tag = "orders",
    request_body = OrderCreateRequest,
    responses(
        (status = 201, description = "Order created in the initial status", body = Order),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Address not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_order(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Json(body): Json<OrderCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = Order {
        id: 0,
        customer_id: body.customer.or(principal.id),
        address_id: body.address,
        status_id: STATUS_CREATED,
        comment: body.comment,
        total_cents: 0,
        created_at: Utc::now(),
    };
    require(&state, &principal, Action::Create, &draft)?;
    if let Some(address_id) = draft.address_id {
        state
            .store
            .get_address(address_id)
            .await
            .map_err(|err| api_lookup_failed("address", err))?;
    }
    let created = state
        .store
        .create_order(draft)
        .await
        .map_err(|err| api_internal("failed to create order", &err))?;
    tracing::info!(order_id = created.id, customer_id = ?created.customer_id, "order created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    patch,
    path = "/v1/orders/{id}",
    tag = "orders",
    params(("id" = i64, Path, description = "Order id")),
    request_body = OrderPatch,
    responses(
        (status = 200, description = "Order updated", body = Order),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Order, status, or address not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn patch_order(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Caller(principal): Caller,
    Json(body): Json<OrderPatch>,
) -> Result<Json<Order>, ApiError> {
    let order = state
        .store
        .get_order(id)
        .await
        .map_err(|err| api_lookup_failed("order", err))?;
    require(&state, &principal, Action::Update, &order)?;
    if let Some(status_id) = body.status_id {
        state
            .store
            .get_status(status_id)
            .await
            .map_err(|err| api_lookup_failed("status", err))?;
    }
    if let Some(address_id) = body.address_id {
        state
            .store
            .get_address(address_id)
            .await
            .map_err(|err| api_lookup_failed("address", err))?;
    }
    let updated = state
        .store
        .patch_order(id, body)
        .await
        .map_err(|err| api_lookup_failed("order", err))?;
    if updated.status_id != order.status_id {
        tracing::info!(
            order_id = id,
            from = order.status_id,
            to = updated.status_id,
            "order status changed"
        );
    }
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/v1/orders/{id}",
    tag = "orders",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 204, description = "Order and its items deleted"),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_order(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Caller(principal): Caller,
) -> Result<StatusCode, ApiError> {
    let order = state
        .store
        .get_order(id)
        .await
        .map_err(|err| api_lookup_failed("order", err))?;
    require(&state, &principal, Action::Delete, &order)?;
    state
        .store
        .delete_order(id)
        .await
        .map_err(|err| api_lookup_failed("order", err))?;
    Ok(StatusCode::NO_CONTENT)
}
