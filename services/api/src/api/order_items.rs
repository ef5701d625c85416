//! Order item handlers.
//!
//! Items can only be read or changed inside the caller's active order. New
//! items are checked against the submitted payload, whose `order` defaults to
//! the active order.
use crate::api::cart::validate_quantity;
use crate::api::error::{ApiError, api_internal, api_lookup_failed, api_validation_error};
use crate::api::paginate;
use crate::api::types::{OrderFilter, Page};
use crate::app::AppState;
use crate::auth::guard::{require, require_all};
use crate::auth::identity::Caller;
use crate::model::{OrderItem, OrderItemCreate, OrderItemPatch, line_price_cents};
use crate::store::StoreError;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use trattoria_authz::Action;

#[utoipa::path(
    get,
    path = "/v1/order-items",
    tag = "orders",
    params(OrderFilter),
    responses(
        (status = 200, description = "List order items", body = Page<OrderItem>),
        (status = 403, description = "A listed item is not readable by the caller", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_order_items(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Query(query): Query<OrderFilter>,
) -> Result<Json<Page<OrderItem>>, ApiError> {
    let items = state
        .store
        .list_order_items(query.order)
        .await
        .map_err(|err| api_internal("failed to list order items", &err))?;
    let page = paginate(items, query.page, query.limit, state.default_page_size);
    require_all(&state, &principal, Action::Read, &page.items)?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/v1/order-items/{id}",
    tag = "orders",
    params(("id" = i64, Path, description = "Order item id")),
    responses(
        (status = 200, description = "Fetch order item", body = OrderItem),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Order item not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_order_item(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Caller(principal): Caller,
) -> Result<Json<OrderItem>, ApiError> {
    let item = state
        .store
        .get_order_item(id)
        .await
        .map_err(|err| api_lookup_failed("order item", err))?;
    require(&state, &principal, Action::Read, &item)?;
    Ok(Json(item))
}

#[utoipa::path(
    post,
    path = "/v1/order-items",
    tag = "orders",
    request_body = OrderItemCreate,
    responses(
        (status = 201, description = "Item added to the order", body = OrderItem),
        (status = 400, description = "Invalid quantity", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Order or dish not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_order_item(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Json(body): Json<OrderItemCreate>,
) -> Result<impl IntoResponse, ApiError> {
    validate_quantity(body.quantity)?;
    let payload = OrderItemCreate {
        order: body.order.or(principal.active_order),
        ..body
    };
    require(&state, &principal, Action::Create, &payload)?;
    let Some(order_id) = payload.order else {
        return Err(api_validation_error("order is required"));
    };
    state
        .store
        .get_order(order_id)
        .await
        .map_err(|err| api_lookup_failed("order", err))?;
    let dish = state
        .store
        .get_dish(payload.dish)
        .await
        .map_err(|err| api_lookup_failed("dish", err))?;
    if !dish.available {
        return Err(api_validation_error("dish is not available"));
    }
    let item = OrderItem {
        id: 0,
        order_id: Some(order_id),
        dish_id: dish.id,
        quantity: payload.quantity,
        price_cents: item_price(dish.price_cents, payload.quantity)?,
    };
    let created = state
        .store
        .create_order_item(item)
        .await
        .map_err(|err| total_update_failed("order", err))?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    patch,
    path = "/v1/order-items/{id}",
    tag = "orders",
    params(("id" = i64, Path, description = "Order item id")),
    request_body = OrderItemPatch,
    responses(
        (status = 200, description = "Quantity changed and price recomputed", body = OrderItem),
        (status = 400, description = "Invalid quantity", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Order item not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn patch_order_item(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Caller(principal): Caller,
    Json(body): Json<OrderItemPatch>,
) -> Result<Json<OrderItem>, ApiError> {
    validate_quantity(body.quantity)?;
    let item = state
        .store
        .get_order_item(id)
        .await
        .map_err(|err| api_lookup_failed("order item", err))?;
    require(&state, &principal, Action::Update, &item)?;
    let dish = state
        .store
        .get_dish(item.dish_id)
        .await
        .map_err(|err| api_lookup_failed("dish", err))?;
    let price_cents = item_price(dish.price_cents, body.quantity)?;
    let updated = state
        .store
        .update_order_item(id, body.quantity, price_cents)
        .await
        .map_err(|err| total_update_failed("order item", err))?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/v1/order-items/{id}",
    tag = "orders",
    params(("id" = i64, Path, description = "Order item id")),
    responses(
        (status = 204, description = "Item removed from the order"),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Order item not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_order_item(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Caller(principal): Caller,
) -> Result<StatusCode, ApiError> {
    let item = state
        .store
        .get_order_item(id)
        .await
        .map_err(|err| api_lookup_failed("order item", err))?;
    require(&state, &principal, Action::Delete, &item)?;
    state
        .store
        .delete_order_item(id)
        .await
        .map_err(|err| api_lookup_failed("order item", err))?;
    Ok(StatusCode::NO_CONTENT)
}

fn item_price(unit_price_cents: i64, quantity: u32) -> Result<i64, ApiError> {
    line_price_cents(unit_price_cents, quantity)
        .ok_or_else(|| api_validation_error("item price is out of range"))
}

/// The store refuses a change that would push the order total out of range.
fn total_update_failed(what: &str, err: StoreError) -> ApiError {
    match err {
        StoreError::Conflict(message) => api_validation_error(&message),
        err => api_lookup_failed(what, err),
    }
}
