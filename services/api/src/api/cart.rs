//! Cart pricing.
//!
//! Carts live on the client. The quote endpoint prices a submitted cart
//! against the current menu without persisting anything.
use crate::api::error::{ApiError, api_lookup_failed, api_validation_error};
use crate::api::types::{CartQuote, CartQuoteLine};
use crate::app::AppState;
use crate::auth::guard::require;
use crate::auth::identity::Caller;
use crate::model::{Cart, MAX_LINE_QUANTITY, line_price_cents};
use axum::Json;
use axum::extract::State;
use chrono::Utc;
use trattoria_authz::Action;

#[utoipa::path(
    post,
    path = "/v1/cart/quote",
    tag = "orders",
    request_body = Cart,
    responses(
        (status = 200, description = "Priced cart", body = CartQuote),
        (status = 400, description = "Invalid cart", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Dish not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn quote_cart(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Json(cart): Json<Cart>,
) -> Result<Json<CartQuote>, ApiError> {
    require(&state, &principal, Action::Manage, &cart)?;
    for line in &cart.items {
        validate_quantity(line.quantity)?;
    }
    let mut lines = Vec::with_capacity(cart.items.len());
    let mut total_cents: i64 = 0;
    for line in &cart.items {
        let dish = state
            .store
            .get_dish(line.dish)
            .await
            .map_err(|err| api_lookup_failed("dish", err))?;
        if !dish.available {
            return Err(api_validation_error("dish is not available"));
        }
        let line_total_cents = line_price_cents(dish.price_cents, line.quantity)
            .ok_or_else(|| api_validation_error("cart total is out of range"))?;
        total_cents = total_cents
            .checked_add(line_total_cents)
            .ok_or_else(|| api_validation_error("cart total is out of range"))?;
        lines.push(CartQuoteLine {
            dish: dish.id,
            name: dish.name,
            quantity: line.quantity,
            unit_price_cents: dish.price_cents,
            line_total_cents,
        });
    }
    Ok(Json(CartQuote {
        lines,
        total_cents,
        quoted_at: Utc::now(),
    }))
}

/// Reject empty and oversized lines.
pub(crate) fn validate_quantity(quantity: u32) -> Result<(), ApiError> {
    if quantity == 0 {
        return Err(api_validation_error("quantity must be at least 1"));
    }
    if quantity > MAX_LINE_QUANTITY {
        return Err(api_validation_error("quantity is too large"));
    }
    Ok(())
}
