//! Dish handlers.
use crate::api::error::{
    ApiError, api_conflict, api_internal, api_lookup_failed, api_validation_error,
};
use crate::api::paginate;
use crate::api::types::{CategoryFilter, DishCreateRequest, Page};
use crate::app::AppState;
use crate::auth::guard::{require, require_all};
use crate::auth::identity::Caller;
use crate::model::{Dish, DishPatch, MAX_PRICE_CENTS};
use crate::store::StoreError;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use trattoria_authz::{Action, Subject};

#[utoipa::path(
    get,
    path = "/v1/dishes",
    tag = "menu",
    params(CategoryFilter),
    responses(
        (status = 200, description = "List dishes", body = Page<Dish>),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_dishes(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Query(query): Query<CategoryFilter>,
) -> Result<Json<Page<Dish>>, ApiError> {
    let dishes = state
        .store
        .list_dishes(query.category)
        .await
        .map_err(|err| api_internal("failed to list dishes", &err))?;
    let page = paginate(dishes, query.page, query.limit, state.default_page_size);
    require_all(&state, &principal, Action::Read, &page.items)?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/v1/dishes/{id}",
    tag = "menu",
    params(("id" = i64, Path, description = "Dish id")),
    responses(
        (status = 200, description = "Fetch dish", body = Dish),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Dish not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_dish(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Caller(principal): Caller,
) -> Result<Json<Dish>, ApiError> {
    let dish = state
        .store
        .get_dish(id)
        .await
        .map_err(|err| api_lookup_failed("dish", err))?;
    require(&state, &principal, Action::Read, &dish)?;
    Ok(Json(dish))
}

#[utoipa::path(
    post,
    path = "/v1/dishes",
    tag = "menu",
    request_body = DishCreateRequest,
    responses(
        (status = 201, description = "Dish created", body = Dish),
        (status = 400, description = "Invalid dish", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Category not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_dish(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Json(body): Json<DishCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.name.trim().is_empty() {
        return Err(api_validation_error("name is required"));
    }
    validate_price(body.price_cents)?;
    require(&state, &principal, Action::Create, Subject::of::<Dish>())?;
    if let Some(category_id) = body.category_id {
        ensure_category(&state, category_id).await?;
    }
    let dish = Dish {
        id: 0,
        name: body.name.trim().to_string(),
        description: body.description,
        price_cents: body.price_cents,
        category_id: body.category_id,
        available: body.available,
    };
    let created = state
        .store
        .create_dish(dish)
        .await
        .map_err(|err| api_internal("failed to create dish", &err))?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    patch,
    path = "/v1/dishes/{id}",
    tag = "menu",
    params(("id" = i64, Path, description = "Dish id")),
    request_body = DishPatch,
    responses(
        (status = 200, description = "Dish updated", body = Dish),
        (status = 400, description = "Invalid update", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Dish or category not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn patch_dish(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Caller(principal): Caller,
    Json(body): Json<DishPatch>,
) -> Result<Json<Dish>, ApiError> {
    if let Some(price_cents) = body.price_cents {
        validate_price(price_cents)?;
    }
    let dish = state
        .store
        .get_dish(id)
        .await
        .map_err(|err| api_lookup_failed("dish", err))?;
    require(&state, &principal, Action::Update, &dish)?;
    if let Some(category_id) = body.category_id {
        ensure_category(&state, category_id).await?;
    }
    let updated = state
        .store
        .patch_dish(id, body)
        .await
        .map_err(|err| api_lookup_failed("dish", err))?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/v1/dishes/{id}",
    tag = "menu",
    params(("id" = i64, Path, description = "Dish id")),
    responses(
        (status = 204, description = "Dish deleted"),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Dish not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Dish is part of an order", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_dish(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Caller(principal): Caller,
) -> Result<StatusCode, ApiError> {
    let dish = state
        .store
        .get_dish(id)
        .await
        .map_err(|err| api_lookup_failed("dish", err))?;
    require(&state, &principal, Action::Delete, &dish)?;
    match state.store.delete_dish(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(StoreError::Conflict(_)) => Err(api_conflict("in_use", "dish is part of an order")),
        Err(err) => Err(api_lookup_failed("dish", err)),
    }
}

fn validate_price(price_cents: i64) -> Result<(), ApiError> {
    if price_cents < 0 {
        return Err(api_validation_error("price must not be negative"));
    }
    if price_cents > MAX_PRICE_CENTS {
        return Err(api_validation_error("price is too high"));
    }
    Ok(())
}

async fn ensure_category(state: &AppState, category_id: i64) -> Result<(), ApiError> {
    state
        .store
        .get_category(category_id)
        .await
        .map(|_| ())
        .map_err(|err| api_lookup_failed("category", err))
}
