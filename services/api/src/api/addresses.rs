//! Delivery address handlers.
//!
//! Addresses have no delete route: no role holds Delete on them.
use crate::api::error::{ApiError, api_internal, api_lookup_failed, api_validation_error};
use crate::api::paginate;
use crate::api::types::{AddressCreateRequest, Page, UserFilter};
use crate::app::AppState;
use crate::auth::guard::{require, require_all};
use crate::auth::identity::Caller;
use crate::model::Address;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use trattoria_authz::Action;

#[utoipa::path(
    get,
    path = "/v1/addresses",
    tag = "addresses",
    params(UserFilter),
    responses(
        (status = 200, description = "List addresses", body = Page<Address>),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_addresses(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Query(query): Query<UserFilter>,
) -> Result<Json<Page<Address>>, ApiError> {
    let addresses = state
        .store
        .list_addresses(query.user)
        .await
        .map_err(|err| api_internal("failed to list addresses", &err))?;
    let page = paginate(addresses, query.page, query.limit, state.default_page_size);
    require_all(&state, &principal, Action::Read, &page.items)?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/v1/addresses/{id}",
    tag = "addresses",
    params(("id" = i64, Path, description = "Address id")),
    responses(
        (status = 200, description = "Fetch address", body = Address),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Address not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_address(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Caller(principal): Caller,
) -> Result<Json<Address>, ApiError> {
    let address = state
        .store
        .get_address(id)
        .await
        .map_err(|err| api_lookup_failed("address", err))?;
    require(&state, &principal, Action::Read, &address)?;
    Ok(Json(address))
}

#[utoipa::path(
    post,
    path = "/v1/addresses",
    tag = "addresses",
    request_body = AddressCreateRequest,
    responses(
        (status = 201, description = "Address created", body = Address),
        (status = 400, description = "Invalid address", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_address(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Json(body): Json<AddressCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.street.trim().is_empty() || body.city.trim().is_empty() {
        return Err(api_validation_error("street and city are required"));
    }
    let draft = Address {
        id: 0,
        user_id: body.user.or(principal.id),
        street: body.street,
        city: body.city,
        postal_code: body.postal_code,
    };
    require(&state, &principal, Action::Create, &draft)?;
    let created = state
        .store
        .create_address(draft)
        .await
        .map_err(|err| api_internal("failed to create address", &err))?;
    Ok((StatusCode::CREATED, Json(created)))
}
