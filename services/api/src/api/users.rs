//! User account handlers.
//!
//! Accounts are created through `/v1/auth/register`; this module covers
//! reads and admin updates.
use crate::api::error::{ApiError, api_internal, api_lookup_failed, api_validation_error};
use crate::api::paginate;
use crate::api::types::{Page, PageQuery};
use crate::app::AppState;
use crate::auth::guard::{require, require_all};
use crate::auth::identity::Caller;
use crate::model::{User, UserPatch};
use axum::Json;
use axum::extract::{Path, Query, State};
use trattoria_authz::Action;

#[utoipa::path(
    get,
    path = "/v1/users",
    tag = "users",
    params(PageQuery),
    responses(
        (status = 200, description = "List users", body = Page<User>),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_users(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<User>>, ApiError> {
    let users = state
        .store
        .list_users()
        .await
        .map_err(|err| api_internal("failed to list users", &err))?;
    let page = paginate(users, query.page, query.limit, state.default_page_size);
    require_all(&state, &principal, Action::Read, &page.items)?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/v1/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Fetch user", body = User),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "User not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_user(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Caller(principal): Caller,
) -> Result<Json<User>, ApiError> {
    let user = state
        .store
        .get_user(id)
        .await
        .map_err(|err| api_lookup_failed("user", err))?;
    require(&state, &principal, Action::Read, &user)?;
    Ok(Json(user))
}

#[utoipa::path(
    patch,
    path = "/v1/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UserPatch,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Invalid update", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "User not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn patch_user(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Caller(principal): Caller,
    Json(body): Json<UserPatch>,
) -> Result<Json<User>, ApiError> {
    if body.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
        return Err(api_validation_error("name must not be empty"));
    }
    let user = state
        .store
        .get_user(id)
        .await
        .map_err(|err| api_lookup_failed("user", err))?;
    require(&state, &principal, Action::Update, &user)?;
    let updated = state
        .store
        .patch_user(id, body)
        .await
        .map_err(|err| api_lookup_failed("user", err))?;
    if updated.role != user.role {
        tracing::info!(user_id = id, from = %user.role, to = %updated.role, "user role changed");
    }
    Ok(Json(updated))
}
