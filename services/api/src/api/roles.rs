//! Role catalog handlers.
use crate::api::error::{ApiError, api_internal, api_lookup_failed};
use crate::api::paginate;
use crate::api::types::{Page, PageQuery};
use crate::app::AppState;
use crate::auth::guard::{require, require_all};
use crate::auth::identity::Caller;
use crate::model::RoleRecord;
use axum::Json;
use axum::extract::{Path, Query, State};
use trattoria_authz::Action;

#[utoipa::path(
    get,
    path = "/v1/roles",
    tag = "roles",
    params(PageQuery),
    responses(
        (status = 200, description = "List roles", body = Page<RoleRecord>),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_roles(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<RoleRecord>>, ApiError> {
    let roles = state
        .store
        .list_roles()
        .await
        .map_err(|err| api_internal("failed to list roles", &err))?;
    let page = paginate(roles, query.page, query.limit, state.default_page_size);
    require_all(&state, &principal, Action::Read, &page.items)?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/v1/roles/{id}",
    tag = "roles",
    params(("id" = i64, Path, description = "Role id")),
    responses(
        (status = 200, description = "Fetch role", body = RoleRecord),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Role not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_role(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Caller(principal): Caller,
) -> Result<Json<RoleRecord>, ApiError> {
    let role = state
        .store
        .get_role(id)
        .await
        .map_err(|err| api_lookup_failed("role", err))?;
    require(&state, &principal, Action::Read, &role)?;
    Ok(Json(role))
}
