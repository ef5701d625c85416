//! Order status handlers.
use crate::api::error::{ApiError, api_internal, api_lookup_failed};
use crate::api::paginate;
use crate::api::types::{Page, PageQuery};
use crate::app::AppState;
use crate::auth::guard::{require, require_all};
use crate::auth::identity::Caller;
use crate::model::Status;
use axum::Json;
use axum::extract::{Path, Query, State};
use trattoria_authz::Action;

#[utoipa::path(
    get,
    path = "/v1/statuses",
    tag = "orders",
    params(PageQuery),
    responses(
        (status = 200, description = "List order statuses", body = Page<Status>),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_statuses(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Status>>, ApiError> {
    let statuses = state
        .store
        .list_statuses()
        .await
        .map_err(|err| api_internal("failed to list statuses", &err))?;
    let page = paginate(statuses, query.page, query.limit, state.default_page_size);
    require_all(&state, &principal, Action::Read, &page.items)?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/v1/statuses/{id}",
    tag = "orders",
    params(("id" = i64, Path, description = "Status id")),
    responses(
        (status = 200, description = "Fetch status", body = Status),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Status not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_status(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Caller(principal): Caller,
) -> Result<Json<Status>, ApiError> {
    let status = state
        .store
        .get_status(id)
        .await
        .map_err(|err| api_lookup_failed("status", err))?;
    require(&state, &principal, Action::Read, &status)?;
    Ok(Json(status))
}
