//! Dining table handlers.
use crate::api::error::{
    ApiError, api_conflict, api_internal, api_lookup_failed, api_validation_error,
};
use crate::api::paginate;
use crate::api::types::{Page, PageQuery, TableCreateRequest};
use crate::app::AppState;
use crate::auth::guard::{require, require_all};
use crate::auth::identity::Caller;
use crate::model::{Table, TablePatch};
use crate::store::StoreError;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use trattoria_authz::{Action, Subject};

#[utoipa::path(
    get,
    path = "/v1/tables",
    tag = "booking",
    params(PageQuery),
    responses(
        (status = 200, description = "List tables", body = Page<Table>),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_tables(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Table>>, ApiError> {
    let tables = state
        .store
        .list_tables()
        .await
        .map_err(|err| api_internal("failed to list tables", &err))?;
    let page = paginate(tables, query.page, query.limit, state.default_page_size);
    require_all(&state, &principal, Action::Read, &page.items)?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/v1/tables/{id}",
    tag = "booking",
    params(("id" = i64, Path, description = "Table id")),
    responses(
        (status = 200, description = "Fetch table", body = Table),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Table not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_table(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Caller(principal): Caller,
) -> Result<Json<Table>, ApiError> {
    let table = state
        .store
        .get_table(id)
        .await
        .map_err(|err| api_lookup_failed("table", err))?;
    require(&state, &principal, Action::Read, &table)?;
    Ok(Json(table))
}

#[utoipa::path(
    post,
    path = "/v1/tables",
    tag = "booking",
    request_body = TableCreateRequest,
    responses(
        (status = 201, description = "Table created", body = Table),
        (status = 400, description = "Invalid table", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Table number in use", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_table(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Json(body): Json<TableCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.seats == 0 {
        return Err(api_validation_error("a table needs at least one seat"));
    }
    require(&state, &principal, Action::Create, Subject::of::<Table>())?;
    let table = Table {
        id: 0,
        number: body.number,
        seats: body.seats,
    };
    match state.store.create_table(table).await {
        Ok(created) => Ok((StatusCode::CREATED, Json(created))),
        Err(StoreError::Conflict(_)) => Err(api_conflict("conflict", "table number in use")),
        Err(err) => Err(api_internal("failed to create table", &err)),
    }
}

#[utoipa::path(
    patch,
    path = "/v1/tables/{id}",
    tag = "booking",
    params(("id" = i64, Path, description = "Table id")),
    request_body = TablePatch,
    responses(
        (status = 200, description = "Table updated", body = Table),
        (status = 400, description = "Invalid update", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Table not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Table number in use", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn patch_table(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Caller(principal): Caller,
    Json(body): Json<TablePatch>,
) -> Result<Json<Table>, ApiError> {
    if body.seats == Some(0) {
        return Err(api_validation_error("a table needs at least one seat"));
    }
    let table = state
        .store
        .get_table(id)
        .await
        .map_err(|err| api_lookup_failed("table", err))?;
    require(&state, &principal, Action::Update, &table)?;
    match state.store.patch_table(id, body).await {
        Ok(updated) => Ok(Json(updated)),
        Err(StoreError::Conflict(_)) => Err(api_conflict("conflict", "table number in use")),
        Err(err) => Err(api_lookup_failed("table", err)),
    }
}

#[utoipa::path(
    delete,
    path = "/v1/tables/{id}",
    tag = "booking",
    params(("id" = i64, Path, description = "Table id")),
    responses(
        (status = 204, description = "Table deleted"),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Table not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Table has reservations", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_table(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Caller(principal): Caller,
) -> Result<StatusCode, ApiError> {
    let table = state
        .store
        .get_table(id)
        .await
        .map_err(|err| api_lookup_failed("table", err))?;
    require(&state, &principal, Action::Delete, &table)?;
    match state.store.delete_table(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(StoreError::Conflict(_)) => Err(api_conflict("in_use", "table has reservations")),
        Err(err) => Err(api_lookup_failed("table", err)),
    }
}
