//! Menu category handlers.
use crate::api::error::{
    ApiError, api_conflict, api_internal, api_lookup_failed, api_validation_error,
};
use crate::api::paginate;
use crate::api::types::{CategoryCreateRequest, Page, PageQuery};
use crate::app::AppState;
use crate::auth::guard::{require, require_all};
use crate::auth::identity::Caller;
use crate::model::{Category, CategoryPatch};
use crate::store::StoreError;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use trattoria_authz::{Action, Subject};

#[utoipa::path(
    get,
    path = "/v1/categories",
    tag = "menu",
    params(PageQuery),
    responses(
        (status = 200, description = "List categories", body = Page<Category>),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_categories(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Category>>, ApiError> {
    let categories = state
        .store
        .list_categories()
        .await
        .map_err(|err| api_internal("failed to list categories", &err))?;
    let page = paginate(categories, query.page, query.limit, state.default_page_size);
    require_all(&state, &principal, Action::Read, &page.items)?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/v1/categories/{id}",
    tag = "menu",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Fetch category", body = Category),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Category not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_category(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Caller(principal): Caller,
) -> Result<Json<Category>, ApiError> {
    let category = state
        .store
        .get_category(id)
        .await
        .map_err(|err| api_lookup_failed("category", err))?;
    require(&state, &principal, Action::Read, &category)?;
    Ok(Json(category))
}

#[utoipa::path(
    post,
    path = "/v1/categories",
    tag = "menu",
    request_body = CategoryCreateRequest,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Invalid category", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Category already exists", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_category(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Json(body): Json<CategoryCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.name.trim().is_empty() {
        return Err(api_validation_error("name is required"));
    }
    require(&state, &principal, Action::Create, Subject::of::<Category>())?;
    let category = Category {
        id: 0,
        name: body.name.trim().to_string(),
        description: body.description,
    };
    match state.store.create_category(category).await {
        Ok(created) => Ok((StatusCode::CREATED, Json(created))),
        Err(StoreError::Conflict(_)) => Err(api_conflict("conflict", "category already exists")),
        Err(err) => Err(api_internal("failed to create category", &err)),
    }
}

#[utoipa::path(
    patch,
    path = "/v1/categories/{id}",
    tag = "menu",
    params(("id" = i64, Path, description = "Category id")),
    request_body = CategoryPatch,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Category not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Category name taken", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn patch_category(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Caller(principal): Caller,
    Json(body): Json<CategoryPatch>,
) -> Result<Json<Category>, ApiError> {
    let category = state
        .store
        .get_category(id)
        .await
        .map_err(|err| api_lookup_failed("category", err))?;
    require(&state, &principal, Action::Update, &category)?;
    match state.store.patch_category(id, body).await {
        Ok(updated) => Ok(Json(updated)),
        Err(StoreError::Conflict(_)) => Err(api_conflict("conflict", "category already exists")),
        Err(err) => Err(api_lookup_failed("category", err)),
    }
}

#[utoipa::path(
    delete,
    path = "/v1/categories/{id}",
    tag = "menu",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Category not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_category(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Caller(principal): Caller,
) -> Result<StatusCode, ApiError> {
    let category = state
        .store
        .get_category(id)
        .await
        .map_err(|err| api_lookup_failed("category", err))?;
    require(&state, &principal, Action::Delete, &category)?;
    state
        .store
        .delete_category(id)
        .await
        .map_err(|err| api_lookup_failed("category", err))?;
    Ok(StatusCode::NO_CONTENT)
}
