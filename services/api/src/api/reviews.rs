//! Dish review handlers.
use crate::api::error::{ApiError, api_internal, api_lookup_failed, api_validation_error};
use crate::api::paginate;
use crate::api::types::{DishFilter, Page};
use crate::app::AppState;
use crate::auth::guard::{require, require_all};
use crate::auth::identity::Caller;
use crate::model::{Review, ReviewCreate};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use trattoria_authz::Action;

const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

#[utoipa::path(
    get,
    path = "/v1/reviews",
    tag = "menu",
    params(DishFilter),
    responses(
        (status = 200, description = "List reviews", body = Page<Review>),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_reviews(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Query(query): Query<DishFilter>,
) -> Result<Json<Page<Review>>, ApiError> {
    let reviews = state
        .store
        .list_reviews(query.dish)
        .await
        .map_err(|err| api_internal("failed to list reviews", &err))?;
    let page = paginate(reviews, query.page, query.limit, state.default_page_size);
    require_all(&state, &principal, Action::Read, &page.items)?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/v1/reviews/{id}",
    tag = "menu",
    params(("id" = i64, Path, description = "Review id")),
    responses(
        (status = 200, description = "Fetch review", body = Review),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Review not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_review(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Caller(principal): Caller,
) -> Result<Json<Review>, ApiError> {
    let review = state
        .store
        .get_review(id)
        .await
        .map_err(|err| api_lookup_failed("review", err))?;
    require(&state, &principal, Action::Read, &review)?;
    Ok(Json(review))
}

#[utoipa::path(
    post,
    path = "/v1/reviews",
    tag = "menu",
    request_body = ReviewCreate,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, description = "Invalid rating", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Dish not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_review(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Json(body): Json<ReviewCreate>,
) -> Result<impl IntoResponse, ApiError> {
    if !RATING_RANGE.contains(&body.rating) {
        return Err(api_validation_error("rating must be between 1 and 5"));
    }
    let payload = ReviewCreate {
        user: body.user.or(principal.id),
        ..body
    };
    require(&state, &principal, Action::Create, &payload)?;
    state
        .store
        .get_dish(payload.dish)
        .await
        .map_err(|err| api_lookup_failed("dish", err))?;
    let review = Review {
        id: 0,
        user_id: payload.user,
        dish_id: payload.dish,
        rating: payload.rating,
        comment: payload.comment,
        created_at: Utc::now(),
    };
    let created = state
        .store
        .create_review(review)
        .await
        .map_err(|err| api_internal("failed to create review", &err))?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    delete,
    path = "/v1/reviews/{id}",
    tag = "menu",
    params(("id" = i64, Path, description = "Review id")),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Review not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_review(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Caller(principal): Caller,
) -> Result<StatusCode, ApiError> {
    let review = state
        .store
        .get_review(id)
        .await
        .map_err(|err| api_lookup_failed("review", err))?;
    require(&state, &principal, Action::Delete, &review)?;
    state
        .store
        .delete_review(id)
        .await
        .map_err(|err| api_lookup_failed("review", err))?;
    Ok(StatusCode::NO_CONTENT)
}
