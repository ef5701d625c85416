//! Table reservation handlers.
use crate::api::error::{
    ApiError, api_conflict, api_internal, api_lookup_failed, api_validation_error,
};
use crate::api::paginate;
use crate::api::types::{CustomerFilter, Page};
use crate::app::AppState;
use crate::auth::guard::{require, require_all};
use crate::auth::identity::Caller;
use crate::model::{Reservation, ReservationCreate};
use crate::store::StoreError;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use trattoria_authz::Action;

#[utoipa::path(
    get,
    path = "/v1/reservations",
    tag = "booking",
    params(CustomerFilter),
    responses(
        (status = 200, description = "List reservations", body = Page<Reservation>),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_reservations(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Query(query): Query<CustomerFilter>,
) -> Result<Json<Page<Reservation>>, ApiError> {
    let reservations = state
        .store
        .list_reservations(query.customer)
        .await
        .map_err(|err| api_internal("failed to list reservations", &err))?;
    let page = paginate(reservations, query.page, query.limit, state.default_page_size);
    require_all(&state, &principal, Action::Read, &page.items)?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/v1/reservations/{id}",
    tag = "booking",
    params(("id" = i64, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Fetch reservation", body = Reservation),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Reservation not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_reservation(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Caller(principal): Caller,
) -> Result<Json<Reservation>, ApiError> {
    let reservation = state
        .store
        .get_reservation(id)
        .await
        .map_err(|err| api_lookup_failed("reservation", err))?;
    require(&state, &principal, Action::Read, &reservation)?;
    Ok(Json(reservation))
}

#[utoipa::path(
    post,
    path = "/v1/reservations",
    tag = "booking",
    request_body = ReservationCreate,
    responses(
        (status = 201, description = "Reservation created", body = Reservation),
        (status = 400, description = "Party does not fit the table", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Table not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Table already reserved for that time", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_reservation(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Json(body): Json<ReservationCreate>,
) -> Result<impl IntoResponse, ApiError> {
    if body.guests == 0 {
        return Err(api_validation_error("guests must be at least 1"));
    }
    let payload = ReservationCreate {
        customer: body.customer.or(principal.id),
        ..body
    };
    require(&state, &principal, Action::Create, &payload)?;
    let table = state
        .store
        .get_table(payload.table)
        .await
        .map_err(|err| api_lookup_failed("table", err))?;
    if payload.guests > table.seats {
        return Err(api_validation_error("party is larger than the table"));
    }
    let reservation = Reservation {
        id: 0,
        customer_id: payload.customer,
        table_id: table.id,
        reserved_at: payload.reserved_at,
        guests: payload.guests,
    };
    match state.store.create_reservation(reservation).await {
        Ok(created) => Ok((StatusCode::CREATED, Json(created))),
        Err(StoreError::Conflict(_)) => Err(api_conflict(
            "conflict",
            "table already reserved for that time",
        )),
        Err(err) => Err(api_internal("failed to create reservation", &err)),
    }
}
