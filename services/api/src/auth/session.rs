//! Registration and login endpoints.
//!
//! # Purpose
//! Creates client accounts and exchanges email/password credentials for a
//! signed session token. The token is returned in the body and also set as the
//! `jwt` cookie for browser clients.
//!
//! # Security considerations
//! - Unknown email and wrong password produce the same 401.
//! - Passwords are hashed with Argon2id and never leave the store.
//! - Self-registration always creates a `client`; other roles are granted by
//!   an admin through the user update endpoint.
use crate::api::error::{
    ApiError, api_conflict, api_internal, api_internal_message, api_unauthorized,
    api_validation_error,
};
use crate::api::types::{LoginRequest, LoginResponse, RegisterRequest};
use crate::app::AppState;
use crate::auth::identity::SESSION_COOKIE;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::mint_token;
use crate::model::User;
use crate::store::{RestaurantStore, StoreError};
use anyhow::Context;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::SET_COOKIE;
use axum::response::IntoResponse;
use trattoria_authz::Role;

const MIN_PASSWORD_LEN: usize = 8;

#[utoipa::path(
    post,
    path = "/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Invalid registration", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_registration(&body)?;
    let password_hash =
        hash_password(&body.password).map_err(|_| api_internal_message("failed to hash password"))?;
    let user = User {
        id: 0,
        email: body.email.trim().to_string(),
        name: body.name.trim().to_string(),
        phone: body.phone,
        role: Role::Client,
        password_hash,
    };
    match state.store.create_user(user).await {
        Ok(created) => {
            tracing::info!(user_id = created.id, "account registered");
            Ok((StatusCode::CREATED, Json(created)))
        }
        Err(StoreError::Conflict(_)) => {
            Err(api_conflict("email_taken", "email already registered"))
        }
        Err(err) => Err(api_internal("failed to create account", &err)),
    }
}

#[utoipa::path(
    post,
    path = "/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .store
        .find_user_by_email(body.email.trim())
        .await
        .map_err(|err| api_internal("failed to load account", &err))?;
    let Some(user) = user.filter(|user| verify_password(&user.password_hash, &body.password))
    else {
        count_login("rejected");
        return Err(api_unauthorized("invalid credentials"));
    };
    let token = mint_token(
        &state.signing_keys,
        user.id,
        user.role.as_str(),
        state.token_ttl,
    )
    .map_err(|err| {
        tracing::error!(error = %err, "failed to mint session token");
        api_internal_message("failed to issue token")
    })?;
    count_login("accepted");
    tracing::info!(user_id = user.id, role = %user.role, "session issued");
    let cookie = format!(
        "{SESSION_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        state.token_ttl.as_secs()
    );
    Ok((
        [(SET_COOKIE, cookie)],
        Json(LoginResponse {
            access_token: token,
            token_type: "Bearer".to_string(),
            expires_in: state.token_ttl.as_secs(),
            user,
        }),
    ))
}

/// Create the configured admin account unless the email is already taken.
pub async fn ensure_admin(
    store: &dyn RestaurantStore,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    if store.find_user_by_email(email).await?.is_some() {
        return Ok(());
    }
    let password_hash = hash_password(password).context("hash bootstrap admin password")?;
    let admin = store
        .create_user(User {
            id: 0,
            email: email.to_string(),
            name: "Administrator".to_string(),
            phone: None,
            role: Role::Admin,
            password_hash,
        })
        .await
        .context("create bootstrap admin")?;
    tracing::info!(user_id = admin.id, "bootstrap admin created");
    Ok(())
}

fn validate_registration(body: &RegisterRequest) -> Result<(), ApiError> {
    let email = body.email.trim();
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !well_formed {
        return Err(api_validation_error("email is not valid"));
    }
    if body.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(api_validation_error(
            "password must be at least 8 characters",
        ));
    }
    if body.name.trim().is_empty() {
        return Err(api_validation_error("name is required"));
    }
    Ok(())
}

fn count_login(outcome: &'static str) {
    metrics::counter!("trattoria_logins_total", "outcome" => outcome).increment(1);
}
