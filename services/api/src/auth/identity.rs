//! Caller identity resolution.
//!
//! # Purpose
//! Turns request credentials into the [`Principal`] that every authorization
//! check runs against.
//!
//! # Key invariants
//! - No credential means a guest principal, never an error.
//! - A credential that is present but fails verification is a 401; it never
//!   silently degrades to guest.
//! - The active order is looked up per request so a freshly created order is
//!   visible to the very next call.
//! - The role comes from the stored account, so a promotion or demotion
//!   applies to the next request made with an existing token. A token for an
//!   account that no longer exists is a 401.
//! - A token role name the policy does not know is kept and resolves to no
//!   rules, whatever the stored account says.
use crate::api::error::{ApiError, api_internal, api_unauthorized};
use crate::app::AppState;
use crate::auth::token::verify_token;
use crate::store::StoreError;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use trattoria_authz::{Principal, RoleName};

/// Cookie carrying the session token for browser clients.
pub const SESSION_COOKIE: &str = "jwt";

/// Resolved caller of the current request.
#[derive(Debug, Clone)]
pub struct Caller(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve_principal(state, &parts.headers).await.map(Caller)
    }
}

pub async fn resolve_principal(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Principal, ApiError> {
    let Some(token) = extract_bearer(headers).or_else(|| extract_cookie(headers, SESSION_COOKIE))
    else {
        return Ok(Principal::guest());
    };
    let claims = verify_token(&state.signing_keys, token, state.token_leeway_secs).map_err(
        |err| {
            tracing::debug!(error = %err, "rejected session token");
            api_unauthorized("invalid token")
        },
    )?;
    let user_id = claims
        .user_id()
        .ok_or_else(|| api_unauthorized("invalid token"))?;
    let user = match state.store.get_user(user_id).await {
        Ok(user) => user,
        Err(StoreError::NotFound(_)) => {
            tracing::debug!(user_id, "session token for unknown user");
            return Err(api_unauthorized("invalid token"));
        }
        Err(err) => return Err(api_internal("failed to resolve caller", &err)),
    };
    let claimed = RoleName::new(claims.role);
    let role = if claimed.role().is_some() {
        RoleName::from(user.role)
    } else {
        claimed
    };
    let active_order = state
        .store
        .active_order_for(user_id)
        .await
        .map_err(|err| api_internal("failed to resolve active order", &err))?;
    Ok(Principal {
        id: Some(user.id),
        role,
        active_order,
    })
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?;
    let value = value.to_str().ok()?;
    value.strip_prefix("Bearer ")
}

fn extract_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_header_is_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(extract_bearer(&headers), Some("abc.def"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_bearer(&headers), None);
    }

    #[test]
    fn session_cookie_is_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; jwt=tok.en.value; lang=it"),
        );
        assert_eq!(extract_cookie(&headers, SESSION_COOKIE), Some("tok.en.value"));
        assert_eq!(extract_cookie(&headers, "missing"), None);
    }

    #[test]
    fn empty_session_cookie_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("jwt="));
        assert_eq!(extract_cookie(&headers, SESSION_COOKIE), None);
    }
}
