//! Access token minting and verification.
//!
//! # Purpose
//! Defines the claims carried by session tokens and the helpers that sign and
//! verify them.
//!
//! # Key invariants
//! - Tokens are always EdDSA (Ed25519); no RSA or HMAC variants are accepted.
//! - `iss` and `aud` are fixed and validated on every request.
//! - `sub` is the numeric user id; `role` is the role name at login time.
//! - The private key is a 32-byte Ed25519 seed; the public key must match it.
//!
//! # Concurrency model
//! Encoding and decoding keys are cached in a process-wide map keyed by `kid`
//! and guarded by `RwLock`. Reads are the hot path.
//!
//! # Examples
//! ```rust
//! use trattoria_api::auth::keys::signing_keys_from_seed;
//! use trattoria_api::auth::token::{mint_token, verify_token};
//! use std::time::Duration;
//!
//! let keys = signing_keys_from_seed([3u8; 32]);
//! let token = mint_token(&keys, 7, "client", Duration::from_secs(60)).expect("mint");
//! let claims = verify_token(&keys, &token, 0).expect("verify");
//! assert_eq!(claims.sub, "7");
//! ```
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use ed25519_dalek::SigningKey as Ed25519SigningKey;
use ed25519_dalek::pkcs8::EncodePrivateKey;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

const ED25519_KEY_LEN: usize = 32;
pub const TOKEN_ISSUER: &str = "trattoria-auth";
pub const TOKEN_AUDIENCE: &str = "trattoria-api";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub iss: String,
    pub aud: String,
    pub sub: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    /// Numeric user id carried in `sub`.
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

/// Ed25519 signing key with its key id.
///
/// `private_key` must never be serialized or logged.
#[derive(Debug, Clone)]
pub struct SigningKey {
    pub kid: String,
    pub alg: Algorithm,
    pub private_key: [u8; ED25519_KEY_LEN],
    pub public_key: [u8; ED25519_KEY_LEN],
}

impl SigningKey {
    /// Check that the key is EdDSA and that the public key matches the seed.
    pub fn validate(&self) -> Result<(), TokenError> {
        if self.alg != Algorithm::EdDSA {
            return Err(TokenError::Key(format!(
                "invalid signing algorithm: {:?}",
                self.alg
            )));
        }
        let signing_key = Ed25519SigningKey::from_bytes(&self.private_key);
        if signing_key.verifying_key().to_bytes() != self.public_key {
            return Err(TokenError::Key(
                "Ed25519 public key does not match private seed".to_string(),
            ));
        }
        Ok(())
    }
}

/// Current signing key plus retired keys still accepted for verification.
#[derive(Debug, Clone)]
pub struct SigningKeys {
    pub current: SigningKey,
    pub previous: Vec<SigningKey>,
}

impl SigningKeys {
    pub fn validate(&self) -> Result<(), TokenError> {
        self.current.validate()?;
        for key in &self.previous {
            key.validate()?;
        }
        Ok(())
    }

    /// Current key first, then previous keys in rotation order.
    pub fn all_keys(&self) -> impl Iterator<Item = &SigningKey> {
        std::iter::once(&self.current).chain(self.previous.iter())
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("key error: {0}")]
    Key(String),
}

/// Sign a session token for `user_id` acting as `role`.
pub fn mint_token(
    keys: &SigningKeys,
    user_id: i64,
    role: &str,
    ttl: Duration,
) -> Result<String, TokenError> {
    keys.validate()?;
    let now = now_epoch_seconds();
    let claims = SessionClaims {
        iss: TOKEN_ISSUER.to_string(),
        aud: TOKEN_AUDIENCE.to_string(),
        sub: user_id.to_string(),
        role: role.to_string(),
        exp: now + ttl.as_secs() as i64,
        iat: now,
    };
    let mut header = Header::new(keys.current.alg);
    header.kid = Some(keys.current.kid.clone());
    let encoding_key = key_cache().encoding_key(&keys.current)?;
    Ok(jsonwebtoken::encode(&header, &claims, &encoding_key)?)
}

/// Verify signature, issuer, audience, and expiry of a session token.
///
/// The key named by the header `kid` is tried first, then every other key.
pub fn verify_token(
    keys: &SigningKeys,
    token: &str,
    leeway: u64,
) -> Result<SessionClaims, TokenError> {
    keys.validate()?;
    let header = jsonwebtoken::decode_header(token)?;
    let mut ordered_keys: Vec<&SigningKey> = Vec::new();
    if let Some(kid) = header.kid.as_deref() {
        ordered_keys.extend(keys.all_keys().filter(|key| key.kid == kid));
        ordered_keys.extend(keys.all_keys().filter(|key| key.kid != kid));
    } else {
        ordered_keys.extend(keys.all_keys());
    }

    let mut validation = Validation::new(Algorithm::EdDSA);
    validation.set_audience(&[TOKEN_AUDIENCE]);
    validation.set_issuer(&[TOKEN_ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
    validation.leeway = leeway;
    let mut last_err = None;
    for key in ordered_keys {
        let decoding_key = key_cache().decoding_key(key)?;
        match jsonwebtoken::decode::<SessionClaims>(token, &decoding_key, &validation) {
            Ok(data) => return Ok(data.claims),
            Err(err) => last_err = Some(err),
        }
    }
    Err(TokenError::Jwt(last_err.unwrap_or_else(|| {
        jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::InvalidToken)
    })))
}

fn now_epoch_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_secs() as i64
}

#[derive(Clone, Default)]
struct KeyCache {
    encoding: Arc<RwLock<HashMap<String, EncodingKey>>>,
    decoding: Arc<RwLock<HashMap<String, DecodingKey>>>,
}

impl KeyCache {
    fn encoding_key(&self, key: &SigningKey) -> Result<EncodingKey, TokenError> {
        if let Ok(map) = self.encoding.read() {
            if let Some(found) = map.get(&key.kid) {
                return Ok(found.clone());
            }
        }
        // jsonwebtoken wants PKCS8 DER for EdDSA signing.
        let signing_key = Ed25519SigningKey::from_bytes(&key.private_key);
        let der = signing_key
            .to_pkcs8_der()
            .map_err(|err| TokenError::Key(format!("encode Ed25519 key: {err}")))?;
        let encoding_key = EncodingKey::from_ed_der(der.as_bytes());
        if let Ok(mut map) = self.encoding.write() {
            map.insert(key.kid.clone(), encoding_key.clone());
        }
        Ok(encoding_key)
    }

    fn decoding_key(&self, key: &SigningKey) -> Result<DecodingKey, TokenError> {
        if let Ok(map) = self.decoding.read() {
            if let Some(found) = map.get(&key.kid) {
                return Ok(found.clone());
            }
        }
        let x = URL_SAFE_NO_PAD.encode(key.public_key);
        let decoding_key = DecodingKey::from_ed_components(&x)?;
        if let Ok(mut map) = self.decoding.write() {
            map.insert(key.kid.clone(), decoding_key.clone());
        }
        Ok(decoding_key)
    }
}

static KEY_CACHE: OnceLock<KeyCache> = OnceLock::new();

fn key_cache() -> &'static KeyCache {
    KEY_CACHE.get_or_init(KeyCache::default)
}
