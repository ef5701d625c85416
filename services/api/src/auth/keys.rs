//! Session signing key construction.
//!
//! Keys are Ed25519 with a raw 32-byte seed. The `kid` is derived from the
//! public key, so equal seeds always produce the same `kid` and different seeds
//! never share a cache slot.
use crate::auth::token::{SigningKey, SigningKeys};
use ed25519_dalek::SigningKey as Ed25519SigningKey;
use jsonwebtoken::Algorithm;
use rand::RngCore;

/// Key set with a fresh random seed and no previous keys.
///
/// Tokens signed with it do not survive a restart.
pub fn generate_signing_keys() -> SigningKeys {
    let mut seed = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut seed);
    signing_keys_from_seed(seed)
}

/// Deterministic key set for a configured seed.
pub fn signing_keys_from_seed(seed: [u8; 32]) -> SigningKeys {
    let signing_key = Ed25519SigningKey::from_bytes(&seed);
    let public_key = signing_key.verifying_key().to_bytes();
    SigningKeys {
        current: SigningKey {
            kid: hex::encode(&public_key[..8]),
            alg: Algorithm::EdDSA,
            private_key: seed,
            public_key,
        },
        previous: Vec::new(),
    }
}
