use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;

pub const DEFAULT_BIND: &str = "0.0.0.0:8443";
pub const DEFAULT_METRICS_BIND: &str = "0.0.0.0:8080";
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;
pub const DEFAULT_TOKEN_LEEWAY_SECS: u64 = 30;
pub const DEFAULT_PAGE_SIZE: u32 = 20;

// Service configuration sourced from environment variables, optionally
// overridden by a YAML file named in TRATTORIA_CONFIG.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub token_ttl_secs: u64,
    pub token_leeway_secs: u64,
    /// Ed25519 seed for session tokens; random per process when unset.
    pub signing_seed: Option<[u8; 32]>,
    pub default_page_size: u32,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct ApiConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    token_ttl_secs: Option<u64>,
    token_leeway_secs: Option<u64>,
    signing_seed: Option<String>,
    default_page_size: Option<u32>,
    bootstrap_admin: Option<BootstrapAdmin>,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("TRATTORIA_BIND")
            .unwrap_or_else(|_| DEFAULT_BIND.to_string())
            .parse()
            .with_context(|| "parse TRATTORIA_BIND")?;
        let metrics_bind = std::env::var("TRATTORIA_METRICS_BIND")
            .unwrap_or_else(|_| DEFAULT_METRICS_BIND.to_string())
            .parse()
            .with_context(|| "parse TRATTORIA_METRICS_BIND")?;
        let token_ttl_secs = env_number("TRATTORIA_TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?;
        let token_leeway_secs =
            env_number("TRATTORIA_TOKEN_LEEWAY_SECS", DEFAULT_TOKEN_LEEWAY_SECS)?;
        let default_page_size = env_number("TRATTORIA_DEFAULT_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        let signing_seed = match std::env::var("TRATTORIA_SIGNING_SEED") {
            Ok(value) => Some(parse_seed(&value).with_context(|| "parse TRATTORIA_SIGNING_SEED")?),
            Err(_) => None,
        };
        let bootstrap_admin = match (
            std::env::var("TRATTORIA_BOOTSTRAP_ADMIN_EMAIL"),
            std::env::var("TRATTORIA_BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) => Some(BootstrapAdmin { email, password }),
            _ => None,
        };
        let config = Self {
            bind_addr,
            metrics_bind,
            token_ttl_secs,
            token_leeway_secs,
            signing_seed,
            default_page_size,
            bootstrap_admin,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("TRATTORIA_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read TRATTORIA_CONFIG: {path}"))?;
            let override_cfg: ApiConfigOverride =
                serde_yaml::from_str(&contents).with_context(|| "parse api config yaml")?;
            if let Some(value) = override_cfg.bind_addr {
                config.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
            }
            if let Some(value) = override_cfg.metrics_bind {
                config.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
            }
            if let Some(value) = override_cfg.token_ttl_secs {
                config.token_ttl_secs = value;
            }
            if let Some(value) = override_cfg.token_leeway_secs {
                config.token_leeway_secs = value;
            }
            if let Some(value) = override_cfg.signing_seed {
                config.signing_seed =
                    Some(parse_seed(&value).with_context(|| "parse signing_seed")?);
            }
            if let Some(value) = override_cfg.default_page_size {
                config.default_page_size = value;
            }
            if let Some(value) = override_cfg.bootstrap_admin {
                config.bootstrap_admin = Some(value);
            }
            config.validate()?;
        }
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.token_ttl_secs == 0 {
            bail!("token ttl must be positive");
        }
        if self.default_page_size == 0 {
            bail!("default page size must be positive");
        }
        Ok(())
    }
}

fn env_number<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) => value.parse().with_context(|| format!("parse {key}")),
        Err(_) => Ok(default),
    }
}

fn parse_seed(value: &str) -> Result<[u8; 32]> {
    let bytes = hex::decode(value.trim()).with_context(|| "decode hex")?;
    bytes
        .try_into()
        .map_err(|bytes: Vec<u8>| anyhow::anyhow!("expected 32 bytes, got {}", bytes.len()))
}
