//! read cache configuration from a file or the environment

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::token::ExpiryPolicy;

pub const ENV_TOKEN_KEY: &str = "TOKEN_CACHE_TOKEN_KEY";
pub const ENV_EXPIRY_KEY: &str = "TOKEN_CACHE_EXPIRY_KEY";
pub const ENV_TTL_SECS: &str = "TOKEN_CACHE_TTL_SECS";
pub const ENV_BUFFER_SECS: &str = "TOKEN_CACHE_BUFFER_SECS";

pub enum ConfigLocation {
    File(String),
    Env,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Secret store key holding the raw token.
    pub token_key: String,
    /// Secret store key holding issuance/expiry metadata.
    pub expiry_key: String,
    pub ttl_secs: u64,
    pub buffer_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            token_key: "Xray_Token".to_string(),
            expiry_key: "xray_token_expires".to_string(),
            ttl_secs: 86_400,
            buffer_secs: 300,
        }
    }
}

impl CacheConfig {
    pub fn load(loc: ConfigLocation) -> Result<Self, Error> {
        match loc {
            ConfigLocation::File(path) => Self::from_file(path),
            ConfigLocation::Env => Self::from_env(),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        let config: CacheConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Every variable is optional; unset ones keep their defaults.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            token_key: lookup(ENV_TOKEN_KEY).unwrap_or(defaults.token_key),
            expiry_key: lookup(ENV_EXPIRY_KEY).unwrap_or(defaults.expiry_key),
            ttl_secs: parse_secs(&lookup, ENV_TTL_SECS)?.unwrap_or(defaults.ttl_secs),
            buffer_secs: parse_secs(&lookup, ENV_BUFFER_SECS)?.unwrap_or(defaults.buffer_secs),
        })
    }

    pub fn from_values(
        token_key: impl Into<String>,
        expiry_key: impl Into<String>,
        ttl_secs: Option<u64>,
        buffer_secs: Option<u64>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            token_key: token_key.into(),
            expiry_key: expiry_key.into(),
            ttl_secs: ttl_secs.unwrap_or(defaults.ttl_secs),
            buffer_secs: buffer_secs.unwrap_or(defaults.buffer_secs),
        }
    }

    pub fn policy(&self) -> Result<ExpiryPolicy, Error> {
        if self.token_key.is_empty() || self.expiry_key.is_empty() {
            return Err(Error::Config("Store keys must not be empty".to_string()));
        }
        if self.token_key == self.expiry_key {
            return Err(Error::Config(
                "Token key and expiry key must differ".to_string(),
            ));
        }
        ExpiryPolicy::from_secs(self.ttl_secs, self.buffer_secs)
    }
}

fn parse_secs<F>(lookup: &F, key: &str) -> Result<Option<u64>, Error>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map_err(|e| Error::Config(format!("Invalid {key} value '{raw}': {e}")))
        })
        .transpose()
}
