//! Single-slot bearer token cache with buffered expiry.
//!
//! An authentication response is turned into a token with [`extract_token`],
//! remembered with [`TokenCache::record`], and handed out by
//! [`TokenCache::authorize`] until `expires_at - buffer` passes.

pub mod config;
pub mod errors;
pub mod store;
pub mod telemetry;
pub mod token;

pub use config::{CacheConfig, ConfigLocation};
pub use errors::Error;
pub use store::{MemoryStore, SecretStore};
pub use token::{AuthStatus, BearerToken, CachedCredential, TokenCache, extract_token};
