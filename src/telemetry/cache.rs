use jiff::Timestamp;
use tracing::{Level, event};
use uuid::Uuid;

use crate::errors::Error;

/// Result of an authorization check, as reported in logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthorizeOutcome {
    Authorized,
    Missing,
    Expired,
}

/// Structured events for a single cache instance. Tokens are reported by length only.
#[derive(Clone, Debug)]
pub struct CacheTelemetry {
    cache_id: Uuid,
    context: String,
}

impl CacheTelemetry {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            cache_id: Uuid::new_v4(),
            context: context.into(),
        }
    }

    pub fn cache_id(&self) -> Uuid {
        self.cache_id
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn emit_recorded(&self, token_len: usize, expires_at: Timestamp) {
        event!(
            Level::INFO,
            cache_id = %self.cache_id,
            context = %self.context,
            token_len,
            expires_at = %expires_at,
            "token.recorded"
        );
    }

    pub fn emit_restored(&self, present: bool) {
        event!(
            Level::INFO,
            cache_id = %self.cache_id,
            context = %self.context,
            present,
            "token.restored"
        );
    }

    pub fn emit_authorize(&self, outcome: AuthorizeOutcome, now: Timestamp) {
        event!(
            Level::DEBUG,
            cache_id = %self.cache_id,
            context = %self.context,
            outcome = ?outcome,
            now = %now,
            "token.authorize"
        );
    }

    pub fn emit_store_failure(&self, key: &str, error: &Error) {
        event!(
            Level::WARN,
            cache_id = %self.cache_id,
            context = %self.context,
            key,
            error = %error,
            "token.store_failure"
        );
    }
}
