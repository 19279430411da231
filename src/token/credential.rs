use std::fmt;
use std::time::Duration;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::errors::Error;

use super::ExpiryPolicy;

/// Opaque bearer token. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Rejects empty or whitespace-only values.
    pub fn new(value: impl Into<String>) -> Result<Self, Error> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(Error::InvalidToken);
        }
        Ok(Self(value))
    }

    /// Returns the raw token value suitable for Authorization headers.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BearerToken(len={})", self.0.len())
    }
}

/// Timestamps persisted alongside the token in the secret store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialMetadata {
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
}

/// The single credential held by a cache slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedCredential {
    token: BearerToken,
    issued_at: Timestamp,
    expires_at: Timestamp,
}

impl CachedCredential {
    pub fn issue(token: BearerToken, issued_at: Timestamp, ttl: Duration) -> Result<Self, Error> {
        let expires_at = ExpiryPolicy::expires_at(issued_at, ttl)?;
        Ok(Self {
            token,
            issued_at,
            expires_at,
        })
    }

    pub fn from_parts(token: BearerToken, metadata: CredentialMetadata) -> Self {
        Self {
            token,
            issued_at: metadata.issued_at,
            expires_at: metadata.expires_at,
        }
    }

    pub fn token(&self) -> &BearerToken {
        &self.token
    }

    pub fn issued_at(&self) -> Timestamp {
        self.issued_at
    }

    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    pub fn metadata(&self) -> CredentialMetadata {
        CredentialMetadata {
            issued_at: self.issued_at,
            expires_at: self.expires_at,
        }
    }

    /// True while `now` is strictly before `expires_at - buffer`.
    pub fn is_usable(&self, now: Timestamp, buffer: Duration) -> bool {
        match ExpiryPolicy::usable_until(self.expires_at, buffer) {
            Some(deadline) => now < deadline,
            None => false,
        }
    }

    /// Time left before the hard expiry, if any.
    pub fn remaining(&self, now: Timestamp) -> Option<Duration> {
        let left = self.expires_at.duration_since(now);
        if left.is_negative() || left.is_zero() {
            return None;
        }
        Some(left.unsigned_abs())
    }
}
