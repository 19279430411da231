use std::time::Duration;

use jiff::{SignedDuration, Timestamp};

use crate::errors::Error;

pub const DEFAULT_TTL: Duration = Duration::from_secs(86_400);
pub const DEFAULT_BUFFER: Duration = Duration::from_secs(300);

/// Lifetime rules applied to every recorded credential.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpiryPolicy {
    /// How long a token stays valid after issuance.
    pub ttl: Duration,
    /// Margin subtracted from the expiry before a token is handed out.
    pub buffer: Duration,
}

impl ExpiryPolicy {
    /// A buffer at or above the ttl is accepted; such tokens are never usable.
    pub fn new(ttl: Duration, buffer: Duration) -> Result<Self, Error> {
        validate_ttl(ttl)?;
        to_signed(buffer)?;
        Ok(Self { ttl, buffer })
    }

    pub fn from_secs(ttl_secs: u64, buffer_secs: u64) -> Result<Self, Error> {
        Self::new(
            Duration::from_secs(ttl_secs),
            Duration::from_secs(buffer_secs),
        )
    }

    /// Computes `issued_at + ttl`.
    pub fn expires_at(issued_at: Timestamp, ttl: Duration) -> Result<Timestamp, Error> {
        validate_ttl(ttl)?;
        issued_at
            .checked_add(to_signed(ttl)?)
            .map_err(|e| Error::Config(format!("Token expiry out of range: {e}")))
    }

    /// Last instant (exclusive) at which a token expiring at `expires_at` may be used.
    ///
    /// `None` means the deadline falls before the earliest representable
    /// timestamp, so the token is always treated as expired.
    pub fn usable_until(expires_at: Timestamp, buffer: Duration) -> Option<Timestamp> {
        let buffer = to_signed(buffer).ok()?;
        expires_at.checked_sub(buffer).ok()
    }
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            buffer: DEFAULT_BUFFER,
        }
    }
}

fn validate_ttl(ttl: Duration) -> Result<(), Error> {
    if ttl.is_zero() {
        return Err(Error::Config("Token TTL must be > 0".into()));
    }
    Ok(())
}

fn to_signed(duration: Duration) -> Result<SignedDuration, Error> {
    SignedDuration::try_from(duration)
        .map_err(|e| Error::Config(format!("Duration {duration:?} out of range: {e}")))
}
