use std::time::Duration;

use bearer_token_cache::errors::Error;
use bearer_token_cache::token::{DEFAULT_BUFFER, DEFAULT_TTL, ExpiryPolicy};
use jiff::Timestamp;

#[test]
fn defaults_are_one_day_and_five_minutes() {
    let policy = ExpiryPolicy::default();
    assert_eq!(policy.ttl, DEFAULT_TTL);
    assert_eq!(policy.buffer, DEFAULT_BUFFER);
    assert_eq!(policy.ttl, Duration::from_secs(86_400));
    assert_eq!(policy.buffer, Duration::from_secs(300));
}

#[test]
fn policy_rejects_zero_ttl() {
    let err = ExpiryPolicy::new(Duration::ZERO, Duration::from_secs(1)).expect_err("ttl must be > 0");
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn expires_at_adds_ttl() {
    let issued = Timestamp::from_second(1_000).unwrap();
    let expires = ExpiryPolicy::expires_at(issued, Duration::from_secs(86_400)).unwrap();
    assert_eq!(expires.as_second(), 87_400);
}

#[test]
fn huge_buffer_has_no_usable_window() {
    let expires = Timestamp::from_second(0).unwrap();
    assert!(ExpiryPolicy::usable_until(expires, Duration::from_secs(u64::MAX)).is_none());
}
