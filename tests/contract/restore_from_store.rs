use std::sync::Arc;

use bearer_token_cache::{AuthStatus, CacheConfig, Error, MemoryStore, SecretStore, TokenCache};

use crate::time::{now, offset, secs};

/// Store whose reads always fail with an I/O error.
struct UnreadableStore;

impl SecretStore for UnreadableStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Err(Error::Io(std::io::Error::other(format!("{key}: permission denied"))))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), Error> {
        Ok(())
    }
}

#[test]
fn restore_round_trips_recorded_credential() {
    let store = Arc::new(MemoryStore::new());
    let config = CacheConfig::default();
    let original = TokenCache::new(store.clone(), &config).unwrap();
    let recorded = original.record_at("persisted", now(), secs(86_400)).unwrap();

    let restored = TokenCache::restore(store, &config).unwrap();
    assert_eq!(restored.current(), Some(recorded));
    assert_eq!(restored.authorize_at(offset(60)).unwrap().as_str(), "persisted");
}

#[test]
fn restore_from_empty_store_is_missing() {
    let cache = TokenCache::restore(Arc::new(MemoryStore::new()), &CacheConfig::default()).unwrap();
    assert_eq!(cache.authorize_at(now()), Err(AuthStatus::Missing));
}

#[test]
fn token_without_metadata_is_ignored() {
    let store = Arc::new(MemoryStore::new());
    store.set("Xray_Token", "orphan").unwrap();
    let cache = TokenCache::restore(store, &CacheConfig::default()).unwrap();
    assert!(cache.current().is_none());
    assert_eq!(cache.authorize_at(now()), Err(AuthStatus::Missing));
}

#[test]
fn blank_stored_token_is_ignored() {
    let store = Arc::new(MemoryStore::new());
    let config = CacheConfig::default();
    TokenCache::new(store.clone(), &config)
        .unwrap()
        .record_at("real", now(), secs(86_400))
        .unwrap();
    store.set("Xray_Token", "  ").unwrap();

    let cache = TokenCache::restore(store, &config).unwrap();
    assert_eq!(cache.authorize_at(now()), Err(AuthStatus::Missing));
}

#[test]
fn corrupt_metadata_is_a_json_error() {
    let store = Arc::new(MemoryStore::new());
    store.set("Xray_Token", "abc").unwrap();
    store.set("xray_token_expires", "tomorrow-ish").unwrap();
    let err = match TokenCache::restore(store, &CacheConfig::default()) {
        Ok(_) => panic!("expected metadata parse failure"),
        Err(err) => err,
    };
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn restored_expired_credential_reports_expired() {
    let store = Arc::new(MemoryStore::new());
    let config = CacheConfig::default();
    TokenCache::new(store.clone(), &config)
        .unwrap()
        .record_at("stale", offset(-90_000), secs(86_400))
        .unwrap();

    let cache = TokenCache::restore(store, &config).unwrap();
    assert_eq!(cache.authorize_at(now()), Err(AuthStatus::Expired));
}

#[test]
fn unreadable_store_is_store_unavailable() {
    let err = match TokenCache::restore(UnreadableStore, &CacheConfig::default()) {
        Ok(_) => panic!("expected restore to fail"),
        Err(err) => err,
    };
    match err {
        Error::StoreUnavailable(msg) => assert!(msg.contains("permission denied")),
        other => panic!("unexpected error: {:?}", other),
    }
}
