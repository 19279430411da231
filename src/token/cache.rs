use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use jiff::Timestamp;
use reqwest::{RequestBuilder, Response};

use crate::config::CacheConfig;
use crate::errors::Error;
use crate::store::SecretStore;
use crate::telemetry::cache::{AuthorizeOutcome, CacheTelemetry};

use super::{
    BearerToken, CachedCredential, CredentialMetadata, ExpiryPolicy, extract_from_response,
};

/// Why no usable token could be handed out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthStatus {
    /// Nothing has been recorded.
    Missing,
    /// A credential exists but is past `expires_at - buffer`.
    Expired,
}

impl fmt::Display for AuthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthStatus::Missing => write!(f, "no token recorded; authenticate first"),
            AuthStatus::Expired => write!(f, "cached token expired; re-authenticate"),
        }
    }
}

impl std::error::Error for AuthStatus {}

/// Single-slot bearer token cache persisted through a [`SecretStore`].
pub struct TokenCache<S> {
    store: S,
    token_key: String,
    expiry_key: String,
    policy: ExpiryPolicy,
    slot: RwLock<Option<CachedCredential>>,
    telemetry: CacheTelemetry,
}

impl<S: SecretStore> TokenCache<S> {
    /// Creates an empty cache; nothing is read from the store.
    pub fn new(store: S, config: &CacheConfig) -> Result<Self, Error> {
        let policy = config.policy()?;
        Ok(Self {
            store,
            token_key: config.token_key.clone(),
            expiry_key: config.expiry_key.clone(),
            policy,
            slot: RwLock::new(None),
            telemetry: CacheTelemetry::new(config.token_key.clone()),
        })
    }

    /// Creates a cache seeded from whatever credential the store already holds.
    ///
    /// A token without metadata (or metadata without a token) is ignored.
    pub fn restore(store: S, config: &CacheConfig) -> Result<Self, Error> {
        let cache = Self::new(store, config)?;
        let token = cache
            .store_get(&cache.token_key)?
            .and_then(|raw| BearerToken::new(raw).ok());
        let metadata = cache.store_get(&cache.expiry_key)?;
        let restored = match (token, metadata) {
            (Some(token), Some(raw)) => {
                let metadata: CredentialMetadata = serde_json::from_str(&raw)?;
                Some(CachedCredential::from_parts(token, metadata))
            }
            _ => None,
        };
        cache.telemetry.emit_restored(restored.is_some());
        *cache.write_slot() = restored;
        Ok(cache)
    }

    pub fn policy(&self) -> &ExpiryPolicy {
        &self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn telemetry(&self) -> &CacheTelemetry {
        &self.telemetry
    }

    /// Snapshot of the stored credential, expired or not.
    pub fn current(&self) -> Option<CachedCredential> {
        self.read_slot().clone()
    }

    /// Records `token` as issued now with the configured ttl.
    pub fn record(&self, token: &str) -> Result<CachedCredential, Error> {
        self.record_at(token, Timestamp::now(), self.policy.ttl)
    }

    /// Persists `token` then swaps it into the slot.
    ///
    /// On any store failure the slot keeps its previous credential.
    pub fn record_at(
        &self,
        token: &str,
        issued_at: Timestamp,
        ttl: Duration,
    ) -> Result<CachedCredential, Error> {
        let token = BearerToken::new(token)?;
        let credential = CachedCredential::issue(token, issued_at, ttl)?;
        let metadata = serde_json::to_string(&credential.metadata())?;

        // Held across the store writes so readers never see a partial update.
        let mut slot = self.write_slot();

        // The store may hold a credential this instance never saw.
        let previous = self.store_get(&self.token_key)?;
        self.store_set(&self.token_key, credential.token().as_str())?;
        if let Err(err) = self.store_set(&self.expiry_key, &metadata) {
            // Best effort: never leave the new token next to old metadata. A blank
            // token reads back as absent.
            let _ = self.store_set(&self.token_key, previous.as_deref().unwrap_or(""));
            return Err(err);
        }

        *slot = Some(credential.clone());
        self.telemetry
            .emit_recorded(credential.token().len(), credential.expires_at());
        Ok(credential)
    }

    /// Extracts the token from an authentication response and records it.
    pub async fn record_response(&self, response: Response) -> Result<CachedCredential, Error> {
        let token = extract_from_response(response).await?;
        self.record(&token)
    }

    pub fn authorize(&self) -> Result<BearerToken, AuthStatus> {
        self.authorize_at(Timestamp::now())
    }

    pub fn authorize_at(&self, now: Timestamp) -> Result<BearerToken, AuthStatus> {
        self.authorize_with_buffer(now, self.policy.buffer)
    }

    /// Returns the cached token if `now < expires_at - buffer`.
    pub fn authorize_with_buffer(
        &self,
        now: Timestamp,
        buffer: Duration,
    ) -> Result<BearerToken, AuthStatus> {
        let result = match self.read_slot().as_ref() {
            None => Err(AuthStatus::Missing),
            Some(credential) if credential.is_usable(now, buffer) => {
                Ok(credential.token().clone())
            }
            Some(_) => Err(AuthStatus::Expired),
        };
        let outcome = match &result {
            Ok(_) => AuthorizeOutcome::Authorized,
            Err(AuthStatus::Missing) => AuthorizeOutcome::Missing,
            Err(AuthStatus::Expired) => AuthorizeOutcome::Expired,
        };
        self.telemetry.emit_authorize(outcome, now);
        result
    }

    /// Attaches `Authorization: Bearer <token>` when a usable token is cached.
    pub fn authorize_request(&self, request: RequestBuilder) -> Result<RequestBuilder, AuthStatus> {
        let token = self.authorize()?;
        Ok(request.header("Authorization", token.header_value()))
    }

    fn store_get(&self, key: &str) -> Result<Option<String>, Error> {
        self.store.get(key).map_err(|err| self.store_failure(key, err))
    }

    fn store_set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.store
            .set(key, value)
            .map_err(|err| self.store_failure(key, err))
    }

    fn store_failure(&self, key: &str, err: Error) -> Error {
        let err = match err {
            Error::StoreUnavailable(_) => err,
            other => Error::StoreUnavailable(other.to_string()),
        };
        self.telemetry.emit_store_failure(key, &err);
        err
    }

    // The slot is only ever replaced wholesale, so a poisoned lock still holds a
    // consistent value.
    fn read_slot(&self) -> RwLockReadGuard<'_, Option<CachedCredential>> {
        self.slot.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_slot(&self) -> RwLockWriteGuard<'_, Option<CachedCredential>> {
        self.slot.write().unwrap_or_else(PoisonError::into_inner)
    }
}
