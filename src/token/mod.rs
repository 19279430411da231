mod cache;
mod credential;
mod extract;
mod policy;

pub use cache::{AuthStatus, TokenCache};
pub use credential::{BearerToken, CachedCredential, CredentialMetadata};
pub use extract::{extract_from_response, extract_token};
pub use policy::{DEFAULT_BUFFER, DEFAULT_TTL, ExpiryPolicy};
