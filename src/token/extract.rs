use reqwest::Response;
use tracing::warn;

use crate::errors::Error;

const SUCCESS_STATUS: u16 = 200;

/// Pulls the bearer token out of an authentication response body.
///
/// The endpoint answers with a JSON-quoted string, so one leading and one
/// trailing `"` are dropped when present. Anything other than a 200 fails
/// with [`Error::AuthFailed`]; a body that is empty once unquoted fails with
/// [`Error::EmptyToken`].
pub fn extract_token(body: &str, status: u16) -> Result<String, Error> {
    if status != SUCCESS_STATUS {
        return Err(Error::AuthFailed { status });
    }
    let token = body.strip_prefix('"').unwrap_or(body);
    let token = token.strip_suffix('"').unwrap_or(token);
    if token.is_empty() {
        return Err(Error::EmptyToken);
    }
    Ok(token.to_string())
}

/// Reads an authentication response and extracts its token.
pub async fn extract_from_response(response: Response) -> Result<String, Error> {
    let status = response.status();
    let body = response.text().await?;
    extract_token(&body, status.as_u16()).inspect_err(|err| {
        warn!(status = status.as_u16(), error = %err, "token.extract_failed");
    })
}
