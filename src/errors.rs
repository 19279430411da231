use std::fmt;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Json(serde_json::Error),
    Http(reqwest::Error),
    Config(String),
    /// Token was empty or whitespace-only when recorded.
    InvalidToken,
    /// The secret store rejected a read or write.
    StoreUnavailable(String),
    /// Authentication response carried a non-200 status.
    AuthFailed { status: u16 },
    /// Authentication response body held no token once unquoted.
    EmptyToken,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "io error: {err}"),
            Error::Json(err) => write!(f, "json error: {err}"),
            Error::Http(err) => write!(f, "http error: {err}"),
            Error::Config(msg) => write!(f, "config error: {msg}"),
            Error::InvalidToken => write!(f, "token must not be empty or whitespace"),
            Error::StoreUnavailable(msg) => write!(f, "secret store unavailable: {msg}"),
            Error::AuthFailed { status } => {
                write!(f, "authentication failed with status {status}")
            }
            Error::EmptyToken => write!(f, "authentication response contained no token"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}
