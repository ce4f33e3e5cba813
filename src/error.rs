// Error types. Storage operations return `StorageError` (the call failed),
// while ledger and probe failures are advisory: the caller logs them and
// carries on with the upload.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a folder operation or of the upload trigger.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("invalid storage path: {0:?}")]
    InvalidPath(String),

    #[error("token cannot be used in an Authorization header")]
    InvalidToken,

    /// The local HTTP client could not be set up (TLS backend and the like).
    #[error("could not build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The storage API answered with a status other than the expected one.
    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    /// Timeout, DNS failure, refused connection and friends.
    #[error("connection error: {0}")]
    Connection(#[from] reqwest::Error),
}

impl StorageError {
    pub fn is_connection(&self) -> bool {
        matches!(self, StorageError::Connection(_))
    }
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("ledger I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ledger JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("size probe request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("no usable content-length in probe response")]
    MissingLength,
}

/// The caption image could not be fetched; nothing is uploaded in that case.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("invalid image source URL: {0}")]
    InvalidUrl(String),

    #[error("image source unreachable: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("image source returned {0}")]
    Status(StatusCode),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Any real reqwest::Error will do; a relative URL fails before sending.
    fn reqwest_error() -> reqwest::Error {
        reqwest::blocking::Client::new()
            .get("not a url")
            .send()
            .unwrap_err()
    }

    #[test]
    fn client_setup_failure_is_not_a_connection_error() {
        let err = StorageError::ClientBuild(reqwest_error());
        assert!(!err.is_connection());
        assert!(err.to_string().starts_with("could not build HTTP client"));
    }

    #[test]
    fn transport_failure_is_a_connection_error() {
        assert!(StorageError::from(reqwest_error()).is_connection());
    }
}
