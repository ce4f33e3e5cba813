// Blocking client for the cloud-storage REST API: folder lifecycle and
// upload-by-reference, authenticated with an OAuth bearer token.

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::StorageConfig;
use crate::error::StorageError;
use crate::ledger::{MetadataLedger, UploadRecord};
use crate::probe::probe_size_or_zero;
use crate::sanitize::{sanitized_destination, trailing_segment};

const UNKNOWN_ERROR: &str = "Unknown error";

/// Successful outcomes of `create_folder`. Both count as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderCreated {
    Created,
    AlreadyExists,
}

/// The storage service queued the transfer. It has NOT necessarily finished,
/// and may still fail on the remote side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadAccepted {
    /// Path the service was asked to write to (after sanitization).
    pub destination: String,
    pub size_bytes: u64,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

pub struct StorageClient {
    http: Client,
    config: StorageConfig,
    auth: HeaderValue,
    ledger: MetadataLedger,
}

impl StorageClient {
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        let http = Client::builder()
            .build()
            .map_err(StorageError::ClientBuild)?;
        let mut auth = HeaderValue::from_str(&format!("OAuth {}", config.token))
            .map_err(|_| StorageError::InvalidToken)?;
        auth.set_sensitive(true);
        let ledger = MetadataLedger::new(config.ledger_path.clone());

        Ok(StorageClient {
            http,
            config,
            auth,
            ledger,
        })
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn ledger(&self) -> &MetadataLedger {
        &self.ledger
    }

    /// Create the folder at `path`. An existing folder is not an error, so
    /// this can be repeated safely across runs.
    pub fn create_folder(&self, path: &str) -> Result<FolderCreated, StorageError> {
        check_path(path)?;
        info!(path, "creating folder");

        let resp = self
            .authorized(self.http.put(self.config.resources_url()))
            .query(&[("path", path)])
            .timeout(self.config.folder_timeout)
            .send()?;

        match resp.status() {
            StatusCode::CREATED => {
                info!(path, "folder created");
                Ok(FolderCreated::Created)
            }
            StatusCode::CONFLICT => {
                info!(path, "folder already exists");
                Ok(FolderCreated::AlreadyExists)
            }
            _ => Err(api_error(resp)),
        }
    }

    /// Delete the folder at `path`. Only 204 counts as success; deleting a
    /// folder that does not exist is reported as a failure.
    pub fn delete_folder(&self, path: &str) -> Result<(), StorageError> {
        check_path(path)?;
        info!(path, "deleting folder");

        let resp = self
            .authorized(self.http.delete(self.config.resources_url()))
            .query(&[("path", path)])
            .timeout(self.config.folder_timeout)
            .send()?;

        if resp.status() == StatusCode::NO_CONTENT {
            Ok(())
        } else {
            Err(api_error(resp))
        }
    }

    /// Ask the storage service to fetch `url` into `path` on its own side.
    ///
    /// The trailing segment of `path` is sanitized before use. Before the
    /// trigger request an `UploadRecord` is appended to the ledger, so the
    /// attempt is recorded even if the trigger fails. Size probing and
    /// ledger problems are logged and never fail the call.
    pub fn upload_from_url(&self, path: &str, url: &str) -> Result<UploadAccepted, StorageError> {
        check_path(path)?;
        let destination = sanitized_destination(path);
        info!(destination = %destination, "uploading file");

        let size_bytes = probe_size_or_zero(&self.http, url, self.config.probe_timeout);

        let record = UploadRecord::uploading(trailing_segment(path), url, size_bytes);
        match self.ledger.append(&record) {
            Ok(count) => info!(
                ledger = %self.ledger.path().display(),
                entries = count,
                "upload info saved"
            ),
            Err(e) => warn!(
                ledger = %self.ledger.path().display(),
                error = %e,
                "could not save upload info"
            ),
        }

        let resp = self
            .authorized(self.http.post(self.config.upload_url()))
            .query(&[
                ("path", destination.as_str()),
                ("url", url),
                ("disable_redirects", "true"),
            ])
            .timeout(self.config.upload_timeout)
            .send()?;

        if resp.status() == StatusCode::ACCEPTED {
            info!(destination = %destination, "file queued for upload");
            Ok(UploadAccepted {
                destination,
                size_bytes,
            })
        } else {
            Err(api_error(resp))
        }
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.header(AUTHORIZATION, self.auth.clone())
    }
}

fn check_path(path: &str) -> Result<(), StorageError> {
    if path.trim().is_empty() {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    Ok(())
}

// Provider errors carry a JSON body with a human-readable `message`.
fn api_error(resp: Response) -> StorageError {
    let status = resp.status();
    let message = resp
        .json::<ErrorBody>()
        .ok()
        .and_then(|body| body.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
    StorageError::Api { status, message }
}
