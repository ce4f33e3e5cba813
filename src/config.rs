// Run configuration. Built once and handed to the `StorageClient`; nothing
// here is global.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://cloud-api.yandex.net/v1/disk";
pub const DEFAULT_LEDGER_PATH: &str = "image_info.json";

/// Connection settings for the storage REST API plus the local ledger path.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub base_url: String,
    pub token: String,
    pub ledger_path: PathBuf,
    pub folder_timeout: Duration,
    pub probe_timeout: Duration,
    pub upload_timeout: Duration,
}

impl StorageConfig {
    pub fn new(token: impl Into<String>) -> Self {
        StorageConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
            ledger_path: PathBuf::from(DEFAULT_LEDGER_PATH),
            folder_timeout: Duration::from_secs(10),
            probe_timeout: Duration::from_secs(5),
            upload_timeout: Duration::from_secs(10),
        }
    }

    /// Same as `new`, but the base URL may be overridden with `DISK_API_URL`.
    pub fn from_env(token: impl Into<String>) -> Self {
        let config = StorageConfig::new(token);
        match std::env::var("DISK_API_URL") {
            Ok(url) if !url.trim().is_empty() => config.with_base_url(url),
            _ => config,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_ledger_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ledger_path = path.into();
        self
    }

    pub fn with_timeouts(mut self, folder: Duration, probe: Duration, upload: Duration) -> Self {
        self.folder_timeout = folder;
        self.probe_timeout = probe;
        self.upload_timeout = upload;
        self
    }

    /// `{base}/resources`
    pub fn resources_url(&self) -> String {
        format!("{}/resources", self.base_url)
    }

    /// `{base}/resources/upload`
    pub fn upload_url(&self) -> String {
        format!("{}/resources/upload", self.base_url)
    }
}
