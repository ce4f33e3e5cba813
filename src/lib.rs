// Library root
// -----------
// Saves a captioned image into a cloud-storage account without downloading
// it: the storage service is told to fetch the image URL itself.
//
// Module responsibilities:
// - `storage`: REST client for folder creation/deletion and
//   upload-by-reference.
// - `ledger`: local JSON log of every upload attempt.
// - `sanitize`: safe filenames from arbitrary caption text.
// - `probe`: best-effort size lookup for the image.
// - `source`: the caption-image rendering service.
// - `config`, `error`: run settings and error types.
// - `ui`: prompts, progress display and the one-shot run flow.
pub mod config;
pub mod error;
pub mod ledger;
pub mod probe;
pub mod sanitize;
pub mod source;
pub mod storage;
pub mod ui;

pub use config::StorageConfig;
pub use error::StorageError;
pub use ledger::{MetadataLedger, UploadRecord, UploadStatus};
pub use storage::{FolderCreated, StorageClient, UploadAccepted};
