// Best-effort size lookup for a remote asset. Nothing here ever aborts an
// upload: the caller logs a `ProbeError` and records size 0.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_LENGTH;
use tracing::{debug, warn};

use crate::error::ProbeError;

/// Size of the asset behind `url` in bytes.
///
/// Tries `HEAD` first. If that fails or carries no usable content-length,
/// issues a plain `GET`, reads only its headers and drops the body unread.
pub fn probe_size(client: &Client, url: &str, timeout: Duration) -> Result<u64, ProbeError> {
    match head_length(client, url, timeout) {
        Ok(size) => return Ok(size),
        Err(e) => debug!(url, error = %e, "HEAD probe gave no size, falling back to GET"),
    }

    let resp = client.get(url).timeout(timeout).send()?;
    // `resp` is dropped without reading the body.
    header_length(&resp).ok_or(ProbeError::MissingLength)
}

/// Like `probe_size`, but any failure becomes 0.
pub fn probe_size_or_zero(client: &Client, url: &str, timeout: Duration) -> u64 {
    probe_size(client, url, timeout).unwrap_or_else(|e| {
        warn!(url, error = %e, "could not determine file size");
        0
    })
}

fn head_length(client: &Client, url: &str, timeout: Duration) -> Result<u64, ProbeError> {
    let resp = client.head(url).timeout(timeout).send()?;
    if !resp.status().is_success() {
        return Err(ProbeError::MissingLength);
    }
    header_length(&resp).ok_or(ProbeError::MissingLength)
}

// Reads the header itself: `Response::content_length` reports the body size
// hint, which is 0 for HEAD responses.
fn header_length(resp: &Response) -> Option<u64> {
    resp.headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|&n| n > 0)
}
