// The caption-image rendering service. Consumed as "GET a URL, get image
// bytes or an error"; the URL is later handed to the storage service as-is.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;

use crate::error::SourceError;

pub const DEFAULT_SOURCE_BASE: &str = "https://cataas.com";
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Base URL of the rendering service, overridable with `CAPTION_IMAGE_URL`.
pub fn source_base_from_env() -> String {
    match std::env::var("CAPTION_IMAGE_URL") {
        Ok(base) if !base.trim().is_empty() => base,
        _ => DEFAULT_SOURCE_BASE.to_string(),
    }
}

/// URL of an image with `caption` rendered on it. The caption is
/// percent-encoded as one path segment.
pub fn caption_image_url(base: &str, caption: &str) -> Result<Url, SourceError> {
    let mut url = Url::parse(base).map_err(|e| SourceError::InvalidUrl(format!("{base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| SourceError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(["cat", "says", caption]);
    url.query_pairs_mut()
        .append_pair("fontColor", "white")
        .append_pair("fontSize", "85");
    Ok(url)
}

/// Check that the image can actually be fetched. The body is discarded.
pub fn fetch_image(client: &Client, url: &Url) -> Result<(), SourceError> {
    let resp = client.get(url.clone()).timeout(FETCH_TIMEOUT).send()?;
    let status = resp.status();
    if !status.is_success() {
        return Err(SourceError::Status(status));
    }
    Ok(())
}
