// Turns free user text into a filename the storage service will accept.

pub const IMAGE_EXTENSION: &str = ".jpg";
pub const MAX_FILENAME_CHARS: usize = 40;
const FALLBACK_FILENAME: &str = "image.jpg";

/// Sanitize a single path segment: whitespace becomes `_`, anything that is
/// not a word character, `-`, `_` or `.` is dropped, the result is capped at
/// 40 characters and `.jpg` is appended unless already present (any case).
///
/// A word character is `_` or any `char::is_alphanumeric` character. That is
/// the Unicode Alphabetic property, so combining signs such as the Devanagari
/// vowel sign U+093F are kept even though a regex `\w` would drop them.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|&c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .take(MAX_FILENAME_CHARS)
        .collect();

    if cleaned.is_empty() {
        return FALLBACK_FILENAME.to_string();
    }
    if cleaned.to_lowercase().ends_with(IMAGE_EXTENSION) {
        cleaned
    } else {
        format!("{cleaned}{IMAGE_EXTENSION}")
    }
}

/// Last `/`-separated segment of a storage path, exactly as given.
pub fn trailing_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Destination actually used for the transfer: the parent part of `path` is
/// kept verbatim and only the trailing segment is sanitized.
pub fn sanitized_destination(path: &str) -> String {
    match path.rsplit_once('/') {
        Some((parent, name)) => format!("{parent}/{}", sanitize_filename(name)),
        None => sanitize_filename(path),
    }
}
