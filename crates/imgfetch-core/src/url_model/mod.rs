//! URL modeling and filename derivation.
//!
//! Decides whether a requested URL looks like an image and which local filename
//! the fetched bytes are saved under.

mod path;

use chrono::{DateTime, Local};

pub use path::basename_from_url;

/// Returns true if `candidate` ends with one of `extensions`, ignoring ASCII case.
///
/// Applied both to the raw URL (advisory check) and to the URL's basename
/// (filename resolution).
pub fn has_image_extension<S: AsRef<str>>(candidate: &str, extensions: &[S]) -> bool {
    let lower = candidate.to_ascii_lowercase();
    extensions
        .iter()
        .any(|ext| lower.ends_with(&ext.as_ref().to_ascii_lowercase()))
}

/// Name used when the URL carries no usable image filename: `image_YYYYMMDD_HHMMSS.jpg`.
pub fn generated_filename(now: DateTime<Local>) -> String {
    format!("image_{}.jpg", now.format("%Y%m%d_%H%M%S"))
}

/// Derives the filename for saving the image fetched from `url`.
///
/// Uses the last path segment when it ends in a recognized extension; an empty
/// segment and an unrecognized one both fall back to [`generated_filename`].
///
/// # Examples
///
/// - `resolve_filename("https://example.com/pics/cat.png", ..)` → `"cat.png"`
/// - `resolve_filename("https://example.com/gallery/", ..)` → `"image_20240131_235959.jpg"`
pub fn resolve_filename<S: AsRef<str>>(
    url: &str,
    extensions: &[S],
    now: DateTime<Local>,
) -> String {
    let basename = basename_from_url(url);
    if basename.is_empty() || !has_image_extension(&basename, extensions) {
        generated_filename(now)
    } else {
        basename
    }
}
