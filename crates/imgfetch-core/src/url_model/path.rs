//! Basename extraction from a URL path.

/// Returns the text after the final `/` of the URL's path, query and fragment excluded.
///
/// The segment is returned as it appears in the URL (no percent-decoding). A path
/// ending in `/` yields an empty string. Input that `url` cannot parse (for example
/// a scheme-less `example.com/cat.png`, which libcurl still accepts) is split by hand.
pub fn basename_from_url(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) => last_segment(parsed.path()).to_string(),
        Err(_) => last_segment(raw_path(url)).to_string(),
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or("")
}

/// Path part of an unparseable URL: everything before `?`/`#`, minus any `scheme://host`.
fn raw_path(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    let without_query = &url[..end];
    match without_query.split_once("://") {
        Some((_, rest)) => rest.find('/').map(|i| &rest[i..]).unwrap_or(""),
        None => without_query,
    }
}
