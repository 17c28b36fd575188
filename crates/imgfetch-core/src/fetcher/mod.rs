//! Single-image fetcher.
//!
//! One blocking GET through libcurl's easy interface. The body is streamed into
//! the output file chunk by chunk by `ImageSink`; nothing is buffered whole.

mod error;
mod sink;
mod status;

use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use curl::easy::Easy2;

use crate::config::FetcherConfig;
use crate::report;
use crate::url_model;

pub use error::{classify_curl_error, FetchError, FetchErrorKind, HttpStatusError};
use sink::{ImageSink, SinkFailure};

/// Redirect hops followed before giving up.
const MAX_REDIRECTIONS: u32 = 30;

/// A completed transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    /// Resolved filename (from the URL or generated).
    pub filename: String,
    /// Output directory joined with `filename`.
    pub path: PathBuf,
    pub bytes_written: u64,
}

/// Downloads one image per call into the configured output directory.
#[derive(Debug, Clone, Default)]
pub struct Fetcher {
    config: FetcherConfig,
}

impl Fetcher {
    pub fn new(config: FetcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// True if `url` ends with a recognized image extension.
    pub fn looks_like_image(&self, url: &str) -> bool {
        url_model::has_image_extension(url, &self.config.image_extensions)
    }

    /// Fetches `url` and saves the body under the output directory.
    ///
    /// The directory is only created once a 2xx status has arrived, so a failed
    /// request leaves the filesystem untouched. A transfer that dies mid-body
    /// leaves the partial file in place.
    pub fn fetch_and_save(&self, url: &str) -> Result<Fetched, FetchError> {
        let url = url.trim();
        check_scheme(url)?;

        let sink = ImageSink::new(
            url,
            &self.config.output_dir,
            &self.config.image_extensions,
        );
        let mut easy = Easy2::new(sink);
        easy.url(url).map_err(FetchError::InvalidUrl)?;
        easy.follow_location(self.config.follow_redirects)
            .map_err(classify_curl_error)?;
        easy.max_redirections(MAX_REDIRECTIONS)
            .map_err(classify_curl_error)?;
        easy.buffer_size(self.config.chunk_size)
            .map_err(classify_curl_error)?;

        tracing::info!(url, "GET");
        let performed = easy.perform();

        let final_url = easy
            .effective_url()
            .ok()
            .flatten()
            .unwrap_or(url)
            .to_string();
        let sink = easy.get_mut();

        if let Some(failure) = sink.failure.take() {
            return Err(failure_to_error(failure, &final_url));
        }
        if let Err(e) = performed {
            let err = classify_curl_error(e);
            tracing::warn!(url, kind = ?err.kind(), "transfer failed: {}", err);
            return Err(err);
        }

        // Empty bodies never reach `write`; settle the status and create the file here.
        if sink.target.is_none() {
            sink.ensure_target()
                .map_err(|failure| failure_to_error(failure, &final_url))?;
        }
        let bytes_written = sink.bytes_written;
        let (filename, path) = sink
            .finish()
            .ok_or_else(|| FetchError::Unexpected("output file was not opened".to_string()))?;

        tracing::info!(path = %path.display(), bytes_written, "saved image");
        Ok(Fetched {
            filename,
            path,
            bytes_written,
        })
    }

    /// Runs one fetch and writes the user-facing transcript to `out`:
    /// the advisory warning when the URL doesn't look like an image, then either
    /// the success lines or exactly one error line.
    ///
    /// Panics inside the fetch are caught and reported as unexpected errors.
    pub fn fetch_and_report<W: Write>(
        &self,
        url: &str,
        out: &mut W,
    ) -> io::Result<Result<Fetched, FetchError>> {
        let url = url.trim();
        if !self.looks_like_image(url) {
            report::extension_warning(out, &self.config.image_extensions)?;
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.fetch_and_save(url)))
            .unwrap_or_else(|payload| {
                Err(FetchError::Unexpected(panic_message(payload.as_ref())))
            });

        match &outcome {
            Ok(fetched) => report::success(out, fetched)?,
            Err(err) => report::failure(out, err)?,
        }
        Ok(outcome)
    }
}

fn failure_to_error(failure: SinkFailure, url: &str) -> FetchError {
    let err = match failure {
        SinkFailure::Status(status) => FetchError::Http(HttpStatusError::new(&status, url)),
        SinkFailure::NoStatus => {
            FetchError::network(format!("no HTTP response received from '{}'", url))
        }
        SinkFailure::Io { path, source } => FetchError::filesystem(path, source),
    };
    tracing::warn!(url, kind = ?err.kind(), "fetch failed: {}", err);
    err
}

/// Only HTTP(S) URLs with an explicit scheme are fetched; libcurl would otherwise
/// guess `http://` for input like `example.com/cat.png`.
fn check_scheme(url: &str) -> Result<(), FetchError> {
    match url::Url::parse(url) {
        Ok(parsed) => match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(FetchError::network(format!(
                "unsupported URL scheme '{}' in '{}'",
                other, url
            ))),
        },
        Err(url::ParseError::RelativeUrlWithoutBase) => Err(FetchError::network(format!(
            "Invalid URL '{}': No scheme supplied. Perhaps you meant https://{}?",
            url, url
        ))),
        // Malformed hosts and the like are left for libcurl to reject.
        Err(_) => Ok(()),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "internal error".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_scheme_is_network_error() {
        let err = check_scheme("ftp://example.com/cat.png").unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Network);
        assert!(check_scheme("https://example.com/cat.png").is_ok());
        assert!(check_scheme("HTTP://example.com/cat.png").is_ok());
    }

    #[test]
    fn missing_scheme_is_network_error() {
        for input in ["example.com/cat.png", "127.0.0.1:8080/cat.png", ""] {
            let err = check_scheme(input).unwrap_err();
            assert_eq!(err.kind(), FetchErrorKind::Network, "{input:?}");
            assert_eq!(
                err.to_string(),
                format!(
                    "Invalid URL '{}': No scheme supplied. Perhaps you meant https://{}?",
                    input, input
                )
            );
        }
    }

    #[test]
    fn malformed_host_is_left_to_transport() {
        assert!(check_scheme("http://exa mple.com/x.png").is_ok());
    }

    #[test]
    fn scheme_less_input_never_reaches_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = FetcherConfig::default();
        cfg.output_dir = dir.path().join("Fetched_Images");
        let fetcher = Fetcher::new(cfg);
        for input in ["127.0.0.1:9/cat.png", ""] {
            let mut out = Vec::new();
            let outcome = fetcher.fetch_and_report(input, &mut out).unwrap();
            assert_eq!(outcome.unwrap_err().kind(), FetchErrorKind::Network);
            let text = String::from_utf8(out).unwrap();
            let last = text.lines().last().unwrap_or("");
            assert!(
                last.starts_with("Error: Network issue occurred: Invalid URL '"),
                "{last}"
            );
            assert!(last.contains("No scheme supplied"));
        }
        assert!(!dir.path().join("Fetched_Images").exists());
    }

    #[test]
    fn panic_message_from_payloads() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn std::any::Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "internal error");
    }

    #[test]
    fn looks_like_image_uses_configured_extensions() {
        let fetcher = Fetcher::default();
        assert!(fetcher.looks_like_image("https://example.com/a.PNG"));
        assert!(!fetcher.looks_like_image("https://example.com/a.webp"));

        let mut cfg = FetcherConfig::default();
        cfg.image_extensions = vec![".webp".to_string()];
        let fetcher = Fetcher::new(cfg);
        assert!(fetcher.looks_like_image("https://example.com/a.webp"));
    }

    #[test]
    fn refused_scheme_reports_without_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = FetcherConfig::default();
        cfg.output_dir = dir.path().join("Fetched_Images");
        let fetcher = Fetcher::new(cfg);
        let mut out = Vec::new();
        let outcome = fetcher
            .fetch_and_report("file:///etc/passwd", &mut out)
            .unwrap();
        assert_eq!(outcome.unwrap_err().kind(), FetchErrorKind::Network);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Warning: URL may not point to a valid image file"));
        assert!(lines[1].starts_with("Error: Network issue occurred: "));
        assert!(!dir.path().join("Fetched_Images").exists());
    }
}
