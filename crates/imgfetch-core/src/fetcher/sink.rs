//! Easy2 Handler that streams the response body into the output file.
//! Checks the final status before touching the filesystem; opens the file on the first chunk.

use chrono::Local;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str;

use crate::url_model;

use super::status::{parse_status_line, StatusLine};

/// Why the sink stopped accepting data. Read back after `perform` to classify the failure.
#[derive(Debug)]
pub enum SinkFailure {
    /// Final response was not 2xx.
    Status(StatusLine),
    /// Body arrived without any HTTP status line (non-HTTP protocol).
    NoStatus,
    /// Directory creation, file open or write failed.
    Io { path: PathBuf, source: io::Error },
}

/// File the body is being written to.
#[derive(Debug)]
pub struct SaveTarget {
    pub filename: String,
    pub path: PathBuf,
    file: File,
}

/// Handler state for the single image transfer. Implements curl's Handler for Easy2.
pub struct ImageSink {
    url: String,
    output_dir: PathBuf,
    extensions: Vec<String>,
    pub(super) status: Option<StatusLine>,
    pub(super) target: Option<SaveTarget>,
    pub(super) failure: Option<SinkFailure>,
    pub(super) bytes_written: u64,
}

impl ImageSink {
    pub fn new(url: &str, output_dir: &Path, extensions: &[String]) -> Self {
        Self {
            url: url.to_string(),
            output_dir: output_dir.to_path_buf(),
            extensions: extensions.to_vec(),
            status: None,
            target: None,
            failure: None,
            bytes_written: 0,
        }
    }

    /// Makes sure the output file is open, creating the directory first.
    ///
    /// Refuses when the response status is missing or not 2xx.
    pub(super) fn ensure_target(&mut self) -> Result<&mut SaveTarget, SinkFailure> {
        match &self.status {
            Some(s) if s.is_success() => {}
            Some(s) => return Err(SinkFailure::Status(s.clone())),
            None => return Err(SinkFailure::NoStatus),
        }

        if self.target.is_none() {
            fs::create_dir_all(&self.output_dir).map_err(|source| SinkFailure::Io {
                path: self.output_dir.clone(),
                source,
            })?;
            let filename =
                url_model::resolve_filename(&self.url, &self.extensions, Local::now());
            let path = self.output_dir.join(&filename);
            let file = File::create(&path).map_err(|source| SinkFailure::Io {
                path: path.clone(),
                source,
            })?;
            tracing::debug!(path = %path.display(), "opened output file");
            self.target = Some(SaveTarget {
                filename,
                path,
                file,
            });
        }

        match self.target.as_mut() {
            Some(target) => Ok(target),
            None => Err(SinkFailure::NoStatus),
        }
    }

    /// Closes the output file, returning its name and path.
    pub(super) fn finish(&mut self) -> Option<(String, PathBuf)> {
        self.target.take().map(|t| (t.filename, t.path))
    }
}

impl curl::easy::Handler for ImageSink {
    fn header(&mut self, data: &[u8]) -> bool {
        if let Ok(line) = str::from_utf8(data) {
            // A new status line starts each response (redirect hops, 100 Continue).
            if let Some(status) = parse_status_line(line) {
                self.status = Some(status);
            }
        }
        true
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, curl::easy::WriteError> {
        if self.failure.is_some() {
            return Ok(0);
        }
        // Keep-alive chunk: nothing to write.
        if data.is_empty() {
            return Ok(0);
        }
        let result = self
            .ensure_target()
            .and_then(|target| {
                target.file.write_all(data).map_err(|source| SinkFailure::Io {
                    path: target.path.clone(),
                    source,
                })
            });
        match result {
            Ok(()) => {
                self.bytes_written += data.len() as u64;
                Ok(data.len())
            }
            Err(failure) => {
                tracing::warn!("aborting transfer: {:?}", failure);
                self.failure = Some(failure);
                Ok(0) // abort transfer
            }
        }
    }
}
