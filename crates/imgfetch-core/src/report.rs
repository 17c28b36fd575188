//! User-facing transcript: banner, advisory warning, success lines, error line.
//!
//! Everything here writes to a caller-supplied `Write` so the exact text can be
//! asserted in tests; logging goes through `tracing`, never through these.

use std::io::{self, Write};

use crate::fetcher::{FetchError, Fetched};

pub fn banner<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Welcome to the Ubuntu Image Fetcher")?;
    writeln!(out, "A tool for mindfully collecting images from the web")?;
    writeln!(out)?;
    Ok(())
}

/// Prompt shown before reading the URL; no trailing newline.
pub fn prompt<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "Please enter the image URL: ")?;
    out.flush()
}

/// Advisory line for URLs without a recognized image extension. Never blocks the fetch.
pub fn extension_warning<W: Write, S: AsRef<str>>(
    out: &mut W,
    extensions: &[S],
) -> io::Result<()> {
    let names: Vec<&str> = extensions
        .iter()
        .map(|e| e.as_ref().trim_start_matches('.'))
        .collect();
    writeln!(
        out,
        "Warning: URL may not point to a valid image file ({}). Proceeding anyway...",
        names.join(", ")
    )
}

pub fn success<W: Write>(out: &mut W, fetched: &Fetched) -> io::Result<()> {
    writeln!(out, "✓ Successfully fetched: {}", fetched.filename)?;
    writeln!(out, "✓ Image saved to {}", fetched.path.display())?;
    writeln!(out)?;
    writeln!(out, "Connection strengthened. Community enriched.")?;
    Ok(())
}

/// Exactly one line per failure.
pub fn failure<W: Write>(out: &mut W, err: &FetchError) -> io::Result<()> {
    match err {
        FetchError::Http(status) => writeln!(out, "Error: HTTP issue occurred: {}", status),
        FetchError::Connection(_) => writeln!(
            out,
            "Error: Failed to connect to the server. Please check your internet connection."
        ),
        FetchError::InvalidUrl(_) => writeln!(out, "Error: Invalid URL provided."),
        FetchError::Network { detail } => {
            writeln!(out, "Error: Network issue occurred: {}", detail)
        }
        FetchError::Filesystem { .. } => {
            writeln!(out, "Error: File system issue occurred: {}", err)
        }
        FetchError::Unexpected(detail) => writeln!(out, "Unexpected error: {}", detail),
    }
}
