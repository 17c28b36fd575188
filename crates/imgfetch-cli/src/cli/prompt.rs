//! Interactive URL prompt.

use imgfetch_core::{report, FetchError};
use std::io::{BufRead, Write};

/// Prints the prompt and reads one line, trimmed.
///
/// End of input and read failures become [`FetchError::Unexpected`] so they are
/// reported like any other failed fetch.
pub fn read_url<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> Result<String, FetchError> {
    report::prompt(out).map_err(|e| FetchError::Unexpected(e.to_string()))?;

    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => Err(FetchError::Unexpected(
            "end of input while reading the URL".to_string(),
        )),
        Ok(_) => Ok(line.trim().to_string()),
        Err(e) => Err(FetchError::Unexpected(e.to_string())),
    }
}
