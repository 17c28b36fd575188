//! HTTP status line parsing.

/// Parsed `HTTP/x.y <code> <reason>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub code: u32,
    pub reason: String,
}

impl StatusLine {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

/// Parses a response status line; returns `None` for header lines and garbage.
pub fn parse_status_line(line: &str) -> Option<StatusLine> {
    let line = line.trim_end_matches(['\r', '\n']);
    if !line.starts_with("HTTP/") {
        return None;
    }
    let mut parts = line.splitn(3, ' ');
    let _version = parts.next()?;
    let code = parts.next()?.trim().parse::<u32>().ok()?;
    let reason = parts.next().unwrap_or("").trim().to_string();
    Some(StatusLine { code, reason })
}
