//! Throwaway HTTP/1.1 image host for integration tests.
//!
//! `/redirect/<rest>` answers `302 Found` with `Location: /<rest>`; every other
//! path gets the configured status and body.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Bytes per `write_all` when sending a body, so curl sees several reads.
const SEND_PIECE: usize = 4096;

/// One served image. Configure, then [`ImageServer::spawn`].
#[derive(Debug, Clone)]
pub struct ImageServer {
    body: Vec<u8>,
    status: &'static str,
    truncate_after: Option<usize>,
}

impl ImageServer {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            status: "200 OK",
            truncate_after: None,
        }
    }

    /// Status line sent for non-redirect paths, e.g. `"404 Not Found"`.
    pub fn status(mut self, status: &'static str) -> Self {
        self.status = status;
        self
    }

    /// Advertise the full `Content-Length` but hang up after `n` body bytes.
    pub fn truncate_after(mut self, n: usize) -> Self {
        self.truncate_after = Some(n);
        self
    }

    /// Listens on an ephemeral port until the test process exits.
    /// Returns the base URL, ending in `/`.
    pub fn spawn(self) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}/", listener.local_addr().unwrap());
        let server = Arc::new(self);
        thread::spawn(move || {
            for conn in listener.incoming() {
                let Ok(conn) = conn else { continue };
                let server = Arc::clone(&server);
                thread::spawn(move || {
                    let _ = server.answer(conn);
                });
            }
        });
        base
    }

    fn answer(&self, mut conn: TcpStream) -> std::io::Result<()> {
        conn.set_read_timeout(Some(Duration::from_secs(2)))?;
        let target = read_request_target(&conn)?;

        if let Some(rest) = target.strip_prefix("/redirect/") {
            return write!(
                conn,
                "HTTP/1.1 302 Found\r\nLocation: /{}\r\nContent-Length: 0\r\n\
                 Connection: close\r\n\r\n",
                rest
            );
        }

        write!(
            conn,
            "HTTP/1.1 {}\r\nContent-Type: image/png\r\nContent-Length: {}\r\n\
             Connection: close\r\n\r\n",
            self.status,
            self.body.len()
        )?;
        let sent = match self.truncate_after {
            Some(n) => &self.body[..n.min(self.body.len())],
            None => &self.body[..],
        };
        for piece in sent.chunks(SEND_PIECE) {
            conn.write_all(piece)?;
            conn.flush()?;
        }
        Ok(())
    }
}

/// Consumes the request head and returns the request-target of its first line.
fn read_request_target(conn: &TcpStream) -> std::io::Result<String> {
    let mut reader = BufReader::new(conn);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let mut header = String::new();
    while reader.read_line(&mut header)? > 0 && !header.trim_end().is_empty() {
        header.clear();
    }
    Ok(request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_string())
}

/// A URL on a port nothing listens on.
pub fn refused_url(path: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/{}", addr, path)
}
