//! Minimal one-connection-per-response HTTP stub for offline client tests.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

/// A canned HTTP response.
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Serve `replies` in order, one per connection, on a random local port.
///
/// Returns the base URL (`http://127.0.0.1:PORT/v2`) and a receiver yielding
/// the request target (path + query) of every request served.
pub fn serve(replies: Vec<Reply>) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
    let port = listener.local_addr().expect("local addr").port();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for reply in replies {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
            let mut request_line = String::new();
            reader.read_line(&mut request_line).ok();
            // drain headers
            loop {
                let mut line = String::new();
                match reader.read_line(&mut line) {
                    Ok(0) => break,
                    Ok(_) if line == "\r\n" || line == "\n" => break,
                    Ok(_) => continue,
                    Err(_) => break,
                }
            }
            let target = request_line
                .split_whitespace()
                .nth(1)
                .unwrap_or_default()
                .to_string();
            let _ = tx.send(target);

            let reason = if reply.status == 200 { "OK" } else { "Error" };
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                reply.status,
                reason,
                reply.body.len(),
                reply.body
            );
            stream.write_all(response.as_bytes()).ok();
            stream.flush().ok();
        }
    });

    (format!("http://127.0.0.1:{port}/v2"), rx)
}

/// A `[metadata, payload]` envelope as the API sends it.
pub fn envelope(pages: u32, payload: &str) -> String {
    format!(
        r#"[{{"page":1,"pages":{pages},"per_page":"100","total":0,"sourceid":"2","lastupdated":"2025-07-01"}},{payload}]"#
    )
}
