// tests/common/mod.rs
//
// One-shot HTTP responder on a loopback port: accepts a single connection,
// hands the raw request to the test and answers with a canned reply.

#![allow(dead_code)]

use std::{
    io::{Read, Write},
    net::TcpListener,
    sync::mpsc::{self, Receiver},
    thread,
};

pub struct Captured {
    pub head: String,
    pub body: String,
}

impl Captured {
    pub fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or("")
    }
}

/// Serve one request. Returns the base URL (`http://127.0.0.1:PORT`) and a
/// receiver for the captured request.
pub fn serve_once(status: u16, content_type: &str, body: &str) -> (String, Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();
    let reply = format!(
        "HTTP/1.1 {status} X\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    thread::spawn(move || {
        let (mut sock, _) = listener.accept().unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let head_end = loop {
            let n = sock.read(&mut chunk).unwrap();
            if n == 0 { break buf.len(); }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(i) = find(&buf, b"\r\n\r\n") { break i + 4; }
        };

        let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
        let len = head
            .lines()
            .filter_map(|l| l.split_once(':'))
            .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.trim().parse::<usize>().ok())
            .unwrap_or(0);

        while buf.len() < head_end + len {
            let n = sock.read(&mut chunk).unwrap();
            if n == 0 { break; }
            buf.extend_from_slice(&chunk[..n]);
        }
        let body = String::from_utf8_lossy(&buf[head_end..]).into_owned();

        sock.write_all(reply.as_bytes()).unwrap();
        sock.flush().unwrap();
        let _ = tx.send(Captured { head, body });
    });

    (format!("http://{addr}"), rx)
}

fn find(hay: &[u8], needle: &[u8]) -> Option<usize> {
    hay.windows(needle.len()).position(|w| w == needle)
}
