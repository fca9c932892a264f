//! One-shot HTTP responder for integration tests.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver};
use std::thread;

/// What the server saw.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
}

impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub struct MockServer {
    pub base_url: String,
    requests: Receiver<Request>,
}

impl MockServer {
    /// Answer the next `responses.len()` connections in order, each with
    /// `(status line, body)`.
    pub fn start(responses: Vec<(&'static str, String)>) -> Self {
        Self::start_bytes(
            responses
                .into_iter()
                .map(|(status, body)| (status, body.into_bytes()))
                .collect(),
        )
    }

    /// Like [`MockServer::start`], for bodies that are not text.
    pub fn start_bytes(responses: Vec<(&'static str, Vec<u8>)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            for (status, body) in responses {
                let Ok((stream, _)) = listener.accept() else {
                    return;
                };
                if let Some(req) = respond(stream, status, &body) {
                    let _ = tx.send(req);
                }
            }
        });

        Self {
            base_url,
            requests: rx,
        }
    }

    pub fn json(status: &'static str, body: &str) -> Self {
        Self::start(vec![(status, body.to_string())])
    }

    pub fn next_request(&self) -> Request {
        self.requests
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("server saw no request")
    }
}

/// A URL nothing is listening on.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn respond(stream: TcpStream, status: &str, body: &[u8]) -> Option<Request> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);
    let mut line = String::new();
    reader.read_line(&mut line).ok()?;
    let mut parts = line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut headers = Vec::new();
    let mut content_length = 0usize;
    loop {
        let mut h = String::new();
        reader.read_line(&mut h).ok()?;
        let h = h.trim_end();
        if h.is_empty() {
            break;
        }
        if let Some((k, v)) = h.split_once(':') {
            let (k, v) = (k.trim().to_string(), v.trim().to_string());
            if k.eq_ignore_ascii_case("content-length") {
                content_length = v.parse().unwrap_or(0);
            }
            headers.push((k, v));
        }
    }
    let mut discard = vec![0u8; content_length];
    reader.read_exact(&mut discard).ok()?;

    let head = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    let mut stream = stream;
    stream.write_all(head.as_bytes()).ok()?;
    stream.write_all(body).ok()?;
    stream.flush().ok()?;

    Some(Request {
        method,
        path,
        headers,
    })
}
