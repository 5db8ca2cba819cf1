//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves static bodies by request path. Unknown paths get 404. A route can
//! be marked truncated: the full `Content-Length` is announced but only half
//! the body is sent before the connection closes.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone)]
pub struct Route {
    pub body: Vec<u8>,
    pub truncated: bool,
}

#[derive(Debug, Default)]
pub struct Routes(HashMap<String, Route>);

impl Routes {
    pub fn serve(mut self, path: &str, body: &[u8]) -> Self {
        self.0.insert(
            path.to_string(),
            Route {
                body: body.to_vec(),
                truncated: false,
            },
        );
        self
    }

    pub fn truncate(mut self, path: &str, body: &[u8]) -> Self {
        self.0.insert(
            path.to_string(),
            Route {
                body: body.to_vec(),
                truncated: true,
            },
        );
        self
    }
}

/// Running server: base URL plus a count of GET requests served.
pub struct FileServer {
    pub base: String,
    hits: Arc<AtomicUsize>,
}

impl FileServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Starts the server in a background thread. It runs until the process exits.
pub fn start(routes: Routes) -> FileServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes = Arc::new(routes);
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let counter = Arc::clone(&counter);
            thread::spawn(move || handle(stream, &routes, &counter));
        }
    });
    FileServer {
        base: format!("http://127.0.0.1:{}/", port),
        hits,
    }
}

fn handle(mut stream: std::net::TcpStream, routes: &Routes, hits: &AtomicUsize) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("/");
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }
    hits.fetch_add(1, Ordering::SeqCst);
    let Some(route) = routes.0.get(path) else {
        let _ = stream.write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n");
        return;
    };
    let header = format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        route.body.len()
    );
    let _ = stream.write_all(header.as_bytes());
    let sent = if route.truncated {
        &route.body[..route.body.len() / 2]
    } else {
        &route.body[..]
    };
    let _ = stream.write_all(sent);
}
