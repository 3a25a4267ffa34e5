#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use taxowalk::taxonomy::Node;

pub fn gid(suffix: &str) -> String {
    format!("gid://shopify/TaxonomyCategory/{suffix}")
}

pub fn category(suffix: &str, name: &str, children: Vec<Node>) -> Node {
    Node::new(gid(suffix), name, name).with_children(children)
}

pub fn vertical(name: &str, children: Vec<Node>) -> Node {
    Node::new("", name, name).with_children(children)
}

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/taxonomy.json")
}

pub fn fixture_bytes() -> Vec<u8> {
    std::fs::read(fixture_path()).unwrap()
}

/// Minimal HTTP/1.1 server answering every request with one canned response.
pub struct TestServer {
    pub url: String,
    hits: Arc<AtomicUsize>,
    online: Arc<AtomicBool>,
    bodies: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    pub fn start(status: u16, body: Vec<u8>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/taxonomy.json", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let online = Arc::new(AtomicBool::new(true));
        let bodies = Arc::new(Mutex::new(Vec::new()));

        let (t_hits, t_online, t_bodies) = (hits.clone(), online.clone(), bodies.clone());
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let request_body = read_request(&mut stream);
                if !t_online.load(Ordering::SeqCst) {
                    // Hang up without a response.
                    continue;
                }
                t_hits.fetch_add(1, Ordering::SeqCst);
                t_bodies.lock().unwrap().push(request_body);
                let head = format!(
                    "HTTP/1.1 {status} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.write_all(&body);
                let _ = stream.flush();
            }
        });

        Self {
            url,
            hits,
            online,
            bodies,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn go_offline(&self) {
        self.online.store(false, Ordering::SeqCst);
    }

    pub fn request_bodies(&self) -> Vec<String> {
        self.bodies.lock().unwrap().clone()
    }
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    let header_end = loop {
        let n = match stream.read(&mut buf) {
            Ok(0) | Err(_) => return String::new(),
            Ok(n) => n,
        };
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&data[..header_end]).to_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while data.len() < header_end + content_length {
        let n = match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        data.extend_from_slice(&buf[..n]);
    }
    String::from_utf8_lossy(&data[header_end..]).into_owned()
}
