//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use vanity_gateway::protocol::pktline::{encode, flush};
use vanity_gateway::resolve::{FetchError, RefsFetcher};

pub const MASTER_HASH: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
pub const TAG_HASH: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
pub const BRANCH_HASH: &str = "cccccccccccccccccccccccccccccccccccccccc";

/// Build an upload-pack advertisement from `(hash, ref)` pairs.
pub fn advertisement(refs: &[(&str, &str)]) -> Vec<u8> {
    let mut buf = encode(b"# service=git-upload-pack\n");
    buf.extend_from_slice(flush());
    for (i, (hash, name)) in refs.iter().enumerate() {
        let line = if i == 0 {
            format!("{hash} {name}\0multi_ack thin-pack side-band side-band-64k ofs-delta\n")
        } else {
            format!("{hash} {name}\n")
        };
        buf.extend_from_slice(&encode(line.as_bytes()));
    }
    buf.extend_from_slice(flush());
    buf
}

/// The usual repository: HEAD, master, a develop branch and a v1.0 tag.
pub fn sample_advertisement() -> Vec<u8> {
    advertisement(&[
        (MASTER_HASH, "HEAD"),
        (BRANCH_HASH, "refs/heads/develop"),
        (MASTER_HASH, "refs/heads/master"),
        (TAG_HASH, "refs/tags/v1.0"),
    ])
}

/// In-memory upstream keyed by base path.
#[derive(Default)]
pub struct StaticRefs {
    repos: HashMap<String, Vec<u8>>,
    pub calls: Mutex<Vec<String>>,
}

impl StaticRefs {
    pub fn with_repo(mut self, base_path: &str, advertisement: Vec<u8>) -> Self {
        self.repos.insert(base_path.to_string(), advertisement);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RefsFetcher for StaticRefs {
    async fn fetch_refs(&self, base_path: &str) -> Result<Vec<u8>, FetchError> {
        self.calls.lock().unwrap().push(base_path.to_string());
        self.repos
            .get(base_path)
            .cloned()
            .ok_or(FetchError::Status(404))
    }
}

/// Start a mock upstream on an ephemeral port.
///
/// Every request is answered with `status` and `body`; request lines are
/// recorded in the returned log.
pub async fn start_mock_upstream(
    status: u16,
    body: Vec<u8>,
) -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));
    let body = Arc::new(body);

    let requests = log.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let requests = requests.clone();
            let body = body.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let head = String::from_utf8_lossy(&buf[..n]);
                if let Some(line) = head.lines().next() {
                    requests.lock().unwrap().push(line.to_string());
                }

                let status_text = match status {
                    200 => "200 OK",
                    304 => "304 Not Modified",
                    404 => "404 Not Found",
                    500 => "500 Internal Server Error",
                    _ => "200 OK",
                };
                let mut response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    status_text,
                    body.len()
                )
                .into_bytes();
                response.extend_from_slice(&body);

                let _ = socket.write_all(&response).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, log)
}
