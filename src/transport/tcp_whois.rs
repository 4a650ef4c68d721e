//! Raw-TCP WHOIS client (feature `tcp-whois`), the optional default
//! [`WhoisTransport`] (spec §6 collaborator 4). Adapted from the teacher's
//! `whois.rs`: same connect/query/referral-follow shape, restructured to
//! return a [`WhoisValue`] tree (a node per hop, each carrying `__raw`)
//! instead of the teacher's parsed/flat `WhoisResult`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::errors::WhoisTransientError;
use crate::whois_heuristic::{WhoisLookupOptions, WhoisTransport};
use crate::whois_value::WhoisValue;

const WHOIS_PORT: u16 = 43;
const DEFAULT_MAX_RESPONSE_BYTES: usize = 1_048_576;
const DEFAULT_FOLLOW_DEPTH: usize = 2;

/// Reusable read buffers, grounded on the teacher's `buffer_pool.rs`; kept
/// as a plain pooled `Vec<u8>` store rather than the teacher's RAII
/// wrapper, since this transport only ever borrows one buffer at a time
/// per query.
struct BufferPool {
    buffers: Mutex<Vec<Vec<u8>>>,
    buffer_size: usize,
    max_pool_size: usize,
}

impl BufferPool {
    fn new(buffer_size: usize, max_pool_size: usize) -> Self {
        Self {
            buffers: Mutex::new(Vec::new()),
            buffer_size,
            max_pool_size,
        }
    }

    async fn take(&self) -> Vec<u8> {
        let mut pool = self.buffers.lock().await;
        pool.pop().unwrap_or_else(|| vec![0; self.buffer_size])
    }

    async fn give_back(&self, mut buffer: Vec<u8>) {
        let mut pool = self.buffers.lock().await;
        if pool.len() < self.max_pool_size {
            buffer.clear();
            buffer.resize(self.buffer_size, 0);
            pool.push(buffer);
        }
    }
}

/// The optional default [`WhoisTransport`]: connects to `options.host_hint`
/// over plain TCP, issues the WHOIS query, and follows referrals up to
/// `options.follow` (default 2) hops.
pub struct TcpWhoisTransport {
    buffer_pool: BufferPool,
    max_response_bytes: usize,
}

impl TcpWhoisTransport {
    pub fn new() -> Self {
        Self {
            buffer_pool: BufferPool::new(8192, 64),
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }

    async fn query(&self, server: &str, domain: &str, timeout_budget: Duration) -> Result<String, WhoisTransientError> {
        let mut stream = timeout(timeout_budget, TcpStream::connect((server, WHOIS_PORT)))
            .await
            .map_err(|_| WhoisTransientError::new(format!("connection to {server} timed out")))?
            .map_err(|e| WhoisTransientError::new(format!("connection to {server} failed: {e}")))?;

        if let Err(e) = stream.set_nodelay(true) {
            debug!(server, error = %e, "failed to set TCP_NODELAY");
        }

        let query_line = format!("{domain}\r\n");
        stream
            .write_all(query_line.as_bytes())
            .await
            .map_err(|e| WhoisTransientError::new(format!("write to {server} failed: {e}")))?;

        let mut buffer = self.buffer_pool.take().await;
        let mut response = Vec::new();
        let read_result = loop {
            match timeout(timeout_budget, stream.read(&mut buffer)).await {
                Ok(Ok(0)) => break Ok(()),
                Ok(Ok(n)) => {
                    response.extend_from_slice(&buffer[..n]);
                    if response.len() > self.max_response_bytes {
                        break Err(WhoisTransientError::new(format!("response from {server} exceeded size limit")));
                    }
                }
                Ok(Err(e)) => break Err(WhoisTransientError::new(format!("read from {server} failed: {e}"))),
                Err(_) => break Err(WhoisTransientError::new(format!("read from {server} timed out"))),
            }
        };
        self.buffer_pool.give_back(buffer).await;
        read_result?;

        String::from_utf8(response).map_err(|_| WhoisTransientError::new(format!("response from {server} was not valid utf-8")))
    }

    fn referral_server(data: &str) -> Option<String> {
        for line in data.lines() {
            let line = line.trim();
            if let Some((key, value)) = line.split_once(':') {
                let key = key.trim().to_lowercase();
                let value = value.trim();
                if (key.contains("whois") && key.contains("server")) || key == "refer" {
                    if !value.is_empty() {
                        return Some(value.to_string());
                    }
                }
            }
        }
        None
    }

    fn node(raw: String, referral: Option<WhoisValue>) -> WhoisValue {
        let mut map = HashMap::new();
        map.insert("__raw".to_string(), WhoisValue::Scalar(raw));
        if let Some(referral) = referral {
            map.insert("referral".to_string(), referral);
        }
        WhoisValue::Node(map)
    }

    async fn follow(
        &self,
        server: &str,
        domain: &str,
        timeout_budget: Duration,
        depth_remaining: usize,
    ) -> Result<WhoisValue, WhoisTransientError> {
        let raw = self.query(server, domain, timeout_budget).await?;

        if depth_remaining == 0 {
            return Ok(Self::node(raw, None));
        }

        match Self::referral_server(&raw) {
            Some(next_server) if next_server != server => {
                match Box::pin(self.follow(&next_server, domain, timeout_budget, depth_remaining - 1)).await {
                    Ok(child) => Ok(Self::node(raw, Some(child))),
                    Err(e) => {
                        warn!(server = next_server, error = %e, "referral query failed, keeping this hop's data");
                        Ok(Self::node(raw, None))
                    }
                }
            }
            _ => Ok(Self::node(raw, None)),
        }
    }
}

impl Default for TcpWhoisTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WhoisTransport for TcpWhoisTransport {
    async fn lookup(&self, domain: &str, options: &WhoisLookupOptions) -> Result<WhoisValue, WhoisTransientError> {
        let Some(server) = options.host_hint.clone() else {
            return Err(WhoisTransientError::new(format!(
                "no whois server known: TLD for {domain:?} not supported"
            )));
        };

        let depth = options.follow.unwrap_or(DEFAULT_FOLLOW_DEPTH);
        self.follow(&server, domain, options.timeout, depth).await
    }
}

/// Convenience constructor matching the other default-collaborator
/// factories, kept as a free function so callers don't need to name
/// [`TcpWhoisTransport`] directly.
pub fn default_whois_transport() -> Arc<dyn WhoisTransport> {
    Arc::new(TcpWhoisTransport::new())
}
