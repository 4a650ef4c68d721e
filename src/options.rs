//! Programmatic options for the checker factories (spec §6).
//!
//! Unlike the teacher's `config.rs`, nothing here is auto-detected from the
//! host or read from the environment — spec.md is explicit that the core
//! carries "no CLI, no environment variables, no on-disk state". Every
//! field is supplied by the embedding application, with the numeric
//! defaults spec.md enumerates.

use std::collections::HashMap;
use std::time::Duration;

/// Exponential-backoff retry policy shared by DnsProbe attempts and
/// WhoisHeuristic queries (spec §4.3/§4.4): `delay = min(maxTimeout,
/// minTimeout * factor^k)`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub retries: usize,
    pub factor: u32,
    pub min_timeout: Duration,
    pub max_timeout: Duration,
}

impl RetryPolicy {
    pub fn dns_default() -> Self {
        Self {
            retries: 3,
            factor: 2,
            min_timeout: Duration::from_millis(1000),
            max_timeout: Duration::from_millis(16000),
        }
    }

    pub fn whois_default() -> Self {
        Self::dns_default()
    }

    /// The capped exponential-backoff delay sequence this policy describes:
    /// `delay_k = min(maxTimeout, minTimeout * factor^k)` for `k` in
    /// `0..retries`.
    pub fn schedule(&self) -> Vec<Duration> {
        (0..self.retries)
            .map(|k| {
                let factor = self.factor.saturating_pow(k as u32) as u128;
                let millis = self.min_timeout.as_millis().saturating_mul(factor);
                Duration::from_millis(millis.min(self.max_timeout.as_millis()) as u64)
            })
            .collect()
    }
}

/// IP family preference passed through to the WHOIS/RDAP client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpFamily {
    V4,
    V6,
}

/// Options governing DnsProbe (spec §6 `dns.*`).
#[derive(Debug, Clone)]
pub struct DnsOptions {
    pub dns_servers: Vec<String>,
    pub confirmations: usize,
    pub max_attempts: Option<usize>,
    pub retry_policy: RetryPolicy,
}

impl Default for DnsOptions {
    fn default() -> Self {
        Self {
            dns_servers: vec![
                "https://1.1.1.1".to_string(),
                "https://1.0.0.1".to_string(),
                "https://8.8.8.8".to_string(),
                "https://8.8.4.4".to_string(),
            ],
            confirmations: 2,
            max_attempts: None,
            retry_policy: RetryPolicy::dns_default(),
        }
    }
}

/// Options governing WhoisHeuristic (spec §6 `whois.*`).
#[derive(Debug, Clone)]
pub struct WhoisOptions {
    pub timeout: Duration,
    pub retry_policy: RetryPolicy,
    pub family: Option<IpFamily>,
    pub follow: Option<usize>,
    pub custom_whois_servers_mapping: HashMap<String, String>,
    pub whois_error_count_as_alive: bool,
}

impl Default for WhoisOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(5000),
            retry_policy: RetryPolicy::whois_default(),
            family: None,
            follow: None,
            custom_whois_servers_mapping: HashMap::new(),
            whois_error_count_as_alive: true,
        }
    }
}
