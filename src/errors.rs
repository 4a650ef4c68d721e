//! Error taxonomy for the liveness decision engine.
//!
//! Per spec §7, no user-facing failure is ever thrown from
//! `ApexChecker::is_apex_alive` / `FqdnChecker::is_fqdn_alive` — every
//! fragility collapses into a boolean verdict. The typed errors below exist
//! to let the *internal* plumbing (WhoisHeuristic's retry policy, the
//! factory constructors) distinguish failure modes; only
//! [`ConfigError`] ever reaches a caller as an `Err`.

use thiserror::Error;

/// Thrown synchronously from the checker factories on malformed
/// configuration (spec §7's "Programmer error").
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unknown DNS server scheme {scheme:?} in {spec:?} (expected one of \"\", \"udp\", \"tcp\", \"tls\", \"https\")")]
    UnknownScheme { spec: String, scheme: String },

    #[error("empty DNS server host in {0:?}")]
    EmptyHost(String),

    #[error("dns.confirmations must be >= 1")]
    NonPositiveConfirmations,

    #[error("dns.maxAttempts must be >= 1")]
    NonPositiveMaxAttempts,

    #[error("dns.dnsServers must not be empty")]
    EmptyServerList,
}

/// WhoisHeuristic could not even identify a TLD for the apex (spec §7's
/// `TldExtractionError`). Never surfaces past `WhoisHeuristic` — callers
/// (`ApexChecker`) convert it into `whois_error_count_as_alive`.
#[derive(Error, Debug)]
#[error("could not extract a TLD from {0:?}")]
pub struct TldExtractionError(pub String);

/// A bailed-out WHOIS/RDAP client error that the retry policy must not
/// retry (spec §4.4 step 4's "Invalid TLD"/"TLD not found" signals).
/// Caught by `ApexChecker` and converted into `whois_error_count_as_alive`.
#[derive(Error, Debug)]
#[error("whois query for {domain} failed definitively: {source}")]
pub struct WhoisQueryError {
    pub domain: String,
    #[source]
    pub source: WhoisTransientError,
}

/// A transient error surfaced by a [`crate::whois_heuristic::WhoisTransport`].
/// Consumed by WhoisHeuristic's retry policy; on retry exhaustion it is
/// swallowed and reported as `whois_error_count_as_alive`.
#[derive(Error, Debug, Clone)]
#[error("{0}")]
pub struct WhoisTransientError(pub String);

impl WhoisTransientError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A transient error surfaced by a [`crate::dns_probe::DnsResolver`].
/// Consumed by DnsProbe's per-attempt retry policy; never thrown to the
/// caller — an attempt that exhausts retries just counts as non-confirming.
#[derive(Error, Debug, Clone)]
#[error("{0}")]
pub struct DnsTransientError(pub String);

impl DnsTransientError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
