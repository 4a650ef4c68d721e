//! WHOIS/RDAP registration heuristic (spec §4.4).
//!
//! `hasBeenRegistered` invokes the external WHOIS/RDAP client and
//! classifies the result into registered / unregistered / unknown,
//! trusting raw text over structured fields because referred responses may
//! carry stale "registered" data (spec §4.4 rationale). Substring-based
//! error classification is a known fragility inherited from whatever
//! external WHOIS library backs the transport (spec §9) — it is isolated
//! here so that only this module changes if that library grows typed
//! errors.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::apex_extractor::ApexExtractor;
use crate::errors::{TldExtractionError, WhoisQueryError, WhoisTransientError};
use crate::options::{IpFamily, WhoisOptions};
use crate::tld_mappings::TldWhoisMap;
use crate::whois_value::{scan, WhoisValue};

/// Per-query options passed through to the external WHOIS/RDAP client
/// (spec §6 `whois.family`, `whois.follow`, plus the per-attempt timeout
/// and resolved TLD-server hint).
#[derive(Debug, Clone)]
pub struct WhoisLookupOptions {
    pub timeout: Duration,
    pub host_hint: Option<String>,
    pub family: Option<IpFamily>,
    pub follow: Option<usize>,
}

/// The external WHOIS/RDAP client (spec §6 collaborator 4): "an object with
/// possibly-nested referrals; each referral node may carry `__raw:
/// string`. Errors expose a human-readable message used for substring
/// classification." Concrete transports are out of scope for the core; see
/// [`crate::transport::tcp_whois`] for the optional default.
#[async_trait]
pub trait WhoisTransport: Send + Sync {
    async fn lookup(
        &self,
        domain: &str,
        options: &WhoisLookupOptions,
    ) -> Result<WhoisValue, WhoisTransientError>;
}

/// Authoritative non-answers the retry layer must not retry (spec §9
/// "Sentinel values"). Kept as a sum type alongside the WHOIS value rather
/// than as sentinel strings, per spec's explicit recommendation.
enum Sentinel {
    TldUnsupported,
    NoWhois,
    Value(WhoisValue),
}

/// Classification of one transport error, by substring match on its
/// message (spec §4.4 step 4).
enum ErrorClass {
    TldUnsupported,
    NoWhois,
    Bail,
    Retry,
}

fn classify_error(message: &str) -> ErrorClass {
    if message.contains("not supported") && message.to_lowercase().contains("tld for") {
        ErrorClass::TldUnsupported
    } else if message.contains("Invalid TLD") || (message.contains("TLD") && message.contains("not found")) {
        ErrorClass::Bail
    } else if message.contains("No WHOIS data found") {
        ErrorClass::NoWhois
    } else {
        ErrorClass::Retry
    }
}

pub struct WhoisHeuristic {
    transport: Arc<dyn WhoisTransport>,
    apex_extractor: Arc<dyn ApexExtractor>,
    tld_map: TldWhoisMap,
}

impl WhoisHeuristic {
    pub fn new(
        transport: Arc<dyn WhoisTransport>,
        apex_extractor: Arc<dyn ApexExtractor>,
        tld_map: TldWhoisMap,
    ) -> Self {
        Self {
            transport,
            apex_extractor,
            tld_map,
        }
    }

    /// `hasBeenRegistered(apex, options) -> boolean` (spec §4.4), failing
    /// only on a definitive "TLD does not exist" signal.
    pub async fn has_been_registered(
        &self,
        apex: &str,
        options: &WhoisOptions,
    ) -> Result<bool, WhoisQueryError> {
        let tld = self
            .apex_extractor
            .tld_of(apex)
            .ok_or_else(|| TldExtractionError(apex.to_string()))
            .map_err(|source| WhoisQueryError {
                domain: apex.to_string(),
                source: WhoisTransientError::new(source.to_string()),
            })?;

        let host_hint = self.tld_map.lookup(&tld).map(str::to_string);
        let lookup_options = WhoisLookupOptions {
            timeout: options.timeout,
            host_hint,
            family: options.family,
            follow: options.follow,
        };

        match self.query_with_retry(apex, &lookup_options, &options.retry_policy_schedule()).await {
            Ok(sentinel) => Ok(self.interpret(sentinel)),
            Err(QueryFailure::Bailed(message)) => Err(WhoisQueryError {
                domain: apex.to_string(),
                source: WhoisTransientError::new(message),
            }),
            Err(QueryFailure::RetriesExhausted) => {
                warn!(apex, "whois query exhausted retries, assuming whois_error_count_as_alive");
                Ok(options.whois_error_count_as_alive)
            }
        }
    }

    fn interpret(&self, sentinel: Sentinel) -> bool {
        match sentinel {
            // No signal at all: assume registered rather than falsely
            // flagging the apex dead.
            Sentinel::TldUnsupported => true,
            // Authoritative negative.
            Sentinel::NoWhois => false,
            Sentinel::Value(value) => scan(&value),
        }
    }

    async fn query_with_retry(
        &self,
        apex: &str,
        options: &WhoisLookupOptions,
        schedule: &[Duration],
    ) -> Result<Sentinel, QueryFailure> {
        let mut attempt = 0usize;
        loop {
            match self.transport.lookup(apex, options).await {
                Ok(value) => return Ok(Sentinel::Value(value)),
                Err(err) => match classify_error(&err.0) {
                    ErrorClass::TldUnsupported => return Ok(Sentinel::TldUnsupported),
                    ErrorClass::NoWhois => return Ok(Sentinel::NoWhois),
                    ErrorClass::Bail => return Err(QueryFailure::Bailed(err.0)),
                    ErrorClass::Retry => {
                        if attempt >= schedule.len() {
                            return Err(QueryFailure::RetriesExhausted);
                        }
                        debug!(apex, attempt, error = %err.0, "whois transient error, retrying");
                        tokio::time::sleep(schedule[attempt]).await;
                        attempt += 1;
                    }
                },
            }
        }
    }
}

enum QueryFailure {
    Bailed(String),
    RetriesExhausted,
}

impl WhoisOptions {
    fn retry_policy_schedule(&self) -> Vec<Duration> {
        self.retry_policy.schedule()
    }
}
