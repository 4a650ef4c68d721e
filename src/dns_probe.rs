//! Confirmation-threshold DNS race with bounded retries (spec §4.3).
//!
//! Attempts are strictly serial, never parallel, to bound upstream
//! pressure. The probe does not distinguish NXDOMAIN from an empty answer
//! section — both are "not confirmed" for that attempt — and deliberately
//! does **not** treat SOA-in-authority as a confirming NS answer (spec §9,
//! "Open question — SOA-as-NS": some authoritative servers return SOA-only
//! responses for names that are in fact delegated; WhoisHeuristic is the
//! safety net for those, not this probe).

use std::sync::Arc;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tokio_retry::Retry;
use tracing::{debug, warn};

use crate::dns_spec::DnsServerSpec;
use crate::errors::DnsTransientError;
use crate::model::{ProbeOutcome, RecordType};
use crate::options::RetryPolicy;

/// A DNS answer as the probe needs to see it: only whether the answer
/// section is non-empty matters (spec §4.3 step 4). The full record data
/// is intentionally not modeled here — the core never inspects it.
#[derive(Debug, Clone, Default)]
pub struct DnsAnswer {
    pub answers: Vec<String>,
}

impl DnsAnswer {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn non_empty(answers: Vec<String>) -> Self {
        Self { answers }
    }

    pub fn is_confirming(&self) -> bool {
        !self.answers.is_empty()
    }
}

/// A single typed resolver bound to one DNS server (spec §6 external
/// collaborator 3: "DNS transport factory producing typed resolvers
/// `(name, type) -> {answers: Array}`"). Concrete UDP/TCP/DoT/DoH
/// implementations are out of scope for the core; see
/// [`crate::transport::hickory`] for the optional default.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn query(&self, name: &str, record_type: RecordType) -> Result<DnsAnswer, DnsTransientError>;
}

/// Builds a [`DnsResolver`] for a given [`DnsServerSpec`]. Implementations
/// are expected to be cheap/stateless to construct — DnsProbe builds a
/// fresh set of resolvers on every call so that A and AAAA phases get
/// independently randomized server orderings (spec §4.6).
pub trait DnsTransportFactory: Send + Sync {
    fn make_resolver(&self, spec: &DnsServerSpec) -> Arc<dyn DnsResolver>;
}

pub struct DnsProbe {
    transport: Arc<dyn DnsTransportFactory>,
}

impl DnsProbe {
    pub fn new(transport: Arc<dyn DnsTransportFactory>) -> Self {
        Self { transport }
    }

    /// Runs the confirmation race for `name`/`record_type` against a fresh
    /// shuffle of `servers`. `max_attempts` is clamped to `servers.len()`
    /// per spec §4.3 step 2 (`M' = min(M, |servers|)`).
    pub async fn run(
        &self,
        name: &str,
        record_type: RecordType,
        servers: &[DnsServerSpec],
        confirmations: usize,
        max_attempts: usize,
        retry_policy: &RetryPolicy,
    ) -> ProbeOutcome {
        if servers.is_empty() || confirmations == 0 {
            return ProbeOutcome::NotConfirmed;
        }

        let mut shuffled: Vec<&DnsServerSpec> = servers.iter().collect();
        shuffled.shuffle(&mut rand::thread_rng());

        let resolvers: Vec<Arc<dyn DnsResolver>> = shuffled
            .iter()
            .map(|spec| self.transport.make_resolver(spec))
            .collect();

        let attempt_count = max_attempts.min(resolvers.len());
        let mut confirmed = 0usize;

        for i in 0..attempt_count {
            let resolver = &resolvers[i % resolvers.len()];
            if self
                .attempt(resolver.as_ref(), name, record_type, retry_policy)
                .await
            {
                confirmed += 1;
                debug!(
                    name,
                    record = record_type.as_str(),
                    confirmed,
                    confirmations,
                    "dns probe attempt confirmed"
                );
                if confirmed >= confirmations {
                    return ProbeOutcome::Confirmed;
                }
            }
        }

        ProbeOutcome::NotConfirmed
    }

    /// One attempt including its retry budget. A retry-exhausted attempt is
    /// logged and treated as non-confirming; it never aborts the probe.
    async fn attempt(
        &self,
        resolver: &dyn DnsResolver,
        name: &str,
        record_type: RecordType,
        retry_policy: &RetryPolicy,
    ) -> bool {
        let schedule = retry_policy.schedule();
        let result = Retry::spawn(schedule, || resolver.query(name, record_type)).await;

        match result {
            Ok(answer) => answer.is_confirming(),
            Err(err) => {
                warn!(
                    name,
                    record = record_type.as_str(),
                    error = %err,
                    "dns resolver attempt exhausted retries"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubResolver {
        confirming: bool,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl DnsResolver for StubResolver {
        async fn query(&self, _name: &str, _record_type: RecordType) -> Result<DnsAnswer, DnsTransientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.confirming {
                Ok(DnsAnswer::non_empty(vec!["ns1.example.com".to_string()]))
            } else {
                Ok(DnsAnswer::empty())
            }
        }
    }

    struct StubTransport {
        confirming_hosts: Vec<String>,
        calls: Arc<AtomicUsize>,
    }

    impl DnsTransportFactory for StubTransport {
        fn make_resolver(&self, spec: &DnsServerSpec) -> Arc<dyn DnsResolver> {
            Arc::new(StubResolver {
                confirming: self.confirming_hosts.contains(&spec.host),
                calls: self.calls.clone(),
            })
        }
    }

    fn servers(hosts: &[&str]) -> Vec<DnsServerSpec> {
        hosts
            .iter()
            .map(|h| DnsServerSpec::parse(h).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn confirms_once_threshold_reached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let transport = Arc::new(StubTransport {
            confirming_hosts: vec!["1.1.1.1".to_string(), "1.0.0.1".to_string()],
            calls: calls.clone(),
        });
        let probe = DnsProbe::new(transport);
        let servers = servers(&["1.1.1.1", "1.0.0.1", "8.8.8.8", "8.8.4.4"]);

        let outcome = probe
            .run(
                "example.com",
                RecordType::Ns,
                &servers,
                2,
                4,
                &RetryPolicy::dns_default(),
            )
            .await;
        assert_eq!(outcome, ProbeOutcome::Confirmed);
    }

    #[tokio::test]
    async fn not_confirmed_when_no_server_answers() {
        let calls = Arc::new(AtomicUsize::new(0));
        let transport = Arc::new(StubTransport {
            confirming_hosts: vec![],
            calls: calls.clone(),
        });
        let probe = DnsProbe::new(transport);
        let servers = servers(&["1.1.1.1", "1.0.0.1"]);

        let outcome = probe
            .run(
                "ghost.example.com",
                RecordType::A,
                &servers,
                2,
                2,
                &RetryPolicy::dns_default(),
            )
            .await;
        assert_eq!(outcome, ProbeOutcome::NotConfirmed);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn max_attempts_is_clamped_to_server_count() {
        let calls = Arc::new(AtomicUsize::new(0));
        let transport = Arc::new(StubTransport {
            confirming_hosts: vec![],
            calls: calls.clone(),
        });
        let probe = DnsProbe::new(transport);
        let servers = servers(&["1.1.1.1", "1.0.0.1"]);

        let _ = probe
            .run(
                "example.com",
                RecordType::A,
                &servers,
                5,
                100,
                &RetryPolicy::dns_default(),
            )
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
