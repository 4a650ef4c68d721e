//! Apex liveness decision (spec §4.5): NS probe fast path, WHOIS fallback.

use std::sync::Arc;

use tracing::debug;

use crate::apex_extractor::ApexExtractor;
use crate::cache::{get_or_compute, ResultCache};
use crate::coalescer::Coalescer;
use crate::dns_probe::{DnsProbe, DnsTransportFactory};
use crate::dns_spec::DnsServerSpec;
use crate::idn::IdnNormalizer;
use crate::model::{ApexResult, RecordType};
use crate::options::DnsOptions;
use crate::tld_mappings::TldWhoisMap;
use crate::whois_heuristic::{WhoisHeuristic, WhoisTransport};
use crate::options::WhoisOptions;

/// `createApexChecker(options)` (spec §6), callable repeatedly as
/// `isApexAlive(inputDomain) -> ApexResult`.
pub struct ApexChecker {
    idn: Arc<dyn IdnNormalizer>,
    apex_extractor: Arc<dyn ApexExtractor>,
    dns_probe: DnsProbe,
    dns_options: DnsOptions,
    dns_servers: Vec<DnsServerSpec>,
    whois: WhoisHeuristic,
    whois_options: WhoisOptions,
    coalescer: Coalescer<String, ApexResult>,
    cache: Option<Arc<dyn ResultCache<ApexResult>>>,
}

impl ApexChecker {
    pub fn new(
        idn: Arc<dyn IdnNormalizer>,
        apex_extractor: Arc<dyn ApexExtractor>,
        dns_transport: Arc<dyn DnsTransportFactory>,
        dns_options: DnsOptions,
        dns_servers: Vec<DnsServerSpec>,
        whois_transport: Arc<dyn WhoisTransport>,
        tld_map: TldWhoisMap,
        whois_options: WhoisOptions,
        cache: Option<Arc<dyn ResultCache<ApexResult>>>,
    ) -> Self {
        Self {
            idn,
            apex_extractor: apex_extractor.clone(),
            dns_probe: DnsProbe::new(dns_transport),
            dns_options,
            dns_servers,
            whois: WhoisHeuristic::new(whois_transport, apex_extractor, tld_map),
            whois_options,
            coalescer: Coalescer::new(),
            cache,
        }
    }

    /// `isApexAlive(inputDomain) -> ApexResult` (spec §4.5).
    pub async fn is_apex_alive(&self, input_domain: &str) -> ApexResult {
        // Step 1: normalize to A-label form. Unnormalizable input has no
        // registerable apex either, so it collapses to the shared null
        // result exactly like a failed public-suffix lookup would.
        let Some(normalized) = self.idn.to_a_label(input_domain) else {
            return ApexResult::null();
        };

        // Step 2: coalesce and cache by normalized input, not apex (spec
        // §4.5's documented cache/coalescer key choice).
        let key = normalized.clone();
        let cache = self.cache.clone();
        let result = self
            .coalescer
            .run(key.clone(), || async move {
                let value = get_or_compute(
                    cache.as_deref().map(|c| c as &dyn ResultCache<ApexResult>),
                    &key,
                    || self.compute(&normalized),
                )
                .await;
                Ok::<ApexResult, std::convert::Infallible>(value)
            })
            .await;

        // The thunk above never produces an `Err` (its error type is
        // uninhabited), so a coalescer `Err` can only mean a panicking
        // driver; fall back to the shared null result rather than panic
        // ourselves, consistent with the "assume alive on unknown" bias
        // not applying to a definitively-unparseable input.
        result.unwrap_or_else(|_| ApexResult::null())
    }

    async fn compute(&self, normalized: &str) -> ApexResult {
        // Step 3: registerable apex.
        let Some(apex) = self.apex_extractor.registerable_domain(normalized) else {
            return ApexResult::null();
        };

        // Step 4: NS probe fast path.
        let confirmations = self.dns_options.confirmations;
        let max_attempts = self
            .dns_options
            .max_attempts
            .unwrap_or(self.dns_servers.len());
        let ns_outcome = self
            .dns_probe
            .run(
                &apex,
                RecordType::Ns,
                &self.dns_servers,
                confirmations,
                max_attempts,
                &self.dns_options.retry_policy,
            )
            .await;

        if ns_outcome.is_confirmed() {
            debug!(apex, "apex confirmed alive via NS probe");
            return ApexResult::alive(apex);
        }

        // Step 5: WHOIS fallback.
        match self.whois.has_been_registered(&apex, &self.whois_options).await {
            Ok(true) => ApexResult::alive(apex),
            Ok(false) => ApexResult::dead(apex),
            Err(_) => {
                debug!(apex, "whois query failed definitively, assuming whois_error_count_as_alive");
                if self.whois_options.whois_error_count_as_alive {
                    ApexResult::alive(apex)
                } else {
                    ApexResult::dead(apex)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apex_extractor::StaticApexExtractor;
    use crate::dns_probe::{DnsAnswer, DnsResolver, DnsTransportFactory};
    use crate::errors::{DnsTransientError, WhoisTransientError};
    use crate::idn::IdnNormalizer;
    use crate::options::RetryPolicy;
    use crate::whois_heuristic::{WhoisLookupOptions, WhoisTransport};
    use crate::whois_value::WhoisValue;
    use async_trait::async_trait;
    use std::collections::HashMap as Map;

    struct IdentityIdn;
    impl IdnNormalizer for IdentityIdn {
        fn to_a_label(&self, input: &str) -> Option<String> {
            Some(input.to_lowercase())
        }
    }

    struct AlwaysConfirmResolver;
    #[async_trait]
    impl DnsResolver for AlwaysConfirmResolver {
        async fn query(&self, _name: &str, _record_type: RecordType) -> Result<DnsAnswer, DnsTransientError> {
            Ok(DnsAnswer::non_empty(vec!["ns1.example.com".to_string()]))
        }
    }

    struct NeverConfirmResolver;
    #[async_trait]
    impl DnsResolver for NeverConfirmResolver {
        async fn query(&self, _name: &str, _record_type: RecordType) -> Result<DnsAnswer, DnsTransientError> {
            Ok(DnsAnswer::empty())
        }
    }

    struct StubDnsTransport {
        confirm: bool,
    }
    impl DnsTransportFactory for StubDnsTransport {
        fn make_resolver(&self, _spec: &DnsServerSpec) -> Arc<dyn DnsResolver> {
            if self.confirm {
                Arc::new(AlwaysConfirmResolver)
            } else {
                Arc::new(NeverConfirmResolver)
            }
        }
    }

    struct ScriptedWhois {
        raw: Option<&'static str>,
        err: Option<&'static str>,
    }
    #[async_trait]
    impl WhoisTransport for ScriptedWhois {
        async fn lookup(
            &self,
            _domain: &str,
            _options: &WhoisLookupOptions,
        ) -> Result<WhoisValue, WhoisTransientError> {
            if let Some(message) = self.err {
                return Err(WhoisTransientError::new(message));
            }
            let mut map = WhoisValue::node();
            map.insert(
                "__raw".to_string(),
                WhoisValue::Scalar(self.raw.unwrap_or("").to_string()),
            );
            Ok(WhoisValue::Node(map))
        }
    }

    fn extractor() -> Arc<dyn ApexExtractor> {
        let mut tlds = Map::new();
        tlds.insert("example.com".to_string(), "com".to_string());
        tlds.insert("example2.com".to_string(), "com".to_string());
        let mut apexes = Map::new();
        apexes.insert("example.com".to_string(), "example.com".to_string());
        apexes.insert("sub.example2.com".to_string(), "example2.com".to_string());
        Arc::new(StaticApexExtractor::new(tlds).with_apexes(apexes))
    }

    fn dns_options() -> DnsOptions {
        DnsOptions {
            dns_servers: vec![],
            confirmations: 2,
            max_attempts: None,
            retry_policy: RetryPolicy::dns_default(),
        }
    }

    fn servers() -> Vec<DnsServerSpec> {
        vec![
            DnsServerSpec::parse("1.1.1.1").unwrap(),
            DnsServerSpec::parse("1.0.0.1").unwrap(),
        ]
    }

    #[tokio::test]
    async fn ns_confirmed_skips_whois() {
        let checker = ApexChecker::new(
            Arc::new(IdentityIdn),
            extractor(),
            Arc::new(StubDnsTransport { confirm: true }),
            dns_options(),
            servers(),
            Arc::new(ScriptedWhois { raw: None, err: Some("should not be called") }),
            TldWhoisMap::default(),
            WhoisOptions::default(),
            None,
        );

        let result = checker.is_apex_alive("example.com").await;
        assert_eq!(result, ApexResult::alive("example.com".to_string()));
    }

    #[tokio::test]
    async fn dead_phrase_falls_back_to_dead() {
        let checker = ApexChecker::new(
            Arc::new(IdentityIdn),
            extractor(),
            Arc::new(StubDnsTransport { confirm: false }),
            dns_options(),
            servers(),
            Arc::new(ScriptedWhois {
                raw: Some("No match for EXAMPLE2.COM"),
                err: None,
            }),
            TldWhoisMap::default(),
            WhoisOptions::default(),
            None,
        );

        let result = checker.is_apex_alive("sub.example2.com").await;
        assert_eq!(result, ApexResult::dead("example2.com".to_string()));
    }

    #[tokio::test]
    async fn whois_query_error_uses_whois_error_count_as_alive() {
        let mut options = WhoisOptions::default();
        options.whois_error_count_as_alive = false;
        let checker = ApexChecker::new(
            Arc::new(IdentityIdn),
            extractor(),
            Arc::new(StubDnsTransport { confirm: false }),
            dns_options(),
            servers(),
            Arc::new(ScriptedWhois {
                raw: None,
                err: Some("TLD \"zzz\" not found"),
            }),
            TldWhoisMap::default(),
            options,
            None,
        );

        let result = checker.is_apex_alive("example.com").await;
        assert_eq!(result, ApexResult::dead("example.com".to_string()));
    }

    #[tokio::test]
    async fn unresolvable_apex_is_shared_null_result() {
        let checker = ApexChecker::new(
            Arc::new(IdentityIdn),
            extractor(),
            Arc::new(StubDnsTransport { confirm: false }),
            dns_options(),
            servers(),
            Arc::new(ScriptedWhois { raw: None, err: Some("unused") }),
            TldWhoisMap::default(),
            WhoisOptions::default(),
            None,
        );

        let result = checker.is_apex_alive("192.0.2.1").await;
        assert_eq!(result, ApexResult::null());
    }
}
