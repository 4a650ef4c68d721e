//! FQDN liveness decision (spec §4.6): wraps ApexChecker, then an A/AAAA
//! probe cascade for names below the apex.

use std::sync::Arc;

use crate::apex_checker::ApexChecker;
use crate::cache::{get_or_compute, ResultCache};
use crate::coalescer::Coalescer;
use crate::dns_probe::{DnsProbe, DnsTransportFactory};
use crate::dns_spec::DnsServerSpec;
use crate::idn::IdnNormalizer;
use crate::model::{FqdnResult, RecordType};
use crate::options::DnsOptions;

/// `createFqdnChecker(options)` (spec §6), callable repeatedly as
/// `isFqdnAlive(inputDomain) -> FqdnResult`.
pub struct FqdnChecker {
    idn: Arc<dyn IdnNormalizer>,
    apex_checker: ApexChecker,
    dns_probe: DnsProbe,
    dns_options: DnsOptions,
    dns_servers: Vec<DnsServerSpec>,
    coalescer: Coalescer<String, FqdnResult>,
    cache: Option<Arc<dyn ResultCache<FqdnResult>>>,
}

impl FqdnChecker {
    pub fn new(
        idn: Arc<dyn IdnNormalizer>,
        apex_checker: ApexChecker,
        dns_transport: Arc<dyn DnsTransportFactory>,
        dns_options: DnsOptions,
        dns_servers: Vec<DnsServerSpec>,
        cache: Option<Arc<dyn ResultCache<FqdnResult>>>,
    ) -> Self {
        Self {
            idn,
            apex_checker,
            dns_probe: DnsProbe::new(dns_transport),
            dns_options,
            dns_servers,
            coalescer: Coalescer::new(),
            cache,
        }
    }

    /// `isFqdnAlive(inputDomain) -> FqdnResult` (spec §4.6).
    pub async fn is_fqdn_alive(&self, input_domain: &str) -> FqdnResult {
        // Step 1: normalize.
        let Some(normalized) = self.idn.to_a_label(input_domain) else {
            return FqdnResult::null();
        };

        // Step 2: delegate to ApexChecker.
        let apex_result = self.apex_checker.is_apex_alive(&normalized).await;
        let Some(apex) = apex_result.registerable_domain else {
            return FqdnResult::null();
        };
        if !apex_result.alive {
            return FqdnResult::apex_dead(apex);
        }

        // Step 3: apex-identity shortcut, zero further queries.
        if normalized == apex {
            return FqdnResult::alive(apex);
        }

        // Steps 4-7: coalesce and cache by FQDN, then probe A then AAAA.
        let key = normalized.clone();
        let cache = self.cache.clone();
        let apex_for_fallback = apex.clone();
        let result = self
            .coalescer
            .run(key.clone(), || async move {
                let value = get_or_compute(
                    cache.as_deref().map(|c| c as &dyn ResultCache<FqdnResult>),
                    &key,
                    || self.probe(&normalized, apex.clone()),
                )
                .await;
                Ok::<FqdnResult, std::convert::Infallible>(value)
            })
            .await;

        result.unwrap_or_else(|_| FqdnResult::apex_alive_fqdn_dead(apex_for_fallback))
    }

    async fn probe(&self, normalized: &str, apex: String) -> FqdnResult {
        let confirmations = self.dns_options.confirmations;
        let max_attempts = self
            .dns_options
            .max_attempts
            .unwrap_or(self.dns_servers.len());

        // Step 5: A probe, completes fully before step 6 begins.
        let a_outcome = self
            .dns_probe
            .run(
                normalized,
                RecordType::A,
                &self.dns_servers,
                confirmations,
                max_attempts,
                &self.dns_options.retry_policy,
            )
            .await;
        if a_outcome.is_confirmed() {
            return FqdnResult::alive(apex);
        }

        // Step 6: AAAA probe, independent fresh shuffle.
        let aaaa_outcome = self
            .dns_probe
            .run(
                normalized,
                RecordType::Aaaa,
                &self.dns_servers,
                confirmations,
                max_attempts,
                &self.dns_options.retry_policy,
            )
            .await;
        if aaaa_outcome.is_confirmed() {
            return FqdnResult::alive(apex);
        }

        // Step 7.
        FqdnResult::apex_alive_fqdn_dead(apex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apex_extractor::StaticApexExtractor;
    use crate::dns_probe::{DnsAnswer, DnsResolver, DnsTransportFactory};
    use crate::errors::{DnsTransientError, WhoisTransientError};
    use crate::options::{RetryPolicy, WhoisOptions};
    use crate::tld_mappings::TldWhoisMap;
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

    struct RecordTypeResolver {
        confirming_types: Vec<RecordType>,
    }
    #[async_trait]
    impl DnsResolver for RecordTypeResolver {
        async fn query(&self, _name: &str, record_type: RecordType) -> Result<DnsAnswer, DnsTransientError> {
            if self.confirming_types.contains(&record_type) {
                Ok(DnsAnswer::non_empty(vec!["answer".to_string()]))
            } else {
                Ok(DnsAnswer::empty())
            }
        }
    }

    struct StubDnsTransport {
        confirming_types: Vec<RecordType>,
    }
    impl DnsTransportFactory for StubDnsTransport {
        fn make_resolver(&self, _spec: &DnsServerSpec) -> Arc<dyn DnsResolver> {
            Arc::new(RecordTypeResolver {
                confirming_types: self.confirming_types.clone(),
            })
        }
    }

    struct UnreachableWhois;
    #[async_trait]
    impl WhoisTransport for UnreachableWhois {
        async fn lookup(
            &self,
            _domain: &str,
            _options: &WhoisLookupOptions,
        ) -> Result<WhoisValue, WhoisTransientError> {
            panic!("whois transport should not be reached when NS confirms the apex");
        }
    }

    fn extractor() -> Arc<dyn ApexExtractor> {
        let mut tlds = Map::new();
        tlds.insert("example.com".to_string(), "com".to_string());
        let mut apexes = Map::new();
        apexes.insert("example.com".to_string(), "example.com".to_string());
        apexes.insert("a.example.com".to_string(), "example.com".to_string());
        apexes.insert("ghost.example.com".to_string(), "example.com".to_string());
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

    fn build_checker(confirming_a_aaaa: Vec<RecordType>) -> FqdnChecker {
        let apex_dns_transport: Arc<dyn DnsTransportFactory> =
            Arc::new(StubDnsTransport { confirming_types: vec![RecordType::Ns] });
        let apex_checker = ApexChecker::new(
            Arc::new(IdentityIdn),
            extractor(),
            apex_dns_transport,
            dns_options(),
            servers(),
            Arc::new(UnreachableWhois),
            TldWhoisMap::default(),
            WhoisOptions::default(),
            None,
        );

        FqdnChecker::new(
            Arc::new(IdentityIdn),
            apex_checker,
            Arc::new(StubDnsTransport { confirming_types: confirming_a_aaaa }),
            dns_options(),
            servers(),
            None,
        )
    }

    #[tokio::test]
    async fn apex_identity_shortcut_skips_probing() {
        let checker = build_checker(vec![]);
        let result = checker.is_fqdn_alive("example.com").await;
        assert_eq!(result, FqdnResult::alive("example.com".to_string()));
    }

    #[tokio::test]
    async fn a_record_confirms_fqdn_alive() {
        let checker = build_checker(vec![RecordType::A]);
        let result = checker.is_fqdn_alive("a.example.com").await;
        assert_eq!(result, FqdnResult::alive("example.com".to_string()));
    }

    #[tokio::test]
    async fn no_a_or_aaaa_leaves_fqdn_dead_with_apex_alive() {
        let checker = build_checker(vec![]);
        let result = checker.is_fqdn_alive("ghost.example.com").await;
        assert_eq!(
            result,
            FqdnResult::apex_alive_fqdn_dead("example.com".to_string())
        );
    }
}
