//! `createApexChecker`/`createFqdnChecker` (spec §6): the two stateful
//! factory operations an embedding application calls once at startup.
//! Grounded on the teacher's `WhoisClient::new`/`new_with_config`
//! constructors, which validate configuration once and fail fast rather
//! than at query time — here that validation lives in [`DnsServerSpec`]
//! parsing and the explicit checks below.

use std::sync::Arc;

use crate::apex_checker::ApexChecker;
use crate::apex_extractor::{ApexExtractor, PublicsuffixApexExtractor};
use crate::cache::{InMemoryCache, ResultCache};
use crate::dns_probe::DnsTransportFactory;
use crate::dns_spec::DnsServerSpec;
use crate::errors::ConfigError;
use crate::fqdn_checker::FqdnChecker;
use crate::idn::{IdnNormalizer, IdnaNormalizer};
use crate::model::{ApexResult, FqdnResult};
use crate::options::{DnsOptions, WhoisOptions};
use crate::tld_mappings::TldWhoisMap;
use crate::whois_heuristic::WhoisTransport;

/// Everything `createApexChecker`/`createFqdnChecker` need beyond the
/// numeric options already captured by [`DnsOptions`]/[`WhoisOptions`]:
/// the pluggable external collaborators (spec §6) that the core has no
/// concrete default for unless the corresponding cargo feature is on.
pub struct CheckerCollaborators {
    pub dns_transport: Arc<dyn DnsTransportFactory>,
    pub whois_transport: Arc<dyn WhoisTransport>,
    pub apex_extractor: Arc<dyn ApexExtractor>,
    pub idn_normalizer: Arc<dyn IdnNormalizer>,
}

impl CheckerCollaborators {
    /// `apex_extractor`/`idn_normalizer` are pure computation and always
    /// have a built-in default (spec §6 collaborators 1-2); `dns_transport`
    /// and `whois_transport` must be supplied unless this crate was built
    /// with the corresponding default-collaborator feature.
    pub fn new(dns_transport: Arc<dyn DnsTransportFactory>, whois_transport: Arc<dyn WhoisTransport>) -> Self {
        Self {
            dns_transport,
            whois_transport,
            apex_extractor: Arc::new(PublicsuffixApexExtractor::new()),
            idn_normalizer: Arc::new(IdnaNormalizer),
        }
    }
}

fn parse_dns_servers(options: &DnsOptions) -> Result<Vec<DnsServerSpec>, ConfigError> {
    if options.dns_servers.is_empty() {
        return Err(ConfigError::EmptyServerList);
    }
    options.dns_servers.iter().map(|raw| DnsServerSpec::parse(raw)).collect()
}

fn validate_dns_options(options: &DnsOptions) -> Result<(), ConfigError> {
    if options.confirmations == 0 {
        return Err(ConfigError::NonPositiveConfirmations);
    }
    if let Some(max_attempts) = options.max_attempts {
        if max_attempts == 0 {
            return Err(ConfigError::NonPositiveMaxAttempts);
        }
    }
    Ok(())
}

/// `createApexChecker(options) -> (domain) -> ApexResult` (spec §6). The
/// returned [`ApexChecker`] is the callable closure: call
/// [`ApexChecker::is_apex_alive`] repeatedly.
pub fn create_apex_checker(
    dns_options: DnsOptions,
    whois_options: WhoisOptions,
    collaborators: CheckerCollaborators,
    apex_result_cache: Option<Arc<dyn ResultCache<ApexResult>>>,
) -> Result<ApexChecker, ConfigError> {
    validate_dns_options(&dns_options)?;
    let dns_servers = parse_dns_servers(&dns_options)?;

    let mut tld_map = TldWhoisMap::default();
    if !whois_options.custom_whois_servers_mapping.is_empty() {
        tld_map = TldWhoisMap::new(whois_options.custom_whois_servers_mapping.clone());
    }

    let cache = apex_result_cache.or_else(|| {
        Some(Arc::new(InMemoryCache::<ApexResult>::default()) as Arc<dyn ResultCache<ApexResult>>)
    });

    Ok(ApexChecker::new(
        collaborators.idn_normalizer,
        collaborators.apex_extractor,
        collaborators.dns_transport,
        dns_options,
        dns_servers,
        collaborators.whois_transport,
        tld_map,
        whois_options,
        cache,
    ))
}

/// `createFqdnChecker(options) -> (domain) -> FqdnResult` (spec §6). Builds
/// its own nested [`ApexChecker`] from the same options and collaborators,
/// matching spec's "FqdnChecker wraps ApexChecker" composition.
pub fn create_fqdn_checker(
    dns_options: DnsOptions,
    whois_options: WhoisOptions,
    collaborators: CheckerCollaborators,
    apex_result_cache: Option<Arc<dyn ResultCache<ApexResult>>>,
    fqdn_result_cache: Option<Arc<dyn ResultCache<FqdnResult>>>,
) -> Result<FqdnChecker, ConfigError> {
    validate_dns_options(&dns_options)?;
    let dns_servers = parse_dns_servers(&dns_options)?;

    let apex_checker = create_apex_checker(
        dns_options.clone(),
        whois_options,
        CheckerCollaborators {
            dns_transport: collaborators.dns_transport.clone(),
            whois_transport: collaborators.whois_transport,
            apex_extractor: collaborators.apex_extractor,
            idn_normalizer: collaborators.idn_normalizer.clone(),
        },
        apex_result_cache,
    )?;

    let cache = fqdn_result_cache.or_else(|| {
        Some(Arc::new(InMemoryCache::<FqdnResult>::default()) as Arc<dyn ResultCache<FqdnResult>>)
    });

    Ok(FqdnChecker::new(
        collaborators.idn_normalizer,
        apex_checker,
        collaborators.dns_transport,
        dns_options,
        dns_servers,
        cache,
    ))
}
