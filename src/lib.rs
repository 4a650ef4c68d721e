//! # fqdn-liveness
//!
//! A layered NS → WHOIS/RDAP → A → AAAA liveness decision engine for
//! fully-qualified domain names, built for list-curation and
//! abuse-detection pipelines that need to tell abandoned/expired names
//! apart from genuinely reachable ones at scale — while tolerating flaky
//! DNS servers and fragile WHOIS/RDAP infrastructure.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fqdn_liveness::{
//!     create_fqdn_checker, CheckerCollaborators, DnsOptions, WhoisOptions,
//! };
//!
//! # #[cfg(all(feature = "hickory-transport", feature = "tcp-whois"))]
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use fqdn_liveness::transport::hickory::HickoryTransportFactory;
//! use fqdn_liveness::transport::tcp_whois::default_whois_transport;
//!
//! let collaborators = CheckerCollaborators::new(
//!     Arc::new(HickoryTransportFactory::new()),
//!     default_whois_transport(),
//! );
//! let checker = create_fqdn_checker(
//!     DnsOptions::default(),
//!     WhoisOptions::default(),
//!     collaborators,
//!     None,
//!     None,
//! )?;
//!
//! let result = checker.is_fqdn_alive("example.com").await;
//! println!("alive: {}", result.alive);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! Two composed checkers, leaves first:
//!
//! - [`ApexChecker`] decides whether a registerable apex is alive: an
//!   [`DnsProbe`] NS-record fast path, falling back to a [`WhoisHeuristic`]
//!   registration check. Backed by its own [`ResultCache`] and
//!   [`Coalescer`].
//! - [`FqdnChecker`] wraps an [`ApexChecker`]; if the FQDN isn't the apex
//!   itself it probes A then AAAA. Backed by its own cache and coalescer.
//!
//! Four external collaborators are modeled as traits so the engine never
//! hard-codes a live network call: [`ApexExtractor`], [`IdnNormalizer`],
//! [`DnsTransportFactory`]/[`DnsResolver`], and [`WhoisTransport`]. The
//! first two are pure computation and always compiled in; the DNS/WHOIS
//! transports ship concrete defaults behind the `hickory-transport` and
//! `tcp-whois` Cargo features so the crate is usable out of the box, but
//! every checker is constructed from trait objects so callers can
//! substitute stubs in tests (see each module's `#[cfg(test)]` section).

pub mod apex_checker;
pub mod apex_extractor;
pub mod cache;
pub mod coalescer;
pub mod dns_probe;
pub mod dns_spec;
pub mod errors;
pub mod factory;
pub mod fqdn_checker;
pub mod idn;
pub mod model;
pub mod options;
pub mod tld_mappings;
pub mod transport;
pub mod whois_heuristic;
pub mod whois_value;

pub use apex_checker::ApexChecker;
pub use apex_extractor::{ApexExtractor, PublicsuffixApexExtractor};
pub use cache::{get_or_compute, InMemoryCache, ResultCache};
pub use coalescer::Coalescer;
pub use dns_probe::{DnsAnswer, DnsProbe, DnsResolver, DnsTransportFactory};
pub use dns_spec::{DnsScheme, DnsServerSpec};
pub use errors::{ConfigError, DnsTransientError, TldExtractionError, WhoisQueryError, WhoisTransientError};
pub use factory::{create_apex_checker, create_fqdn_checker, CheckerCollaborators};
pub use fqdn_checker::FqdnChecker;
pub use idn::{IdnNormalizer, IdnaNormalizer};
pub use model::{ApexResult, FqdnResult, ProbeOutcome, RecordType};
pub use options::{DnsOptions, IpFamily, RetryPolicy, WhoisOptions};
pub use tld_mappings::TldWhoisMap;
pub use whois_heuristic::{WhoisHeuristic, WhoisLookupOptions, WhoisTransport};
pub use whois_value::WhoisValue;
