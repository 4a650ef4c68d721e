//! Optional default implementations of the DNS/WHOIS collaborator traits
//! (spec §6). The core engine (`dns_probe`, `whois_heuristic`) only ever
//! depends on the trait objects; these modules exist purely so an
//! embedding application doesn't have to write its own transport to get
//! started, and are compiled in only behind their feature flags.

#[cfg(feature = "hickory-transport")]
pub mod hickory;

#[cfg(feature = "tcp-whois")]
pub mod tcp_whois;
