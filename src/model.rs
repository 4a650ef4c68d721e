//! Result types shared by [`crate::apex_checker`] and [`crate::fqdn_checker`].

use serde::{Deserialize, Serialize};

/// Outcome of `ApexChecker::is_apex_alive`.
///
/// `registerable_domain` is `None` iff the input could not be reduced to a
/// registerable name, in which case `alive` is always `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApexResult {
    pub registerable_domain: Option<String>,
    pub alive: bool,
}

impl ApexResult {
    /// The shared result for inputs whose apex cannot be determined.
    pub fn null() -> Self {
        Self {
            registerable_domain: None,
            alive: false,
        }
    }

    pub fn alive(registerable_domain: String) -> Self {
        Self {
            registerable_domain: Some(registerable_domain),
            alive: true,
        }
    }

    pub fn dead(registerable_domain: String) -> Self {
        Self {
            registerable_domain: Some(registerable_domain),
            alive: false,
        }
    }
}

/// Outcome of `FqdnChecker::is_fqdn_alive`.
///
/// Invariants (enforced by construction, never by a caller-facing check):
/// `alive => registerable_domain_alive`; `registerable_domain.is_none() =>
/// !registerable_domain_alive && !alive`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FqdnResult {
    pub registerable_domain: Option<String>,
    pub registerable_domain_alive: bool,
    pub alive: bool,
}

impl FqdnResult {
    pub fn null() -> Self {
        Self {
            registerable_domain: None,
            registerable_domain_alive: false,
            alive: false,
        }
    }

    pub fn apex_dead(registerable_domain: String) -> Self {
        Self {
            registerable_domain: Some(registerable_domain),
            registerable_domain_alive: false,
            alive: false,
        }
    }

    pub fn alive(registerable_domain: String) -> Self {
        Self {
            registerable_domain: Some(registerable_domain),
            registerable_domain_alive: true,
            alive: true,
        }
    }

    pub fn apex_alive_fqdn_dead(registerable_domain: String) -> Self {
        Self {
            registerable_domain: Some(registerable_domain),
            registerable_domain_alive: true,
            alive: false,
        }
    }
}

/// DNS record types the probe cascade queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    Ns,
    A,
    Aaaa,
}

impl RecordType {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::Ns => "NS",
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }
}

/// Outcome of a single [`crate::dns_probe::DnsProbe::run`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Confirmed,
    NotConfirmed,
}

impl ProbeOutcome {
    pub fn is_confirmed(self) -> bool {
        matches!(self, ProbeOutcome::Confirmed)
    }
}
