//! The duck-typed WHOIS/RDAP response tree and the dead-phrase filter
//! (spec §4.4 step 7, §9 "Duck-typed WHOIS object").
//!
//! Rather than model the external client's native JSON/dictionary shape
//! directly, the core consumes a small tagged value type: scalar, array, or
//! nested node. Nodes may carry a `__raw` string field holding the raw text
//! of one (possibly referred) WHOIS response. Arrays are never descended
//! into — their contents (`Name Server`, `Domain Status`, free-form `text`
//! fields) are already reflected in the node's own `__raw`.

use std::collections::HashMap;

/// One node (or leaf) of a WHOIS/RDAP response tree.
#[derive(Debug, Clone, PartialEq)]
pub enum WhoisValue {
    Scalar(String),
    Array(Vec<WhoisValue>),
    Node(HashMap<String, WhoisValue>),
}

impl WhoisValue {
    pub fn node() -> HashMap<String, WhoisValue> {
        HashMap::new()
    }

    fn as_node(&self) -> Option<&HashMap<String, WhoisValue>> {
        match self {
            WhoisValue::Node(map) => Some(map),
            _ => None,
        }
    }

    fn raw(&self) -> Option<&str> {
        self.as_node()
            .and_then(|map| map.get("__raw"))
            .and_then(|v| match v {
                WhoisValue::Scalar(s) => Some(s.as_str()),
                _ => None,
            })
    }
}

/// The canonical case-insensitive substring set whose presence in raw WHOIS
/// text indicates the domain is unregistered (spec §4.4 "Dead-phrase
/// filter"). Leading/trailing spaces on a couple of entries are
/// significant — they prevent false positives inside longer words (e.g.
/// "is free" inside some unrelated phrase).
const DEAD_PHRASES: &[&str] = &[
    "no match for",
    "does not exist",
    "not found",
    "no found",
    "no entries",
    "no data found",
    "is available for registration",
    "currently available for application",
    "no matching record",
    "no information available about domain name",
    "not been registered",
    "no match!!",
    "status: available",
    " is free",
    "no object found",
    "nothing found",
    "status: free",
    " has been blocked by ",
];

/// Tests one line (already lowercased) against the dead-phrase filter.
fn line_is_dead(line: &str) -> bool {
    DEAD_PHRASES.iter().any(|phrase| line.contains(phrase))
}

/// Lowercases `raw`, normalizes runs of tabs/spaces to a single space,
/// splits on LF/CRLF, and reports whether any resulting line matches the
/// dead-phrase filter.
fn raw_text_is_dead(raw: &str) -> bool {
    let lowered = raw.to_lowercase();
    lowered.lines().any(|line| {
        let normalized = normalize_whitespace(line);
        line_is_dead(&normalized)
    })
}

fn normalize_whitespace(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut last_was_space = false;
    for ch in line.chars() {
        if ch == '\t' || ch == ' ' {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(ch);
            last_was_space = false;
        }
    }
    out
}

/// Reports whether a dead phrase appears in this node's own `__raw` field
/// or in any nested node's `__raw` field, at any depth. A dead phrase
/// anywhere in the tree (e.g. inside a followed referral) taints the whole
/// response, regardless of how clean the outer node's own text looks.
fn contains_dead_phrase(value: &WhoisValue) -> bool {
    let Some(map) = value.as_node() else {
        return false;
    };

    if let Some(raw) = value.raw() {
        if raw_text_is_dead(raw) {
            return true;
        }
    }

    map.values()
        .any(|nested| matches!(nested, WhoisValue::Node(_)) && contains_dead_phrase(nested))
}

/// Reports whether this node or any nested node carries at least one own
/// key, i.e. structured evidence the response said something at all.
fn has_positive_evidence(value: &WhoisValue) -> bool {
    let Some(map) = value.as_node() else {
        return false;
    };

    if !map.is_empty() {
        return true;
    }

    map.values()
        .any(|nested| matches!(nested, WhoisValue::Node(_)) && has_positive_evidence(nested))
}

/// Recursive raw-text scan. Returns `true` iff the WHOIS tree carries
/// positive evidence of registration: at least one own key somewhere in
/// the tree, and no dead phrase anywhere in any `__raw` field at any
/// depth, including inside followed referrals.
pub fn scan(value: &WhoisValue) -> bool {
    if contains_dead_phrase(value) {
        return false;
    }

    has_positive_evidence(value)
}
