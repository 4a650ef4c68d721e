//! IDN → A-label normalization (spec §6 collaborator 2). Pure computation,
//! so — like [`crate::apex_extractor`] — the default implementation is
//! always compiled in rather than feature-gated.

/// Normalizes a domain to its ASCII-compatible (A-label) form, e.g.
/// `bücher.example` -> `xn--bcher-kva.example`. ASCII input that is already
/// in A-label (or plain ASCII) form passes through unchanged.
pub trait IdnNormalizer: Send + Sync {
    fn to_a_label(&self, input: &str) -> Option<String>;
}

/// Default [`IdnNormalizer`], backed by the `idna` crate (sourced from the
/// wider retrieval pack — the teacher has no IDN story of its own).
#[derive(Debug, Default)]
pub struct IdnaNormalizer;

impl IdnNormalizer for IdnaNormalizer {
    fn to_a_label(&self, input: &str) -> Option<String> {
        idna::domain_to_ascii(input.trim()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_input_passes_through_lowercased() {
        let normalizer = IdnaNormalizer;
        assert_eq!(
            normalizer.to_a_label("Example.COM"),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn unicode_input_becomes_a_label() {
        let normalizer = IdnaNormalizer;
        let result = normalizer.to_a_label("bücher.example").unwrap();
        assert!(result.starts_with("xn--"));
        assert!(result.ends_with(".example"));
    }
}
