//! Signature hashing for change detection
//!
//! The digest covers the canonical signature text only, so body edits never
//! change it. Not used for anything security-related.

use crate::ordered::OrderedMap;
use sha2::{Digest, Sha256};

/// Number of hex characters kept from the SHA-256 digest
pub const HASH_LEN: usize = 8;

/// Canonical form: `name(param: type, ...): returnType`
pub fn canonical_signature(
    name: &str,
    parameters: &OrderedMap<String>,
    return_type: &str,
) -> String {
    let params: Vec<String> = parameters
        .iter()
        .map(|(k, v)| format!("{}: {}", k, v))
        .collect();
    format!("{}({}): {}", name, params.join(", "), return_type)
}

/// First eight lowercase hex characters of SHA-256 over the canonical signature
pub fn signature_hash(name: &str, parameters: &OrderedMap<String>, return_type: &str) -> String {
    let digest = Sha256::digest(canonical_signature(name, parameters, return_type).as_bytes());
    let hex = format!("{:x}", digest);
    hex[..HASH_LEN].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> OrderedMap<String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_canonical_signature_format() {
        let p = params(&[("a", "number"), ("b", "number")]);
        assert_eq!(
            canonical_signature("add", &p, "number"),
            "add(a: number, b: number): number"
        );
        assert_eq!(canonical_signature("noop", &OrderedMap::new(), "any"), "noop(): any");
    }

    #[test]
    fn test_hash_is_deterministic_and_short() {
        let p = params(&[("a", "number"), ("b", "number")]);
        let first = signature_hash("add", &p, "number");
        let second = signature_hash("add", &p, "number");
        assert_eq!(first, second);
        assert_eq!(first.len(), HASH_LEN);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_hash_matches_sha256_prefix() {
        // sha256("noop(): any")
        let expected = format!("{:x}", Sha256::digest(b"noop(): any"));
        assert_eq!(signature_hash("noop", &OrderedMap::new(), "any"), &expected[..8]);
    }

    #[test]
    fn test_signature_edits_change_hash() {
        let two = params(&[("a", "number"), ("b", "number")]);
        let three = params(&[("a", "number"), ("b", "number"), ("c", "number")]);
        let retyped = params(&[("a", "number"), ("b", "string")]);
        let base = signature_hash("add", &two, "number");

        assert_ne!(base, signature_hash("add", &three, "number"));
        assert_ne!(base, signature_hash("add", &retyped, "number"));
        assert_ne!(base, signature_hash("add", &two, "string"));
    }
}
