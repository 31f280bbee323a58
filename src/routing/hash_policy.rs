//! Request affinity hashing.
//!
//! # Responsibilities
//! - Derive a 64-bit affinity key from configured metadata keys
//! - Hand the key to the downstream consistent-hash load balancer
//!
//! # Design Decisions
//! - SHA-256 truncated to 64 bits: fixed and unseeded, so every proxy
//!   replica and every restart computes the same key for the same values
//! - Missing or empty fields are skipped; no present field = no key

use sha2::{Digest, Sha256};

use crate::routing::metadata::Metadata;

/// Metadata keys feeding the affinity hash, in configured order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashPolicy {
    keys: Vec<String>,
}

impl HashPolicy {
    /// Build a policy. Returns `None` when no keys are configured.
    pub fn new(keys: Vec<String>) -> Option<Self> {
        if keys.is_empty() {
            None
        } else {
            Some(Self { keys })
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Affinity key for `metadata`, or `None` if none of the keys is set.
    pub fn generate_hash(&self, metadata: &dyn Metadata) -> Option<u64> {
        let mut hash: Option<u64> = None;
        for key in &self.keys {
            let value = match metadata.get(key) {
                Some(value) if !value.is_empty() => value,
                _ => continue,
            };
            let field = hash_value(value);
            hash = Some(match hash {
                Some(acc) => acc.rotate_left(1) ^ field,
                None => field,
            });
        }

        tracing::trace!(keys = ?self.keys, hash = ?hash, "Computed affinity hash");
        hash
    }
}

/// Stable 64-bit hash of a single value.
pub fn hash_value(value: &str) -> u64 {
    let digest = Sha256::digest(value.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::metadata::MetadataMap;

    #[test]
    fn test_hash_value_is_fixed() {
        // First eight bytes of SHA-256("abc").
        assert_eq!(hash_value("abc"), 0xba78_16bf_8f01_cfea);
    }

    #[test]
    fn test_empty_policy() {
        assert!(HashPolicy::new(Vec::new()).is_none());
    }

    #[test]
    fn test_single_key() {
        let policy = HashPolicy::new(vec!["user".into()]).unwrap();
        let meta = MetadataMap::new().with("user", "abc");
        assert_eq!(policy.generate_hash(&meta), Some(hash_value("abc")));
        assert_eq!(policy.generate_hash(&meta), policy.generate_hash(&meta.clone()));
    }

    #[test]
    fn test_missing_fields_are_skipped() {
        let policy = HashPolicy::new(vec!["session".into(), "user".into()]).unwrap();

        let only_user = MetadataMap::new().with("user", "abc").with("session", "");
        assert_eq!(policy.generate_hash(&only_user), Some(hash_value("abc")));
        assert_eq!(policy.generate_hash(&MetadataMap::new()), None);
    }

    #[test]
    fn test_combines_fields_in_order() {
        let forward = HashPolicy::new(vec!["a".into(), "b".into()]).unwrap();
        let backward = HashPolicy::new(vec!["b".into(), "a".into()]).unwrap();
        let meta = MetadataMap::new().with("a", "x").with("b", "y");

        let expected = hash_value("x").rotate_left(1) ^ hash_value("y");
        assert_eq!(forward.generate_hash(&meta), Some(expected));
        assert_ne!(forward.generate_hash(&meta), backward.generate_hash(&meta));
    }
}
