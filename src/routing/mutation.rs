//! Request/response field mutations attached to a route.

use std::collections::HashMap;

use crate::config::KeyValueConfig;

/// Mutable key/value set the caller applies to a request or response.
pub type Mutation = HashMap<String, String>;

/// One configured key/value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationEntry {
    key: String,
    value: String,
}

impl MutationEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl From<&KeyValueConfig> for MutationEntry {
    fn from(config: &KeyValueConfig) -> Self {
        Self::new(config.key.clone(), config.value.clone())
    }
}

/// Write `entries` into `target` in order; later entries overwrite earlier ones.
pub fn apply_mutations(entries: &[MutationEntry], target: &mut Mutation) {
    for entry in entries {
        target.insert(entry.key.clone(), entry.value.clone());
    }
}
