//! Metadata match conditions.
//!
//! # Responsibilities
//! - Evaluate one configured condition against one metadata key
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - Regexes are compiled once at construction and must match the whole value
//! - Evaluation is total: a value that cannot be interpreted (e.g. a
//!   non-integer under a range condition) is a non-match, never an error
//! - Empty condition list = always matches (wildcard)

use regex::Regex;

use crate::config::HeaderMatchConfig;
use crate::routing::metadata::Metadata;

/// Trait for matching request metadata against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the metadata satisfies this condition.
    fn matches(&self, metadata: &dyn Metadata) -> bool;
}

/// How a single metadata value is compared.
#[derive(Debug, Clone)]
pub enum HeaderMatchKind {
    /// Exact equality. An empty expected value accepts any value.
    Value(String),
    /// Whole-value regular expression.
    Regex(Regex),
    /// Integer value within `[start, end)`.
    Range { start: i64, end: i64 },
    /// Key presence (`true`) or absence (`false`).
    Present(bool),
    Prefix(String),
    Suffix(String),
    Contains(String),
}

/// Matches one metadata key.
#[derive(Debug, Clone)]
pub struct HeaderMatcher {
    name: String,
    kind: HeaderMatchKind,
    invert: bool,
}

/// Compile `pattern` so that it must match the whole value.
pub fn full_match_regex(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", pattern))
}

impl HeaderMatcher {
    pub fn new(name: impl Into<String>, kind: HeaderMatchKind) -> Self {
        Self {
            name: name.into(),
            kind,
            invert: false,
        }
    }

    /// Negate the outcome for present keys.
    pub fn inverted(mut self) -> Self {
        self.invert = true;
        self
    }

    /// Build a matcher from its configuration.
    ///
    /// Fails only if the configured regex does not compile.
    pub fn from_config(config: &HeaderMatchConfig) -> Result<Self, regex::Error> {
        let kind = if let Some(value) = &config.exact {
            HeaderMatchKind::Value(value.clone())
        } else if let Some(pattern) = &config.regex {
            HeaderMatchKind::Regex(full_match_regex(pattern)?)
        } else if let Some(range) = config.range {
            HeaderMatchKind::Range {
                start: range.start,
                end: range.end,
            }
        } else if let Some(present) = config.present {
            HeaderMatchKind::Present(present)
        } else if let Some(prefix) = &config.prefix {
            HeaderMatchKind::Prefix(prefix.clone())
        } else if let Some(suffix) = &config.suffix {
            HeaderMatchKind::Suffix(suffix.clone())
        } else if let Some(contains) = &config.contains {
            HeaderMatchKind::Contains(contains.clone())
        } else {
            HeaderMatchKind::Value(String::new())
        };

        Ok(Self {
            name: config.name.clone(),
            kind,
            invert: config.invert,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &HeaderMatchKind {
        &self.kind
    }

    pub fn is_inverted(&self) -> bool {
        self.invert
    }
}

impl Matcher for HeaderMatcher {
    fn matches(&self, metadata: &dyn Metadata) -> bool {
        let value = match metadata.get(&self.name) {
            Some(value) => value,
            // An absent key only satisfies presence checks; inversion applies there too.
            None => {
                return match self.kind {
                    HeaderMatchKind::Present(expected) => !expected != self.invert,
                    _ => false,
                }
            }
        };

        let matched = match &self.kind {
            HeaderMatchKind::Value(expected) => expected.is_empty() || value == expected,
            HeaderMatchKind::Regex(regex) => regex.is_match(value),
            HeaderMatchKind::Range { start, end } => value
                .parse::<i64>()
                .map(|v| v >= *start && v < *end)
                .unwrap_or(false),
            HeaderMatchKind::Present(expected) => *expected,
            HeaderMatchKind::Prefix(prefix) => value.starts_with(prefix.as_str()),
            HeaderMatchKind::Suffix(suffix) => value.ends_with(suffix.as_str()),
            HeaderMatchKind::Contains(needle) => value.contains(needle.as_str()),
        };

        matched != self.invert
    }
}

/// Combines multiple matchers with AND semantics.
#[derive(Debug, Default)]
pub struct AndMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AndMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Matcher> {
        self.matchers.iter().map(|m| m.as_ref())
    }
}

impl Matcher for AndMatcher {
    fn matches(&self, metadata: &dyn Metadata) -> bool {
        // All matchers must pass (AND)
        self.matchers.iter().all(|m| m.matches(metadata))
    }
}
