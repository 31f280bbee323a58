//! Route construction errors.

use thiserror::Error;

use crate::config::ValidationError;

/// Errors raised while building routes from configuration.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The rule failed semantic validation.
    #[error("invalid route {route} (rule {index}): {}", join_errors(.errors))]
    InvalidRule {
        index: usize,
        route: String,
        errors: Vec<ValidationError>,
    },

    /// A match condition's regex did not compile.
    #[error("route {route}: failed to compile regex for `{name}`: {source}")]
    Regex {
        route: String,
        name: String,
        #[source]
        source: regex::Error,
    },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
