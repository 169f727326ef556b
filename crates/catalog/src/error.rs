//! Error types for catalog operations.
//!
//! Errors are categorized so callers can tell local validation failures
//! (raised before any remote call) from remote lookup misses and transport
//! failures. Nothing in this crate retries; categories exist for reporting.

use std::fmt;
use thiserror::Error;

/// Categories of catalog errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed user input, detected locally
    Validation,
    /// Remote lookup found nothing
    NotFound,
    /// A filter matched more than one entity
    Ambiguous,
    /// Missing or contradictory configuration
    Configuration,
    /// Network or transport failure
    Transport,
    /// Remote side rejected the request
    Server,
}

impl ErrorCategory {
    /// Whether errors of this category are raised before any remote call.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Validation | Self::Configuration)
    }

    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Validation => "Invalid input",
            Self::NotFound => "Entity not found",
            Self::Ambiguous => "Ambiguous match",
            Self::Configuration => "Invalid configuration",
            Self::Transport => "Network connectivity issue",
            Self::Server => "Remote API error",
        }
    }

    /// Get actionable advice for resolving this error category.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Validation => "Fix the highlighted attribute in your configuration",
            Self::NotFound => "Check the id or alias exists in the catalog",
            Self::Ambiguous => "Use a filter field that identifies exactly one entity",
            Self::Configuration => "Set either the id or the alias attribute",
            Self::Transport => "Check your internet connection and try again",
            Self::Server => "Check the API token and the request details",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur during catalog operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed user input detected before any remote call
    #[error("{message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// Remote lookup found no matching entity
    #[error("unable to find {kind} with: {identifier}")]
    NotFound {
        /// Entity kind, e.g. "service"
        kind: String,
        /// What was looked up, e.g. an id, an alias, or `field==value`
        identifier: String,
    },

    /// A filter matched more than one entity
    #[error("found {count} {kind} entries with: {field}=={value}, expected exactly one")]
    AmbiguousMatch {
        /// Entity kind
        kind: String,
        /// Filter field
        field: String,
        /// Filter value
        value: String,
        /// Number of matches
        count: usize,
    },

    /// Missing or contradictory configuration
    #[error("configuration error: {message}")]
    Configuration {
        /// What is wrong with the configuration
        message: String,
    },

    /// Network or transport failure
    #[error("transport error: {message}")]
    Transport {
        /// Underlying failure
        message: String,
    },

    /// Remote API rejected the request
    #[error("server error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Server {
        /// HTTP status, when known
        status: Option<u16>,
        /// Message returned by the API
        message: String,
    },
}

impl Error {
    /// Shorthand for a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a not-found error
    pub fn not_found(kind: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            identifier: identifier.into(),
        }
    }

    /// Shorthand for a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Validation { .. } => ErrorCategory::Validation,
            Error::NotFound { .. } => ErrorCategory::NotFound,
            Error::AmbiguousMatch { .. } => ErrorCategory::Ambiguous,
            Error::Configuration { .. } => ErrorCategory::Configuration,
            Error::Transport { .. } => ErrorCategory::Transport,
            Error::Server { .. } => ErrorCategory::Server,
        }
    }

    /// Whether the remote system reported no such entity.
    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_local() {
        assert!(ErrorCategory::Validation.is_local());
        assert!(ErrorCategory::Configuration.is_local());
        assert!(!ErrorCategory::NotFound.is_local());
        assert!(!ErrorCategory::Transport.is_local());
    }

    #[test]
    fn test_not_found_message() {
        let err = Error::not_found("category", "name==Security");
        assert_eq!(
            err.to_string(),
            "unable to find category with: name==Security"
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_server_message_with_and_without_status() {
        let with = Error::Server {
            status: Some(502),
            message: "bad gateway".into(),
        };
        assert_eq!(with.to_string(), "server error (502): bad gateway");

        let without = Error::Server {
            status: None,
            message: "rejected".into(),
        };
        assert_eq!(without.to_string(), "server error: rejected");
    }

    #[test]
    fn test_ambiguous_message() {
        let err = Error::AmbiguousMatch {
            kind: "filter".into(),
            field: "name".into(),
            value: "Tier 1".into(),
            count: 2,
        };
        assert_eq!(err.category(), ErrorCategory::Ambiguous);
        assert!(err.to_string().contains("found 2 filter entries"));
    }
}
