//! The closed error taxonomy shared by every fallible operation in the core.
//!
//! Every one-shot API call, config validation and stream failure resolves to
//! a value or exactly one [`ApiError`] variant. There is no open-ended
//! "unknown" bucket: unrecognized failures fold into [`ApiError::Network`]
//! with a best-effort message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Path of the offending field (e.g. `"question"`, `"participants"`).
    pub path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Classified failure variants for the debate client core.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApiError {
    /// Connection-level failure: no HTTP status was ever received.
    #[error("network error: {message}")]
    Network {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        cause: Option<String>,
    },

    /// The request was understood but rejected (4xx other than auth/404/409/429).
    #[error("validation failed: {}", format_issues(issues))]
    Validation { issues: Vec<ValidationIssue> },

    /// Authentication or authorization failure (401 or 403).
    #[error("auth error ({status_code}): {message}")]
    Auth { message: String, status_code: u16 },

    /// Too many requests; retry after the given delay.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimit { retry_after_ms: u64 },

    /// The addressed resource does not exist.
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// The request conflicts with current server state (409).
    #[error("conflict: {message}")]
    Conflict {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        conflicting_resource: Option<String>,
    },

    /// The server failed (5xx).
    #[error("server error ({status_code}): {message}")]
    Server { status_code: u16, message: String },
}

impl ApiError {
    /// Connection-level failure without an underlying cause.
    pub fn network(message: impl Into<String>) -> Self {
        ApiError::Network {
            message: message.into(),
            cause: None,
        }
    }

    /// Connection-level failure wrapping an underlying error.
    pub fn network_caused_by(
        message: impl Into<String>,
        cause: &(dyn std::error::Error + 'static),
    ) -> Self {
        ApiError::Network {
            message: message.into(),
            cause: Some(cause.to_string()),
        }
    }

    /// Validation failure with a single synthesized issue.
    pub fn validation(path: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Validation {
            issues: vec![ValidationIssue::new(path, message)],
        }
    }

    /// True for failures a caller may reasonably retry on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::Network { .. } | ApiError::RateLimit { .. } | ApiError::Server { .. }
        )
    }
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    if issues.is_empty() {
        return "no issues reported".to_string();
    }
    issues
        .iter()
        .map(|i| format!("{}: {}", i.path, i.message))
        .collect::<Vec<_>>()
        .join("; ")
}
