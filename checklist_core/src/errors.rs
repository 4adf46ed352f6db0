//! # Error Types
//!
//! Structured error types for checklist_core. Every API call, workflow and
//! local validation reports failures through [`ChecklistError`], so the GUI
//! can decide per error class whether to roll back, alert, or only log.
//!
//! ## Example
//!
//! ```rust
//! use checklist_core::errors::{ChecklistError, ChecklistResult};
//!
//! fn parse_due_date(raw: &str) -> ChecklistResult<chrono::NaiveDate> {
//!     chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
//!         ChecklistError::invalid_input("due_date", raw, e.to_string())
//!     })
//! }
//!
//! assert!(parse_due_date("2026-13-40").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for checklist_core operations
pub type ChecklistResult<T> = Result<T, ChecklistError>;

/// Structured error type for checklist operations.
///
/// `endpoint` fields hold the endpoint's display form (e.g.
/// `POST /documents/{id}/complete`) so log lines point at the failing call.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum ChecklistError {
    /// The request never produced a response (DNS, connection, TLS, ...)
    #[error("Network error calling {endpoint}: {reason}")]
    Network { endpoint: String, reason: String },

    /// The server answered with a non-2xx status
    #[error("{endpoint} returned HTTP {status}: {body}")]
    HttpStatus {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The server answered `{"success": false}`
    #[error("{endpoint} was rejected by the server{}", .reason.as_deref().map(|r| format!(": {r}")).unwrap_or_default())]
    Rejected {
        endpoint: String,
        reason: Option<String>,
    },

    /// The response body was not the expected JSON shape
    #[error("Could not decode response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    /// A successful query envelope carried no `data`
    #[error("{endpoint} returned no data")]
    MissingData { endpoint: String },

    /// A user-supplied value is invalid (e.g. a malformed due date)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A referenced item is not known to the client or backend
    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    /// Configuration could not be loaded or validated
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

impl ChecklistError {
    /// Create a Network error
    pub fn network(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        ChecklistError::Network {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Create an HttpStatus error
    pub fn http_status(endpoint: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        ChecklistError::HttpStatus {
            endpoint: endpoint.into(),
            status,
            body: body.into(),
        }
    }

    /// Create a Rejected error
    pub fn rejected(endpoint: impl Into<String>, reason: Option<String>) -> Self {
        ChecklistError::Rejected {
            endpoint: endpoint.into(),
            reason,
        }
    }

    /// Create a Decode error
    pub fn decode(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        ChecklistError::Decode {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingData error
    pub fn missing_data(endpoint: impl Into<String>) -> Self {
        ChecklistError::MissingData {
            endpoint: endpoint.into(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        ChecklistError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a NotFound error
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        ChecklistError::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Create a Config error
    pub fn config(reason: impl Into<String>) -> Self {
        ChecklistError::Config {
            reason: reason.into(),
        }
    }

    /// True when the failure happened on the way to or from the server,
    /// as opposed to a local validation problem.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            ChecklistError::Network { .. }
                | ChecklistError::HttpStatus { .. }
                | ChecklistError::Rejected { .. }
                | ChecklistError::Decode { .. }
                | ChecklistError::MissingData { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ChecklistError::Network { .. } => "NETWORK",
            ChecklistError::HttpStatus { .. } => "HTTP_STATUS",
            ChecklistError::Rejected { .. } => "REJECTED",
            ChecklistError::Decode { .. } => "DECODE",
            ChecklistError::MissingData { .. } => "MISSING_DATA",
            ChecklistError::InvalidInput { .. } => "INVALID_INPUT",
            ChecklistError::NotFound { .. } => "NOT_FOUND",
            ChecklistError::Config { .. } => "CONFIG",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = ChecklistError::rejected("POST /reset/titre_sejour", Some("locked".to_string()));
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"Rejected\""));
        let roundtrip: ChecklistError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_rejected_display_with_and_without_reason() {
        let with = ChecklistError::rejected("GET /profiles", Some("boom".to_string()));
        assert_eq!(with.to_string(), "GET /profiles was rejected by the server: boom");

        let without = ChecklistError::rejected("GET /profiles", None);
        assert_eq!(without.to_string(), "GET /profiles was rejected by the server");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ChecklistError::network("GET /metadata", "refused").error_code(), "NETWORK");
        assert_eq!(ChecklistError::not_found("document", "cr_passport").error_code(), "NOT_FOUND");
        assert_eq!(ChecklistError::config("bad url").error_code(), "CONFIG");
    }

    #[test]
    fn test_is_remote() {
        assert!(ChecklistError::http_status("GET /categories", 500, "").is_remote());
        assert!(!ChecklistError::invalid_input("due_date", "x", "bad").is_remote());
    }
}
