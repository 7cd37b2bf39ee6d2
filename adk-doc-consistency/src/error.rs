//! Error types for the consistency checker

use crate::model::FactKind;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for checker operations
pub type Result<T> = std::result::Result<T, CheckError>;

/// Errors that can occur while loading inputs or evaluating claims
#[derive(Error, Debug)]
pub enum CheckError {
    /// A claim is missing its subject path or fact kind
    #[error("Invalid claim '{claim_id}': {reason}")]
    InvalidClaim { claim_id: String, reason: String },

    /// Two facts disagree about the same subject path and fact kind
    #[error(
        "Invalid reference table: conflicting {kind} facts for '{subject_path}' ('{first}' vs '{second}')"
    )]
    InvalidReferenceTable { subject_path: String, kind: FactKind, first: String, second: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Input file has an extension the loader does not understand
    #[error("Unsupported input format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// A reference source file could not be parsed
    #[error("Failed to parse {}: {message}", path.display())]
    SourceParse { path: PathBuf, message: String },

    /// A batch worker panicked or was cancelled
    #[error("Evaluation task failed: {0}")]
    Task(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl CheckError {
    /// Whether this error comes from malformed claims or reference facts rather
    /// than from the environment.
    pub fn is_fatal_input(&self) -> bool {
        matches!(self, CheckError::InvalidClaim { .. } | CheckError::InvalidReferenceTable { .. })
    }

    pub(crate) fn invalid_claim(claim_id: &str, reason: impl Into<String>) -> Self {
        CheckError::InvalidClaim { claim_id: claim_id.to_string(), reason: reason.into() }
    }
}

impl From<walkdir::Error> for CheckError {
    fn from(err: walkdir::Error) -> Self {
        CheckError::Io(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = CheckError::invalid_claim("c-7", "missing subject path");
        assert_eq!(err.to_string(), "Invalid claim 'c-7': missing subject path");
        assert!(err.is_fatal_input());

        let err = CheckError::InvalidReferenceTable {
            subject_path: "RunConfig.max_llm_calls".to_string(),
            kind: FactKind::DefaultValue,
            first: "500".to_string(),
            second: "1000".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("RunConfig.max_llm_calls"));
        assert!(msg.contains("default-value"));
        assert!(msg.contains("'500' vs '1000'"));
    }

    #[test]
    fn test_io_errors_are_not_input_errors() {
        let err: CheckError = std::io::Error::other("disk gone").into();
        assert!(!err.is_fatal_input());
    }
}
