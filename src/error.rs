//! Error types for the instrumentation layer
//!
//! The capture pipeline itself is best-effort and never surfaces errors:
//! malformed payloads are dropped, a torn-down engine yields "no data", and
//! capacity overflow is handled by eviction. Errors exist only on the
//! host-facing seams: ad-hoc script execution and snapshot decoding.

use thiserror::Error;

/// Errors surfaced by the debugger's host-facing operations
#[derive(Error, Debug)]
pub enum DebuggerError {
    /// The web view engine behind the debugger has been torn down
    #[error("web view engine is no longer available")]
    EngineGone,

    /// The requested feature is switched off in the active configuration
    #[error("feature disabled by configuration: {0}")]
    FeatureDisabled(&'static str),

    /// The engine reported a script evaluation failure
    #[error("script evaluation failed: {0}")]
    ScriptFailed(String),

    /// The engine returned a value of an unexpected shape
    #[error("unexpected script result: {0}")]
    UnexpectedResult(String),

    /// A snapshot payload could not be decoded
    #[error("failed to decode snapshot payload: {0}")]
    DecodeFailed(#[from] serde_json::Error),
}

/// Result type for debugger operations
pub type Result<T> = std::result::Result<T, DebuggerError>;

impl DebuggerError {
    /// Stable error code for logging and metrics
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EngineGone => "ENGINE_GONE",
            Self::FeatureDisabled(_) => "FEATURE_DISABLED",
            Self::ScriptFailed(_) => "SCRIPT_FAILED",
            Self::UnexpectedResult(_) => "UNEXPECTED_RESULT",
            Self::DecodeFailed(_) => "DECODE_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(DebuggerError::EngineGone.error_code(), "ENGINE_GONE");
        assert_eq!(
            DebuggerError::FeatureDisabled("dom_inspection").error_code(),
            "FEATURE_DISABLED"
        );
        assert_eq!(
            DebuggerError::ScriptFailed("boom".to_string()).error_code(),
            "SCRIPT_FAILED"
        );
    }

    #[test]
    fn test_error_display() {
        let err = DebuggerError::FeatureDisabled("storage_inspection");
        assert_eq!(
            err.to_string(),
            "feature disabled by configuration: storage_inspection"
        );
    }
}
