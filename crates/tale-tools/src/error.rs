//! Boundary errors
//!
//! Only request-shape problems surface as [`ToolError`]. Validation failures
//! are ordinary results.

use thiserror::Error;

/// Request rejected before any validation ran
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// No operation with this name
    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    /// Required argument absent or of the wrong kind
    #[error("invalid request for '{tool}': {reason}")]
    InvalidRequest {
        /// Tool that was called
        tool: &'static str,
        /// What was wrong with the arguments
        reason: String,
    },
}

impl ToolError {
    /// Stable kind used in protocol error responses
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnknownTool(_) => "unknown_tool",
            Self::InvalidRequest { .. } => "invalid_request",
        }
    }
}

/// Result alias for boundary operations
pub type ToolResult<T> = Result<T, ToolError>;
