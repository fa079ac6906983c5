//! # Error Handling
//!
//! Error types for rusthydra operations. Attack execution itself never
//! returns these to the caller (every failure becomes a terminal
//! [`AttackResult`](crate::models::AttackResult)); they cover the fallible
//! edges around it: configuration, validation of CLI input, result
//! persistence and logging setup.
//!
//! ## Example
//!
//! ```rust
//! use rusthydra::error::{HydraError, Result};
//!
//! fn validate_tasks(tasks: u32) -> Result<u32> {
//!     if tasks == 0 {
//!         return Err(HydraError::validation("Task count must be greater than 0"));
//!     }
//!     Ok(tasks)
//! }
//!
//! assert!(validate_tasks(0).is_err());
//! ```

use std::io;

/// Error conditions raised around attack execution
#[derive(Debug, thiserror::Error)]
pub enum HydraError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("External tool error: {tool} failed with {message}")]
    ExternalTool { tool: String, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Timeout error: operation timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },
}

impl HydraError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new external tool error
    pub fn external_tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalTool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new parsing error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a new timeout error
    pub fn timeout(duration_ms: u64) -> Self {
        Self::Timeout { duration_ms }
    }
}

/// Result type alias for rusthydra operations
pub type Result<T> = std::result::Result<T, HydraError>;
