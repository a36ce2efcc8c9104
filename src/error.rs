// src/error.rs

use thiserror::Error;

/// Failures of the one-off configuration/validation layer.
///
/// Field kernels themselves never fail; everything they rely on is checked
/// here before a run starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown {kind} representation tag {tag}")]
    UnknownTag { kind: &'static str, tag: u8 },

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("inconsistent system data: {0}")]
    Inconsistent(String),
}

impl ConfigError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
