// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Error types for the redaction engine

use thiserror::Error;

/// Result alias used throughout the redaction engine
pub type Result<T> = std::result::Result<T, RedactionError>;

/// Reasons a filter label is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedLabel {
    #[error("You must provide a label.")]
    Blank,

    #[error("Unsupported label. Labels must contain only letters and underscores: '{0}'")]
    InvalidCharacters(String),
}

/// Errors raised while configuring or applying filters
///
/// All variants are deterministic caller or configuration mistakes, so none
/// of them are worth retrying.
#[derive(Debug, Error)]
pub enum RedactionError {
    #[error(transparent)]
    MalformedLabel(#[from] MalformedLabel),

    #[error("Unrecognized filter key '{key}'. Expected one of: {expected}")]
    InvalidFilterKey { key: String, expected: String },

    #[error("Unsupported filter. Expected a regex or ner filter, but got '{0}'")]
    UnsupportedFilter(String),

    #[error("Failed to compile pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Entity model failed: {0}")]
    Model(String),
}

impl RedactionError {
    /// Stable name of the error kind, used when surfacing errors across FFI
    pub fn kind(&self) -> &'static str {
        match self {
            RedactionError::MalformedLabel(_) => "malformed_label",
            RedactionError::InvalidFilterKey { .. } => "invalid_filter_key",
            RedactionError::UnsupportedFilter(_) => "unsupported_filter",
            RedactionError::InvalidPattern { .. } => "invalid_pattern",
            RedactionError::InvalidConfig(_) | RedactionError::Json(_) => "invalid_config",
            RedactionError::Model(_) => "model",
        }
    }
}
