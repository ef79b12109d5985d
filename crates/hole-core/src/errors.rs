//! Cross-cutting error types for the hole workspace.
//!
//! This module defines errors raised while building or parsing model values.
//! Store-level failures (`StoreError`) live in `hole-store`, which converts
//! these into its own taxonomy.

use thiserror::Error;

/// Errors that can be raised by model construction and parsing.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An image or audio kind was built without a usable URL, or a raw kind
    /// tag is not one of `text`, `image`, `audio`.
    #[error("Invalid content kind '{kind}': {reason}")]
    InvalidContentKind { kind: String, reason: String },

    /// A snapshot marker string could not be parsed.
    #[error("Invalid snapshot marker '{0}'")]
    InvalidMarker(String),

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
