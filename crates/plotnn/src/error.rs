//! Error types for plotnn operations.
//!
//! [`PlotnnError`] wraps everything that can go wrong between reading a
//! diagram description and writing the last output file.

use std::{io, ops::Range};

use thiserror::Error;

/// The main error type for plotnn operations.
///
/// # Diagnostic Variants
///
/// The `Definition` variant keeps the description source and, when known,
/// the byte span of the offending item, so callers can point at it.
#[derive(Debug, Error)]
pub enum PlotnnError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid diagram description: {message}")]
    Definition {
        message: String,
        span: Option<Range<usize>>,
        src: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(#[from] crate::export::Error),
}

impl PlotnnError {
    /// Create a new `Definition` error with the associated source text.
    pub fn new_definition_error(
        message: impl Into<String>,
        span: Option<Range<usize>>,
        src: impl Into<String>,
    ) -> Self {
        Self::Definition {
            message: message.into(),
            span,
            src: src.into(),
        }
    }
}
