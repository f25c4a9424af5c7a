//! Core error types for rillc-util.
//!
//! These are *fatal-path* errors, distinct from user-facing diagnostics:
//! a [`LiteralError`] surfaces malformed literal lexemes to the parser,
//! which converts it into a diagnostic at the offending span.

use thiserror::Error;

/// Error produced while decoding a numeric literal lexeme into a value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LiteralError {
    /// The digits do not fit a signed 64-bit integer
    #[error("integer literal out of range: {0}")]
    IntOutOfRange(Box<str>),

    /// The lexeme contains characters the decoder does not accept
    #[error("malformed numeric literal: {0}")]
    Malformed(Box<str>),
}

/// Result type alias for literal decoding.
pub type LiteralResult<T> = std::result::Result<T, LiteralError>;
