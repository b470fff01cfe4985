//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`, so configuration problems surface unchanged at the
//! facade.

use thiserror::Error;

/// Errors produced by `tw-core`.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid probability weights: {0}")]
    Weights(String),
}

/// Shorthand result type for `tw-core`.
pub type CoreResult<T> = Result<T, CoreError>;
