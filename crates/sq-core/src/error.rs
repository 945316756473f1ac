//! Configuration errors shared by the workspace.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `sq-core`.
pub type CoreResult<T> = Result<T, CoreError>;
