//! Error types for compile passes.

use thiserror::Error;
use ucss::UcssError;

/// Errors that abort or degrade a compile pass.
///
/// A [`CompileError::Generation`] aborts the pass and keeps the previously
/// written layer in place. A [`CompileError::Cache`] is only ever logged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// The theme stylesheet could not be turned into utilities.
    #[error("utility generation failed: {0}")]
    Generation(#[from] UcssError),

    /// A cache entry could not be stored or decoded.
    #[error("cache error: {0}")]
    Cache(String),
}

pub type Result<T> = std::result::Result<T, CompileError>;
