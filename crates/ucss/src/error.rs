//! Error types for theme extraction and utility generation.
//!
//! Token parsing never fails (unknown variants are dropped and reported on the
//! token), so the only errors surfaced here come from reading the hand-authored
//! part of the theme stylesheet.

use thiserror::Error;

/// Errors that can occur while extracting utilities from a theme stylesheet.
///
/// # Examples
///
/// ```rust
/// use ucss::parser::extract_custom_utilities;
///
/// // Missing closing brace on the utility block
/// let result = extract_custom_utilities(".card { padding: 1rem;");
/// assert!(result.is_err());
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UcssError {
    /// Invalid CSS syntax was encountered while reading custom utilities.
    ///
    /// The string contains details about what was unexpected and where.
    #[error("CSS syntax error: {0}")]
    InvalidSyntax(String),

    /// A `{` block was opened but never closed.
    ///
    /// Carries the (truncated) prelude of the block that was left open.
    #[error("unbalanced block after `{0}`")]
    UnbalancedBlock(String),
}
