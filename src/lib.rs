//! Utility-class stylesheet compiler.
//!
//! This facade re-exports the pure compiler core ([`ucss`]) and its runtime
//! ([`utilcss`]). Most hosts only need the runtime types re-exported here:
//!
//! ```
//! use utilcss_rs::testing::{MemoryScanner, MemorySink, MemoryTheme};
//! use utilcss_rs::{Compiler, CompilerConfig};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let sink = MemorySink::new();
//! let compiler = Compiler::new(
//!     CompilerConfig::default().with_layer_name("app"),
//!     MemoryTheme::new(".flex { display: flex; }"),
//!     MemoryScanner::new(["sm:flex"]),
//!     sink.clone(),
//! );
//! compiler.compile().await;
//!
//! assert_eq!(
//!     sink.layer().unwrap(),
//!     "@layer app {\n@media (min-width: 640px) { .sm\\:flex { display: flex; } }\n}"
//! );
//! # });
//! ```

use std::collections::BTreeSet;

pub use ucss;
pub use utilcss::{
    CacheEntry, CacheStore, ClassScanner, CompileError, CompileOutcome, Compiler, CompilerConfig,
    CompilerState, MemoryCache, SkipReason, StyleSink, ThemeSource, cache, init_logger, log,
    testing,
};

/// Compiles `classes` against `theme` in one shot, without caching or a
/// critical-CSS handoff.
///
/// # Example
///
/// ```
/// let css = utilcss_rs::compile_once(
///     ":root { --spacing-4: 1rem; }",
///     ["p-4", "hover:p-4"],
///     &utilcss_rs::CompilerConfig::default(),
/// )
/// .unwrap();
///
/// assert!(css.contains(r".hover\:p-4:hover { padding: var(--spacing-4); }"));
/// ```
pub fn compile_once<I, S>(
    theme: &str,
    classes: I,
    config: &CompilerConfig,
) -> Result<String, CompileError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let classes: BTreeSet<String> = classes.into_iter().map(Into::into).collect();
    let index = ucss::ThemeIndex::build(theme, config.color_utilities)?;
    let (css, report) = index.render(&classes, &config.layer_name);
    if !report.unresolved.is_empty() {
        log::debug!("no utility for: {}", report.unresolved.join(", "));
    }
    Ok(css)
}
