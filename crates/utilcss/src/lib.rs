//! # utilcss - Utility-class CSS compiler runtime
//!
//! Drives [`ucss`] from a host: scans used classes, fetches the theme,
//! writes the generated layer, caches it by content hash and hands the
//! critical stylesheet over once the layer is in place.
//!
//! ## Modules
//!
//! - [`compiler`]: The compile state machine and its outcomes
//! - [`source`]: Collaborator traits (theme source, class scanner, style sink)
//! - [`cache`]: Cache entries, keys and the bounded in-memory store
//! - [`config`]: Compiler settings
//! - [`testing`]: In-memory collaborators for tests and demos

pub mod cache;
pub mod compiler;
pub mod config;
pub mod error;
mod log_init;
pub mod source;
pub mod testing;

pub use cache::{CacheEntry, CacheStore, MemoryCache};
pub use compiler::{CompileOutcome, Compiler, CompilerState, SkipReason};
pub use config::CompilerConfig;
pub use error::{CompileError, Result};
pub use log_init::{init_logger, init_logger_with_level};
pub use source::{ClassScanner, StyleSink, ThemeSource};

// Re-export the log crate so hosts can use utilcss::log::info!, etc.
pub use log;
pub use ucss;
