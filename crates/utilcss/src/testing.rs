//! In-memory collaborators for driving a [`Compiler`](crate::Compiler) in tests.
//!
//! Each double is a cheap handle around shared state: hand one clone to the
//! compiler and keep another to change inputs or inspect what was written.
//!
//! # Example
//!
//! ```
//! use utilcss::testing::{MemoryScanner, MemorySink, MemoryTheme};
//! use utilcss::{Compiler, CompilerConfig};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let scanner = MemoryScanner::new(["p-4"]);
//! let sink = MemorySink::with_critical(".p-4 { padding: 16px; }\n.hero { height: 50vh; }");
//! let compiler = Compiler::new(
//!     CompilerConfig::default(),
//!     MemoryTheme::new(":root { --spacing-4: 1rem; }"),
//!     scanner.clone(),
//!     sink.clone(),
//! );
//!
//! compiler.compile().await;
//! assert_eq!(sink.critical_history(), vec![".hero { height: 50vh; }".to_string()]);
//! assert_eq!(sink.critical_css(), None);
//! # });
//! ```

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::cache::{CacheEntry, CacheStore};
use crate::error::Result;
use crate::source::{ClassScanner, StyleSink, ThemeSource};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Theme text that can be swapped or withdrawn between passes.
#[derive(Debug, Clone, Default)]
pub struct MemoryTheme {
    text: Arc<Mutex<Option<String>>>,
    fetches: Arc<Mutex<usize>>,
}

impl MemoryTheme {
    pub fn new(text: impl Into<String>) -> Self {
        let theme = Self::default();
        theme.set(text);
        theme
    }

    /// A source whose fetches fail until [`MemoryTheme::set`] is called.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn set(&self, text: impl Into<String>) {
        *lock(&self.text) = Some(text.into());
    }

    pub fn clear(&self) {
        *lock(&self.text) = None;
    }

    pub fn fetch_count(&self) -> usize {
        *lock(&self.fetches)
    }
}

#[async_trait]
impl ThemeSource for MemoryTheme {
    async fn fetch(&self) -> Option<String> {
        *lock(&self.fetches) += 1;
        lock(&self.text).clone()
    }
}

#[derive(Debug, Default)]
struct ScannerState {
    static_classes: BTreeSet<String>,
    dynamic: BTreeSet<String>,
    scans: usize,
}

/// A fixed static class set plus tokens reported later via [`MemoryScanner::observe`].
#[derive(Debug, Clone, Default)]
pub struct MemoryScanner {
    state: Arc<Mutex<ScannerState>>,
}

impl MemoryScanner {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let scanner = Self::default();
        lock(&scanner.state).static_classes = classes.into_iter().map(Into::into).collect();
        scanner
    }

    pub fn observe(&self, token: impl Into<String>) {
        lock(&self.state).dynamic.insert(token.into());
    }

    pub fn scan_count(&self) -> usize {
        lock(&self.state).scans
    }
}

impl ClassScanner for MemoryScanner {
    fn scan_static(&mut self) -> BTreeSet<String> {
        let mut state = lock(&self.state);
        state.scans += 1;
        state.static_classes.clone()
    }

    fn dynamic(&self) -> BTreeSet<String> {
        lock(&self.state).dynamic.clone()
    }
}

#[derive(Debug, Default)]
struct SinkState {
    layer: Option<String>,
    writes: usize,
    critical: Option<String>,
    critical_history: Vec<String>,
    frames: usize,
}

/// Records the written layer and plays the critical stylesheet.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    state: Arc<Mutex<SinkState>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink with a critical stylesheet installed.
    pub fn with_critical(css: impl Into<String>) -> Self {
        let sink = Self::default();
        lock(&sink.state).critical = Some(css.into());
        sink
    }

    pub fn layer(&self) -> Option<String> {
        lock(&self.state).layer.clone()
    }

    pub fn write_count(&self) -> usize {
        lock(&self.state).writes
    }

    pub fn critical_css(&self) -> Option<String> {
        lock(&self.state).critical.clone()
    }

    /// Every critical replacement, oldest first.
    pub fn critical_history(&self) -> Vec<String> {
        lock(&self.state).critical_history.clone()
    }

    pub fn frame_count(&self) -> usize {
        lock(&self.state).frames
    }
}

#[async_trait]
impl StyleSink for MemorySink {
    fn write_layer(&mut self, css: &str) {
        let mut state = lock(&self.state);
        state.layer = Some(css.to_string());
        state.writes += 1;
    }

    fn critical(&self) -> Option<String> {
        lock(&self.state).critical.clone()
    }

    fn replace_critical(&mut self, css: &str) {
        let mut state = lock(&self.state);
        state.critical = Some(css.to_string());
        state.critical_history.push(css.to_string());
    }

    fn retract_critical(&mut self) {
        lock(&self.state).critical = None;
    }

    async fn next_frame(&self) {
        lock(&self.state).frames += 1;
        tokio::task::yield_now().await;
    }
}

/// A cache store several compilers can share.
#[derive(Debug)]
pub struct SharedCache<C> {
    inner: Arc<Mutex<C>>,
}

impl<C> Clone for SharedCache<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: CacheStore> SharedCache<C> {
    pub fn new(cache: C) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }
}

impl<C: CacheStore> CacheStore for SharedCache<C> {
    fn get(&mut self, key: &str) -> Option<CacheEntry> {
        lock(&self.inner).get(key)
    }

    fn put(&mut self, entry: CacheEntry) -> Result<()> {
        lock(&self.inner).put(entry)
    }
}
