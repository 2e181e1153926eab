//! The collaborators a [`Compiler`](crate::Compiler) drives.
//!
//! How the theme is fetched, how classes are discovered and where the layer
//! ends up are the host's business; the compiler only sees these traits.

use std::collections::BTreeSet;

use async_trait::async_trait;

/// Supplies the theme stylesheet text.
#[async_trait]
pub trait ThemeSource: Send + Sync {
    /// Fetches the current theme. `None` (or empty text) skips the pass.
    async fn fetch(&self) -> Option<String>;
}

/// Reports which utility tokens are in use.
pub trait ClassScanner: Send + Sync {
    /// One-time scan of the classes present when compilation starts.
    fn scan_static(&mut self) -> BTreeSet<String>;

    /// Tokens observed since then.
    fn dynamic(&self) -> BTreeSet<String>;
}

/// Receives the generated layer and owns the critical stylesheet.
#[async_trait]
pub trait StyleSink: Send + Sync {
    /// Replaces the generated layer text.
    fn write_layer(&mut self, css: &str);

    /// The pre-rendered critical stylesheet, if one is still installed.
    fn critical(&self) -> Option<String>;

    fn replace_critical(&mut self, css: &str);

    fn retract_critical(&mut self);

    /// Resolves once the host has had a chance to apply pending styles.
    async fn next_frame(&self) {
        tokio::task::yield_now().await;
    }
}
