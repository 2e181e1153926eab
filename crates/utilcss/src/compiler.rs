//! The compile orchestrator.
//!
//! ```text
//!                 first compile()
//! Uninitialized ─────────────────► InitialScan ──► SteadyState ◄─┐
//!       ▲                              │                │        │ compile()
//!       └──── theme unavailable ───────┘                └────────┘
//! ```
//!
//! Every call first passes two guards: a pass already in flight makes the
//! call a no-op, and so does a call arriving within `min_interval` of the
//! last pass start. Neither queues a retry.
//!
//! The initial pass compiles exactly the statically scanned classes. Later
//! passes compile static plus dynamically observed classes and do nothing
//! when that set has not changed since the last successful pass.

use std::collections::BTreeSet;
use std::fmt;

use tokio::sync::Mutex;
use tokio::time::Instant;
use ucss::{ThemeIndex, UcssError, base_classes, filter_critical};

use crate::cache::{CacheEntry, CacheStore, MemoryCache, cache_key, content_hash};
use crate::config::CompilerConfig;
use crate::error::CompileError;
use crate::source::{ClassScanner, StyleSink, ThemeSource};

/// Where the compiler is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilerState {
    Uninitialized,
    InitialScan,
    SteadyState,
    /// A pass is in flight.
    Compiling,
}

/// Why a call did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another pass was still running.
    Reentrant,
    /// The previous pass started less than `min_interval` ago.
    RateLimited,
    /// The theme source returned nothing.
    ThemeUnavailable,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Reentrant => write!(f, "pass already in flight"),
            SkipReason::RateLimited => write!(f, "rate limited"),
            SkipReason::ThemeUnavailable => write!(f, "theme unavailable"),
        }
    }
}

/// Result of one `compile()` call.
#[derive(Debug, Clone, PartialEq)]
pub enum CompileOutcome {
    /// A layer was written.
    Compiled { cache_hit: bool },
    /// The used-class set matched the last compiled one.
    Unchanged,
    Skipped(SkipReason),
    /// The pass was aborted; the previous layer stays in effect.
    Failed(CompileError),
}

impl CompileOutcome {
    pub fn is_compiled(&self) -> bool {
        matches!(self, CompileOutcome::Compiled { .. })
    }
}

/// Everything a pass reads and writes. Owned by the pass lock.
struct Pass {
    state: CompilerState,
    scanner: Box<dyn ClassScanner>,
    cache: Box<dyn CacheStore>,
    sink: Box<dyn StyleSink>,
    last_start: Option<Instant>,
    /// Classes from the one-time static scan; `None` until it has run.
    static_classes: Option<BTreeSet<String>>,
    /// Hash of the class set behind `css`.
    compiled_classes: Option<String>,
    /// The parsed theme and the hash of the text it came from.
    index: Option<(String, ThemeIndex)>,
    css: Option<String>,
}

impl Pass {
    /// Returns the index for `theme`, reparsing only when its hash changed.
    fn theme_index(
        &mut self,
        theme: &str,
        theme_hash: &str,
        config: &CompilerConfig,
    ) -> Result<&ThemeIndex, UcssError> {
        let index = match self.index.take() {
            Some((cached, index)) if cached == theme_hash => index,
            _ => {
                log::debug!("theme changed, rebuilding index ({theme_hash})");
                ThemeIndex::build(theme, config.color_utilities)?
            }
        };
        Ok(&self.index.insert((theme_hash.to_string(), index)).1)
    }

    /// Hands the critical stylesheet over to the generated layer: rules the
    /// layer now covers are removed, and after two frames the rest goes too.
    async fn hand_off_critical(&mut self, css: &str) {
        let Some(critical) = self.sink.critical() else {
            return;
        };
        let filtered = filter_critical(&critical, &base_classes(css));
        self.sink.replace_critical(&filtered);
        self.sink.next_frame().await;
        self.sink.next_frame().await;
        self.sink.retract_critical();
        log::debug!("critical stylesheet retracted");
    }
}

/// Compiles used utility tokens against a theme into one CSS layer.
///
/// The compiler is `Send + Sync`; share it behind an `Arc` and call
/// [`Compiler::compile`] whenever the used-class set may have changed.
///
/// # Example
///
/// ```
/// use utilcss::testing::{MemoryScanner, MemorySink, MemoryTheme};
/// use utilcss::{CompileOutcome, Compiler, CompilerConfig};
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let sink = MemorySink::new();
/// let compiler = Compiler::new(
///     CompilerConfig::default(),
///     MemoryTheme::new(":root { --primary: #336699; }"),
///     MemoryScanner::new(["bg-primary"]),
///     sink.clone(),
/// );
///
/// assert_eq!(compiler.compile().await, CompileOutcome::Compiled { cache_hit: false });
/// assert!(sink.layer().unwrap().contains(".bg-primary { background-color: var(--primary); }"));
/// # });
/// ```
pub struct Compiler {
    config: CompilerConfig,
    theme: Box<dyn ThemeSource>,
    pass: Mutex<Pass>,
}

impl Compiler {
    /// Creates a compiler backed by an in-memory cache sized by `config`.
    pub fn new(
        config: CompilerConfig,
        theme: impl ThemeSource + 'static,
        scanner: impl ClassScanner + 'static,
        sink: impl StyleSink + 'static,
    ) -> Self {
        let cache = MemoryCache::new(config.cache_capacity, config.cache_ttl);
        Self {
            theme: Box::new(theme),
            pass: Mutex::new(Pass {
                state: CompilerState::Uninitialized,
                scanner: Box::new(scanner),
                cache: Box::new(cache),
                sink: Box::new(sink),
                last_start: None,
                static_classes: None,
                compiled_classes: None,
                index: None,
                css: None,
            }),
            config,
        }
    }

    /// Replaces the cache store.
    pub fn with_cache(mut self, cache: impl CacheStore + 'static) -> Self {
        self.pass.get_mut().cache = Box::new(cache);
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// The current state; `Compiling` while a pass holds the lock.
    pub fn state(&self) -> CompilerState {
        match self.pass.try_lock() {
            Ok(pass) => pass.state,
            Err(_) => CompilerState::Compiling,
        }
    }

    /// The last successfully written layer.
    pub async fn css(&self) -> Option<String> {
        self.pass.lock().await.css.clone()
    }

    /// Runs one compile pass, or explains why it did not.
    pub async fn compile(&self) -> CompileOutcome {
        let Ok(mut pass) = self.pass.try_lock() else {
            log::debug!("compile skipped: {}", SkipReason::Reentrant);
            return CompileOutcome::Skipped(SkipReason::Reentrant);
        };

        let now = Instant::now();
        if let Some(last) = pass.last_start
            && now.duration_since(last) < self.config.min_interval
        {
            log::debug!("compile skipped: {}", SkipReason::RateLimited);
            return CompileOutcome::Skipped(SkipReason::RateLimited);
        }
        pass.last_start = Some(now);

        match pass.state {
            CompilerState::Uninitialized => self.initial_pass(&mut pass).await,
            _ => self.steady_pass(&mut pass).await,
        }
    }

    async fn initial_pass(&self, pass: &mut Pass) -> CompileOutcome {
        pass.state = CompilerState::InitialScan;
        let classes = match &pass.static_classes {
            Some(classes) => classes.clone(),
            None => {
                let classes = pass.scanner.scan_static();
                log::debug!("initial scan found {} classes", classes.len());
                pass.static_classes = Some(classes.clone());
                classes
            }
        };

        let Some(theme) = self.fetch_theme().await else {
            pass.state = CompilerState::Uninitialized;
            return CompileOutcome::Skipped(SkipReason::ThemeUnavailable);
        };

        let outcome = self.run(pass, classes, &theme).await;
        pass.state = CompilerState::SteadyState;
        outcome
    }

    async fn steady_pass(&self, pass: &mut Pass) -> CompileOutcome {
        let mut classes = pass.static_classes.clone().unwrap_or_default();
        classes.extend(pass.scanner.dynamic());

        if pass.compiled_classes.as_deref() == Some(class_hash(&classes).as_str()) {
            log::trace!("class set unchanged");
            return CompileOutcome::Unchanged;
        }

        let Some(theme) = self.fetch_theme().await else {
            return CompileOutcome::Skipped(SkipReason::ThemeUnavailable);
        };
        self.run(pass, classes, &theme).await
    }

    async fn fetch_theme(&self) -> Option<String> {
        match self.theme.fetch().await {
            Some(theme) if !theme.trim().is_empty() => Some(theme),
            _ => {
                log::warn!("compile skipped: {}", SkipReason::ThemeUnavailable);
                None
            }
        }
    }

    async fn run(&self, pass: &mut Pass, classes: BTreeSet<String>, theme: &str) -> CompileOutcome {
        let theme_hash = content_hash(theme);
        let key = cache_key(&classes, &theme_hash);

        let cached = pass
            .cache
            .get(&key)
            .filter(|entry| entry.theme_hash == theme_hash);

        let (css, cache_hit) = match cached {
            Some(entry) => {
                log::debug!("cache hit for {} classes", classes.len());
                (entry.css, true)
            }
            None => {
                let index = match pass.theme_index(theme, &theme_hash, &self.config) {
                    Ok(index) => index,
                    Err(err) => {
                        let err = CompileError::from(err);
                        log::error!("{err}; keeping previous layer");
                        return CompileOutcome::Failed(err);
                    }
                };
                let (css, report) = index.render(&classes, &self.config.layer_name);
                log::debug!(
                    "generated {} rules ({} duplicates), {} unresolved, {} skipped",
                    report.emitted,
                    report.duplicates,
                    report.unresolved.len(),
                    report.partial.len()
                );
                if let Err(err) = pass.cache.put(CacheEntry::new(key, css.as_str(), theme_hash)) {
                    log::warn!("{err}");
                }
                (css, false)
            }
        };

        pass.sink.write_layer(&css);
        log::info!(
            "wrote layer `{}` ({} bytes, {} classes)",
            self.config.layer_name,
            css.len(),
            classes.len()
        );
        pass.hand_off_critical(&css).await;

        pass.compiled_classes = Some(class_hash(&classes));
        pass.css = Some(css);
        CompileOutcome::Compiled { cache_hit }
    }
}

fn class_hash(classes: &BTreeSet<String>) -> String {
    content_hash(&classes.iter().map(String::as_str).collect::<Vec<_>>().join(","))
}
