use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use insta::assert_snapshot;
use tokio::sync::Notify;
use utilcss::testing::{MemoryScanner, MemorySink, MemoryTheme, SharedCache};
use utilcss::ucss::UcssError;
use utilcss::{
    CacheEntry, CacheStore, CompileError, CompileOutcome, Compiler, CompilerConfig, CompilerState,
    MemoryCache, SkipReason, ThemeSource,
};

const THEME: &str = r#"
    :root { --primary: #336699; --spacing-4: 1rem; }
    .flex { display: flex; }
"#;

fn compiler(theme: MemoryTheme, scanner: MemoryScanner, sink: MemorySink) -> Compiler {
    Compiler::new(CompilerConfig::default(), theme, scanner, sink)
}

async fn next_window() {
    tokio::time::advance(Duration::from_millis(100)).await;
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_skips_calls_inside_interval() {
    let compiler = compiler(
        MemoryTheme::new(THEME),
        MemoryScanner::new(["flex"]),
        MemorySink::new(),
    );

    assert!(compiler.compile().await.is_compiled());
    assert_eq!(
        compiler.compile().await,
        CompileOutcome::Skipped(SkipReason::RateLimited)
    );

    tokio::time::advance(Duration::from_millis(99)).await;
    assert_eq!(
        compiler.compile().await,
        CompileOutcome::Skipped(SkipReason::RateLimited)
    );

    // The skipped call did not move the window
    tokio::time::advance(Duration::from_millis(1)).await;
    assert_eq!(compiler.compile().await, CompileOutcome::Unchanged);
}

#[tokio::test(start_paused = true)]
async fn test_static_scan_happens_once() {
    let scanner = MemoryScanner::new(["flex"]);
    let compiler = compiler(MemoryTheme::new(THEME), scanner.clone(), MemorySink::new());

    for _ in 0..3 {
        compiler.compile().await;
        next_window().await;
    }
    assert_eq!(scanner.scan_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_static_scan_survives_theme_outage_on_first_call() {
    let scanner = MemoryScanner::new(["flex"]);
    let theme = MemoryTheme::unavailable();
    let sink = MemorySink::new();
    let compiler = compiler(theme.clone(), scanner.clone(), sink.clone());

    for _ in 0..3 {
        assert_eq!(
            compiler.compile().await,
            CompileOutcome::Skipped(SkipReason::ThemeUnavailable)
        );
        assert_eq!(compiler.state(), CompilerState::Uninitialized);
        next_window().await;
    }

    theme.set(THEME);
    assert!(compiler.compile().await.is_compiled());
    assert_eq!(scanner.scan_count(), 1);
    assert!(sink.layer().unwrap().contains(".flex { display: flex; }"));
}

#[tokio::test(start_paused = true)]
async fn test_dynamic_tokens_trigger_recompile() {
    let scanner = MemoryScanner::new(["flex"]);
    let sink = MemorySink::new();
    let theme = MemoryTheme::new(THEME);
    let compiler = compiler(theme.clone(), scanner.clone(), sink.clone());

    compiler.compile().await;
    next_window().await;
    assert_eq!(compiler.compile().await, CompileOutcome::Unchanged);
    assert_eq!(theme.fetch_count(), 1);

    scanner.observe("hover:bg-primary");
    next_window().await;
    assert_eq!(
        compiler.compile().await,
        CompileOutcome::Compiled { cache_hit: false }
    );

    assert_snapshot!(sink.layer().unwrap(), @r"
    @layer utilities {
    .hover\:bg-primary:hover { background-color: var(--primary); }
    .flex { display: flex; }
    }
    ");
    assert_eq!(sink.write_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_generation_error_keeps_previous_layer() {
    let scanner = MemoryScanner::new(["flex"]);
    let sink = MemorySink::new();
    let theme = MemoryTheme::new(THEME);
    let compiler = compiler(theme.clone(), scanner.clone(), sink.clone());

    compiler.compile().await;
    let before = sink.layer().unwrap();

    theme.set(".card { padding: 1rem;");
    scanner.observe("card");
    next_window().await;
    let outcome = compiler.compile().await;
    assert!(matches!(
        outcome,
        CompileOutcome::Failed(CompileError::Generation(UcssError::UnbalancedBlock(_)))
    ));
    assert_eq!(compiler.state(), CompilerState::SteadyState);
    assert_eq!(sink.layer(), Some(before.clone()));
    assert_eq!(compiler.css().await, Some(before));

    theme.set(".card { padding: 1rem; }");
    next_window().await;
    assert!(compiler.compile().await.is_compiled());
    assert!(sink.layer().unwrap().contains(".card { padding: 1rem; }"));
}

#[tokio::test(start_paused = true)]
async fn test_initial_generation_error_still_completes_init() {
    let scanner = MemoryScanner::new(["flex"]);
    let compiler = compiler(
        MemoryTheme::new(".flex { display: flex; } }"),
        scanner.clone(),
        MemorySink::new(),
    );

    assert!(matches!(
        compiler.compile().await,
        CompileOutcome::Failed(CompileError::Generation(UcssError::InvalidSyntax(_)))
    ));
    assert_eq!(compiler.state(), CompilerState::SteadyState);

    next_window().await;
    compiler.compile().await;
    assert_eq!(scanner.scan_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_theme_outage_in_steady_state_is_skipped() {
    let scanner = MemoryScanner::new(["flex"]);
    let theme = MemoryTheme::new(THEME);
    let compiler = compiler(theme.clone(), scanner.clone(), MemorySink::new());

    compiler.compile().await;
    theme.clear();
    scanner.observe("p-4");
    next_window().await;

    assert_eq!(
        compiler.compile().await,
        CompileOutcome::Skipped(SkipReason::ThemeUnavailable)
    );
    assert_eq!(compiler.state(), CompilerState::SteadyState);
}

#[tokio::test]
async fn test_shared_cache_yields_identical_css() {
    let cache = SharedCache::new(MemoryCache::new(8, Duration::from_secs(60)));
    let first_sink = MemorySink::new();
    let second_sink = MemorySink::new();

    let first = compiler(
        MemoryTheme::new(THEME),
        MemoryScanner::new(["flex", "md:p-4", "bg-primary"]),
        first_sink.clone(),
    )
    .with_cache(cache.clone());
    let second = compiler(
        MemoryTheme::new(THEME),
        MemoryScanner::new(["bg-primary", "flex", "md:p-4"]),
        second_sink.clone(),
    )
    .with_cache(cache);

    assert_eq!(first.compile().await, CompileOutcome::Compiled { cache_hit: false });
    assert_eq!(second.compile().await, CompileOutcome::Compiled { cache_hit: true });
    assert_eq!(first_sink.layer(), second_sink.layer());
}

#[tokio::test]
async fn test_changed_theme_misses_the_cache() {
    let cache = SharedCache::new(MemoryCache::new(8, Duration::from_secs(60)));
    let first = compiler(
        MemoryTheme::new(THEME),
        MemoryScanner::new(["flex"]),
        MemorySink::new(),
    )
    .with_cache(cache.clone());
    let second = compiler(
        MemoryTheme::new(".flex { display: inline-flex; }"),
        MemoryScanner::new(["flex"]),
        MemorySink::new(),
    )
    .with_cache(cache);

    first.compile().await;
    assert_eq!(second.compile().await, CompileOutcome::Compiled { cache_hit: false });
}

struct ReadOnlyCache;

impl CacheStore for ReadOnlyCache {
    fn get(&mut self, _key: &str) -> Option<CacheEntry> {
        None
    }

    fn put(&mut self, _entry: CacheEntry) -> utilcss::Result<()> {
        Err(CompileError::Cache("read-only".into()))
    }
}

#[tokio::test]
async fn test_cache_write_failure_is_not_fatal() {
    let sink = MemorySink::new();
    let compiler = compiler(MemoryTheme::new(THEME), MemoryScanner::new(["flex"]), sink.clone())
        .with_cache(ReadOnlyCache);

    assert_eq!(compiler.compile().await, CompileOutcome::Compiled { cache_hit: false });
    assert!(sink.layer().is_some());
}

#[tokio::test]
async fn test_critical_css_filtered_then_retracted() {
    let sink = MemorySink::with_critical(
        ".flex { display: flex; }\n.hero { min-height: 60vh; }\n@media (min-width: 768px) { .md\\:p-4 { padding: 16px; } }",
    );
    let scanner = MemoryScanner::new(["flex", "md:p-4"]);
    let compiler = Compiler::new(
        CompilerConfig::default().with_min_interval(Duration::ZERO),
        MemoryTheme::new(THEME),
        scanner.clone(),
        sink.clone(),
    );

    compiler.compile().await;
    assert_eq!(
        sink.critical_history(),
        vec![".hero { min-height: 60vh; }".to_string()]
    );
    assert_eq!(sink.frame_count(), 2);
    assert_eq!(sink.critical_css(), None);

    scanner.observe("bg-primary");
    compiler.compile().await;
    assert_eq!(sink.critical_history().len(), 1);
    assert_eq!(sink.frame_count(), 2);
}

struct GatedTheme {
    gate: Arc<Notify>,
}

#[async_trait]
impl ThemeSource for GatedTheme {
    async fn fetch(&self) -> Option<String> {
        self.gate.notified().await;
        Some(THEME.to_string())
    }
}

#[tokio::test]
async fn test_overlapping_call_is_a_no_op() {
    let gate = Arc::new(Notify::new());
    let compiler = Arc::new(Compiler::new(
        CompilerConfig::default(),
        GatedTheme { gate: gate.clone() },
        MemoryScanner::new(["flex"]),
        MemorySink::new(),
    ));

    let in_flight = tokio::spawn({
        let compiler = compiler.clone();
        async move { compiler.compile().await }
    });

    for _ in 0..10 {
        if compiler.state() == CompilerState::Compiling {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(compiler.state(), CompilerState::Compiling);
    assert_eq!(
        compiler.compile().await,
        CompileOutcome::Skipped(SkipReason::Reentrant)
    );

    gate.notify_one();
    assert!(in_flight.await.unwrap().is_compiled());
    assert_eq!(compiler.state(), CompilerState::SteadyState);
}
