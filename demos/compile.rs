//! Compile Demo - Static scan, dynamic tokens and the critical handoff
//!
//! The workflow:
//! 1. The first pass compiles the classes present at startup
//! 2. The critical stylesheet loses the rules the layer now covers, then is retracted
//! 3. New tokens show up (as if added by a script) and trigger a recompile
//! 4. A second compiler sharing the cache reuses the stored layer
//!
//! Run with `cargo run --example compile`. Debug logs go to `utilcss-demo.log`.

use std::time::Duration;

use utilcss_rs::testing::{MemoryScanner, MemorySink, MemoryTheme, SharedCache};
use utilcss_rs::{Compiler, CompilerConfig, MemoryCache, init_logger, log};

const THEME: &str = r#"
    :root {
        --primary: #336699;
        --surface: #f8f8f2;
        --spacing-2: 0.5rem;
        --spacing-4: 1rem;
        --radius-lg: 0.75rem;
        --font-weight-bold: 700;
        --breakpoint-tablet: 48rem;
    }

    @utility stack { display: flex; flex-direction: column; }

    :where(.card, .panel) {
        background: var(--surface);
        border-radius: var(--radius-lg);
    }
"#;

const CRITICAL: &str = r#"
    .card { background: #f8f8f2; }
    .hero { min-height: 60vh; }
"#;

#[tokio::main]
async fn main() {
    if let Err(err) = init_logger("utilcss-demo.log") {
        eprintln!("logging disabled: {err}");
    }

    let config = CompilerConfig::default().with_min_interval(Duration::from_millis(50));
    let cache = SharedCache::new(MemoryCache::new(config.cache_capacity, config.cache_ttl));
    let scanner = MemoryScanner::new(["card", "stack", "p-4", "tablet:p-2", "bg-primary"]);
    let sink = MemorySink::with_critical(CRITICAL);

    let compiler = Compiler::new(
        config.clone(),
        MemoryTheme::new(THEME),
        scanner.clone(),
        sink.clone(),
    )
    .with_cache(cache.clone());

    println!("initial pass: {:?}", compiler.compile().await);
    println!("{}\n", sink.layer().unwrap_or_default());
    println!("critical after handoff: {:?}\n", sink.critical_history());

    scanner.observe("hover:!bg-primary");
    scanner.observe("dark:font-bold");
    tokio::time::sleep(config.min_interval).await;
    println!("after new tokens: {:?}", compiler.compile().await);
    println!("{}\n", sink.layer().unwrap_or_default());

    let mirror_sink = MemorySink::new();
    let mirror = Compiler::new(
        config,
        MemoryTheme::new(THEME),
        MemoryScanner::new(["card", "stack", "p-4", "tablet:p-2", "bg-primary"]),
        mirror_sink.clone(),
    )
    .with_cache(cache);
    println!("second compiler: {:?}", mirror.compile().await);

    log::info!("demo finished");
}
