use std::fs;

use utilcss::testing::{MemoryScanner, MemorySink, MemoryTheme};
use utilcss::{Compiler, CompilerConfig, init_logger};

#[tokio::test]
async fn test_file_logger_records_compile_passes() {
    let path = std::env::temp_dir().join(format!("utilcss-test-{}.log", std::process::id()));
    let _ = fs::remove_file(&path);

    init_logger(&path).unwrap();
    assert!(init_logger(&path).is_err(), "second logger must be rejected");

    let compiler = Compiler::new(
        CompilerConfig::default(),
        MemoryTheme::new(".broken { color: red;"),
        MemoryScanner::new(["broken"]),
        MemorySink::new(),
    );
    compiler.compile().await;

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("[DEBUG] initial scan found 1 classes"));
    assert!(contents.contains("[ERROR] utility generation failed: unbalanced block"));
    let _ = fs::remove_file(&path);
}
