use log::{LevelFilter, Metadata, Record, SetLoggerError};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

struct FileLogger {
    file_path: PathBuf,
    level: LevelFilter,
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if let Ok(mut file) = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)
            {
                let _ = writeln!(file, "[{}] {}", record.level(), record.args());
            }
        }
    }

    fn flush(&self) {}
}

/// Appends `debug` and more severe records to the file at `path`.
///
/// Fails if a logger is already installed.
pub fn init_logger(path: impl AsRef<Path>) -> Result<(), SetLoggerError> {
    init_logger_with_level(path, LevelFilter::Debug)
}

/// Like [`init_logger`], with an explicit maximum level.
pub fn init_logger_with_level(
    path: impl AsRef<Path>,
    level: LevelFilter,
) -> Result<(), SetLoggerError> {
    let logger = FileLogger {
        file_path: path.as_ref().to_path_buf(),
        level,
    };
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level);
    Ok(())
}
