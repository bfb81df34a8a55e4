//! File logging.  The terminal belongs to the calendar, so all diagnostics go
//! to size-rotated files under the data directory instead.
use flexi_logger::{
    Cleanup, Criterion, FileSpec, FlexiLoggerError, LogSpecification, Logger, LoggerHandle,
    Naming, WriteMode,
};
use log::{error, info, LevelFilter};
use std::path::{Path, PathBuf};
use thiserror::Error;

const LOG_FILE_BASENAME: &str = "daynote";
const MAX_LOG_FILE_SIZE: u64 = 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

pub(crate) fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Parse a level name as given on the command line
pub(crate) fn parse_level(s: &str) -> Result<LevelFilter, UnknownLevelError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "off" => Ok(LevelFilter::Off),
        "error" => Ok(LevelFilter::Error),
        "warn" | "warning" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        _ => Err(UnknownLevelError(s.to_owned())),
    }
}

/// Start logging to files in `dir`.  Logging stops once the returned handle
/// is dropped.
pub(crate) fn init_logging(level: LevelFilter, dir: &Path) -> Result<LoggerHandle, LoggingError> {
    std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
        path: dir.to_owned(),
        source,
    })?;
    let handle = Logger::with(LogSpecification::builder().default(level).build())
        .log_to_file(
            FileSpec::default()
                .directory(dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()?;
    install_panic_hook();
    info!(
        "event=app_start version={} level={level} log_dir={}",
        env!("CARGO_PKG_VERSION"),
        dir.display()
    );
    Ok(handle)
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info.location().map_or_else(
            || String::from("unknown"),
            |loc| format!("{}:{}", loc.file(), loc.line()),
        );
        error!("event=panic location={location}");
        previous(panic_info);
    }));
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unknown log level {0:?}; expected one of off, error, warn, info, debug, trace")]
pub(crate) struct UnknownLevelError(String);

#[derive(Debug, Error)]
pub(crate) enum LoggingError {
    #[error("failed to create log directory {}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to start logger")]
    Start(#[from] FlexiLoggerError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("info"), Ok(LevelFilter::Info));
        assert_eq!(parse_level(" DEBUG "), Ok(LevelFilter::Debug));
        assert_eq!(parse_level("warning"), Ok(LevelFilter::Warn));
        assert_eq!(parse_level("off"), Ok(LevelFilter::Off));
        assert_eq!(
            parse_level("loud"),
            Err(UnknownLevelError(String::from("loud")))
        );
    }

    #[test]
    fn test_create_dir_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let r = init_logging(LevelFilter::Info, &blocker.join("logs"));
        assert!(matches!(r, Err(LoggingError::CreateDir { .. })));
    }

    // The only test that installs the global logger
    #[test]
    fn test_init_logging_writes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("logs");
        let handle = init_logging(LevelFilter::Info, &dir).unwrap();
        info!("event=test_line");
        handle.flush();
        let names = std::fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        assert!(
            names.iter().any(|n| n.starts_with(LOG_FILE_BASENAME)),
            "no log file among {names:?}"
        );
        handle.shutdown();
    }
}
