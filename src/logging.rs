//! Logger bootstrap for the viewer.
//!
//! Log lines go to stderr, or to a rotating file set when a directory is
//! given (warnings are still mirrored to stderr). The returned handle must be
//! kept alive for the lifetime of the process.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming, WriteMode,
};
use log::info;

const LOG_FILE_BASENAME: &str = "magnolia-map";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

const SUPPORTED_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Lower-cases `level` and checks it against the supported set.
pub fn normalize_level(level: &str) -> Result<&'static str> {
    let wanted = level.trim().to_ascii_lowercase();
    SUPPORTED_LEVELS
        .iter()
        .copied()
        .find(|candidate| *candidate == wanted)
        .ok_or_else(|| {
            anyhow!(
                "unsupported log level `{level}`; expected one of {}",
                SUPPORTED_LEVELS.join(", ")
            )
        })
}

/// `RUST_LOG` wins over `level` when set.
pub fn init_logging(level: &str, log_dir: Option<&Path>) -> Result<LoggerHandle> {
    let level = normalize_level(level)?;
    let logger = Logger::try_with_env_or_str(level)
        .with_context(|| format!("invalid log specification `{level}`"))?;

    let logger = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            logger
                .log_to_file(FileSpec::default().directory(dir).basename(LOG_FILE_BASENAME))
                .rotate(
                    Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(MAX_LOG_FILES),
                )
                .write_mode(WriteMode::BufferAndFlush)
                .append()
                .duplicate_to_stderr(Duplicate::Warn)
                .format_for_files(flexi_logger::detailed_format)
        }
        None => logger
            .log_to_stderr()
            .format_for_stderr(flexi_logger::default_format),
    };

    let handle = logger.start().context("failed to start logger")?;
    info!(
        "event=app_start level={level} version={} log_dir={}",
        env!("CARGO_PKG_VERSION"),
        log_dir.map_or_else(|| "stderr".to_owned(), |dir| dir.display().to_string())
    );
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_case_insensitive() {
        assert_eq!(normalize_level("INFO").unwrap(), "info");
        assert_eq!(normalize_level(" warn ").unwrap(), "warn");
    }

    #[test]
    fn unknown_level_is_rejected() {
        let error = normalize_level("loud").unwrap_err();
        assert!(error.to_string().contains("loud"));
    }
}
