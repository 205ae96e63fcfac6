//! Tracing configuration for passdesk
//!
//! Installs the global `tracing-subscriber` registry: an env filter, a
//! stdout layer, and optionally a daily-rotated log file.
//!
//! ## Filter precedence / 过滤优先级
//!
//! 1. `RUST_LOG`
//! 2. `logging.level` from the config file
//! 3. Build-profile defaults (`debug` in dev, `info` in release)

use std::{fs, io, path::PathBuf, sync::OnceLock};

use anyhow::Context;
use pass_core::LoggingConfig;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, registry, EnvFilter};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const LOG_FILE_PREFIX: &str = "passdesk.log";

/// Check if running in development environment
fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Build the default filter directives for tracing
///
/// ## Behavior / 行为
/// - **Development**: debug level for the app crates
/// - **Production**: info level for the app crates
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    let level = if is_dev { "debug" } else { "info" };
    vec![
        level.to_string(),
        format!("pass_core={level}"),
        format!("pass_app={level}"),
        format!("passdesk={level}"),
    ]
}

fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| match config.level.as_deref() {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::new(build_filter_directives(is_development()).join(",")),
    })
}

/// Initialize the tracing subscriber
///
/// Call once at startup, before the stores are built. When file logging is
/// requested but the log directory cannot be prepared, logging continues on
/// stdout only.
///
/// ## Errors / 错误
///
/// Returns `Err` if a global subscriber is already registered.
pub fn init_tracing_subscriber(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter = build_env_filter(config);

    let stdout_writer: BoxMakeWriter = BoxMakeWriter::new(io::stdout);
    let file_writer = if config.log_to_file {
        match build_file_writer() {
            Ok(writer) => Some(writer),
            Err(err) => {
                eprintln!("Failed to initialize file logging, falling back to stdout: {err:#}");
                None
            }
        }
    } else {
        None
    };

    // "2025-01-15 10:30:45.123 INFO [file.rs:42] [target] message"
    let stdout_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(
            "%Y-%m-%d %H:%M:%S%.3f".to_string(),
        ))
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(stdout_writer);

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_timer(fmt::time::ChronoUtc::new(
                "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            ))
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
    });

    registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to register tracing subscriber")?;

    Ok(())
}

/// Directory for log files: `<data_local_dir>/passdesk/logs`.
pub fn logs_dir() -> anyhow::Result<PathBuf> {
    let data_dir = dirs::data_local_dir().context("No local data directory on this platform")?;
    Ok(data_dir.join("passdesk").join("logs"))
}

fn build_file_writer() -> anyhow::Result<NonBlocking> {
    let logs_dir = logs_dir()?;
    fs::create_dir_all(&logs_dir)
        .with_context(|| format!("Failed to create log directory: {}", logs_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(&logs_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}
