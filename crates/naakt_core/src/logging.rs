//! Core logging bootstrap and safety policy.
//!
//! # Responsibility
//! - Pick a writable log directory from a prioritized candidate list.
//! - Keep at most a fixed number of rotated log files per tool.
//! - Initialize file-based logs exactly once per process.
//! - Emit stable `event=… module=… status=…` diagnostic lines.
//!
//! # Invariants
//! - Logging init is idempotent for the same directory and level.
//! - Logging initialization must not panic.
//! - Re-initialization with a different directory or level is rejected.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{debug, error, info};
use once_cell::sync::OnceCell;
use std::backtrace::Backtrace;
use std::error::Error;
use std::path::{Path, PathBuf};

/// Default cap on log files kept per tool.
pub const MAX_LOGS_PER_TOOL: usize = 10;
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const WRITE_PROBE_FILE: &str = ".write_test";
const FALLBACK_DIR_NAME: &str = "naakt_logs";
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

struct LoggingState {
    tool_name: String,
    level: &'static str,
    log_dir: PathBuf,
    _logger: LoggerHandle,
}

/// Logging settings resolved at process start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Tool name; used as log file prefix.
    pub tool_name: String,
    /// One of `trace|debug|info|warn|error`.
    pub level: String,
    /// Candidate directories in priority order.
    pub dir_candidates: Vec<PathBuf>,
    /// Used when no candidate is writable.
    pub fallback_dir: PathBuf,
    pub max_logs_per_tool: usize,
}

impl LogConfig {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            level: default_log_level().to_string(),
            dir_candidates: Vec::new(),
            fallback_dir: default_fallback_dir(),
            max_logs_per_tool: MAX_LOGS_PER_TOOL,
        }
    }
}

/// `<temp>/naakt_logs`.
pub fn default_fallback_dir() -> PathBuf {
    std::env::temp_dir().join(FALLBACK_DIR_NAME)
}

/// Initializes core logging and returns the active log directory.
///
/// # Invariants
/// - Calling this function repeatedly with the same resolved directory and
///   level is idempotent.
/// - Reconfiguration attempts are rejected.
/// - Initialization never panics.
///
/// # Errors
/// - Returns an error when `level` is unsupported or `tool_name` is blank.
/// - Returns an error when no directory (including the fallback) can be
///   created.
/// - Returns an error when logger backend setup fails.
pub fn init_logging(config: &LogConfig) -> Result<PathBuf, String> {
    let normalized_level = normalize_level(&config.level)?;
    let tool_name = normalize_tool_name(&config.tool_name)?;
    let log_dir = resolve_log_dir(&config.dir_candidates, &config.fallback_dir)?;

    if let Some(state) = LOGGING_STATE.get() {
        return check_same_config(state, normalized_level, &log_dir);
    }

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, String> {
        let logger = Logger::try_with_str(normalized_level)
            .map_err(|err| format!("invalid log level `{normalized_level}`: {err}"))?
            .log_to_file(
                FileSpec::default()
                    .directory(log_dir.as_path())
                    .basename(tool_name.as_str()),
            )
            .rotate(
                Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                Naming::Timestamps,
                Cleanup::KeepLogFiles(config.max_logs_per_tool.max(1)),
            )
            .write_mode(WriteMode::BufferAndFlush)
            .format_for_files(flexi_logger::detailed_format)
            .start()
            .map_err(|err| format!("failed to start logger: {err}"))?;

        install_panic_hook_once();

        info!(
            "event=tool_start module=core status=ok tool={} platform={} build_mode={} version={}",
            tool_name,
            std::env::consts::OS,
            build_mode(),
            env!("CARGO_PKG_VERSION")
        );
        info!(
            "event=core_init module=core status=ok level={} log_dir={} max_logs={}",
            normalized_level,
            log_dir.display(),
            config.max_logs_per_tool
        );

        Ok(LoggingState {
            tool_name,
            level: normalized_level,
            log_dir: log_dir.clone(),
            _logger: logger,
        })
    })?;

    check_same_config(state, normalized_level, &log_dir)
}

fn check_same_config(
    state: &LoggingState,
    level: &'static str,
    log_dir: &Path,
) -> Result<PathBuf, String> {
    if state.log_dir != log_dir {
        return Err(format!(
            "logging already initialized at `{}`; refusing to switch to `{}`",
            state.log_dir.display(),
            log_dir.display()
        ));
    }
    if state.level != level {
        return Err(format!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            state.level, level
        ));
    }
    Ok(state.log_dir.clone())
}

/// Returns `(tool_name, level, log_dir)` once logging is active.
pub fn logging_status() -> Option<(String, &'static str, PathBuf)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.tool_name.clone(), state.level, state.log_dir.clone()))
}

/// Returns the default log level for current build mode.
///
/// - `debug` builds -> `debug`
/// - `release` builds -> `info`
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Returns the first writable candidate, else the (created) fallback.
pub fn resolve_log_dir(candidates: &[PathBuf], fallback: &Path) -> Result<PathBuf, String> {
    if let Some(found) = candidates.iter().find(|dir| is_writable_dir(dir)) {
        return Ok(found.clone());
    }
    std::fs::create_dir_all(fallback).map_err(|err| {
        format!(
            "failed to create fallback log directory `{}`: {err}",
            fallback.display()
        )
    })?;
    Ok(fallback.to_path_buf())
}

fn is_writable_dir(dir: &Path) -> bool {
    if dir.as_os_str().is_empty() || !dir.is_absolute() {
        return false;
    }
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }
    let probe = dir.join(WRITE_PROBE_FILE);
    match std::fs::write(&probe, b"test") {
        Ok(()) => std::fs::remove_file(&probe).is_ok(),
        Err(_) => false,
    }
}

/// Logs a failure with its source chain, plus a backtrace at debug level.
pub fn log_failure(event: &str, err: &dyn Error) {
    let mut chain = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }
    error!(
        "event={} status=error error={} causes=[{}]",
        event,
        sanitize_message(&err.to_string(), usize::MAX),
        chain.join("; ")
    );
    debug!("event={} backtrace:\n{}", event, Backtrace::force_capture());
}

/// Writes the closing line of a tool run.
pub fn finalize(success: bool, message: Option<&str>) {
    let result = if success { "SUCCESS" } else { "FAILED" };
    match message {
        Some(message) => info!(
            "event=tool_end module=core result={} message={}",
            result,
            sanitize_message(message, usize::MAX)
        ),
        None => info!("event=tool_end module=core result={result}"),
    }
}

fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}

fn normalize_tool_name(tool_name: &str) -> Result<String, String> {
    let trimmed = tool_name.trim();
    if trimmed.is_empty() {
        return Err("tool_name cannot be empty".to_string());
    }
    Ok(trimmed.to_string())
}

fn build_mode() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

fn install_panic_hook_once() {
    if PANIC_HOOK_INSTALLED.get().is_some() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_payload_summary(panic_info);
        error!(
            "event=panic_captured module=core status=error location={} payload={}",
            location, payload
        );
        previous_hook(panic_info);
    }));

    let _ = PANIC_HOOK_INSTALLED.set(());
}

fn panic_payload_summary(info: &std::panic::PanicHookInfo<'_>) -> String {
    let payload = if let Some(message) = info.payload().downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = info.payload().downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    };

    sanitize_message(&payload, MAX_PANIC_PAYLOAD_CHARS)
}

fn sanitize_message(value: &str, max_chars: usize) -> String {
    let normalized = value.replace(['\n', '\r'], " ");
    let mut truncated = normalized.chars().take(max_chars).collect::<String>();
    if normalized.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}
