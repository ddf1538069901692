//! Process configuration and directory discovery.
//!
//! # Responsibility
//! - Resolve the taxonomy data folder and log directory candidates.
//! - Keep environment access in one place so the rest of core stays pure.
//!
//! # Invariants
//! - Configuration is read once at process start and passed down.
//! - Only directory discovery and log level come from the environment.

use crate::logging::{default_fallback_dir, default_log_level, LogConfig, MAX_LOGS_PER_TOOL};
use crate::repo::taxonomy_repo::TaxonomyPaths;
use std::path::PathBuf;

/// Tool name used for log files.
pub const TOOL_NAME: &str = "NAAKTGenerator";

pub const DATA_DIR_ENV: &str = "NAAKT_DATA_DIR";
pub const LOG_DIR_ENV: &str = "NAAKT_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "NAAKT_LOG_LEVEL";

const DEFAULT_DATA_DIR: &str = "naakt_data";
const VENDOR_DIR: &str = "3BM_Bouwkunde";

/// Resolved process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaaktConfig {
    pub tool_name: String,
    pub log_level: String,
    pub data_dir: PathBuf,
    /// Log directory candidates in priority order.
    pub log_dir_candidates: Vec<PathBuf>,
    pub max_logs_per_tool: usize,
}

impl NaaktConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let data_dir = non_blank(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let mut log_dir_candidates = Vec::new();
        if let Some(dir) = non_blank(LOG_DIR_ENV) {
            log_dir_candidates.push(PathBuf::from(dir));
        }
        if let Some(app_data) = non_blank("APPDATA") {
            log_dir_candidates.push(PathBuf::from(app_data).join(VENDOR_DIR).join("logs"));
        }
        if let Some(home) = non_blank("HOME") {
            log_dir_candidates.push(
                PathBuf::from(home)
                    .join(format!(".{}", VENDOR_DIR.to_lowercase()))
                    .join("logs"),
            );
        }

        let log_level = non_blank(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string());

        Self {
            tool_name: TOOL_NAME.to_string(),
            log_level,
            data_dir,
            log_dir_candidates,
            max_logs_per_tool: MAX_LOGS_PER_TOOL,
        }
    }

    pub fn taxonomy_paths(&self) -> TaxonomyPaths {
        TaxonomyPaths::in_dir(&self.data_dir)
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            tool_name: self.tool_name.clone(),
            level: self.log_level.clone(),
            dir_candidates: self.log_dir_candidates.clone(),
            fallback_dir: default_fallback_dir(),
            max_logs_per_tool: self.max_logs_per_tool,
        }
    }
}
