//! # Structured Logging Module
//!
//! `tracing` setup for rusthydra with configurable level, JSON output and an
//! optional rolling log file.
//!
//! Console logs go to stderr so that `--json` results on stdout stay
//! machine-readable.
//!
//! ## Example
//!
//! ```rust,no_run
//! use rusthydra::logging::{init_logging, LogConfig};
//!
//! let config = LogConfig::from_env()?;
//! let _guards = init_logging(&config)?;
//!
//! tracing::info!("Attack starting");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::error::{HydraError, Result};
use crate::models::AttackResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Configuration for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to output to console
    pub console: bool,
    /// Whether to output in JSON format
    pub json: bool,
    /// Log file path (optional)
    pub file_path: Option<PathBuf>,
    /// Number of rotated log files to keep
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            console: true,
            json: false,
            file_path: None,
            max_files: 5,
        }
    }
}

impl LogConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(level) = std::env::var("RUSTHYDRA_LOG_LEVEL") {
            config.level = level;
        }

        if let Ok(console) = std::env::var("RUSTHYDRA_LOG_CONSOLE") {
            config.console = console
                .parse::<bool>()
                .map_err(|_| HydraError::config("Invalid RUSTHYDRA_LOG_CONSOLE value"))?;
        }

        if let Ok(json) = std::env::var("RUSTHYDRA_LOG_JSON") {
            config.json = json
                .parse::<bool>()
                .map_err(|_| HydraError::config("Invalid RUSTHYDRA_LOG_JSON value"))?;
        }

        if let Ok(file_path) = std::env::var("RUSTHYDRA_LOG_FILE") {
            config.file_path = Some(PathBuf::from(file_path));
        }

        if let Ok(max_files) = std::env::var("RUSTHYDRA_LOG_MAX_FILES") {
            config.max_files = max_files
                .parse::<usize>()
                .map_err(|_| HydraError::config("Invalid RUSTHYDRA_LOG_MAX_FILES value"))?;
        }

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.as_str()) {
            return Err(HydraError::config(format!(
                "Invalid log level '{}'. Valid levels: {}",
                self.level,
                valid_levels.join(", ")
            )));
        }

        if self.max_files == 0 {
            return Err(HydraError::config("Max files must be greater than 0"));
        }

        Ok(())
    }
}

/// Initialize structured logging with the given configuration
///
/// Returns the file appender guards; keep them alive until exit or buffered
/// file output is lost.
pub fn init_logging(config: &LogConfig) -> Result<Vec<WorkerGuard>> {
    config.validate()?;

    let mut guards = Vec::new();
    let mut layers = Vec::new();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    if config.console {
        let console_layer = if config.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_writer(std::io::stderr)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .boxed()
        };

        layers.push(console_layer.with_filter(env_filter.clone()));
    }

    if let Some(file_path) = &config.file_path {
        let prefix = file_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("rusthydra")
            .to_string();

        let file_appender = tracing_appender::rolling::Builder::new()
            .rotation(tracing_appender::rolling::Rotation::DAILY)
            .filename_prefix(prefix)
            .filename_suffix("log")
            .max_log_files(config.max_files)
            .build(file_path.parent().unwrap_or_else(|| std::path::Path::new(".")))
            .map_err(|e| HydraError::config(format!("Failed to create log appender: {}", e)))?;

        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        guards.push(guard);

        let file_layer = if config.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_target(true)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .boxed()
        };

        layers.push(file_layer.with_filter(env_filter));
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| HydraError::config(format!("Failed to install logger: {}", e)))?;

    tracing::debug!(
        level = %config.level,
        console = config.console,
        json = config.json,
        file_path = ?config.file_path,
        "Logging initialized"
    );

    Ok(guards)
}

/// Create a span for one attack
pub fn attack_span(target: &str, protocol: &str) -> tracing::Span {
    tracing::info_span!(
        "attack",
        target = %target,
        protocol = %protocol,
        start_time = %chrono::Utc::now().to_rfc3339()
    )
}

/// Log external tool execution
pub fn log_external_tool(tool: &str, command: &str, duration_ms: u64, success: bool) {
    if success {
        tracing::debug!(
            tool = %tool,
            command = %command,
            duration_ms = duration_ms,
            "External tool executed successfully"
        );
    } else {
        tracing::warn!(
            tool = %tool,
            command = %command,
            duration_ms = duration_ms,
            "External tool execution failed"
        );
    }
}

/// Log the terminal state of an attack
pub fn log_attack_completion(result: &AttackResult, duration_ms: u64) {
    tracing::info!(
        target = %result.target,
        protocol = %result.protocol,
        status = %result.status,
        credentials = result.credentials.len(),
        duration_ms = duration_ms,
        error = ?result.error,
        "Attack finished"
    );
}
