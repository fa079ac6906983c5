//! # Result Output
//!
//! Persists finished attacks as JSON files and renders them for the
//! terminal.
//!
//! Saved files are named `attack_<YYYYmmdd_HHMMSS>.json` (UTC). Two saves in
//! the same second target the same name; callers that care must space them
//! out.

use crate::config::HydraConfig;
use crate::constants;
use crate::error::{HydraError, Result};
use crate::models::{AttackResult, AttackStatus};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Directory of saved attack results
#[derive(Debug, Clone)]
pub struct ResultStore {
    results_dir: PathBuf,
}

impl ResultStore {
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: results_dir.into(),
        }
    }

    pub fn from_config(config: &HydraConfig) -> Self {
        Self::new(config.results_dir.clone())
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// Write `result` as pretty JSON and return the file path
    ///
    /// Creates the results directory if needed.
    pub fn save(&self, result: &AttackResult) -> Result<PathBuf> {
        fs::create_dir_all(&self.results_dir)?;

        let file_name = format!(
            "{}{}.json",
            constants::RESULT_FILE_PREFIX,
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        let path = self.results_dir.join(file_name);

        let content = serde_json::to_string_pretty(result)
            .map_err(|e| HydraError::parse(format!("Failed to serialize result: {}", e)))?;
        fs::write(&path, content)?;

        info!(path = %path.display(), "Attack result saved");
        Ok(path)
    }

    /// Read a previously saved result
    pub fn load(path: impl AsRef<Path>) -> Result<AttackResult> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| HydraError::parse(format!("Failed to parse result file: {}", e)))
    }
}

/// Print a human-readable summary of `result` to stdout
pub fn print_result(result: &AttackResult) {
    let status = match result.status {
        AttackStatus::Success => result.status.to_string().green().bold(),
        AttackStatus::Completed => result.status.to_string().yellow().bold(),
        AttackStatus::Timeout | AttackStatus::Failed => result.status.to_string().red().bold(),
        AttackStatus::Pending | AttackStatus::Running => result.status.to_string().normal(),
    };

    let port = result
        .port
        .map(|p| format!(":{}", p))
        .unwrap_or_default();
    println!(
        "{} {}://{}{} {}",
        "ATTACK".bright_cyan(),
        result.protocol,
        result.target,
        port,
        status
    );

    if let Some(duration) = result.duration_secs() {
        println!("  duration: {:.1}s", duration);
    }

    if let Some(error) = &result.error {
        println!("  {} {}", "error:".red(), error);
    }

    if result.credentials.is_empty() {
        if result.status == AttackStatus::Completed {
            println!("  {} No valid credentials found", "WARNING".yellow());
        }
        return;
    }

    println!("  {} credential(s) found:", result.credentials.len());
    for credential in &result.credentials {
        match &credential.username {
            Some(username) => println!(
                "  [{}] login: {}   password: {}",
                credential.port,
                username.bright_white().bold(),
                credential.password.bright_white().bold()
            ),
            None => println!(
                "  [{}] password: {}",
                credential.port,
                credential.password.bright_white().bold()
            ),
        }
    }
}
