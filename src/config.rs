//! # Configuration Management
//!
//! Two layers of configuration:
//!
//! - [`HydraConfig`]: runner and persister settings (hydra binary, results
//!   directory, defaults for tasks, timeout and stop-on-success). Passed
//!   explicitly to [`HydraAttack`](crate::external::hydra::HydraAttack) and
//!   [`ResultStore`](crate::output::ResultStore).
//! - [`Config`]: everything the command line asks for, i.e. one
//!   [`AttackRequest`] plus output options, layered as defaults < config
//!   file < environment < flags.
//!
//! ## Example
//!
//! ```rust
//! use rusthydra::config::Config;
//!
//! let config = Config::from_args(&[
//!     "rusthydra".to_string(),
//!     "ftp".to_string(),
//!     "--ip".to_string(),
//!     "127.0.0.1".to_string(),
//!     "-P".to_string(),
//!     "passwords.txt".to_string(),
//!     "--json".to_string(),
//! ])?;
//!
//! assert_eq!(config.request.protocol, "ftp");
//! assert!(config.json_mode);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::config_file::ConfigFile;
use crate::constants;
use crate::error::{HydraError, Result};
use crate::logging::LogConfig;
use crate::models::{AttackRequest, CredentialSource};
use crate::validation;
use std::path::PathBuf;
use std::time::Duration;

/// Settings shared by every attack a runner performs
#[derive(Debug, Clone, PartialEq)]
pub struct HydraConfig {
    /// Program name or path of the hydra binary
    pub hydra_path: String,
    /// Directory receiving saved attack results
    pub results_dir: PathBuf,
    /// Task count used when a request does not set one
    pub default_tasks: u32,
    /// Attack timeout used when a request does not set one
    pub default_timeout: Duration,
    /// Whether hydra stops after the first hit (`-f`) by default
    pub stop_on_success: bool,
}

impl Default for HydraConfig {
    fn default() -> Self {
        Self {
            hydra_path: constants::HYDRA_BINARY.to_string(),
            results_dir: PathBuf::from(constants::DEFAULT_RESULTS_DIR),
            default_tasks: constants::DEFAULT_TASKS,
            default_timeout: Duration::from_secs(constants::DEFAULT_ATTACK_TIMEOUT_SECS),
            stop_on_success: true,
        }
    }
}

impl HydraConfig {
    /// Override fields from `RUSTHYDRA_*` environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var("RUSTHYDRA_HYDRA_PATH") {
            self.hydra_path = path;
        }

        if let Ok(dir) = std::env::var("RUSTHYDRA_RESULTS_DIR") {
            self.results_dir = PathBuf::from(dir);
        }

        if let Ok(tasks) = std::env::var("RUSTHYDRA_TASKS") {
            self.default_tasks = tasks
                .parse::<u32>()
                .map_err(|_| HydraError::config("Invalid RUSTHYDRA_TASKS value"))?;
        }

        if let Ok(timeout) = std::env::var("RUSTHYDRA_TIMEOUT") {
            let secs = timeout
                .parse::<u64>()
                .map_err(|_| HydraError::config("Invalid RUSTHYDRA_TIMEOUT value"))?;
            self.default_timeout = Duration::from_secs(secs);
        }

        if let Ok(stop) = std::env::var("RUSTHYDRA_STOP_ON_SUCCESS") {
            self.stop_on_success = stop
                .parse::<bool>()
                .map_err(|_| HydraError::config("Invalid RUSTHYDRA_STOP_ON_SUCCESS value"))?;
        }

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.hydra_path.trim().is_empty() {
            return Err(HydraError::config("Hydra path cannot be empty"));
        }

        if self.results_dir.as_os_str().is_empty() {
            return Err(HydraError::config("Results directory cannot be empty"));
        }

        validation::validate_task_count(self.default_tasks)
            .map_err(|e| HydraError::config(format!("Invalid default task count: {}", e)))?;
        validation::validate_timeout_secs(self.default_timeout.as_secs())
            .map_err(|e| HydraError::config(format!("Invalid default timeout: {}", e)))?;

        Ok(())
    }
}

/// Command-line configuration for one run
#[derive(Debug, Clone)]
pub struct Config {
    /// The attack to perform
    pub request: AttackRequest,
    /// Runner and persister settings
    pub hydra: HydraConfig,
    /// Print the result as JSON instead of a summary
    pub json_mode: bool,
    /// Save the result under the results directory
    pub save: bool,
    /// Logging configuration
    pub logging: LogConfig,
}

impl Config {
    /// Create configuration from command line arguments
    ///
    /// `args[0]` is the program name.
    pub fn from_args(args: &[String]) -> Result<Self> {
        if args.len() < 2 {
            return Err(HydraError::config("Protocol and target arguments required"));
        }

        let args = ParsedArgs::parse(args)?;

        let mut hydra = HydraConfig::default();
        if let Some(path) = args.flag_value(&["--config"]) {
            ConfigFile::load_from_file(&path)?.apply_to(&mut hydra);
        }
        hydra.apply_env()?;

        if let Some(dir) = args.flag_value(&["--results-dir"]) {
            hydra.results_dir = PathBuf::from(dir);
        }
        if let Some(path) = args.flag_value(&["--hydra-path"]) {
            hydra.hydra_path = path;
        }
        hydra.validate()?;

        let protocol = match args.flag_value(&["--protocol"]) {
            Some(protocol) => protocol,
            None => args
                .positional()
                .ok_or_else(|| HydraError::config("Protocol argument required"))?,
        };
        let protocol = validation::validate_protocol(&protocol)?;

        let ip = args.flag_value(&["--ip"]);
        let hostname = args.flag_value(&["--host", "--hostname"]);
        if ip.is_none() && hostname.is_none() {
            return Err(HydraError::config("Target required: use --ip or --host"));
        }

        let login = args.credential_source("-l", "-L")?;
        let password = args.credential_source("-p", "-P")?;

        let port = match args.flag_value(&["-s", "--port"]) {
            Some(port) => Some(validation::validate_port(port.parse::<u16>().map_err(|_| {
                HydraError::config(format!("Invalid port: {}", port))
            })?)?),
            None => None,
        };

        let tasks = match args.flag_value(&["-t", "--tasks"]) {
            Some(tasks) => Some(validation::validate_task_count(
                tasks
                    .parse::<u32>()
                    .map_err(|_| HydraError::config(format!("Invalid task count: {}", tasks)))?,
            )?),
            None => None,
        };

        let timeout = match args.flag_value(&["--timeout"]) {
            Some(secs) => Some(Duration::from_secs(validation::validate_timeout_secs(
                secs.parse::<u64>()
                    .map_err(|_| HydraError::config(format!("Invalid timeout value: {}", secs)))?,
            )?)),
            None => None,
        };

        let stop_on_success = if args.has_flag("-f") {
            Some(true)
        } else if args.has_flag("--no-stop") {
            Some(false)
        } else {
            None
        };

        let request = AttackRequest {
            ip,
            hostname,
            protocol,
            login,
            password,
            port,
            tasks,
            stop_on_success,
            timeout,
        };

        Ok(Config {
            request,
            hydra,
            json_mode: args.has_flag("--json"),
            save: args.has_flag("--save"),
            logging: LogConfig::from_env()?,
        })
    }
}

/// Flags that take the next argument as their value
const VALUE_FLAGS: &[&str] = &[
    "--config",
    "--results-dir",
    "--hydra-path",
    "--protocol",
    "--ip",
    "--host",
    "--hostname",
    "-l",
    "-L",
    "-p",
    "-P",
    "-s",
    "--port",
    "-t",
    "--tasks",
    "--timeout",
];

/// Command line split in a single pass, so a flag's value is never itself
/// read as a flag (`-p -f` is the password "-f")
#[derive(Debug, Default)]
struct ParsedArgs {
    values: Vec<(String, String)>,
    switches: Vec<String>,
    positionals: Vec<String>,
}

impl ParsedArgs {
    /// `args[0]` is the program name and is skipped
    fn parse(args: &[String]) -> Result<Self> {
        let mut parsed = Self::default();
        let mut iter = args.iter().skip(1);

        while let Some(arg) = iter.next() {
            if VALUE_FLAGS.contains(&arg.as_str()) {
                let value = iter
                    .next()
                    .ok_or_else(|| HydraError::config(format!("Missing value for {}", arg)))?;
                parsed.values.push((arg.clone(), value.clone()));
            } else if arg.starts_with('-') {
                parsed.switches.push(arg.clone());
            } else {
                parsed.positionals.push(arg.clone());
            }
        }

        Ok(parsed)
    }

    fn has_flag(&self, flag: &str) -> bool {
        self.switches.iter().any(|arg| arg == flag)
    }

    /// Value of the first occurrence of any of `flags`
    fn flag_value(&self, flags: &[&str]) -> Option<String> {
        self.values
            .iter()
            .find(|(flag, _)| flags.contains(&flag.as_str()))
            .map(|(_, value)| value.clone())
    }

    fn positional(&self) -> Option<String> {
        self.positionals.first().cloned()
    }

    fn credential_source(
        &self,
        single_flag: &str,
        file_flag: &str,
    ) -> Result<Option<CredentialSource>> {
        match (self.flag_value(&[single_flag]), self.flag_value(&[file_flag])) {
            (Some(_), Some(_)) => Err(HydraError::config(format!(
                "{} and {} are mutually exclusive",
                single_flag, file_flag
            ))),
            (Some(value), None) => Ok(Some(CredentialSource::Single(value))),
            (None, Some(path)) => Ok(Some(CredentialSource::File(PathBuf::from(path)))),
            (None, None) => Ok(None),
        }
    }
}
