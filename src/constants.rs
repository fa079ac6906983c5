//! # Configuration Constants
//!
//! Defaults and limits used throughout rusthydra.
//!
//! ## Example
//!
//! ```rust
//! use rusthydra::constants::*;
//! use std::time::Duration;
//!
//! let timeout = Duration::from_secs(DEFAULT_ATTACK_TIMEOUT_SECS);
//! assert!(DEFAULT_TASKS <= limits::MAX_TASKS);
//! ```

/// Name of the external binary, resolved through `PATH`
pub const HYDRA_BINARY: &str = "hydra";

/// Default number of parallel hydra tasks (`-t`)
pub const DEFAULT_TASKS: u32 = 16;

/// Default wall-clock bound for a single attack in seconds
pub const DEFAULT_ATTACK_TIMEOUT_SECS: u64 = 300;

/// Default directory receiving saved attack results
pub const DEFAULT_RESULTS_DIR: &str = "hydra_results";

/// Prefix of every saved result file
pub const RESULT_FILE_PREFIX: &str = "attack_";

/// Timeout for the `hydra -h` version probe in seconds
pub const VERSION_PROBE_TIMEOUT_SECS: u64 = 5;

/// Upper bound on captured hydra stderr, in bytes
pub const MAX_STDERR_CAPTURE: usize = 64 * 1024;

/// Longest output line kept from hydra; the rest of the line is discarded
pub const MAX_LINE_LENGTH: usize = 8 * 1024;

/// Error text reported when the binary cannot be launched
pub const NOT_INSTALLED_MESSAGE: &str = "Hydra is not installed or not found in PATH";

/// Input limits
pub mod limits {
    /// Hydra refuses more than 64 tasks per target
    pub const MAX_TASKS: u32 = 64;
    /// Minimum task count
    pub const MIN_TASKS: u32 = 1;
    /// Maximum hostname length
    pub const MAX_HOSTNAME_LENGTH: usize = 255;
    /// Maximum length of a single hostname label
    pub const MAX_LABEL_LENGTH: usize = 63;
    /// Upper bound for an attack timeout (one day)
    pub const MAX_TIMEOUT_SECS: u64 = 86_400;
    /// Upper bound for a protocol identifier
    pub const MAX_PROTOCOL_LENGTH: usize = 32;
}
