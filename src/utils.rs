//! # Utility Functions
//!
//! Small helpers shared by the runner and the CLI: dependency checks and
//! clock access.

use crate::error::{HydraError, Result};
use std::process::Command;

/// Check that the hydra binary is reachable
///
/// Returns an external tool error carrying installation hints when the
/// binary is missing. Nothing is installed automatically.
pub fn check_dependencies(hydra_path: &str) -> Result<()> {
    if check_binary_in_path(hydra_path) {
        return Ok(());
    }

    Err(HydraError::external_tool(
        "dependency_check",
        format!(
            "Missing required tool:\n  {} (THC-Hydra network login cracker)\n\nInstall with:\n  sudo apt install hydra  # Debian/Ubuntu\n  sudo pacman -S hydra  # Arch\n  brew install hydra  # macOS\n\n  # Or build from source:\n  git clone https://github.com/vanhauser-thc/thc-hydra.git\n  cd thc-hydra && ./configure && make && sudo make install",
            hydra_path
        ),
    ))
}

/// Check if a binary exists in the system PATH
///
/// Paths containing a separator are checked directly on disk.
pub fn check_binary_in_path(bin: &str) -> bool {
    if bin.contains(std::path::MAIN_SEPARATOR) {
        return std::path::Path::new(bin).is_file();
    }

    match Command::new("which").arg(bin).output() {
        Ok(out) => out.status.success(),
        Err(_) => false,
    }
}

/// Current time as fractional seconds since the Unix epoch
pub fn epoch_seconds() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary() {
        assert!(!check_binary_in_path("definitely_not_a_real_command_12345"));
        assert!(check_dependencies("definitely_not_a_real_command_12345").is_err());
    }

    #[test]
    fn test_epoch_seconds_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(epoch_seconds() > 1_577_836_800.0);
    }
}
