//! # Input Validation Module
//!
//! Target and parameter checks run before hydra is ever launched.
//!
//! The three target predicates (`validate_ip`, `validate_hostname`,
//! `validate_target`) are plain boolean/option functions so callers can
//! turn a bad target into a failed attack result instead of an error. The
//! remaining checks return [`Result`] for the CLI and config layers.
//!
//! ## Example
//!
//! ```rust
//! use rusthydra::validation::*;
//!
//! assert!(validate_ip("192.168.1.1"));
//! assert!(validate_hostname("sub.example.com"));
//! assert_eq!(
//!     validate_target(None, Some("example.com")),
//!     Some("example.com".to_string())
//! );
//! assert_eq!(validate_target(Some("10.0.0.1"), Some("example.com")), None);
//! ```

use crate::constants::limits;
use crate::error::{HydraError, Result};
use std::net::IpAddr;

/// Returns true if `ip` is a well-formed IPv4 or IPv6 address
pub fn validate_ip(ip: &str) -> bool {
    ip.parse::<IpAddr>().is_ok()
}

/// Returns true if `hostname` is a well-formed DNS name
///
/// Labels are 1-63 ASCII alphanumerics or hyphens and may not start or end
/// with a hyphen. The whole name is at most 255 characters.
pub fn validate_hostname(hostname: &str) -> bool {
    if hostname.is_empty() || hostname.len() > limits::MAX_HOSTNAME_LENGTH {
        return false;
    }

    hostname.split('.').all(is_valid_label)
}

fn is_valid_label(label: &str) -> bool {
    if label.is_empty() || label.len() > limits::MAX_LABEL_LENGTH {
        return false;
    }

    if label.starts_with('-') || label.ends_with('-') {
        return false;
    }

    label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Picks the attack target out of an IP / hostname pair
///
/// Exactly one of the two must be given and valid. The accepted value is
/// returned unchanged.
pub fn validate_target(ip: Option<&str>, hostname: Option<&str>) -> Option<String> {
    match (ip, hostname) {
        (Some(ip), None) if validate_ip(ip) => Some(ip.to_string()),
        (None, Some(hostname)) if validate_hostname(hostname) => Some(hostname.to_string()),
        _ => None,
    }
}

/// Validates the hydra task count (`-t`)
pub fn validate_task_count(tasks: u32) -> Result<u32> {
    if !(limits::MIN_TASKS..=limits::MAX_TASKS).contains(&tasks) {
        return Err(HydraError::validation(format!(
            "Task count must be between {} and {}",
            limits::MIN_TASKS,
            limits::MAX_TASKS
        )));
    }

    Ok(tasks)
}

/// Validates a service port override
pub fn validate_port(port: u16) -> Result<u16> {
    if port == 0 {
        return Err(HydraError::validation("Port cannot be 0"));
    }

    Ok(port)
}

/// Validates an attack timeout expressed in seconds
pub fn validate_timeout_secs(secs: u64) -> Result<u64> {
    if secs == 0 {
        return Err(HydraError::validation("Timeout must be greater than 0"));
    }

    if secs > limits::MAX_TIMEOUT_SECS {
        return Err(HydraError::validation(format!(
            "Timeout cannot exceed {} seconds",
            limits::MAX_TIMEOUT_SECS
        )));
    }

    Ok(secs)
}

/// Validates a hydra service identifier such as `ssh` or `http-post-form`
pub fn validate_protocol(protocol: &str) -> Result<String> {
    if protocol.is_empty() {
        return Err(HydraError::validation("Protocol cannot be empty"));
    }

    if protocol.len() > limits::MAX_PROTOCOL_LENGTH {
        return Err(HydraError::validation("Protocol identifier too long"));
    }

    if !protocol
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(HydraError::validation(format!(
            "Invalid protocol identifier: {}",
            protocol
        )));
    }

    Ok(protocol.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ip() {
        assert!(validate_ip("192.168.1.1"));
        assert!(validate_ip("2001:0db8:85a3:0000:0000:8a2e:0370:7334"));
        assert!(validate_ip("::1"));
        assert!(!validate_ip("256.256.256.256"));
        assert!(!validate_ip("invalid_ip"));
        assert!(!validate_ip("127.0.0."));
        assert!(!validate_ip(""));
    }

    #[test]
    fn test_validate_hostname() {
        assert!(validate_hostname("example.com"));
        assert!(validate_hostname("sub.example.com"));
        assert!(validate_hostname("localhost"));
        assert!(validate_hostname("my-host01.lan"));
        assert!(!validate_hostname("invalid..com"));
        assert!(!validate_hostname(&"a".repeat(256)));
        assert!(!validate_hostname("-invalid.com"));
        assert!(!validate_hostname("invalid-.com"));
        assert!(!validate_hostname("example.com."));
        assert!(!validate_hostname("under_score.com"));
        assert!(!validate_hostname(&format!("{}.com", "a".repeat(64))));
        assert!(!validate_hostname(""));
    }

    #[test]
    fn test_validate_target() {
        assert_eq!(
            validate_target(Some("192.168.1.1"), None),
            Some("192.168.1.1".to_string())
        );
        assert_eq!(
            validate_target(None, Some("example.com")),
            Some("example.com".to_string())
        );
        assert_eq!(validate_target(Some("invalid"), None), None);
        assert_eq!(validate_target(None, Some("invalid..com")), None);
        assert_eq!(validate_target(None, None), None);
        assert_eq!(validate_target(Some("10.0.0.1"), Some("example.com")), None);
    }

    #[test]
    fn test_validate_task_count() {
        assert!(validate_task_count(1).is_ok());
        assert!(validate_task_count(16).is_ok());
        assert!(validate_task_count(64).is_ok());
        assert!(validate_task_count(0).is_err());
        assert!(validate_task_count(65).is_err());
    }

    #[test]
    fn test_validate_port_and_timeout() {
        assert!(validate_port(22).is_ok());
        assert!(validate_port(0).is_err());

        assert!(validate_timeout_secs(30).is_ok());
        assert!(validate_timeout_secs(0).is_err());
        assert!(validate_timeout_secs(86_401).is_err());
    }

    #[test]
    fn test_validate_protocol() {
        assert!(validate_protocol("ssh").is_ok());
        assert!(validate_protocol("http-post-form").is_ok());
        assert!(validate_protocol("pop3").is_ok());
        assert!(validate_protocol("").is_err());
        assert!(validate_protocol("ssh;rm").is_err());
        assert!(validate_protocol("SSH").is_err());
    }
}
