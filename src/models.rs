//! # Attack Data Model
//!
//! Request, credential and result types shared by the runner, the parser
//! and the persister.

use crate::utils::epoch_seconds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Where hydra takes logins or passwords from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// A single literal value (`-l` / `-p`)
    Single(String),
    /// A wordlist file (`-L` / `-P`)
    File(PathBuf),
}

impl CredentialSource {
    pub fn single(value: impl Into<String>) -> Self {
        Self::Single(value.into())
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }
}

/// Parameters of one attack
///
/// Optional knobs left as `None` fall back to the runner's
/// [`HydraConfig`](crate::config::HydraConfig).
#[derive(Debug, Clone, Default)]
pub struct AttackRequest {
    pub ip: Option<String>,
    pub hostname: Option<String>,
    pub protocol: String,
    pub login: Option<CredentialSource>,
    pub password: Option<CredentialSource>,
    pub port: Option<u16>,
    pub tasks: Option<u32>,
    pub stop_on_success: Option<bool>,
    pub timeout: Option<Duration>,
}

impl AttackRequest {
    /// Attack against an IP address
    pub fn ip(ip: impl Into<String>, protocol: impl Into<String>) -> Self {
        Self {
            ip: Some(ip.into()),
            protocol: protocol.into(),
            ..Self::default()
        }
    }

    /// Attack against a hostname
    pub fn hostname(hostname: impl Into<String>, protocol: impl Into<String>) -> Self {
        Self {
            hostname: Some(hostname.into()),
            protocol: protocol.into(),
            ..Self::default()
        }
    }

    pub fn with_login(mut self, login: CredentialSource) -> Self {
        self.login = Some(login);
        self
    }

    pub fn with_password(mut self, password: CredentialSource) -> Self {
        self.password = Some(password);
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_tasks(mut self, tasks: u32) -> Self {
        self.tasks = Some(tasks);
        self
    }

    pub fn with_stop_on_success(mut self, stop: bool) -> Self {
        self.stop_on_success = Some(stop);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Whatever target was supplied, valid or not, for error reporting
    pub fn raw_target(&self) -> String {
        match (&self.ip, &self.hostname) {
            (Some(ip), None) => ip.clone(),
            (None, Some(hostname)) => hostname.clone(),
            (Some(ip), Some(hostname)) => format!("{}/{}", ip, hostname),
            (None, None) => String::new(),
        }
    }
}

/// A login found by hydra
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(default)]
    pub port: String,
    /// Absent for password-only services such as SNMP
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub password: String,
    pub timestamp: DateTime<Utc>,
}

/// Lifecycle of a single attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackStatus {
    Pending,
    Running,
    /// At least one credential was found
    Success,
    /// Hydra ran to completion without finding anything
    Completed,
    Timeout,
    Failed,
}

impl AttackStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, AttackStatus::Pending | AttackStatus::Running)
    }
}

impl fmt::Display for AttackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttackStatus::Pending => "pending",
            AttackStatus::Running => "running",
            AttackStatus::Success => "success",
            AttackStatus::Completed => "completed",
            AttackStatus::Timeout => "timeout",
            AttackStatus::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Outcome of one attack invocation
///
/// Created `pending`, filled while hydra runs, frozen once a terminal
/// status is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackResult {
    pub target: String,
    pub protocol: String,
    pub port: Option<u16>,
    pub credentials: Vec<Credential>,
    pub start_time: f64,
    pub end_time: Option<f64>,
    pub status: AttackStatus,
    pub error: Option<String>,
}

impl AttackResult {
    pub fn new(target: impl Into<String>, protocol: impl Into<String>, port: Option<u16>) -> Self {
        Self {
            target: target.into(),
            protocol: protocol.into(),
            port,
            credentials: Vec::new(),
            start_time: epoch_seconds(),
            end_time: None,
            status: AttackStatus::Pending,
            error: None,
        }
    }

    /// A result that failed before hydra was launched
    pub fn failed(
        target: impl Into<String>,
        protocol: impl Into<String>,
        port: Option<u16>,
        error: impl Into<String>,
    ) -> Self {
        let mut result = Self::new(target, protocol, port);
        result.finish(AttackStatus::Failed, Some(error.into()));
        result
    }

    pub fn mark_running(&mut self) {
        if self.status == AttackStatus::Pending {
            self.status = AttackStatus::Running;
        }
    }

    /// Append a credential; ignored once the result is finalized
    pub fn add_credential(&mut self, credential: Credential) {
        if !self.status.is_terminal() {
            self.credentials.push(credential);
        }
    }

    /// Set the terminal status and stamp `end_time`
    ///
    /// `Success` without credentials is recorded as `Completed`. Calls after
    /// the first terminal status are ignored.
    pub fn finish(&mut self, status: AttackStatus, error: Option<String>) {
        if self.status.is_terminal() {
            return;
        }

        self.status = match status {
            AttackStatus::Success if self.credentials.is_empty() => AttackStatus::Completed,
            other => other,
        };
        self.error = error;
        self.end_time = Some(epoch_seconds());
    }

    pub fn is_success(&self) -> bool {
        self.status == AttackStatus::Success
    }

    /// Wall-clock duration in seconds, once finished
    pub fn duration_secs(&self) -> Option<f64> {
        self.end_time.map(|end| (end - self.start_time).max(0.0))
    }
}
