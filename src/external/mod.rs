//! # External Tool Integration
//!
//! Process plumbing for driving hydra. Two layers live here:
//!
//! - [`BaseTool`] runs a binary to completion with a timeout and hands back
//!   its collected [`Output`]. Used for short probes such as `hydra -h`.
//! - [`ProcessSpawner`] launches a long-running child with piped output
//!   streams so the caller can read them line by line while it runs. On
//!   Unix the child leads its own process group and killing it takes down
//!   its forked workers too. The
//!   attack runner goes through this trait, which lets tests substitute
//!   in-memory processes.
//!
//! ## Example
//!
//! ```rust,no_run
//! use rusthydra::external::BaseTool;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tool = BaseTool::new("echo")?;
//!     let output = tool.execute_command(&["hello"], Duration::from_secs(5)).await?;
//!
//!     println!("Output: {}", String::from_utf8_lossy(&output.stdout));
//!     Ok(())
//! }
//! ```

pub mod hydra;

use crate::error::{HydraError, Result};
use async_trait::async_trait;
use std::io;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::io::AsyncRead;

/// Trait for external tool execution with timeout support
#[async_trait]
pub trait ExternalTool {
    /// Execute the tool with given arguments and timeout
    async fn execute_with_timeout(&self, args: &[&str], timeout: Duration) -> Result<Output>;
}

/// Base implementation for run-to-completion tool execution
#[derive(Debug)]
pub struct BaseTool {
    pub name: String,
    pub binary_path: String,
}

impl BaseTool {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let binary_path = Self::find_binary(&name)?;
        Ok(Self { name, binary_path })
    }

    fn find_binary(name: &str) -> Result<String> {
        use std::process::Command;

        if name.contains(std::path::MAIN_SEPARATOR) {
            if std::path::Path::new(name).is_file() {
                return Ok(name.to_string());
            }
            return Err(HydraError::external_tool(name, "Tool not found at given path"));
        }

        let output = Command::new("which")
            .arg(name)
            .output()
            .map_err(|e| HydraError::external_tool("which", e.to_string()))?;

        if !output.status.success() {
            return Err(HydraError::external_tool(name, "Tool not found in PATH"));
        }

        let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if path.is_empty() {
            return Err(HydraError::external_tool(name, "Tool path is empty"));
        }

        Ok(path)
    }

    pub async fn execute_command(&self, args: &[&str], timeout_duration: Duration) -> Result<Output> {
        use tokio::process::Command;
        use tokio::time::timeout as tokio_timeout;

        let mut cmd = Command::new(&self.binary_path);
        cmd.args(args).stdin(Stdio::null()).kill_on_drop(true);

        let output = tokio_timeout(timeout_duration, cmd.output())
            .await
            .map_err(|_| HydraError::timeout(timeout_duration.as_millis() as u64))?;

        output.map_err(|e| HydraError::external_tool(self.name.clone(), e.to_string()))
    }
}

#[async_trait]
impl ExternalTool for BaseTool {
    async fn execute_with_timeout(&self, args: &[&str], timeout: Duration) -> Result<Output> {
        self.execute_command(args, timeout).await
    }
}

/// Boxed readable output stream of a child
pub type OutputStream = Box<dyn AsyncRead + Send + Unpin>;

/// Handle on a running child process
#[async_trait]
pub trait ChildHandle: Send {
    /// Wait for the child to exit, returning its exit code if it has one
    async fn wait(&mut self) -> io::Result<Option<i32>>;

    /// Forcibly terminate the child, along with any processes it started,
    /// and reap it
    async fn kill(&mut self) -> io::Result<()>;
}

/// A freshly launched child with its output streams detached
pub struct SpawnedProcess {
    pub stdout: OutputStream,
    pub stderr: OutputStream,
    pub child: Box<dyn ChildHandle>,
}

/// Launches child processes from an argument vector
///
/// `argv[0]` is the program, the rest are its arguments.
#[async_trait]
pub trait ProcessSpawner: Send + Sync {
    async fn spawn(&self, argv: &[String]) -> io::Result<SpawnedProcess>;
}

/// Spawner backed by real OS processes
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSpawner;

#[async_trait]
impl ProcessSpawner for TokioSpawner {
    async fn spawn(&self, argv: &[String]) -> io::Result<SpawnedProcess> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty command"))?;

        let mut command = tokio::process::Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Hydra forks one worker per task; they share the leader's group
        #[cfg(unix)]
        command.process_group(0);

        let mut child = command.spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("child stdout was not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::other("child stderr was not captured"))?;

        Ok(SpawnedProcess {
            stdout: Box::new(stdout),
            stderr: Box::new(stderr),
            child: Box::new(GroupedChild::new(child)),
        })
    }
}

/// Child launched as the leader of its own process group
struct GroupedChild {
    child: tokio::process::Child,
    #[cfg_attr(not(unix), allow(dead_code))]
    pgid: Option<u32>,
}

impl GroupedChild {
    fn new(child: tokio::process::Child) -> Self {
        Self {
            pgid: child.id(),
            child,
        }
    }
}

#[async_trait]
impl ChildHandle for GroupedChild {
    async fn wait(&mut self) -> io::Result<Option<i32>> {
        let status = self.child.wait().await?;
        Ok(status.code())
    }

    /// Kill every process in the group, then reap the leader
    async fn kill(&mut self) -> io::Result<()> {
        #[cfg(unix)]
        let group = match self.pgid {
            Some(pgid) => kill_process_group(pgid),
            None => Ok(()),
        };
        #[cfg(not(unix))]
        let group: io::Result<()> = Ok(());

        self.child.kill().await?;
        group
    }
}

#[cfg(unix)]
fn kill_process_group(pgid: u32) -> io::Result<()> {
    let pgid = libc::pid_t::try_from(pgid)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "process id out of range"))?;

    // SAFETY: kill(2) takes no pointers
    if unsafe { libc::kill(-pgid, libc::SIGKILL) } == 0 {
        return Ok(());
    }

    let err = io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::ESRCH) {
        // group already gone
        Ok(())
    } else {
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_tool_invalid_command() {
        let result = BaseTool::new("definitely_not_a_real_command_12345");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_tokio_spawner_missing_binary() {
        let argv = vec!["definitely_not_a_real_command_12345".to_string()];
        let err = TokioSpawner.spawn(&argv).await.err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_tokio_spawner_empty_argv() {
        let err = TokioSpawner.spawn(&[]).await.err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
