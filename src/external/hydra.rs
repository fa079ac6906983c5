//! Hydra invocation: command construction, attack supervision and version
//! probing.

use crate::config::HydraConfig;
use crate::constants;
use crate::error::{HydraError, Result};
use crate::external::{
    BaseTool, ChildHandle, ExternalTool, ProcessSpawner, SpawnedProcess, TokioSpawner,
};
use crate::logging;
use crate::models::{AttackRequest, AttackResult, AttackStatus, CredentialSource};
use crate::parser;
use crate::shutdown::ShutdownSignal;
use crate::validation;
use std::future::Future;
use std::io;
use std::net::Ipv6Addr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, error, info, trace, warn, Instrument};

/// Build hydra's argument vector
///
/// The program comes first and the `<protocol>://<target>` URL last. IPv6
/// targets are bracketed.
#[allow(clippy::too_many_arguments)]
pub fn build_command(
    program: &str,
    target: &str,
    protocol: &str,
    login: Option<&CredentialSource>,
    password: Option<&CredentialSource>,
    tasks: u32,
    port: Option<u16>,
    stop_on_success: bool,
) -> Vec<String> {
    let mut command = vec![program.to_string()];

    if let Some(login) = login {
        push_source(&mut command, login, "-l", "-L");
    }

    if let Some(password) = password {
        push_source(&mut command, password, "-p", "-P");
    }

    command.push("-t".to_string());
    command.push(tasks.to_string());

    if stop_on_success {
        command.push("-f".to_string());
    }

    if let Some(port) = port {
        command.push("-s".to_string());
        command.push(port.to_string());
    }

    command.push(target_url(protocol, target));
    command
}

fn push_source(command: &mut Vec<String>, source: &CredentialSource, single: &str, file: &str) {
    match source {
        CredentialSource::Single(value) => {
            command.push(single.to_string());
            command.push(value.clone());
        }
        CredentialSource::File(path) => {
            command.push(file.to_string());
            command.push(path.display().to_string());
        }
    }
}

fn target_url(protocol: &str, target: &str) -> String {
    if target.parse::<Ipv6Addr>().is_ok() {
        format!("{}://[{}]", protocol, target)
    } else {
        format!("{}://{}", protocol, target)
    }
}

/// How the supervised child stopped
enum Outcome {
    Exited(io::Result<Option<i32>>),
    TimedOut,
    Interrupted(ShutdownSignal),
}

/// Runs hydra attacks and collects their results
///
/// Each call to [`run_attack`](Self::run_attack) owns its own child process
/// and [`AttackResult`]; a single `HydraAttack` can serve many attacks.
pub struct HydraAttack {
    config: HydraConfig,
    spawner: Arc<dyn ProcessSpawner>,
}

impl HydraAttack {
    /// Runner launching real hydra processes
    pub fn new(config: HydraConfig) -> Self {
        Self::with_spawner(config, TokioSpawner)
    }

    /// Runner launching processes through a custom spawner
    pub fn with_spawner(config: HydraConfig, spawner: impl ProcessSpawner + 'static) -> Self {
        Self {
            config,
            spawner: Arc::new(spawner),
        }
    }

    /// Argument vector for `request` against an already validated target
    pub fn command_for(&self, target: &str, request: &AttackRequest) -> Vec<String> {
        build_command(
            &self.config.hydra_path,
            target,
            &request.protocol,
            request.login.as_ref(),
            request.password.as_ref(),
            request.tasks.unwrap_or(self.config.default_tasks),
            request.port,
            request.stop_on_success.unwrap_or(self.config.stop_on_success),
        )
    }

    /// Run one attack to a terminal state
    ///
    /// Never fails: validation errors, a missing binary, timeouts and bad
    /// exits all come back as a finished [`AttackResult`].
    pub async fn run_attack(&self, request: &AttackRequest) -> AttackResult {
        self.run_attack_until(request, std::future::pending()).await
    }

    /// Like [`run_attack`](Self::run_attack), but also stops when `shutdown`
    /// resolves, killing the child and reporting the attack as failed
    pub async fn run_attack_until<F>(&self, request: &AttackRequest, shutdown: F) -> AttackResult
    where
        F: Future<Output = ShutdownSignal>,
    {
        let port = request.port;

        let Some(target) =
            validation::validate_target(request.ip.as_deref(), request.hostname.as_deref())
        else {
            warn!(target = %request.raw_target(), "Rejected attack target");
            return AttackResult::failed(
                request.raw_target(),
                request.protocol.clone(),
                port,
                "Invalid target: provide exactly one valid IP address or hostname",
            );
        };

        let timeout = request.timeout.unwrap_or(self.config.default_timeout);
        if let Err(e) = self.check_parameters(request, timeout) {
            warn!(target = %target, error = %e, "Rejected attack parameters");
            return AttackResult::failed(target, request.protocol.clone(), port, e.to_string());
        }

        let span = logging::attack_span(&target, &request.protocol);
        self.supervise(target, request, timeout, shutdown)
            .instrument(span)
            .await
    }

    fn check_parameters(&self, request: &AttackRequest, timeout: Duration) -> Result<()> {
        validation::validate_protocol(&request.protocol)?;
        validation::validate_task_count(request.tasks.unwrap_or(self.config.default_tasks))?;
        if let Some(port) = request.port {
            validation::validate_port(port)?;
        }
        if timeout.is_zero() {
            return Err(HydraError::validation("Timeout must be greater than 0"));
        }
        Ok(())
    }

    async fn supervise<F>(
        &self,
        target: String,
        request: &AttackRequest,
        timeout: Duration,
        shutdown: F,
    ) -> AttackResult
    where
        F: Future<Output = ShutdownSignal>,
    {
        let argv = self.command_for(&target, request);
        let command_line = argv.join(" ");
        let mut result = AttackResult::new(target, request.protocol.clone(), request.port);
        let started = Instant::now();

        debug!(command = %command_line, "Launching hydra");

        let process = match self.spawner.spawn(&argv).await {
            Ok(process) => process,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                error!(program = %self.config.hydra_path, "Hydra binary not found");
                result.finish(
                    AttackStatus::Failed,
                    Some(constants::NOT_INSTALLED_MESSAGE.to_string()),
                );
                return result;
            }
            Err(e) => {
                error!(error = %e, "Failed to launch hydra");
                result.finish(
                    AttackStatus::Failed,
                    Some(format!("Failed to start hydra: {}", e)),
                );
                return result;
            }
        };

        result.mark_running();

        let SpawnedProcess {
            stdout,
            stderr,
            mut child,
        } = process;
        let mut stderr_capture = String::new();

        let outcome = {
            let supervised = async {
                tokio::try_join!(
                    read_credentials(stdout, &mut result),
                    capture_stderr(stderr, &mut stderr_capture),
                )?;
                child.wait().await
            };

            tokio::select! {
                finished = tokio::time::timeout(timeout, supervised) => match finished {
                    Ok(exit) => Outcome::Exited(exit),
                    Err(_) => Outcome::TimedOut,
                },
                signal = shutdown => Outcome::Interrupted(signal),
            }
        };

        match outcome {
            Outcome::Exited(Ok(code)) => {
                if !result.credentials.is_empty() {
                    result.finish(AttackStatus::Success, None);
                } else if code == Some(0) {
                    result.finish(AttackStatus::Completed, None);
                } else {
                    result.finish(AttackStatus::Failed, Some(exit_error(code, &stderr_capture)));
                }
            }
            Outcome::Exited(Err(e)) if e.kind() == io::ErrorKind::TimedOut => {
                warn!(error = %e, "Reading hydra output timed out");
                terminate(child.as_mut()).await;
                result.finish(
                    AttackStatus::Timeout,
                    Some(format!("Attack timed out while reading hydra output: {}", e)),
                );
            }
            Outcome::Exited(Err(e)) => {
                error!(error = %e, "I/O failure while supervising hydra");
                terminate(child.as_mut()).await;
                result.finish(
                    AttackStatus::Failed,
                    Some(format!("I/O error while running hydra: {}", e)),
                );
            }
            Outcome::TimedOut => {
                warn!(timeout_secs = timeout.as_secs_f64(), "Attack timed out, killing hydra");
                terminate(child.as_mut()).await;
                result.finish(
                    AttackStatus::Timeout,
                    Some(format!(
                        "Attack timed out after {} seconds",
                        timeout.as_secs_f64()
                    )),
                );
            }
            Outcome::Interrupted(signal) => {
                warn!(signal = %signal, "Attack interrupted, killing hydra");
                terminate(child.as_mut()).await;
                result.finish(
                    AttackStatus::Failed,
                    Some(format!("Attack interrupted by {}", signal)),
                );
            }
        }

        let duration_ms = started.elapsed().as_millis() as u64;
        logging::log_external_tool(
            &self.config.hydra_path,
            &command_line,
            duration_ms,
            result.status != AttackStatus::Failed,
        );
        logging::log_attack_completion(&result, duration_ms);

        result
    }
}

async fn read_credentials<R>(stream: R, result: &mut AttackResult) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut raw = Vec::new();

    while read_bounded_line(&mut reader, &mut raw, constants::MAX_LINE_LENGTH).await? {
        let line = String::from_utf8_lossy(&raw);
        trace!(line = %line.trim_end(), "hydra stdout");

        if let Some(credential) = parser::parse_credential_line(&line) {
            info!(
                port = %credential.port,
                username = ?credential.username,
                "Credential found"
            );
            result.add_credential(credential);
        }
    }

    Ok(())
}

async fn capture_stderr<R>(stream: R, capture: &mut String) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut raw = Vec::new();

    while read_bounded_line(&mut reader, &mut raw, constants::MAX_LINE_LENGTH).await? {
        let line = String::from_utf8_lossy(&raw);
        let line = line.trim_end();
        debug!(line = %line, "hydra stderr");
        push_capped(capture, line, constants::MAX_STDERR_CAPTURE);
    }

    Ok(())
}

/// Read the next `\n`-terminated line into `line`, keeping at most `limit`
/// bytes of it
///
/// The remainder of an overlong line is consumed and dropped. Returns
/// `false` at end of stream.
async fn read_bounded_line<R>(reader: &mut R, line: &mut Vec<u8>, limit: usize) -> io::Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    line.clear();
    let mut read_any = false;

    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(read_any);
        }
        read_any = true;

        let (chunk, used, complete) = match available.iter().position(|&b| b == b'\n') {
            Some(end) => (&available[..end], end + 1, true),
            None => (available, available.len(), false),
        };

        let room = limit.saturating_sub(line.len());
        line.extend_from_slice(&chunk[..chunk.len().min(room)]);
        reader.consume(used);

        if complete {
            return Ok(true);
        }
    }
}

/// Append `line` and a newline to `capture` without growing it past `cap`
fn push_capped(capture: &mut String, line: &str, cap: usize) {
    let remaining = cap.saturating_sub(capture.len());
    if remaining == 0 {
        return;
    }

    let mut end = line.len().min(remaining - 1);
    while !line.is_char_boundary(end) {
        end -= 1;
    }

    capture.push_str(&line[..end]);
    capture.push('\n');
}

async fn terminate(child: &mut dyn ChildHandle) {
    if let Err(e) = child.kill().await {
        debug!(error = %e, "Killing hydra failed, it may have already exited");
    }
}

fn exit_error(code: Option<i32>, stderr: &str) -> String {
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }

    match code {
        Some(code) => format!("hydra exited with status {}", code),
        None => "hydra was terminated by a signal".to_string(),
    }
}

/// Probe the installed hydra version via `hydra -h`
pub async fn detect_version(config: &HydraConfig) -> Result<String> {
    let tool = BaseTool::new(config.hydra_path.clone())?;
    let output = tool
        .execute_with_timeout(
            &["-h"],
            Duration::from_secs(constants::VERSION_PROBE_TIMEOUT_SECS),
        )
        .await?;

    // `hydra -h` exits non-zero but still prints its banner
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    parse_version_banner(&stdout)
        .or_else(|| parse_version_banner(&stderr))
        .ok_or_else(|| HydraError::parse("Could not find hydra version banner"))
}

fn parse_version_banner(text: &str) -> Option<String> {
    text.lines().find_map(|line| {
        line.trim()
            .strip_prefix("Hydra v")
            .and_then(|rest| rest.split_whitespace().next())
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(command: &[String], flag: &str) -> usize {
        command.iter().position(|arg| arg == flag).unwrap()
    }

    #[test]
    fn test_build_command() {
        let command = build_command(
            "hydra",
            "example.com",
            "ftp",
            Some(&CredentialSource::file("logins.txt")),
            Some(&CredentialSource::file("passwords.txt")),
            16,
            Some(21),
            true,
        );

        assert_eq!(command[0], "hydra");
        assert_eq!(command[position(&command, "-P") + 1], "passwords.txt");
        assert_eq!(command[position(&command, "-L") + 1], "logins.txt");
        assert_eq!(command[position(&command, "-t") + 1], "16");
        assert!(command.contains(&"-f".to_string()));
        assert_eq!(command[position(&command, "-s") + 1], "21");
        assert_eq!(command.last().unwrap(), "ftp://example.com");
    }

    #[test]
    fn test_build_command_optional_flags() {
        let command = build_command(
            "hydra",
            "10.0.0.1",
            "ssh",
            Some(&CredentialSource::single("root")),
            Some(&CredentialSource::single("toor")),
            4,
            None,
            false,
        );

        assert_eq!(command[position(&command, "-l") + 1], "root");
        assert_eq!(command[position(&command, "-p") + 1], "toor");
        assert!(!command.contains(&"-f".to_string()));
        assert!(!command.contains(&"-s".to_string()));
        assert_eq!(command.last().unwrap(), "ssh://10.0.0.1");
    }

    #[test]
    fn test_build_command_without_sources() {
        let command = build_command("hydra", "example.com", "snmp", None, None, 1, None, false);
        assert_eq!(command, vec!["hydra", "-t", "1", "snmp://example.com"]);
    }

    #[test]
    fn test_ipv6_target_is_bracketed() {
        assert_eq!(target_url("ssh", "::1"), "ssh://[::1]");
        assert_eq!(target_url("ssh", "192.168.1.1"), "ssh://192.168.1.1");
    }

    #[test]
    fn test_exit_error() {
        assert_eq!(exit_error(Some(255), "  [ERROR] could not connect\n"), "[ERROR] could not connect");
        assert_eq!(exit_error(Some(2), ""), "hydra exited with status 2");
        assert_eq!(exit_error(None, ""), "hydra was terminated by a signal");
    }

    #[test]
    fn test_stderr_capture_never_exceeds_cap() {
        let mut capture = String::new();
        push_capped(&mut capture, &"x".repeat(100), 40);
        assert_eq!(capture.len(), 40);
        assert!(capture.ends_with('\n'));

        push_capped(&mut capture, "more", 40);
        assert_eq!(capture.len(), 40);

        // never splits a multi-byte character
        let mut capture = String::new();
        push_capped(&mut capture, "ééé", 5);
        assert_eq!(capture, "éé\n");
    }

    #[tokio::test]
    async fn test_capture_stderr_with_one_huge_line() {
        let huge = "E".repeat(constants::MAX_STDERR_CAPTURE * 2);
        let mut capture = String::new();
        capture_stderr(huge.as_bytes(), &mut capture).await.unwrap();

        assert!(capture.len() <= constants::MAX_STDERR_CAPTURE);
        assert!(capture.len() <= constants::MAX_LINE_LENGTH + 1);
    }

    #[tokio::test]
    async fn test_read_bounded_line_truncates_and_resyncs() {
        let input = format!("{}\nshort\nlast", "A".repeat(100));
        let mut reader = BufReader::with_capacity(16, input.as_bytes());
        let mut line = Vec::new();

        assert!(read_bounded_line(&mut reader, &mut line, 10).await.unwrap());
        assert_eq!(line, b"AAAAAAAAAA");
        assert!(read_bounded_line(&mut reader, &mut line, 10).await.unwrap());
        assert_eq!(line, b"short");
        assert!(read_bounded_line(&mut reader, &mut line, 10).await.unwrap());
        assert_eq!(line, b"last");
        assert!(!read_bounded_line(&mut reader, &mut line, 10).await.unwrap());
    }

    #[test]
    fn test_parse_version_banner() {
        let banner = "Hydra v9.5 (c) 2023 by van Hauser/THC & David Maciejak - Please do not use in military or secret service organizations, or for illegal purposes.\n\nSyntax: hydra [[[-l LOGIN|-L FILE] ...";
        assert_eq!(parse_version_banner(banner).as_deref(), Some("9.5"));
        assert!(parse_version_banner("Syntax: hydra").is_none());
    }
}
