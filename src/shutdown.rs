//! # Shutdown Signals
//!
//! Turns SIGINT/SIGTERM into a future the attack runner can race against,
//! so an interrupted attack still kills hydra and reports a result.
//!
//! ## Example
//!
//! ```rust,no_run
//! use rusthydra::config::HydraConfig;
//! use rusthydra::external::hydra::HydraAttack;
//! use rusthydra::models::AttackRequest;
//! use rusthydra::shutdown::wait_for_signal;
//!
//! #[tokio::main]
//! async fn main() {
//!     let runner = HydraAttack::new(HydraConfig::default());
//!     let request = AttackRequest::ip("127.0.0.1", "ssh");
//!     let result = runner.run_attack_until(&request, wait_for_signal()).await;
//!     println!("{}", result.status);
//! }
//! ```

use tracing::{info, warn};

/// Signal types that can trigger shutdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// SIGINT (Ctrl+C)
    SigInt,
    /// SIGTERM (termination signal)
    SigTerm,
}

impl std::fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShutdownSignal::SigInt => write!(f, "SIGINT"),
            ShutdownSignal::SigTerm => write!(f, "SIGTERM"),
        }
    }
}

/// Resolve on the first SIGINT or SIGTERM
///
/// If a handler cannot be installed that signal is simply never reported.
pub async fn wait_for_signal() -> ShutdownSignal {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => ShutdownSignal::SigInt,
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGINT");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                ShutdownSignal::SigTerm
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<ShutdownSignal>();

    let signal = tokio::select! {
        signal = ctrl_c => signal,
        signal = terminate => signal,
    };

    info!(signal = %signal, "Shutdown signal received");
    signal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_display() {
        assert_eq!(ShutdownSignal::SigInt.to_string(), "SIGINT");
        assert_eq!(ShutdownSignal::SigTerm.to_string(), "SIGTERM");
    }
}
