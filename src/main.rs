// rusthydra - async THC-Hydra supervisor

use colored::*;
use rusthydra::config::Config;
use rusthydra::error::{HydraError, Result};
use rusthydra::external::hydra::{self, HydraAttack};
use rusthydra::logging;
use rusthydra::models::{AttackResult, AttackStatus};
use rusthydra::output::{self, ResultStore};
use rusthydra::shutdown;
use rusthydra::utils;
use std::env;
use std::process::ExitCode;

/// Exit status for an attack that ran to completion
const EXIT_ATTACK_FAILED: u8 = 2;

/// Application entry point
///
/// Must return rather than call `process::exit`: the log file guards only
/// flush when dropped.
#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let config = match Config::from_args(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{} {}", "ERROR".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    let _log_guards = match logging::init_logging(&config.logging) {
        Ok(guards) => guards,
        Err(e) => {
            eprintln!("{} {}", "ERROR".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(result) => ExitCode::from(exit_status(&result)),
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// `0` when hydra finished its run, `2` for failed or timed-out attacks
fn exit_status(result: &AttackResult) -> u8 {
    if result.is_success() || result.status == AttackStatus::Completed {
        0
    } else {
        EXIT_ATTACK_FAILED
    }
}

/// Print usage information
fn print_usage() {
    eprintln!(
        "{}",
        "usage: rusthydra <protocol> (--ip IP | --host HOST) [options]"
            .red()
            .bold()
    );
    eprintln!("Credential Options:");
    eprintln!("  -l LOGIN            Single login");
    eprintln!("  -L FILE             Login wordlist");
    eprintln!("  -p PASS             Single password");
    eprintln!("  -P FILE             Password wordlist");
    eprintln!("Attack Options:");
    eprintln!("  -s, --port PORT     Service port override");
    eprintln!("  -t, --tasks N       Parallel hydra tasks (1-64, default: 16)");
    eprintln!("  -f                  Stop after the first valid credential (default)");
    eprintln!("  --no-stop           Keep going after the first valid credential");
    eprintln!("  --timeout SECS      Abort the attack after SECS seconds (default: 300)");
    eprintln!("Output Options:");
    eprintln!("  --json              Print the result as JSON");
    eprintln!("  --save              Save the result to the results directory");
    eprintln!("  --results-dir DIR   Results directory (default: hydra_results)");
    eprintln!("  --config FILE       Load settings from a TOML file");
    eprintln!("  --hydra-path PATH   Hydra binary to run (default: hydra)");
    eprintln!("Examples:");
    eprintln!("  rusthydra ftp --ip 192.168.1.10 -L users.txt -P rockyou.txt");
    eprintln!("  rusthydra ssh --host server.lan -l root -P passwords.txt -t 4");
    eprintln!("  rusthydra snmp --ip 10.0.0.1 -P communities.txt --json --save");
}

/// Main application logic
async fn run(config: Config) -> Result<AttackResult> {
    if let Err(e) = utils::check_dependencies(&config.hydra.hydra_path) {
        // The runner reports the missing binary itself; this only adds hints
        tracing::warn!("{}", e);
        if !config.json_mode {
            eprintln!("{} {}", "WARNING".yellow(), e);
        }
    } else {
        match hydra::detect_version(&config.hydra).await {
            Ok(version) => tracing::info!(version = %version, "Using hydra"),
            Err(e) => tracing::debug!(error = %e, "Could not determine hydra version"),
        }
    }

    if !config.json_mode {
        print_attack_start(&config);
    }

    let runner = HydraAttack::new(config.hydra.clone());
    let result = runner
        .run_attack_until(&config.request, shutdown::wait_for_signal())
        .await;

    output_result(&result, &config)?;

    if config.save {
        let path = ResultStore::from_config(&config.hydra).save(&result)?;
        if !config.json_mode {
            println!("{} Result saved to {}", "SAVED".bright_green(), path.display());
        }
    }

    Ok(result)
}

/// Print attack start message
fn print_attack_start(config: &Config) {
    let request = &config.request;
    println!(
        "{} Running {} against {} with {} tasks...",
        "HYDRA".bright_yellow(),
        request.protocol,
        request.raw_target(),
        request.tasks.unwrap_or(config.hydra.default_tasks)
    );
}

/// Output the result in the requested format
fn output_result(result: &AttackResult, config: &Config) -> Result<()> {
    if config.json_mode {
        let json_output = serde_json::to_string_pretty(result)
            .map_err(|e| HydraError::parse(format!("Failed to serialize JSON: {}", e)))?;
        println!("{}", json_output);
    } else {
        output::print_result(result);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_usage_doesnt_panic() {
        print_usage();
    }

    #[test]
    fn test_print_attack_start() {
        let config = Config::from_args(&[
            "rusthydra".to_string(),
            "ssh".to_string(),
            "--ip".to_string(),
            "127.0.0.1".to_string(),
        ])
        .unwrap();

        print_attack_start(&config);
    }

    #[test]
    fn test_exit_status() {
        let mut result = AttackResult::new("127.0.0.1", "ftp", Some(21));
        result.finish(AttackStatus::Completed, None);
        assert_eq!(exit_status(&result), 0);

        let failed = AttackResult::failed("127.0.0.1", "ftp", Some(21), "boom");
        assert_eq!(exit_status(&failed), EXIT_ATTACK_FAILED);

        let mut timed_out = AttackResult::new("127.0.0.1", "ftp", Some(21));
        timed_out.finish(AttackStatus::Timeout, Some("Attack timed out".to_string()));
        assert_eq!(exit_status(&timed_out), EXIT_ATTACK_FAILED);
    }
}
