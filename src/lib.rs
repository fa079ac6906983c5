//! # rusthydra - Async THC-Hydra Supervisor
//!
//! rusthydra drives the external [THC-Hydra](https://github.com/vanhauser-thc/thc-hydra)
//! login cracker as a subprocess, turns the credentials it reports into
//! structured records and stores attack results as JSON. The brute-force
//! work itself is done entirely by hydra.
//!
//! ## Features
//!
//! - **Target validation**: IP/hostname checks before anything is launched
//! - **Streaming supervision**: stdout/stderr read concurrently while hydra runs
//! - **Timeouts and cancellation**: hydra is always killed, never left detached
//! - **Structured results**: every outcome, including failures, is an [`AttackResult`](models::AttackResult)
//! - **Persistence**: timestamped JSON result files
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rusthydra::config::HydraConfig;
//! use rusthydra::external::hydra::HydraAttack;
//! use rusthydra::models::{AttackRequest, CredentialSource};
//! use rusthydra::output::ResultStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = HydraConfig::default();
//!     let runner = HydraAttack::new(config.clone());
//!
//!     let request = AttackRequest::ip("127.0.0.1", "ftp")
//!         .with_login(CredentialSource::file("users.txt"))
//!         .with_password(CredentialSource::file("passwords.txt"))
//!         .with_port(21);
//!
//!     let result = runner.run_attack(&request).await;
//!     println!("{}: {} credential(s)", result.status, result.credentials.len());
//!
//!     ResultStore::from_config(&config).save(&result)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`validation`]: target and parameter checks
//! - [`parser`]: hydra output line parser
//! - [`external`]: process spawning and the hydra runner
//! - [`output`]: result persistence and terminal rendering
//! - [`models`]: request, credential and result types
//! - [`config`]: runner settings and command-line parsing
//! - [`logging`]: `tracing` setup
//! - [`error`]: error types

pub mod config;
pub mod config_file;
pub mod constants;
pub mod error;
pub mod external;
pub mod logging;
pub mod models;
pub mod output;
pub mod parser;
pub mod shutdown;
pub mod utils;
pub mod validation;
