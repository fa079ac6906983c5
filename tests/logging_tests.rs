//! File logging needs its own test binary: the subscriber is process-global.

#[cfg(test)]
mod tests {
    use rusthydra::config::HydraConfig;
    use rusthydra::external::hydra::HydraAttack;
    use rusthydra::logging::{init_logging, LogConfig};
    use rusthydra::models::{AttackRequest, AttackStatus};
    use std::fs;

    #[tokio::test]
    async fn test_failed_attack_is_flushed_to_log_file() {
        std::env::remove_var("RUST_LOG");

        let dir = std::env::temp_dir().join(format!("rusthydra-logs-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();

        let log_config = LogConfig {
            level: "info".to_string(),
            console: false,
            file_path: Some(dir.join("rusthydra.log")),
            ..LogConfig::default()
        };
        let guards = init_logging(&log_config).unwrap();

        let config = HydraConfig {
            hydra_path: dir.join("no-such-hydra").display().to_string(),
            ..HydraConfig::default()
        };
        let result = HydraAttack::new(config)
            .run_attack(&AttackRequest::ip("127.0.0.1", "ftp"))
            .await;
        assert_eq!(result.status, AttackStatus::Failed);

        drop(guards);

        let mut logged = String::new();
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            if name.starts_with("rusthydra") && name.ends_with("log") {
                logged.push_str(&fs::read_to_string(&path).unwrap());
            }
        }

        assert!(logged.contains("Hydra binary not found"), "log was: {}", logged);
        assert!(logged.contains("Attack finished"), "log was: {}", logged);

        fs::remove_dir_all(&dir).unwrap();
    }
}
