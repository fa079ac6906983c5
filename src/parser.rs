//! # Hydra Output Parser
//!
//! Turns single lines of hydra's stdout into [`Credential`]s. Hydra reports
//! each hit on its own line:
//!
//! ```text
//! [21][ftp] host: 127.0.0.1   login: admin   password: 123456
//! [161][snmp] host: 127.0.0.1 password: public
//! ```
//!
//! Everything else it prints (banners, progress, status lines) is ignored.

use crate::models::Credential;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;

static CREDENTIAL_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\[(?P<port>\d+)\]\[(?P<service>[^\]]+)\]\s+host:\s*(?P<host>\S+)\s+(?:login:\s*(?P<login>.*?)\s+)?password:(?P<password>.*)$",
    )
    .expect("credential line pattern is valid")
});

/// Parse one line of hydra output
///
/// Returns `None` for anything that is not a credential report.
pub fn parse_credential_line(line: &str) -> Option<Credential> {
    let line = line.trim_start().trim_end_matches(['\r', '\n']);
    let caps = CREDENTIAL_LINE.captures(line)?;

    Some(Credential {
        port: caps["port"].to_string(),
        username: caps.name("login").map(|m| m.as_str().to_string()),
        password: caps["password"].trim().to_string(),
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login_and_password() {
        let cred =
            parse_credential_line("[21][ftp] host: 127.0.0.1   login: admin   password: 123456")
                .unwrap();
        assert_eq!(cred.port, "21");
        assert_eq!(cred.username.as_deref(), Some("admin"));
        assert_eq!(cred.password, "123456");
    }

    #[test]
    fn test_parse_password_only() {
        let cred = parse_credential_line("[161][snmp] host: 127.0.0.1 password: public").unwrap();
        assert_eq!(cred.port, "161");
        assert!(cred.username.is_none());
        assert_eq!(cred.password, "public");
    }

    #[test]
    fn test_non_credential_lines() {
        assert!(parse_credential_line("invalid line").is_none());
        assert!(parse_credential_line("").is_none());
        assert!(parse_credential_line(
            "Hydra v9.5 (c) 2023 by van Hauser/THC & David Maciejak - Please do not use in military or secret service organizations"
        )
        .is_none());
        assert!(parse_credential_line(
            "[DATA] max 16 tasks per 1 server, overall 16 tasks, 100 login tries (l:10/p:10)"
        )
        .is_none());
        assert!(parse_credential_line(
            "[STATUS] 64.00 tries/min, 64 tries in 00:01h, 36 to do in 00:01h, 16 active"
        )
        .is_none());
        assert!(parse_credential_line("1 of 1 target successfully completed, 1 valid password found").is_none());
    }

    #[test]
    fn test_parse_tolerates_crlf_and_spaces_in_values() {
        let cred = parse_credential_line(
            "[22][ssh] host: 10.0.0.5   login: backup user   password: pass word \r",
        )
        .unwrap();
        assert_eq!(cred.port, "22");
        assert_eq!(cred.username.as_deref(), Some("backup user"));
        assert_eq!(cred.password, "pass word");
    }

    #[test]
    fn test_parse_empty_password() {
        let cred =
            parse_credential_line("[3306][mysql] host: db.internal   login: root   password: ")
                .unwrap();
        assert_eq!(cred.username.as_deref(), Some("root"));
        assert_eq!(cred.password, "");
    }

    #[test]
    fn test_parse_hostname_target_and_dashed_service() {
        let cred = parse_credential_line(
            "[80][http-post-form] host: example.com   login: admin   password: letmein",
        )
        .unwrap();
        assert_eq!(cred.port, "80");
        assert_eq!(cred.password, "letmein");
    }
}
