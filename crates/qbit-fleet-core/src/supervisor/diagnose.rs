//! Operator-facing explanation of a failed startup login.

use crate::engine::AuthError;

/// Likely causes for `err`, most probable first.
pub fn likely_causes(err: &AuthError) -> Vec<String> {
    match err {
        AuthError::Refused { host } => vec![
            "qBittorrent is not running".to_string(),
            "the Web UI is disabled (Tools -> Preferences -> Web UI)".to_string(),
            format!("the Web UI listens on a different port than {host}"),
        ],
        AuthError::Unreachable { host, .. } | AuthError::TimedOut { host } => vec![
            format!("the network path to {host} is down or firewalled"),
            "the host name does not resolve".to_string(),
            "qBittorrent is overloaded and not answering".to_string(),
        ],
        AuthError::BadCredentials { .. } => vec![
            "the username or password is wrong".to_string(),
            "the Web UI credentials were changed in qBittorrent".to_string(),
        ],
        AuthError::Banned { .. } => vec![
            "too many failed logins: qBittorrent banned this address for a while".to_string(),
            "fix the credentials, then wait for the ban to expire or restart qBittorrent"
                .to_string(),
        ],
        AuthError::Unexpected { host, .. } => vec![
            format!("{host} is not a qBittorrent Web UI (wrong port or path?)"),
            "a reverse proxy in front of qBittorrent is misconfigured".to_string(),
        ],
        AuthError::Session { .. } => vec![
            "login succeeded but API calls are refused; check the Web UI host header and CSRF settings"
                .to_string(),
        ],
    }
}

/// Multi-line diagnostic printed before exiting on a startup failure.
pub fn startup_report(err: &AuthError, host: &str) -> String {
    let mut out = format!("could not connect to qBittorrent at {host}: {err}\nPlease check:\n");
    for (i, cause) in likely_causes(err).iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, cause));
    }
    out
}
