//! `qbit-fleet config`: print the effective config with the password masked.

use anyhow::{Context, Result};
use qbit_fleet_core::config::{self, FleetConfig};
use qbit_fleet_core::logging;
use std::path::Path;

pub fn run_config(cfg: &FleetConfig, explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    print!("{}", render(cfg, &path)?);
    Ok(())
}

fn render(cfg: &FleetConfig, path: &Path) -> Result<String> {
    let body = toml::to_string_pretty(&cfg.redacted()).context("render config")?;
    let log = match logging::log_file_path() {
        Ok(p) => p.display().to_string(),
        Err(e) => format!("unavailable ({e})"),
    };
    Ok(format!("# config: {}\n# log: {}\n{}", path.display(), log, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_config_masks_password_and_names_files() {
        let cfg = FleetConfig {
            password: "hunter2".to_string(),
            ..FleetConfig::default()
        };
        let out = render(&cfg, Path::new("/etc/qbit-fleet.toml")).unwrap();
        assert!(out.starts_with("# config: /etc/qbit-fleet.toml\n# log: "));
        assert!(!out.contains("hunter2"));
        assert!(out.contains("password = \"********\""));
        assert!(out.contains("max_resumed_torrents = 20"));
    }
}
