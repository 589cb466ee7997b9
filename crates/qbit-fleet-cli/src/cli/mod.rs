//! CLI for the qbit-fleet admission controller.

mod commands;
mod signal;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use qbit_fleet_core::config::{self, FleetConfig};
use std::path::PathBuf;

use commands::{
    run_check, run_completions, run_config, run_controller, run_man, run_status, RunOptions,
};

/// Top-level CLI for qbit-fleet.
#[derive(Debug, Parser)]
#[command(name = "qbit-fleet")]
#[command(about = "qbit-fleet: keep a qBittorrent fleet within its download budgets", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Connection and config overrides accepted by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Read config from PATH instead of ~/.config/qbit-fleet/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Engine Web UI address (host:port or URL).
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Web UI username.
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// Web UI password.
    #[arg(long, global = true, env = "QBIT_FLEET_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Override max_active_downloads.
    #[arg(long, global = true, value_name = "N")]
    pub max_active: Option<usize>,

    /// Override max_resumed_torrents.
    #[arg(long, global = true, value_name = "N")]
    pub max_resumed: Option<usize>,

    /// Override tick_interval_secs.
    #[arg(long, global = true, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Log to stderr instead of the state-dir log file.
    #[arg(long, global = true)]
    pub log_stderr: bool,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run the admission controller loop until interrupted.
    Run {
        /// Run a single tick and exit.
        #[arg(long)]
        once: bool,
        /// Plan and log pause/resume batches without sending them.
        #[arg(long)]
        dry_run: bool,
    },

    /// Show every torrent with its bucket, and bucket counts vs. budgets.
    Status,

    /// Verify that the Web UI is reachable and the credentials work.
    Check,

    /// Print the config path and the effective config (password masked).
    Config,

    /// Print shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },

    /// Print a man page.
    Man,
}

impl GlobalArgs {
    /// Config from `--config` or the XDG default, with flag overrides applied.
    fn load_config(&self) -> Result<FleetConfig> {
        let mut cfg = match &self.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        if let Some(host) = &self.host {
            cfg.host = host.clone();
        }
        if let Some(username) = &self.username {
            cfg.username = username.clone();
        }
        if let Some(password) = &self.password {
            cfg.password = password.clone();
        }
        if let Some(n) = self.max_active {
            cfg.max_active_downloads = n;
        }
        if let Some(n) = self.max_resumed {
            cfg.max_resumed_torrents = n;
        }
        if let Some(secs) = self.interval {
            cfg.tick_interval_secs = secs;
        }
        Ok(cfg)
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let Cli { global, command } = self;

        match command {
            CliCommand::Completions { shell } => return run_completions(shell),
            CliCommand::Man => return run_man(),
            _ => {}
        }

        let cfg = global.load_config()?;
        if let CliCommand::Config = command {
            return run_config(&cfg, global.config.as_deref());
        }
        cfg.validate()?;
        tracing::debug!("loaded config: {:?}", cfg.redacted());

        match command {
            CliCommand::Run { once, dry_run } => {
                run_controller(&cfg, RunOptions { once, dry_run }).await?
            }
            CliCommand::Status => run_status(&cfg).await?,
            CliCommand::Check => run_check(&cfg).await?,
            CliCommand::Config | CliCommand::Completions { .. } | CliCommand::Man => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
