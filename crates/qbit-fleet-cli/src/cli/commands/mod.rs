//! CLI command handlers, one file per command.

mod check;
mod completions;
mod config;
mod run;
mod status;

pub use check::run_check;
pub use completions::{run_completions, run_man};
pub use config::run_config;
pub use run::{run_controller, RunOptions};
pub use status::run_status;

use anyhow::Result;
use qbit_fleet_core::config::FleetConfig;
use qbit_fleet_core::controller::blocking;
use qbit_fleet_core::engine::{AuthError, QbitClient};
use qbit_fleet_core::supervisor::{startup_report, Supervisor};

/// Supervisor for the configured engine, not yet connected.
fn supervisor(cfg: &FleetConfig) -> Result<Supervisor<QbitClient>> {
    let client = QbitClient::from_config(cfg)?;
    Ok(Supervisor::new(client, cfg.reconnect_policy()))
}

/// Print the likely causes of a failed login and wrap `err` for the caller.
fn startup_failure(cfg: &FleetConfig, err: AuthError, what: &str) -> anyhow::Error {
    eprint!("{}", startup_report(&err, &cfg.host));
    anyhow::Error::new(err).context(what.to_string())
}

/// Connected supervisor, or the startup diagnostic on failure.
async fn connect(cfg: &FleetConfig, what: &str) -> Result<Supervisor<QbitClient>> {
    let (sup, connected) = blocking(supervisor(cfg)?, |s| s.connect()).await?;
    match connected {
        Ok(()) => Ok(sup),
        Err(e) => Err(startup_failure(cfg, e, what)),
    }
}
