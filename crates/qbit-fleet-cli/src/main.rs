use clap::Parser;
use qbit_fleet_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging as early as possible.
    if cli.global.log_stderr || logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    // Exit explicitly: an engine call abandoned at shutdown may still be
    // running on the blocking pool, and the runtime would wait for it.
    match cli.run().await {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            eprintln!("qbit-fleet error: {:#}", err);
            std::process::exit(1);
        }
    }
}
