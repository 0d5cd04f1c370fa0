//! platform-context binary entry point

use std::process::ExitCode;

use clap::Parser;
use platform_context::cli::{self, Cli};
use platform_context::{logging, Error};
use tracing::{debug, error};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();
    logging::init(&args.log_level);

    match cli::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match &e {
                Error::Api(_) => debug!(error = %e, "Lookup failed"),
                _ => error!(error = %e, "Command failed"),
            }
            eprintln!("{}", cli::report(&e));
            ExitCode::FAILURE
        }
    }
}
