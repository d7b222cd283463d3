//! helmdoc CLI entry point
//!
//! Parses arguments, installs logging, runs the selected command and turns
//! failures into a formatted message and exit code 1.

use anyhow::Result;
use clap::Parser;
use helmdoc::cli;
use helmdoc::core::error::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    cli.build_config().init_logging();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
