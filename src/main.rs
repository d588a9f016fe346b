mod actions;
mod cli;
mod query;
mod repo;
mod sources;
mod types;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use lazy_static::lazy_static;
use types::config::{Config, Opts};

// Initialize writer
lazy_static! {
    static ref WRITER: cli::Writer = cli::Writer::new();
}

/// Exit codes:
/// 1 => something went wrong, the error chain is printed
#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(err) = try_main().await {
        error!("{}", err.to_string());
        err.chain().skip(1).for_each(|cause| {
            due_to!("{}", cause);
        });
        std::process::exit(1);
    }
}

async fn try_main() -> Result<()> {
    let opts = Opts::parse();
    cli::set_verbose(opts.verbose);
    let config = Config::load(opts.config.as_deref()).context("Failed to load configuration")?;
    actions::fullfill_command(&config, &opts).await
}
