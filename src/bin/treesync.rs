//! Treesync CLI Binary
//!
//! Mirrors a source directory onto a replica on a fixed interval until
//! interrupted.

use anyhow::Context;
use clap::Parser;
use std::process;
use treesync::logging::init_logging;
use treesync::tooling::cli::{Cli, CliContext};

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let context = CliContext::new(&cli).context("failed to load configuration")?;
    init_logging(Some(&context.config().logging))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let code = runtime.block_on(context.execute(cli.once))?;
    Ok(code)
}
