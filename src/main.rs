//! # Release Checkout CLI
//!
//! Binary entry point for the `release-checkout` command-line tool.
//!
//! Its responsibilities are limited to:
//! - Initializing logging (`RUST_LOG`, default `info`).
//! - Parsing the optional release argument using `clap`.
//! - Running the checkout and turning failures into a nonzero exit status.
//!
//! All logic lives in the `release_checkout` library crate.

mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = cli::Cli::parse();
    cli.execute()
}
