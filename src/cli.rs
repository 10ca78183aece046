//! CLI argument parsing and command dispatch

use std::io;

use anyhow::{Context, Result};
use clap::Parser;

use release_checkout::checkout::CheckoutRun;
use release_checkout::config::CheckoutConfig;
use release_checkout::output::{OutputConfig, Printer};
use release_checkout::release::ReleaseIdentifier;
use release_checkout::repository::RepositorySet;

/// Release Checkout - Check out submodules at a release tag (or master) for a build
#[derive(Parser, Debug)]
#[command(name = "release-checkout")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Release to check out, with or without a leading `v` (defaults to master)
    #[arg(value_name = "TARGET")]
    target: Option<String>,
}

impl Cli {
    /// Execute the checkout
    pub fn execute(self) -> Result<()> {
        let config = CheckoutConfig::from_env().context("Invalid configuration")?;
        let requested = ReleaseIdentifier::from_arg(self.target.as_deref());
        let from_arg = self.target.as_deref().is_some_and(|t| !t.is_empty());

        let repos = RepositorySet::open_current().context("Failed to open submodules")?;
        let run = CheckoutRun::new(&repos, &config, Printer::new(OutputConfig::from_env()));

        let stdout = io::stdout();
        let mut out = stdout.lock();
        run.execute(&requested, from_arg, &mut out)?;
        Ok(())
    }
}
