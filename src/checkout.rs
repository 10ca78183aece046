//! # Checkout Run
//!
//! Ties the pieces together for one invocation:
//!
//! ```text
//! Start -> Initializing -> Resolving -> Syncing -> Done
//! ```
//!
//! - **Initializing**: all submodules are initialized, retrying transient
//!   failures under the configured policy.
//! - **Resolving**: the requested release is validated against the tags of the
//!   authoritative repositories. An unknown release falls back to the default
//!   branch with a warning. Requesting the default branch skips tag lookup.
//! - **Syncing**: every repository is checked out and reported.
//!
//! The run stops at the first unrecoverable error. Nothing is shared between
//! runs: the configuration and repository set are passed in, and the resolved
//! target lives only in the returned [`CheckoutOutcome`].

use std::fmt;
use std::io::Write;

use log::{debug, info};

use crate::config::CheckoutConfig;
use crate::defaults::TAG_PREVIEW_LEN;
use crate::error::Result;
use crate::output::Printer;
use crate::release::{ReleaseIdentifier, ResolvedTarget, TagSet};
use crate::repository::RepositorySet;
use crate::resolver::{self, Resolution};
use crate::sync::{SubmoduleSynchronizer, SyncReport};

/// Phases of a run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Resolving,
    Syncing,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Initializing => "initializing",
            Phase::Resolving => "resolving",
            Phase::Syncing => "syncing",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOutcome {
    pub resolution: Resolution,
    pub target: ResolvedTarget,
    pub reports: Vec<SyncReport>,
}

/// A single checkout invocation over a set of repositories.
pub struct CheckoutRun<'a> {
    repos: &'a RepositorySet,
    config: &'a CheckoutConfig,
    printer: Printer,
}

impl<'a> CheckoutRun<'a> {
    pub fn new(repos: &'a RepositorySet, config: &'a CheckoutConfig, printer: Printer) -> Self {
        Self {
            repos,
            config,
            printer,
        }
    }

    /// Run all phases for `requested`, writing progress to `out`.
    ///
    /// `from_arg` tells whether the release was given explicitly, which only
    /// changes the wording of the first progress line.
    pub fn execute(
        &self,
        requested: &ReleaseIdentifier,
        from_arg: bool,
        out: &mut dyn Write,
    ) -> Result<CheckoutOutcome> {
        writeln!(out, "{}", self.printer.requested(requested, from_arg))?;
        writeln!(out, "{}", self.printer.preparing(requested))?;

        let synchronizer = SubmoduleSynchronizer::new(self.repos, self.config);

        enter(Phase::Initializing);
        synchronizer.initialize_all()?;

        enter(Phase::Resolving);
        let resolution = self.resolve(requested, out)?;
        let target = resolution.target();

        enter(Phase::Syncing);
        let reports = synchronizer.sync_all(&target)?;
        for report in &reports {
            writeln!(out, "{}", self.printer.report(report))?;
        }
        writeln!(out, "{}", self.printer.success(&target))?;

        enter(Phase::Done);
        Ok(CheckoutOutcome {
            resolution,
            target,
            reports,
        })
    }

    /// Resolve `requested` against the authoritative repositories, reporting
    /// the outcome.
    fn resolve(&self, requested: &ReleaseIdentifier, out: &mut dyn Write) -> Result<Resolution> {
        if requested.is_default_branch() {
            return Ok(Resolution::DefaultBranch);
        }

        let [first_name, second_name] = &self.config.authoritative;
        let first = self.authoritative_tags(first_name)?;
        let second = self.authoritative_tags(second_name)?;

        let resolution = resolver::resolve(requested, &first, &second);
        match &resolution {
            Resolution::Fallback { requested } => {
                writeln!(
                    out,
                    "{}",
                    self.printer
                        .fallback_warning(requested, &self.config.authoritative)
                )?;
                for (name, tags) in [(first_name, &first), (second_name, &second)] {
                    writeln!(
                        out,
                        "{}",
                        self.printer.available_tags(name, tags, TAG_PREVIEW_LEN)
                    )?;
                }
            }
            Resolution::Release { .. } => {
                writeln!(out, "{}", self.printer.using_tag(&resolution.target()))?;
            }
            Resolution::DefaultBranch => {}
        }
        Ok(resolution)
    }

    fn authoritative_tags(&self, name: &str) -> Result<TagSet> {
        let tags = self.repos.require(name)?.tags()?;
        debug!("{} has {} tags", name, tags.len());
        Ok(tags)
    }
}

fn enter(phase: Phase) {
    info!("Checkout {}", phase);
}
