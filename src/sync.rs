//! # Submodule Synchronization
//!
//! Brings every submodule to the state implied by the resolved target.
//!
//! 1. **Initialization**: every submodule is initialized and updated
//!    recursively, under the configured [`RetryPolicy`](crate::retry::RetryPolicy).
//! 2. **Reference mapping**: each repository gets the tag of the resolved
//!    release, except that the default branch is used when no release was
//!    resolved or for the exception repository, which has no release tags.
//! 3. **Checkout**: HEAD is moved to the reference and the working tree and
//!    index are hard-reset. Local modifications are discarded; these
//!    checkouts are CI mirrors, not developer clones.
//!
//! Repositories are independent, so step 3 may run in parallel. Either way
//! the reports come back in declaration order, and the first failure fails
//! the whole synchronization.

use log::{debug, info};
use rayon::prelude::*;

use crate::config::CheckoutConfig;
use crate::error::{Error, Result};
use crate::git::CommitInfo;
use crate::release::{Reference, ResolvedTarget};
use crate::repository::{RepositorySet, SubmoduleOperations};
use crate::retry;

/// Outcome of synchronizing one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub name: String,
    pub reference: Reference,
    pub commit: CommitInfo,
}

/// Drives initialization and checkout of a [`RepositorySet`].
pub struct SubmoduleSynchronizer<'a> {
    repos: &'a RepositorySet,
    config: &'a CheckoutConfig,
}

impl<'a> SubmoduleSynchronizer<'a> {
    pub fn new(repos: &'a RepositorySet, config: &'a CheckoutConfig) -> Self {
        Self { repos, config }
    }

    /// Initialize and update every repository recursively, retrying
    /// transient failures.
    pub fn initialize_all(&self) -> Result<()> {
        for (name, repo) in self.repos.iter() {
            debug!("Initializing submodule {}", name);
            retry::retry(&self.config.init_retry, name, || repo.init_update(true))?;
        }
        info!("Initialized {} submodules", self.repos.len());
        Ok(())
    }

    /// The reference applied to repository `name` for `target`.
    pub fn reference_for(&self, name: &str, target: &ResolvedTarget) -> Reference {
        match target {
            ResolvedTarget::Release(tag) if name != self.config.exception => {
                Reference::Tag(tag.clone())
            }
            _ => Reference::DefaultBranch(self.config.default_branch_ref.clone()),
        }
    }

    /// Check out every repository at its reference for `target`.
    pub fn sync_all(&self, target: &ResolvedTarget) -> Result<Vec<SyncReport>> {
        let plan: Vec<(&str, &dyn SubmoduleOperations, Reference)> = self
            .repos
            .iter()
            .map(|(name, repo)| (name, repo, self.reference_for(name, target)))
            .collect();

        if self.config.parallel {
            plan.into_par_iter()
                .map(|(name, repo, reference)| sync_one(name, repo, reference))
                .collect()
        } else {
            plan.into_iter()
                .map(|(name, repo, reference)| sync_one(name, repo, reference))
                .collect()
        }
    }
}

/// Move one repository to `reference` and read back its head commit.
pub fn sync_one(
    name: &str,
    repo: &dyn SubmoduleOperations,
    reference: Reference,
) -> Result<SyncReport> {
    debug!("Checking out {} at {}", name, reference);
    let wrap = |source: Error| Error::Synchronization {
        name: name.to_string(),
        reference: reference.to_string(),
        source: Box::new(source),
    };

    repo.set_head_reference(&reference).map_err(wrap)?;
    repo.reset_working_tree_and_index().map_err(wrap)?;
    let commit = repo.head_commit().map_err(wrap)?;

    Ok(SyncReport {
        name: name.to_string(),
        reference,
        commit,
    })
}
