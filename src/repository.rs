//! # Submodule Repositories
//!
//! This module provides the handles the synchronizer works with.
//!
//! ## Design
//!
//! Repository access goes through the `SubmoduleOperations` trait so the
//! decision logic can run against mock repositories in tests.
//! `GitSubmodule` is the real implementation, backed by the system `git`
//! command via [`crate::git`].
//!
//! `RepositorySet` is the ordered collection of handles for one run. It is
//! built once from the enclosing repository's `.gitmodules` and then passed
//! explicitly to the resolver and synchronizer.

use std::env;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::git::{self, CommitInfo};
use crate::manifest;
use crate::release::{Reference, TagSet};

/// Operations on a single submodule repository.
pub trait SubmoduleOperations: Send + Sync {
    /// Tag names currently known to the repository.
    fn tags(&self) -> Result<TagSet>;

    /// Initialize and update the submodule's working tree.
    fn init_update(&self, recursive: bool) -> Result<()>;

    /// Point HEAD at `reference`.
    fn set_head_reference(&self, reference: &Reference) -> Result<()>;

    /// Discard local changes so the index and working tree match HEAD.
    fn reset_working_tree_and_index(&self) -> Result<()>;

    /// Metadata of the commit at HEAD.
    fn head_commit(&self) -> Result<CommitInfo>;
}

/// A submodule of the enclosing repository, driven through system git.
#[derive(Debug, Clone)]
pub struct GitSubmodule {
    top_level: PathBuf,
    path: PathBuf,
}

impl GitSubmodule {
    /// `path` is relative to `top_level`.
    pub fn new(top_level: &Path, path: &Path) -> Self {
        Self {
            top_level: top_level.to_path_buf(),
            path: path.to_path_buf(),
        }
    }

    /// Absolute location of the submodule's working tree.
    pub fn work_dir(&self) -> PathBuf {
        self.top_level.join(&self.path)
    }
}

impl SubmoduleOperations for GitSubmodule {
    fn tags(&self) -> Result<TagSet> {
        Ok(git::list_tags(&self.work_dir())?.into_iter().collect())
    }

    fn init_update(&self, recursive: bool) -> Result<()> {
        git::submodule_update(&self.top_level, &self.path, recursive)
    }

    fn set_head_reference(&self, reference: &Reference) -> Result<()> {
        let dir = self.work_dir();
        let commit = git::resolve_commit(&dir, &reference.rev())?;
        git::detach_head(&dir, &commit)
    }

    fn reset_working_tree_and_index(&self) -> Result<()> {
        git::reset_hard(&self.work_dir())
    }

    fn head_commit(&self) -> Result<CommitInfo> {
        git::head_commit(&self.work_dir())
    }
}

/// The repositories taking part in a run, in declaration order.
#[derive(Default)]
pub struct RepositorySet {
    entries: Vec<(String, Box<dyn SubmoduleOperations>)>,
}

impl RepositorySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discovers the enclosing repository from the current directory and
    /// opens its submodules.
    pub fn open_current() -> Result<Self> {
        let cwd = env::current_dir()?;
        let top_level = git::show_toplevel(&cwd)?;
        Self::open(&top_level)
    }

    /// Opens the submodules declared in `<top_level>/.gitmodules`.
    pub fn open(top_level: &Path) -> Result<Self> {
        debug!("Reading submodules of {}", top_level.display());
        let mut set = Self::new();
        for entry in manifest::load(top_level)? {
            set.insert(entry.name, GitSubmodule::new(top_level, &entry.path))?;
        }
        Ok(set)
    }

    /// Adds a repository. Names must be unique.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        repo: impl SubmoduleOperations + 'static,
    ) -> Result<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(Error::DuplicateRepository { name });
        }
        self.entries.push((name, Box::new(repo)));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn get(&self, name: &str) -> Option<&dyn SubmoduleOperations> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, repo)| repo.as_ref())
    }

    /// Like [`get`](Self::get), but a missing repository is an error.
    pub fn require(&self, name: &str) -> Result<&dyn SubmoduleOperations> {
        self.get(name).ok_or_else(|| Error::MissingRepository {
            name: name.to_string(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn SubmoduleOperations)> {
        self.entries
            .iter()
            .map(|(name, repo)| (name.as_str(), repo.as_ref()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Mock repositories shared by the synchronizer and checkout tests.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Calls recorded by a [`MockSubmodule`], in order.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Tags,
        InitUpdate(bool),
        SetHead(String),
        Reset,
        HeadCommit,
    }

    /// In-memory submodule with scripted behavior.
    #[derive(Clone, Default)]
    pub struct MockSubmodule {
        pub tags: Vec<String>,
        /// Number of initial `init_update` calls that fail transiently.
        pub init_failures: u32,
        /// Fail `set_head_reference` for this revision.
        pub missing_rev: Option<String>,
        pub calls: Arc<Mutex<Vec<Call>>>,
        pub head: Arc<Mutex<Option<String>>>,
    }

    impl MockSubmodule {
        pub fn with_tags(tags: &[&str]) -> Self {
            Self {
                tags: tags.iter().map(|t| t.to_string()).collect(),
                ..Self::default()
            }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub fn count(&self, call: &Call) -> usize {
            self.calls().iter().filter(|c| *c == call).count()
        }

        pub fn init_count(&self) -> usize {
            self.calls()
                .iter()
                .filter(|c| matches!(c, Call::InitUpdate(_)))
                .count()
        }

        pub fn head(&self) -> Option<String> {
            self.head.lock().unwrap().clone()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl SubmoduleOperations for MockSubmodule {
        fn tags(&self) -> Result<TagSet> {
            self.record(Call::Tags);
            Ok(self.tags.iter().cloned().collect())
        }

        fn init_update(&self, recursive: bool) -> Result<()> {
            self.record(Call::InitUpdate(recursive));
            if self.init_count() as u32 <= self.init_failures {
                return Err(Error::GitCommand {
                    command: "submodule update --init".to_string(),
                    path: PathBuf::from("/mock"),
                    stderr: "fatal: unable to access remote".to_string(),
                });
            }
            Ok(())
        }

        fn set_head_reference(&self, reference: &Reference) -> Result<()> {
            let rev = reference.rev();
            self.record(Call::SetHead(rev.clone()));
            if self.missing_rev.as_deref() == Some(rev.as_str()) {
                return Err(Error::GitCommand {
                    command: "rev-parse --verify".to_string(),
                    path: PathBuf::from("/mock"),
                    stderr: format!("unknown revision '{}'", rev),
                });
            }
            *self.head.lock().unwrap() = Some(rev);
            Ok(())
        }

        fn reset_working_tree_and_index(&self) -> Result<()> {
            self.record(Call::Reset);
            Ok(())
        }

        fn head_commit(&self) -> Result<CommitInfo> {
            self.record(Call::HeadCommit);
            Ok(CommitInfo {
                id: "0123456789abcdef".to_string(),
                author: "Jellyfin Bot".to_string(),
                summary: format!("Checkout {}", self.head().unwrap_or_default()),
                timestamp: 1_656_547_200,
            })
        }
    }
}
