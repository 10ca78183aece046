//! # Release Identifiers and References
//!
//! Value types shared by the resolver and the synchronizer.
//!
//! - **`ReleaseIdentifier`**: the user-supplied token. The same logical release
//!   may be tagged `v1.2.3` in one repository and `1.2.3` in another, so the
//!   identifier exposes both canonical forms.
//! - **`TagSet`**: the tag names known to one repository.
//! - **`ResolvedTarget`**: the single identifier chosen for a whole run.
//! - **`Reference`**: the concrete git reference applied to one repository.

use std::collections::BTreeSet;
use std::fmt;

use crate::defaults::{DEFAULT_BRANCH_SENTINEL, RELEASE_PREFIX, TAG_REF_PREFIX};

/// A requested release, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseIdentifier(String);

impl ReleaseIdentifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The identifier for "no specific release".
    pub fn default_branch() -> Self {
        Self(DEFAULT_BRANCH_SENTINEL.to_string())
    }

    /// Builds an identifier from an optional command-line argument. A missing
    /// or empty argument selects the default branch.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            Some(value) if !value.is_empty() => Self::new(value),
            _ => Self::default_branch(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_default_branch(&self) -> bool {
        self.0 == DEFAULT_BRANCH_SENTINEL
    }

    /// The `v`-prefixed form: unchanged if already prefixed.
    pub fn with_prefix(&self) -> String {
        if self.0.starts_with(RELEASE_PREFIX) {
            self.0.clone()
        } else {
            format!("{}{}", RELEASE_PREFIX, self.0)
        }
    }

    /// The unprefixed form: a single leading `v` stripped if present.
    pub fn without_prefix(&self) -> String {
        self.0
            .strip_prefix(RELEASE_PREFIX)
            .unwrap_or(&self.0)
            .to_string()
    }
}

impl fmt::Display for ReleaseIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tag names known to a repository, ordered by name as `git tag` lists them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    /// Whether any canonical form of `release` is tagged here.
    pub fn has_release(&self, release: &ReleaseIdentifier) -> bool {
        self.contains(release.as_str())
            || self.contains(&release.with_prefix())
            || self.contains(&release.without_prefix())
    }

    /// The first `count` tags, for diagnostics.
    pub fn preview(&self, count: usize) -> Vec<&str> {
        self.0.iter().take(count).map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// The identifier applied uniformly across one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTarget {
    /// Track the remote default branch everywhere.
    DefaultBranch,
    /// Check out this tag, present in both authoritative repositories.
    Release(String),
}

impl ResolvedTarget {
    pub fn is_default_branch(&self) -> bool {
        matches!(self, ResolvedTarget::DefaultBranch)
    }
}

impl fmt::Display for ResolvedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedTarget::DefaultBranch => f.write_str(DEFAULT_BRANCH_SENTINEL),
            ResolvedTarget::Release(tag) => f.write_str(tag),
        }
    }
}

/// A concrete git reference applied to a single repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// A remote-tracking default branch such as `origin/master`.
    DefaultBranch(String),
    /// A tag, stored without the `refs/tags/` prefix.
    Tag(String),
}

impl Reference {
    /// The revision string handed to git.
    pub fn rev(&self) -> String {
        match self {
            Reference::DefaultBranch(branch) => branch.clone(),
            Reference::Tag(tag) => format!("{}{}", TAG_REF_PREFIX, tag),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rev())
    }
}
