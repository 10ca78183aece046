//! # Release Resolution
//!
//! Decides the single release identifier used for a whole checkout run.
//!
//! A release is accepted only if both authoritative repositories carry a tag
//! for it. Repositories are not consistent about the `v` prefix, so a tag
//! counts as a match in any of three spellings: the identifier as requested,
//! its `v`-prefixed form, or its unprefixed form.
//!
//! When the release is accepted, the prefixed form wins if *both* repositories
//! have it; otherwise the requested string is used verbatim. When either
//! repository lacks the release the run falls back to the default branch.
//! The fallback is a soft failure: it is reported, never raised.
//!
//! Resolution is a pure function of its inputs. No version ordering is
//! involved; tag existence is the only test.

use crate::release::{ReleaseIdentifier, ResolvedTarget, TagSet};

/// Outcome of resolving a requested release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The default branch was requested; no tags were consulted.
    DefaultBranch,
    /// The release exists in both authoritative repositories.
    Release { tag: String },
    /// The release is missing from at least one authoritative repository.
    Fallback { requested: String },
}

impl Resolution {
    /// The target applied to every repository.
    pub fn target(&self) -> ResolvedTarget {
        match self {
            Resolution::Release { tag } => ResolvedTarget::Release(tag.clone()),
            Resolution::DefaultBranch | Resolution::Fallback { .. } => {
                ResolvedTarget::DefaultBranch
            }
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Resolution::Fallback { .. })
    }
}

/// Resolves `requested` against the tags of the two authoritative
/// repositories.
pub fn resolve(requested: &ReleaseIdentifier, first: &TagSet, second: &TagSet) -> Resolution {
    if requested.is_default_branch() {
        return Resolution::DefaultBranch;
    }

    if !(first.has_release(requested) && second.has_release(requested)) {
        return Resolution::Fallback {
            requested: requested.to_string(),
        };
    }

    let with_prefix = requested.with_prefix();
    let tag = if first.contains(&with_prefix) && second.contains(&with_prefix) {
        with_prefix
    } else {
        requested.to_string()
    };

    Resolution::Release { tag }
}
