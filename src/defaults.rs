//! Default values for release-checkout.
//!
//! This module centralizes the fixed repository names and reference formats
//! used across the resolver and synchronizer, so they are declared once.

/// Sentinel release identifier meaning "track the default branch".
pub const DEFAULT_BRANCH_SENTINEL: &str = "master";

/// Remote default-branch pointer checked out when no release applies.
pub const DEFAULT_BRANCH_REF: &str = "origin/master";

/// Prefix of fully qualified tag references.
pub const TAG_REF_PREFIX: &str = "refs/tags/";

/// Prefix distinguishing the canonical form of a release tag.
pub const RELEASE_PREFIX: char = 'v';

/// Repositories whose tags decide whether a release is valid.
pub const AUTHORITATIVE_REPOSITORIES: [&str; 2] = ["jellyfin-server", "jellyfin-web"];

/// Repository that always tracks the default branch.
pub const EXCEPTION_REPOSITORY: &str = "jellyfin-server-windows";

/// Number of tags shown per repository when a release cannot be resolved.
pub const TAG_PREVIEW_LEN: usize = 10;

/// Returns the default-branch reference as an owned string.
///
/// Kept as a function so callers building a [`crate::config::CheckoutConfig`]
/// don't need to repeat the conversion.
pub fn default_branch_ref() -> String {
    DEFAULT_BRANCH_REF.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exception_is_not_authoritative() {
        assert!(!AUTHORITATIVE_REPOSITORIES.contains(&EXCEPTION_REPOSITORY));
    }

    #[test]
    fn test_authoritative_repositories_are_distinct() {
        assert_ne!(AUTHORITATIVE_REPOSITORIES[0], AUTHORITATIVE_REPOSITORIES[1]);
    }

    #[test]
    fn test_default_branch_ref_tracks_sentinel() {
        assert!(default_branch_ref().ends_with(DEFAULT_BRANCH_SENTINEL));
    }
}
