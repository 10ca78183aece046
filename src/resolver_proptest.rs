//! Property-based tests for release resolution.
//!
//! These tests use proptest to generate random identifiers and tag sets and
//! verify that the resolver's invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::release::{ReleaseIdentifier, ResolvedTarget, TagSet};
    use crate::resolver::{resolve, Resolution};
    use proptest::prelude::*;

    fn version() -> impl Strategy<Value = String> {
        "v?[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}"
    }

    fn tag_set() -> impl Strategy<Value = TagSet> {
        prop::collection::vec(version(), 0..8).prop_map(|tags| tags.into_iter().collect::<TagSet>())
    }

    proptest! {
        /// Property: "master" resolves to the default branch regardless of tags
        #[test]
        fn master_always_resolves_to_default_branch(a in tag_set(), b in tag_set()) {
            let resolution = resolve(&ReleaseIdentifier::default_branch(), &a, &b);
            prop_assert_eq!(resolution, Resolution::DefaultBranch);
        }

        /// Property: a release tagged as requested (or `v`-prefixed) in both
        /// repositories resolves to a tag present in both
        #[test]
        fn shared_release_resolves_to_tag_in_both(
            requested in version(),
            prefixed in any::<bool>(),
            a in prop::collection::vec(version(), 0..8),
            b in prop::collection::vec(version(), 0..8),
        ) {
            let release = ReleaseIdentifier::new(requested);
            let spelling = if prefixed {
                release.with_prefix()
            } else {
                release.to_string()
            };
            let a: TagSet = a.into_iter().chain(std::iter::once(spelling.clone())).collect();
            let b: TagSet = b.into_iter().chain(std::iter::once(spelling)).collect();

            match resolve(&release, &a, &b).target() {
                ResolvedTarget::Release(tag) => {
                    prop_assert!(a.contains(&tag) && b.contains(&tag));
                    if a.contains(&release.with_prefix()) && b.contains(&release.with_prefix()) {
                        prop_assert_eq!(tag, release.with_prefix());
                    }
                }
                ResolvedTarget::DefaultBranch => prop_assert!(false, "release should resolve"),
            }
        }

        /// Property: a release missing from either repository falls back
        #[test]
        fn missing_release_falls_back(requested in version(), a in tag_set(), b in tag_set()) {
            let release = ReleaseIdentifier::new(requested);
            prop_assume!(!a.has_release(&release) || !b.has_release(&release));
            prop_assert_eq!(resolve(&release, &a, &b).target(), ResolvedTarget::DefaultBranch);
        }

        /// Property: resolution is deterministic
        #[test]
        fn resolve_is_deterministic(requested in version(), a in tag_set(), b in tag_set()) {
            let release = ReleaseIdentifier::new(requested);
            prop_assert_eq!(resolve(&release, &a, &b), resolve(&release, &a, &b));
        }
    }
}
