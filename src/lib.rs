//! # Release Checkout Library
//!
//! This library prepares a reproducible multi-repository checkout for a CI
//! build. Given a requested release, it decides which git reference every
//! submodule of the enclosing repository should be at, and moves each one
//! there.
//!
//! ## Quick Example
//!
//! ```
//! use release_checkout::release::{ReleaseIdentifier, ResolvedTarget, TagSet};
//! use release_checkout::resolver::resolve;
//!
//! let server: TagSet = ["v10.8.0", "v10.8.1"].into_iter().collect();
//! let web: TagSet = ["v10.8.0"].into_iter().collect();
//!
//! let resolution = resolve(&ReleaseIdentifier::new("10.8.0"), &server, &web);
//! assert_eq!(resolution.target(), ResolvedTarget::Release("v10.8.0".to_string()));
//!
//! let resolution = resolve(&ReleaseIdentifier::new("10.8.1"), &server, &web);
//! assert_eq!(resolution.target(), ResolvedTarget::DefaultBranch);
//! ```
//!
//! ## Core Concepts
//!
//! - **Release resolution (`resolver`, `release`)**: a pure function that
//!   validates the requested release against the tags of two authoritative
//!   repositories, tolerating `v`-prefix differences, and falls back to the
//!   default branch when the release is not available in both.
//! - **Synchronization (`sync`)**: initializes every submodule (with retries),
//!   maps the resolved release to a reference per repository, and hard-resets
//!   each working tree to it.
//! - **Repository access (`repository`, `git`, `manifest`)**: submodules are
//!   discovered from `.gitmodules` and driven through the system `git`
//!   command behind the `SubmoduleOperations` trait.
//! - **Run orchestration (`checkout`)**: the `Initializing -> Resolving ->
//!   Syncing -> Done` sequence for one invocation.

pub mod checkout;
pub mod config;
pub mod defaults;
pub mod error;
pub mod git;
pub mod manifest;
pub mod output;
pub mod release;
pub mod repository;
pub mod resolver;
pub mod retry;
pub mod sync;

#[cfg(test)]
mod resolver_proptest;
