//! Shared test utilities for the CLI end-to-end tests.
//!
//! `GitFixture` builds a throwaway superproject with three submodules backed
//! by local repositories, so tests can run the real binary against real git
//! without network access.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let fixture = GitFixture::new();
//! fixture.command().arg("10.8.0").assert().success();
//! ```

use assert_fs::prelude::*;
use assert_fs::TempDir;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{git, git_env, GitFixture};
}

/// Environment that makes git deterministic and lets submodules clone from
/// local paths.
pub fn git_env() -> Vec<(&'static str, &'static str)> {
    vec![
        ("GIT_CONFIG_NOSYSTEM", "1"),
        ("GIT_CONFIG_GLOBAL", "/dev/null"),
        ("GIT_CONFIG_COUNT", "1"),
        ("GIT_CONFIG_KEY_0", "protocol.file.allow"),
        ("GIT_CONFIG_VALUE_0", "always"),
        ("GIT_AUTHOR_NAME", "Jellyfin Bot"),
        ("GIT_AUTHOR_EMAIL", "bot@example.invalid"),
        ("GIT_COMMITTER_NAME", "Jellyfin Bot"),
        ("GIT_COMMITTER_EMAIL", "bot@example.invalid"),
    ]
}

/// Run git in `dir`, panicking on failure, and return trimmed stdout.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(dir)
        .envs(git_env())
        .args(args)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed in {}: {}",
        args,
        dir.display(),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A superproject clone with uninitialized submodules.
#[allow(dead_code)]
pub struct GitFixture {
    pub temp: TempDir,
    /// The working copy the binary runs in.
    pub work: PathBuf,
    /// Upstream repositories, by submodule name.
    pub upstreams: Vec<(String, PathBuf)>,
}

#[allow(dead_code)]
impl GitFixture {
    /// Server and web both tag `v10.8.0` and have moved on since; the Windows
    /// repository carries the same tag but must still track master.
    pub fn new() -> Self {
        Self::with_tags(&["v10.7.7", "v10.8.0"], &["v10.8.0"], &["v10.8.0"])
    }

    pub fn with_tags(server: &[&str], web: &[&str], windows: &[&str]) -> Self {
        let temp = TempDir::new().unwrap();
        let upstreams: Vec<(String, PathBuf)> = [
            ("jellyfin-server", server),
            ("jellyfin-web", web),
            ("jellyfin-server-windows", windows),
        ]
        .into_iter()
        .map(|(name, tags)| (name.to_string(), upstream(&temp, name, tags)))
        .collect();

        let parent = temp.child("jellyfin-packaging");
        parent.create_dir_all().unwrap();
        git(parent.path(), &["init", "--quiet", "-b", "master"]);
        for (name, path) in &upstreams {
            git(
                parent.path(),
                &["submodule", "add", "--quiet", &path.to_string_lossy(), name],
            );
        }
        git(parent.path(), &["commit", "--quiet", "-m", "Add submodules"]);

        let work = temp.path().join("work");
        git(
            temp.path(),
            &["clone", "--quiet", &parent.path().to_string_lossy(), "work"],
        );

        Self {
            temp,
            work,
            upstreams,
        }
    }

    pub fn upstream(&self, name: &str) -> &Path {
        self.upstreams
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p.as_path())
            .unwrap()
    }

    /// Commit id `rev` resolves to in the upstream of `name`.
    pub fn upstream_commit(&self, name: &str, rev: &str) -> String {
        git(
            self.upstream(name),
            &["rev-parse", &format!("{}^{{commit}}", rev)],
        )
    }

    /// Commit id of HEAD in the checked-out submodule `name`.
    pub fn head_of(&self, name: &str) -> String {
        git(&self.work.join(name), &["rev-parse", "HEAD"])
    }

    /// The binary, configured to run inside the working copy.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("release-checkout");
        cmd.current_dir(&self.work)
            .envs(git_env())
            .env("NO_COLOR", "1")
            .env("RELEASE_CHECKOUT_INIT_ATTEMPTS", "2")
            .env("RELEASE_CHECKOUT_INIT_DELAY_MS", "0");
        cmd
    }
}

/// Create an upstream repository with a tagged release commit followed by a
/// newer commit on master.
fn upstream(temp: &TempDir, name: &str, tags: &[&str]) -> PathBuf {
    let dir = temp.child("upstream").child(name);
    dir.create_dir_all().unwrap();
    let path = dir.path();
    git(path, &["init", "--quiet", "-b", "master"]);

    dir.child("VERSION").write_str("release\n").unwrap();
    git(path, &["add", "VERSION"]);
    git(path, &["commit", "--quiet", "-m", "Release commit"]);
    for tag in tags {
        git(path, &["tag", tag]);
    }

    dir.child("VERSION").write_str("unstable\n").unwrap();
    git(
        path,
        &["commit", "--quiet", "-am", "Start next development cycle"],
    );

    path.to_path_buf()
}
