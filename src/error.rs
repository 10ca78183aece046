//! # Error Handling
//!
//! This module defines the centralized error type for `release-checkout`. It
//! uses the `thiserror` library to build an `Error` enum covering every
//! failure mode of a checkout run, with messages that name the repository,
//! command, or setting involved.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Each variant corresponds to one failure class
//!   and carries the context needed to diagnose it from CI logs.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! ## Transient vs. Fatal
//!
//! Submodule initialization is retried while it keeps failing with transient
//! errors (network hiccups, lock contention on the remote). `Error::is_transient`
//! provides that classification: only a `git` command that ran and exited with
//! a failure status is transient. Errors such as a missing `git` binary or an
//! unreadable `.gitmodules` are fatal and end the run immediately.
//!
//! An unknown release is deliberately *not* represented here. It is a soft
//! failure that downgrades the run to the default branch; see
//! [`crate::resolver::Resolution`].

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for release-checkout operations
#[derive(Error, Debug)]
pub enum Error {
    /// The current directory is not inside a git work tree.
    #[error("Could not locate the top-level repository: {message}")]
    TopLevelNotFound { message: String },

    /// The `.gitmodules` manifest could not be read or is malformed.
    #[error("Submodule manifest error in {}: {message}", path.display())]
    Manifest { path: PathBuf, message: String },

    /// Two repositories were registered under the same name.
    #[error("Repository '{name}' is declared more than once")]
    DuplicateRepository { name: String },

    /// A repository the run depends on is not declared as a submodule.
    #[error("Repository '{name}' is not declared as a submodule")]
    MissingRepository { name: String },

    /// The `git` executable could not be started.
    #[error("Failed to run git {command}: {message}")]
    GitSpawn { command: String, message: String },

    /// A `git` command ran but exited with a failure status.
    #[error("Git command failed in {}: {command} - {stderr}", path.display())]
    GitCommand {
        command: String,
        path: PathBuf,
        stderr: String,
    },

    /// The output of `git log` did not have the expected shape.
    #[error("Could not read head commit in {}: {message}", path.display())]
    CommitParse { path: PathBuf, message: String },

    /// Initialization kept failing until the retry policy gave up.
    #[error("Initialization of '{name}' failed after {attempts} attempts: {last_error}")]
    InitializationExhausted {
        name: String,
        attempts: u32,
        last_error: Box<Error>,
    },

    /// Setting the reference or resetting the working tree of a repository
    /// failed.
    #[error("Failed to synchronize '{name}' to {reference}: {source}")]
    Synchronization {
        name: String,
        reference: String,
        #[source]
        source: Box<Error>,
    },

    /// An environment setting could not be parsed.
    #[error("Invalid value '{value}' for {variable}: {message}")]
    Config {
        variable: String,
        value: String,
        message: String,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether retrying the failed operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::GitCommand { .. })
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
