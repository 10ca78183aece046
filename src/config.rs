//! # Run Configuration
//!
//! `CheckoutConfig` gathers everything a checkout run needs besides the
//! requested release: which repositories are authoritative, which one is
//! pinned to the default branch, and how submodule initialization is retried.
//!
//! The configuration is built once at startup from the defaults in
//! [`crate::defaults`] and a small set of environment variables, then passed
//! by reference to the resolver and synchronizer.
//!
//! | Variable                             | Meaning                                   | Default |
//! |--------------------------------------|-------------------------------------------|---------|
//! | `RELEASE_CHECKOUT_INIT_ATTEMPTS`     | Max initialization attempts, `0` = no cap | `10`    |
//! | `RELEASE_CHECKOUT_INIT_DELAY_MS`     | Delay after the first failed attempt      | `1000`  |
//! | `RELEASE_CHECKOUT_INIT_MAX_DELAY_MS` | Ceiling for the doubling delay            | `30000` |
//! | `RELEASE_CHECKOUT_PARALLEL`          | Synchronize repositories in parallel      | `false` |

use std::env;
use std::num::NonZeroU32;
use std::time::Duration;

use crate::defaults::{self, AUTHORITATIVE_REPOSITORIES, EXCEPTION_REPOSITORY};
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;

pub const ENV_INIT_ATTEMPTS: &str = "RELEASE_CHECKOUT_INIT_ATTEMPTS";
pub const ENV_INIT_DELAY_MS: &str = "RELEASE_CHECKOUT_INIT_DELAY_MS";
pub const ENV_INIT_MAX_DELAY_MS: &str = "RELEASE_CHECKOUT_INIT_MAX_DELAY_MS";
pub const ENV_PARALLEL: &str = "RELEASE_CHECKOUT_PARALLEL";

const DEFAULT_INIT_ATTEMPTS: u32 = 10;
const DEFAULT_INIT_DELAY_MS: u64 = 1_000;
const DEFAULT_INIT_MAX_DELAY_MS: u64 = 30_000;

/// Settings for a single checkout run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    /// The two repositories whose tags gate a release.
    pub authoritative: [String; 2],
    /// The repository always checked out at the default branch.
    pub exception: String,
    /// Remote default-branch pointer, e.g. `origin/master`.
    pub default_branch_ref: String,
    /// Retry policy for submodule initialization.
    pub init_retry: RetryPolicy,
    /// Whether repositories are synchronized in parallel.
    pub parallel: bool,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            authoritative: AUTHORITATIVE_REPOSITORIES.map(String::from),
            exception: EXCEPTION_REPOSITORY.to_string(),
            default_branch_ref: defaults::default_branch_ref(),
            init_retry: RetryPolicy::new(
                NonZeroU32::new(DEFAULT_INIT_ATTEMPTS),
                Duration::from_millis(DEFAULT_INIT_DELAY_MS),
                Duration::from_millis(DEFAULT_INIT_MAX_DELAY_MS),
            ),
            parallel: false,
        }
    }
}

impl CheckoutConfig {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_INIT_ATTEMPTS) {
            // Zero lifts the cap entirely.
            let attempts: u32 = parse_number(ENV_INIT_ATTEMPTS, &value)?;
            config.init_retry.max_attempts = NonZeroU32::new(attempts);
        }
        if let Some(value) = lookup(ENV_INIT_DELAY_MS) {
            config.init_retry.initial_delay =
                Duration::from_millis(parse_number(ENV_INIT_DELAY_MS, &value)?);
        }
        if let Some(value) = lookup(ENV_INIT_MAX_DELAY_MS) {
            config.init_retry.max_delay =
                Duration::from_millis(parse_number(ENV_INIT_MAX_DELAY_MS, &value)?);
        }
        if let Some(value) = lookup(ENV_PARALLEL) {
            config.parallel = parse_flag(ENV_PARALLEL, &value)?;
        }

        Ok(config)
    }

    /// Whether `name` is one of the authoritative repositories.
    pub fn is_authoritative(&self, name: &str) -> bool {
        self.authoritative.iter().any(|a| a == name)
    }
}

fn parse_number<T>(variable: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| Error::Config {
        variable: variable.to_string(),
        value: value.to_string(),
        message: e.to_string(),
    })
}

fn parse_flag(variable: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config {
            variable: variable.to_string(),
            value: value.to_string(),
            message: "expected a boolean (true/false, 1/0)".to_string(),
        }),
    }
}
