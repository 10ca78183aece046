//! # Submodule Manifest
//!
//! Reads the `.gitmodules` file of the enclosing repository to learn which
//! submodules exist and where they live. The file uses git's INI dialect:
//!
//! ```text
//! [submodule "jellyfin-server"]
//!     path = jellyfin-server
//!     url = https://github.com/jellyfin/jellyfin.git
//! ```
//!
//! Entries keep their declaration order, which is also the order in which
//! repositories are reported.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use ini::Ini;

use crate::error::{Error, Result};

/// Name of the manifest file at the repository root.
pub const GITMODULES: &str = ".gitmodules";

/// A submodule declared in `.gitmodules`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmoduleEntry {
    /// Logical name, as in `[submodule "<name>"]`.
    pub name: String,
    /// Path relative to the repository root.
    pub path: PathBuf,
}

/// Loads the manifest from `<top_level>/.gitmodules`.
pub fn load(top_level: &Path) -> Result<Vec<SubmoduleEntry>> {
    let path = top_level.join(GITMODULES);
    let content = fs::read_to_string(&path).map_err(|e| Error::Manifest {
        path: path.clone(),
        message: e.to_string(),
    })?;
    parse(&content, &path)
}

/// Parses manifest content. `origin` is only used in error messages.
pub fn parse(content: &str, origin: &Path) -> Result<Vec<SubmoduleEntry>> {
    let manifest_error = |message: String| Error::Manifest {
        path: origin.to_path_buf(),
        message,
    };

    // git indents keys with tabs; flatten so they aren't read as continuations.
    let flattened: String = content
        .lines()
        .map(str::trim_start)
        .collect::<Vec<_>>()
        .join("\n");
    let ini = Ini::load_from_str_noescape(&flattened).map_err(|e| manifest_error(e.to_string()))?;

    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for (section, properties) in ini.iter() {
        let Some(name) = section.and_then(submodule_name) else {
            continue;
        };
        if !seen.insert(name.to_string()) {
            return Err(manifest_error(format!("duplicate submodule '{}'", name)));
        }
        let path = properties
            .get("path")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| manifest_error(format!("submodule '{}' has no path", name)))?;
        entries.push(SubmoduleEntry {
            name: name.to_string(),
            path: PathBuf::from(path),
        });
    }

    Ok(entries)
}

/// Extracts `<name>` from a `submodule "<name>"` section header.
fn submodule_name(section: &str) -> Option<&str> {
    let rest = section.trim().strip_prefix("submodule")?;
    let name = rest.trim().trim_matches('"');
    (!name.is_empty()).then_some(name)
}
