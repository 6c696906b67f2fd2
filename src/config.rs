// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Per-user configuration for kubectl-get-resources
//!
//! Everything lives relative to the user's home directory:
//! - ~/.kube/config - kubeconfig used to reach the cluster
//! - ~/.get-resources-excluded-groups - API groups to leave out of discovery

use anyhow::{Result, anyhow};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the exclusion list, relative to the home directory
pub const EXCLUDED_GROUPS_FILE: &str = ".get-resources-excluded-groups";

/// Get the user's home directory from `$HOME`
pub fn home_dir() -> Result<PathBuf> {
    home_from(std::env::var_os("HOME"))
}

/// An unset or empty `HOME` leaves the home directory unknown
fn home_from(value: Option<OsString>) -> Result<PathBuf> {
    match value {
        Some(home) if !home.is_empty() => Ok(PathBuf::from(home)),
        _ => Err(anyhow!("$HOME is not defined")),
    }
}

/// Get the default kubeconfig path (~/.kube/config)
pub fn default_kubeconfig_path() -> Result<PathBuf> {
    Ok(home_dir()?.join(".kube").join("config"))
}

/// API groups the user asked to skip during discovery
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludedGroups {
    groups: HashSet<String>,
}

impl ExcludedGroups {
    /// Load the exclusion list from ~/.get-resources-excluded-groups
    ///
    /// A missing home directory or a missing file both yield an empty set.
    pub fn load() -> Self {
        Self::load_in(home_dir())
    }

    fn load_in(home: Result<PathBuf>) -> Self {
        match home {
            Ok(home) => Self::load_from(&home.join(EXCLUDED_GROUPS_FILE)),
            Err(e) => {
                warn!(error = %e, "Can't get user home directory, no groups excluded");
                Self::default()
            }
        }
    }

    /// Load the exclusion list from an explicit path
    pub fn load_from(path: &Path) -> Self {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "No excluded groups file");
                return Self::default();
            }
        };

        let (excluded, read_error) = Self::from_reader(BufReader::new(file));
        if let Some(e) = read_error {
            warn!(path = %path.display(), error = %e, "Error reading excluded groups file");
        }
        if !excluded.is_empty() {
            debug!(path = %path.display(), count = excluded.len(), "Loaded excluded groups");
        }
        excluded
    }

    /// Parse an exclusion list, one group per line
    ///
    /// Lines are trimmed; blank lines and `#` comments are ignored. Reading stops at the
    /// first I/O error, which is returned alongside whatever was collected before it.
    pub fn from_reader<R: BufRead>(reader: R) -> (Self, Option<std::io::Error>) {
        let mut groups = HashSet::new();
        for line in reader.lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => return (Self { groups }, Some(e)),
            };
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            groups.insert(line.to_string());
        }
        (Self { groups }, None)
    }

    pub fn contains(&self, group: &str) -> bool {
        self.groups.contains(group)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ExcludedGroups {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            groups: iter.into_iter().map(Into::into).collect(),
        }
    }
}
