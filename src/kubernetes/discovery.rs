// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Resource discovery for Kubernetes clusters.
//!
//! Turns the server's preferred-resources listing into the ordered set of
//! coordinates worth listing: sub-resources, core events and excluded groups
//! are dropped, everything else is kept in server order.

use std::collections::HashSet;
use thiserror::Error;

use crate::config::ExcludedGroups;

/// One resource as advertised by a discovery document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredResource {
    /// Plural resource name, e.g. "pods" or "pods/status"
    pub name: String,
    pub namespaced: bool,
    pub kind: String,
}

/// One group/version and the resources discovered at it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferredGroup {
    /// "v1" for the core group, "<group>/<version>" otherwise
    pub group_version: String,
    pub resources: Vec<DiscoveredResource>,
}

/// A listable kind at a concrete group/version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// API group (empty string for core v1)
    pub group: String,
    pub version: String,
    pub plural: String,
    pub namespaced: bool,
    pub kind: String,
}

impl ResourceDescriptor {
    /// Check if this resource is namespace-scoped
    pub fn is_namespaced(&self) -> bool {
        self.namespaced
    }

    /// Get the full API group/version string
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unexpected GroupVersion string: {0}")]
pub struct GroupVersionError(String);

/// Split a "group/version" string; a bare "v1" belongs to the core group
pub fn parse_group_version(gv: &str) -> Result<(String, String), GroupVersionError> {
    if gv.is_empty() {
        return Ok((String::new(), String::new()));
    }
    match gv.split_once('/') {
        None => Ok((String::new(), gv.to_string())),
        Some((group, version)) if !version.contains('/') => {
            Ok((group.to_string(), version.to_string()))
        }
        Some(_) => Err(GroupVersionError(gv.to_string())),
    }
}

/// Fold every served version of one group into the listings worth walking
///
/// `versions` holds one listing per served version in server order. Each resource
/// name is kept once: at the preferred version when that version serves it,
/// otherwise at the first other version that does. Versions left with nothing
/// new are dropped.
pub fn merge_group_versions(preferred: &str, versions: Vec<PreferredGroup>) -> Vec<PreferredGroup> {
    let (mut merged, rest): (Vec<_>, Vec<_>) = versions
        .into_iter()
        .partition(|v| v.group_version == preferred);
    merged.extend(rest);

    let mut seen = HashSet::new();
    merged
        .into_iter()
        .filter_map(|mut listing| {
            listing.resources.retain(|r| seen.insert(r.name.clone()));
            (!listing.resources.is_empty()).then_some(listing)
        })
        .collect()
}

/// Core v1 events churn constantly and are never collected
fn is_core_event(group: &str, version: &str, resource: &DiscoveredResource) -> bool {
    group.is_empty() && version == "v1" && (resource.name == "events" || resource.kind == "Event")
}

/// Walk the preferred resources and emit the coordinates to list, in server order
pub fn preferred_descriptors(
    groups: &[PreferredGroup],
    excluded: &ExcludedGroups,
) -> Vec<ResourceDescriptor> {
    let mut descriptors = Vec::new();

    for api_group in groups {
        let Ok((group, version)) = parse_group_version(&api_group.group_version) else {
            continue;
        };

        if excluded.contains(&group) {
            continue;
        }

        for resource in &api_group.resources {
            // Skip subresources (e.g., pods/log, pods/status)
            if resource.name.contains('/') {
                continue;
            }

            if is_core_event(&group, &version, resource) {
                continue;
            }

            descriptors.push(ResourceDescriptor {
                group: group.clone(),
                version: version.clone(),
                plural: resource.name.clone(),
                namespaced: resource.namespaced,
                kind: resource.kind.clone(),
            });
        }
    }

    descriptors
}
