// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Resource collection pipeline
//!
//! Discovery → per-coordinate list calls → creation-time filter → output sink.
//! Everything runs sequentially in discovery order. A list call that fails is
//! skipped: clusters routinely advertise kinds the caller may not list, and
//! one forbidden kind must not stop the rest of the snapshot.

use anyhow::{Context, Result};
use std::future::Future;
use std::io::Write;
use tracing::debug;

use crate::config::ExcludedGroups;
use crate::filter::Filter;
use crate::kubernetes::discovery::preferred_descriptors;
use crate::kubernetes::{ClusterApi, ListTarget, ResourceDescriptor};
use crate::output::OutputSink;

/// Namespace value selecting every namespace
pub const ALL_NAMESPACES: &str = "*";

/// Printed instead of a snapshot when the flags select nothing
pub const NOTHING_TO_PROCESS: &str = "Nothing to process: no namespaces and cluster excluded";

/// What a run collects, derived from `--namespace` and `--exclude-cluster-resources`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// No namespaces and cluster resources excluded
    Nothing,
    /// Every namespaced kind across all namespaces, plus cluster-scoped kinds
    All,
    /// Cluster-scoped kinds only
    ClusterOnly,
    /// Every namespaced kind across all namespaces, no cluster-scoped kinds
    AllNamespaces,
    /// Namespaced kinds in the listed namespaces, optionally plus cluster-scoped kinds
    Named {
        namespaces: Vec<String>,
        include_cluster: bool,
    },
}

impl Mode {
    pub fn select(namespaces: &[String], exclude_cluster: bool) -> Self {
        if namespaces.is_empty() {
            if exclude_cluster {
                Mode::Nothing
            } else {
                Mode::All
            }
        } else if namespaces.len() == 1 && namespaces[0].is_empty() {
            Mode::ClusterOnly
        } else if namespaces.iter().any(|ns| ns == ALL_NAMESPACES) {
            if exclude_cluster {
                Mode::AllNamespaces
            } else {
                Mode::All
            }
        } else {
            Mode::Named {
                namespaces: namespaces.to_vec(),
                include_cluster: !exclude_cluster,
            }
        }
    }

    fn includes_cluster(&self) -> bool {
        match self {
            Mode::All | Mode::ClusterOnly => true,
            Mode::Named {
                include_cluster, ..
            } => *include_cluster,
            Mode::Nothing | Mode::AllNamespaces => false,
        }
    }

    /// The list calls to issue for one coordinate; empty means skip it
    pub fn targets(&self, resource: &ResourceDescriptor) -> Vec<ListTarget<'_>> {
        if !resource.is_namespaced() {
            return if self.includes_cluster() {
                vec![ListTarget::Cluster]
            } else {
                vec![]
            };
        }

        match self {
            Mode::All | Mode::AllNamespaces => vec![ListTarget::AllNamespaces],
            Mode::Named { namespaces, .. } => namespaces
                .iter()
                .map(|ns| {
                    if ns.is_empty() {
                        ListTarget::AllNamespaces
                    } else {
                        ListTarget::Namespace(ns)
                    }
                })
                .collect(),
            Mode::Nothing | Mode::ClusterOnly => vec![],
        }
    }
}

/// Counters reported when collection finishes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub resources: usize,
    pub list_calls: usize,
    pub failed_calls: usize,
    pub objects: usize,
    pub filtered_out: usize,
}

/// Run discovery and route every surviving object to `sink`
pub async fn collect<C, W>(
    cluster: &C,
    mode: &Mode,
    filter: &Filter,
    excluded: &ExcludedGroups,
    sink: &mut OutputSink<W>,
) -> Result<Summary>
where
    C: ClusterApi + ?Sized,
    W: Write,
{
    let mut summary = Summary::default();
    if *mode == Mode::Nothing {
        return Ok(summary);
    }

    let groups = cluster
        .preferred_resources()
        .await
        .context("Failed to discover resources")?;

    let resources = preferred_descriptors(&groups, excluded);
    summary.resources = resources.len();
    debug!(resources = resources.len(), "Resources to collect");

    for resource in &resources {
        for target in mode.targets(resource) {
            summary.list_calls += 1;

            let items = match cluster.list(resource, target).await {
                Ok(items) => items,
                Err(e) => {
                    summary.failed_calls += 1;
                    debug!(
                        group = %resource.group,
                        version = %resource.version,
                        resource = %resource.plural,
                        scope = ?target,
                        error = %e,
                        "List failed, skipping"
                    );
                    continue;
                }
            };

            debug!(
                group = %resource.group,
                version = %resource.version,
                resource = %resource.plural,
                scope = ?target,
                items = items.len(),
                "Listed resource"
            );

            for item in &items {
                if !filter.matches(item.creation_timestamp()) {
                    summary.filtered_out += 1;
                    continue;
                }
                sink.emit(resource, item);
                summary.objects += 1;
            }
        }
    }

    Ok(summary)
}

/// Drive one invocation; `connect` is only awaited when there is something to collect
///
/// Returns `None` when the mode selects nothing: `out` then carries only the
/// "nothing to process" line and the cluster is never contacted.
pub async fn run<C, F, Fut, W>(
    mode: &Mode,
    filter: &Filter,
    excluded: &ExcludedGroups,
    connect: F,
    mut out: W,
) -> Result<Option<Summary>>
where
    C: ClusterApi,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<C>>,
    W: Write,
{
    if *mode == Mode::Nothing {
        writeln!(out, "{NOTHING_TO_PROCESS}")?;
        out.flush()?;
        return Ok(None);
    }

    let cluster = connect().await?;
    snapshot(&cluster, mode, filter, excluded, out)
        .await
        .map(Some)
}

/// Write the header, collect, and flush: the whole snapshot for one run
pub async fn snapshot<C, W>(
    cluster: &C,
    mode: &Mode,
    filter: &Filter,
    excluded: &ExcludedGroups,
    out: W,
) -> Result<Summary>
where
    C: ClusterApi + ?Sized,
    W: Write,
{
    let mut sink = OutputSink::for_filter(filter, out)?;
    let summary = collect(cluster, mode, filter, excluded, &mut sink).await?;
    sink.finish()?;
    Ok(summary)
}
