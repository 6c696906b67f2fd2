// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::filter::FilterArgs;

const EXAMPLES: &str = r#"Examples:
  Get all resources (namespaced + cluster resources)
  kubectl get-resources

  Get only cluster-scoped resources
  kubectl get-resources --namespace=""

  Get only all namespaced resources
  kubectl get-resources --namespace="*" --exclude-cluster-resources=true

  Get specific namespace resources
  kubectl get-resources --namespace=default

  Get multiple namespace resources
  kubectl get-resources --namespace=default --namespace=sample-namespace

  Get all resources created before a given time
  kubectl get-resources --before=2025-08-10T09:39:09Z

  Get all resources created after a given time
  kubectl get-resources --after=2025-08-10T09:39:09Z

  Get all resources between two times
  kubectl get-resources --start=2025-08-10T09:39:09Z --end=2025-08-10T10:30:02Z

  Get resource details added in CSV output
  kubectl get-resources --namespace=default --resource-data=true

  Save all output YAMLs to a directory
  kubectl get-resources --output=<directory>

Notes:
  (1) Flags --resource-data and --output are mutually exclusive
  (2) Exclude API groups from retrieval by listing them, one per line, in
      ~/.get-resources-excluded-groups. Lines starting with '#' are comments.
      Commonly excluded groups are:
        events.k8s.io
        metrics.k8s.io
        image.openshift.io
        packages.operators.coreos.com"#;

#[derive(Parser, Debug)]
#[command(name = "kubectl-get_resources", bin_name = "kubectl get-resources")]
#[command(
    author,
    version,
    about = "Get resources from the K8s/OpenShift cluster. Note: all flags are optional.",
    after_help = EXAMPLES
)]
pub struct Args {
    /// Namespace(s) to process. Use '*' for all, '' for only cluster resources
    #[arg(long = "namespace", value_name = "NAMESPACE")]
    pub namespaces: Vec<String>,

    /// Exclude cluster-scoped resources
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub exclude_cluster_resources: bool,

    /// Only include resources created before this RFC 3339 timestamp
    #[arg(long, value_name = "TIME")]
    pub before: Option<String>,

    /// Only include resources created after this RFC 3339 timestamp
    #[arg(long, value_name = "TIME")]
    pub after: Option<String>,

    /// Start time for filtering resources (use with --end)
    #[arg(long, value_name = "TIME")]
    pub start: Option<String>,

    /// End time for filtering resources (use with --start)
    #[arg(long, value_name = "TIME")]
    pub end: Option<String>,

    /// Directory to save collected resource YAMLs
    #[arg(long, value_name = "DIR")]
    pub output: Option<String>,

    /// Add resource details in CSV output
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub resource_data: bool,

    /// Path to the kubeconfig file [default: ~/.kube/config]
    #[arg(long, value_name = "PATH")]
    pub kubeconfig: Option<PathBuf>,

    /// Kubernetes context to use [default: kubeconfig current context]
    #[arg(long, value_name = "CONTEXT")]
    pub context: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn filter_args(&self) -> FilterArgs<'_> {
        FilterArgs {
            before: self.before.as_deref().unwrap_or_default(),
            after: self.after.as_deref().unwrap_or_default(),
            start: self.start.as_deref().unwrap_or_default(),
            end: self.end.as_deref().unwrap_or_default(),
            output_dir: self.output.as_deref().unwrap_or_default(),
            inline_data: self.resource_data,
        }
    }
}
