// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

mod cli;
mod collector;
mod config;
mod filter;
mod kubernetes;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{BufWriter, IsTerminal};
use std::path::PathBuf;
use tracing::info;

use cli::Args;
use collector::Mode;
use config::ExcludedGroups;
use filter::Filter;
use kubernetes::KubeCluster;

/// Initialize logging to stderr; stdout carries the CSV index
fn init_logging(verbose: bool) {
    let filter = if verbose {
        "kubectl_get_resources=debug"
    } else {
        "kubectl_get_resources=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

/// Reach the cluster named by `--kubeconfig`/`--context`, or the default kubeconfig
async fn connect(kubeconfig: Option<PathBuf>, context: Option<String>) -> Result<KubeCluster> {
    kubernetes::install_crypto_provider();

    let kubeconfig = match kubeconfig {
        Some(path) => path,
        None => config::default_kubeconfig_path()?,
    };
    KubeCluster::connect(&kubeconfig, context.as_deref()).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let filter = Filter::build(&args.filter_args()).context("Flag validation error")?;
    let excluded = ExcludedGroups::load();

    let mode = Mode::select(&args.namespaces, args.exclude_cluster_resources);

    let stdout = std::io::stdout();
    let Some(summary) = collector::run(
        &mode,
        &filter,
        &excluded,
        move || connect(args.kubeconfig, args.context),
        BufWriter::new(stdout.lock()),
    )
    .await?
    else {
        return Ok(());
    };

    info!(
        resources = summary.resources,
        list_calls = summary.list_calls,
        failed_calls = summary.failed_calls,
        objects = summary.objects,
        filtered_out = summary.filtered_out,
        "Done collecting resources."
    );

    Ok(())
}
