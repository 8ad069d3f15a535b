// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! nodeflow - dataflow pipeline runner
//!
//! Build, persist and run graphs of processing machines.

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nodeflow::cli::{Cli, Commands};
use nodeflow::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Change to specified directory if provided
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir).map_err(|e| {
            miette::miette!("Failed to change to directory '{}': {}", dir.display(), e)
        })?;
    }

    let cwd = std::env::current_dir()
        .map_err(|e| miette::miette!("Failed to get current directory: {}", e))?;
    let config = Config::load_from_project(&cwd)?;

    // Initialize tracing
    let fallback = if cli.verbose {
        "nodeflow=debug".to_string()
    } else {
        config.log_filter.clone()
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    // Dispatch to command handlers
    match cli.command {
        Commands::Init { template, force } => {
            nodeflow::cli::init::run(template, force, &config, cli.verbose).await
        }
        Commands::Run {
            graph,
            dry_run,
            no_progress,
        } => nodeflow::cli::run::run(graph, dry_run, no_progress, &config, cli.verbose).await,
        Commands::Watch { graph, debounce } => {
            nodeflow::cli::watch::run(graph, debounce, &config, cli.verbose).await
        }
        Commands::Validate { graph } => {
            nodeflow::cli::validate::run(graph, &config, cli.verbose).await
        }
        Commands::Graph { graph, format } => nodeflow::cli::graph::run(graph, format, &config).await,
        Commands::Fmt { graph, check } => nodeflow::cli::fmt::run(graph, check, &config).await,
        Commands::Types { format } => nodeflow::cli::types::run(format).await,
    }
}
