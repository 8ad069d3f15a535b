// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Watch command - re-run the graph on file changes

use colored::Colorize;
use miette::Result;
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::Config;
use crate::machine::MachineRegistry;
use crate::pipeline::GraphValidator;
use crate::utils::print_error;

/// Directories whose changes never trigger a run
const IGNORED_DIRS: &[&str] = &[".git", "target"];

/// Run the watch command
pub async fn run(
    graph_path: Option<PathBuf>,
    debounce: Option<u64>,
    config: &Config,
    verbose: bool,
) -> Result<()> {
    let path = super::graph_path(graph_path, config);
    let debounce_ms = debounce.unwrap_or(config.debounce_ms);

    if !path.exists() {
        return Err(miette::miette!(
            "Graph file not found: {}\n\n\
             Run 'nodeflow init' to create one.",
            path.display()
        ));
    }

    println!("{}", "Starting watch mode...".bold());
    println!("Watching for changes (debounce: {}ms)", debounce_ms);
    println!("Press {} to exit.", "Ctrl+C".cyan());
    println!();

    // Create channel for receiving events
    let (tx, rx) = channel();

    // Create debounced watcher
    let mut debouncer = new_debouncer(Duration::from_millis(debounce_ms), tx)
        .map_err(|e| miette::miette!("Failed to create file watcher: {}", e))?;

    // Watch current directory
    debouncer
        .watcher()
        .watch(Path::new("."), RecursiveMode::Recursive)
        .map_err(|e| miette::miette!("Failed to start watching: {}", e))?;

    let registry = MachineRegistry::with_builtins();
    let mut changes = ChangeFilter::default();

    // Initial run
    run_graph(&path, &registry, config).await;

    // Watch for changes
    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let paths: Vec<PathBuf> = events
                    .into_iter()
                    .filter(|e| matches!(e.kind, DebouncedEventKind::Any))
                    .map(|e| e.path)
                    .collect();
                let relevant = changes.changed(paths);

                if !relevant.is_empty() {
                    println!();
                    println!("{}", "─".repeat(50).dimmed());
                    println!(
                        "{}: {} file(s) changed",
                        "Change detected".yellow(),
                        relevant.len()
                    );

                    if verbose {
                        for path in &relevant {
                            println!("  {}", path.display());
                        }
                    }

                    println!();
                    run_graph(&path, &registry, config).await;
                }
            }
            Ok(Err(e)) => {
                eprintln!("{}: {:?}", "Watch error".red(), e);
            }
            Err(e) => {
                // Channel closed
                eprintln!("{}: {}", "Channel error".red(), e);
                break;
            }
        }
    }

    Ok(())
}

/// Load, validate and run the whole graph, reporting instead of failing
async fn run_graph(path: &Path, registry: &MachineRegistry, config: &Config) {
    let start = Instant::now();

    let loaded = match super::load_graph(path, registry) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{}: {:?}", "Failed to load graph".red(), e);
            return;
        }
    };

    let validation = GraphValidator::validate(&loaded.graph);
    if !validation.is_valid() {
        eprintln!("{}", "Graph validation failed:".red().bold());
        for error in &validation.errors {
            print_error(error);
        }
        return;
    }

    match super::run::execute_blocking(loaded.graph, config.progress).await {
        Ok(report) => {
            for output in &report.terminal {
                println!("  {} {}", format!("({})", output.machine).dimmed(), output.value);
            }
            println!(
                "{} ({:.2}s)",
                "Pipeline completed successfully".green(),
                start.elapsed().as_secs_f64()
            );
        }
        Err(e) => {
            eprintln!("{}: {:?}", "Pipeline failed".red(), e);
        }
    }
}

/// Tracks file contents so that events which leave a file byte-identical
/// (such as a sink rewriting the same output) do not trigger another run
#[derive(Debug, Default)]
struct ChangeFilter {
    hashes: HashMap<PathBuf, Option<blake3::Hash>>,
}

impl ChangeFilter {
    /// Paths whose content differs from the last time they were seen
    fn changed(&mut self, paths: Vec<PathBuf>) -> Vec<PathBuf> {
        let mut changed = Vec::new();
        for path in paths {
            if is_ignored(&path) || changed.contains(&path) {
                continue;
            }

            let hash = std::fs::read(&path).ok().map(|bytes| blake3::hash(&bytes));
            if self.hashes.get(&path) == Some(&hash) {
                debug!(path = %path.display(), "content unchanged, ignoring event");
                continue;
            }
            self.hashes.insert(path.clone(), hash);
            changed.push(path);
        }
        changed
    }
}

fn is_ignored(path: &Path) -> bool {
    path.components().any(|c| {
        c.as_os_str()
            .to_str()
            .is_some_and(|name| IGNORED_DIRS.contains(&name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_unchanged_content_is_filtered() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("out.txt");
        std::fs::write(&file, "one").unwrap();

        let mut filter = ChangeFilter::default();
        assert_eq!(filter.changed(vec![file.clone()]), vec![file.clone()]);

        // rewritten with identical bytes
        std::fs::write(&file, "one").unwrap();
        assert!(filter.changed(vec![file.clone()]).is_empty());

        std::fs::write(&file, "two").unwrap();
        assert_eq!(filter.changed(vec![file.clone()]), vec![file]);
    }

    #[test]
    fn test_deletion_counts_once() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("gone.txt");
        std::fs::write(&file, "x").unwrap();

        let mut filter = ChangeFilter::default();
        filter.changed(vec![file.clone()]);
        std::fs::remove_file(&file).unwrap();

        assert_eq!(filter.changed(vec![file.clone(), file.clone()]), vec![file.clone()]);
        assert!(filter.changed(vec![file]).is_empty());
    }

    #[test]
    fn test_ignored_directories() {
        assert!(is_ignored(Path::new("./target/debug/out")));
        assert!(is_ignored(Path::new(".git/index")));
        assert!(!is_ignored(Path::new("./data/targets.txt")));
    }
}
