// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Progress bar for pipeline runs

use indicatif::{ProgressBar, ProgressStyle};

use crate::pipeline::Progress;

/// Progress bar driven by executor [`Progress`] reports
pub struct RunProgress {
    bar: ProgressBar,
}

impl RunProgress {
    /// Create a visible bar for a run of `total` nodes
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg:30} [{bar:40.cyan/blue}] {pos}/{len} ({elapsed})")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        Self { bar }
    }

    /// Create a bar that draws nothing
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Reflect one executor report; `machine` is the running node's type
    pub fn update(&self, progress: &Progress, machine: &str) {
        self.bar.set_length(progress.total as u64);
        self.bar
            .set_message(format!("{} {:>3}%", machine, progress.percent));
        let done = if progress.percent >= 100 {
            progress.index + 1
        } else {
            progress.index
        };
        self.bar.set_position(done as u64);
    }

    /// Nodes finished so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Remove the bar from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    #[test]
    fn test_position_tracks_finished_nodes() {
        let mut graph: Graph<()> = Graph::new();
        let node = graph.add_node(());
        let bar = RunProgress::hidden();

        let at = |index, percent| Progress {
            index,
            total: 3,
            node,
            percent,
        };
        bar.update(&at(0, 0), "A");
        assert_eq!(bar.position(), 0);
        bar.update(&at(0, 100), "A");
        assert_eq!(bar.position(), 1);
        bar.update(&at(1, 40), "B");
        assert_eq!(bar.position(), 1);
        bar.finish();
    }
}
