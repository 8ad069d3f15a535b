// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Project configuration
//!
//! Loaded from `.nodeflow.toml` in the project directory, falling back to the
//! user-level `config.toml` in the platform config directory. Every field has
//! a default, so a missing file is not an error.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{NodeflowError, NodeflowResult};

/// Project configuration file name
pub const CONFIG_FILE: &str = ".nodeflow.toml";

/// Configuration from `.nodeflow.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Graph file used when a command is given none
    pub graph: PathBuf,

    /// Show a progress bar while running
    pub progress: bool,

    /// Log filter used when `RUST_LOG` is unset
    pub log_filter: String,

    /// Watch-mode debounce delay in milliseconds
    pub debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            graph: PathBuf::from("pipeline.graph"),
            progress: true,
            log_filter: "nodeflow=info".to_string(),
            debounce_ms: 500,
        }
    }
}

impl Config {
    /// Load from a file, returning defaults if it does not exist
    pub fn load(path: &Path) -> NodeflowResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| NodeflowError::FileReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(toml::from_str(&content)?)
    }

    /// Load from the project directory, then the user config directory
    pub fn load_from_project(project_root: &Path) -> NodeflowResult<Self> {
        let project = project_root.join(CONFIG_FILE);
        if project.exists() {
            debug!(path = %project.display(), "using project config");
            return Self::load(&project);
        }

        match user_config_path() {
            Some(user) if user.exists() => {
                debug!(path = %user.display(), "using user config");
                Self::load(&user)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Save to file
    pub fn save(&self, path: &Path) -> NodeflowResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| NodeflowError::Toml {
            message: e.to_string(),
        })?;

        std::fs::write(path, content).map_err(|e| NodeflowError::FileWriteError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }
}

/// User-level configuration file, if the platform has a config directory
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "nodeflow").map(|dirs| dirs.config_dir().join("config.toml"))
}
