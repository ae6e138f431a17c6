// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Builder configuration: palette and defaults applied to freshly created fields.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

/// Fixed branch palette; the allocator hands these out in order.
pub const DEFAULT_PALETTE: [&str; 10] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899", "#14B8A6", "#F97316",
    "#6366F1", "#84CC16",
];

/// Tunables for the default-config factory and the color allocator.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuilderConfig {
    /// Branch colors, tried in order before falling back to random hex colors.
    pub palette: Vec<String>,
    /// Label prefix of seeded and added options ("Choix 1", "Choix 2", ...).
    pub option_label_prefix: String,
    /// Number of options a new radio/checkbox field starts with.
    pub seeded_options: usize,
    /// Prefix of generated field ids.
    pub id_prefix: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            option_label_prefix: "Choix".to_string(),
            seeded_options: 3,
            id_prefix: "field".to_string(),
        }
    }
}

impl BuilderConfig {
    /// Parse a (possibly partial) JSON configuration; missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self =
            serde_json::from_str(json).context("Failed to parse builder configuration")?;
        ensure!(
            cfg.seeded_options >= 1,
            "seededOptions must be at least 1, got {}",
            cfg.seeded_options
        );
        Ok(cfg)
    }

    /// Read a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read builder configuration {}", path.display()))?;
        Self::from_json_str(&raw)
    }
}
