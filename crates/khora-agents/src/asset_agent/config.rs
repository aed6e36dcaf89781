// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tuning knobs of the [`AssetService`](super::AssetService).
///
/// Every field has a default, so a RON document only needs to list the values
/// it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetServiceConfig {
    /// The directory asset paths are resolved against.
    pub content_root: PathBuf,
    /// The maximum number of pending requests promoted per `update()`.
    pub promotion_budget_per_tick: usize,
    /// Fails requests whose dependencies wait on each other.
    pub detect_dependency_cycles: bool,
    /// Publishes an [`AssetEvent`](super::AssetEvent) whenever a request finishes.
    pub emit_events: bool,
}

impl Default for AssetServiceConfig {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from("assets"),
            promotion_budget_per_tick: usize::MAX,
            detect_dependency_cycles: true,
            emit_events: true,
        }
    }
}

impl AssetServiceConfig {
    /// Parses a configuration from a RON document.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        ron::from_str(source).context("Invalid asset service configuration")
    }

    /// Reads a configuration from a RON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        Self::from_ron_str(&source).with_context(|| format!("In '{}'", path.display()))
    }

    /// Serializes the configuration as pretty RON.
    pub fn to_ron_string(&self) -> Result<String> {
        let pretty_config = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        ron::ser::to_string_pretty(self, pretty_config)
            .context("Failed to serialize asset service configuration")
    }
}
