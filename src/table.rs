//! Route tables loaded from YAML, JSON or TOML files.
//!
//! ```yaml
//! routes:
//!   - path: /blog/:id|isNum|
//!     handlers: [auth, show_post]
//!   - path: /static/*file
//!     handlers: [serve_file]
//! ```
//!
//! Handlers are opaque names here; the table is meant for tooling and tests
//! that need a tree without compiled-in handler functions.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::router::RouteTree;
use crate::runtime_config::RouterConfig;
use crate::validator::ValidatorRegistry;

/// One registration: a path pattern and its handler chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub path: String,
    #[serde(default)]
    pub handlers: Vec<String>,
}

/// Ordered list of registrations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

/// Serialization format of a route table file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Yaml,
    Json,
    Toml,
}

impl TableFormat {
    /// Pick a format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml" | "yml") => Ok(TableFormat::Yaml),
            Some("json") => Ok(TableFormat::Json),
            Some("toml") => Ok(TableFormat::Toml),
            _ => anyhow::bail!(
                "unsupported route table extension for {} (expected .yaml, .yml, .json or .toml)",
                path.display()
            ),
        }
    }
}

impl RouteTable {
    /// Read and parse a table, choosing the format from the extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = TableFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read route table {}", path.display()))?;
        let table = Self::parse(&content, format)
            .with_context(|| format!("Failed to parse route table {}", path.display()))?;
        debug!(
            path = %path.display(),
            routes_count = table.routes.len(),
            "Route table loaded"
        );
        Ok(table)
    }

    pub fn parse(content: &str, format: TableFormat) -> Result<Self> {
        let table: Self = match format {
            TableFormat::Yaml => serde_yaml::from_str(content)?,
            TableFormat::Json => serde_json::from_str(content)?,
            TableFormat::Toml => toml::from_str(content)?,
        };
        Ok(table)
    }

    /// Register every entry in order and build the tree.
    pub fn into_tree(self, registry: &ValidatorRegistry) -> Result<RouteTree<String>> {
        self.into_tree_with_config(registry, RouterConfig::default())
    }

    pub fn into_tree_with_config(
        self,
        registry: &ValidatorRegistry,
        config: RouterConfig,
    ) -> Result<RouteTree<String>> {
        let mut tree = RouteTree::with_config(config);
        for entry in self.routes {
            tree.insert(&entry.path, entry.handlers)
                .with_context(|| format!("Failed to register {}", entry.path))?;
        }
        tree.build(registry).context("Failed to build route tree")?;
        Ok(tree)
    }
}
