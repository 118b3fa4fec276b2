use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::router::RouteTree;
use crate::runtime_config::RouterConfig;
use crate::table::RouteTable;
use crate::validator::ValidatorRegistry;

/// Command-line interface for route tables
#[derive(Parser)]
#[command(name = "routetree")]
#[command(about = "Inspect and exercise route tables", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Build a route table and report errors
    Check {
        /// Route table file (.yaml, .yml, .json or .toml)
        #[arg(short, long, env = "ROUTETREE_ROUTES")]
        routes: PathBuf,
    },
    /// Print the compiled route tree
    Tree {
        /// Route table file (.yaml, .yml, .json or .toml)
        #[arg(short, long, env = "ROUTETREE_ROUTES")]
        routes: PathBuf,
    },
    /// Resolve request targets against a route table
    Match {
        /// Route table file (.yaml, .yml, .json or .toml)
        #[arg(short, long, env = "ROUTETREE_ROUTES")]
        routes: PathBuf,

        /// Request targets, e.g. `/blog/42?page=2`
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

/// Execute `cli`, writing command output to `out`.
///
/// Diagnostics go through `tracing`; `out` only receives the command's
/// result so it can be piped.
pub fn run_cli<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    match cli.command {
        Commands::Check { routes } => {
            let tree = load_tree(&routes)?;
            writeln!(
                out,
                "ok: {} routes, {} nodes",
                tree.routes().len(),
                tree.node_count()
            )?;
        }
        Commands::Tree { routes } => {
            let tree = load_tree(&routes)?;
            write!(out, "{}", tree.dump())?;
        }
        Commands::Match { routes, paths } => {
            let tree = load_tree(&routes)?;
            for target in &paths {
                let line = match tree.resolve(target) {
                    Some(matched) => json!({
                        "path": target,
                        "matched": true,
                        "handlers": matched.handlers,
                        "params": matched.params_map(),
                    }),
                    None => json!({
                        "path": target,
                        "matched": false,
                    }),
                };
                writeln!(out, "{line}")?;
            }
        }
    }
    Ok(())
}

fn load_tree(routes: &Path) -> Result<RouteTree<String>> {
    let table = RouteTable::load(routes)?;
    let tree =
        table.into_tree_with_config(&ValidatorRegistry::with_builtins(), RouterConfig::from_env())?;
    info!(
        routes_file = %routes.display(),
        routes_count = tree.routes().len(),
        "Route table ready"
    );
    Ok(tree)
}
