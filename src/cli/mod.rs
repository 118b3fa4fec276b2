//! # CLI Module
//!
//! Command-line tooling for route tables: validate them, inspect the
//! compiled tree, and try request paths against it.
//!
//! ## Commands
//!
//! ### `check`
//!
//! Build a table and report the first error, exiting non-zero on failure:
//!
//! ```bash
//! routetree check --routes routes.yaml
//! ```
//!
//! ### `tree`
//!
//! Print the prefix-compressed tree:
//!
//! ```bash
//! routetree tree --routes routes.yaml
//! ```
//!
//! ### `match`
//!
//! Resolve request targets and print one JSON object per target:
//!
//! ```bash
//! routetree match --routes routes.yaml /blog/42 '/static/css/site.css?v=3'
//! ```
//!
//! Tables may use the built-in validators (`isNum`, `isAlpha`, `isAlnum`,
//! `isSlug`, `isUlid`).
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use routetree::cli::{run_cli, Cli};
//! use clap::Parser;
//!
//! run_cli(Cli::parse(), &mut std::io::stdout())?;
//! ```

mod commands;


pub use commands::{run_cli, Cli, Commands};
