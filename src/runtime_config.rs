//! # Runtime Configuration Module
//!
//! Environment-driven tuning for the route tree.
//!
//! ## Environment Variables
//!
//! ### `ROUTETREE_SCRATCH_POOL_SIZE`
//!
//! Number of idle scratch buffers the matcher keeps for parameter capture.
//! Accepts decimal (`64`) or hexadecimal (`0x40`). Default: `64`.
//! Size it to roughly the number of threads performing lookups concurrently;
//! beyond that, buffers are allocated on demand and dropped on release.
//!
//! ### `ROUTETREE_SLOW_LOOKUP_US`
//!
//! Lookups slower than this many microseconds are logged at `WARN`.
//! Default: `1000`.
//!
//! ### `ROUTETREE_DECODE_PARAMS`
//!
//! Whether [`RouteTree::resolve`](crate::router::RouteTree::resolve)
//! percent-decodes extracted values. Default: `true`.
//!
//! ## Usage
//!
//! ```rust
//! use routetree::runtime_config::RouterConfig;
//!
//! let config = RouterConfig::from_env();
//! println!("scratch pool: {} buffers", config.scratch_pool_size);
//! ```

use std::env;
use std::time::Duration;

const DEFAULT_SCRATCH_POOL_SIZE: usize = 64;
const DEFAULT_SLOW_LOOKUP_US: u64 = 1000;

/// Router configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterConfig {
    /// Idle scratch buffers kept by the matcher (default: 64)
    pub scratch_pool_size: usize,
    /// Lookups slower than this are logged as warnings (default: 1 ms)
    pub slow_lookup_threshold: Duration,
    /// Percent-decode values returned by `resolve` (default: true)
    pub decode_params: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            scratch_pool_size: DEFAULT_SCRATCH_POOL_SIZE,
            slow_lookup_threshold: Duration::from_micros(DEFAULT_SLOW_LOOKUP_US),
            decode_params: true,
        }
    }
}

impl RouterConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let scratch_pool_size = match env::var("ROUTETREE_SCRATCH_POOL_SIZE") {
            Ok(val) => parse_size(&val).unwrap_or(DEFAULT_SCRATCH_POOL_SIZE),
            Err(_) => DEFAULT_SCRATCH_POOL_SIZE,
        };
        let slow_lookup_us = env::var("ROUTETREE_SLOW_LOOKUP_US")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_SLOW_LOOKUP_US);
        let decode_params = env::var("ROUTETREE_DECODE_PARAMS")
            .ok()
            .and_then(|s| parse_bool(&s))
            .unwrap_or(true);

        RouterConfig {
            scratch_pool_size,
            slow_lookup_threshold: Duration::from_micros(slow_lookup_us),
            decode_params,
        }
    }
}

fn parse_size(val: &str) -> Option<usize> {
    let val = val.trim();
    match val.strip_prefix("0x") {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => val.parse().ok(),
    }
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
