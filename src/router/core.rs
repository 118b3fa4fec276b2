//! Route tree core - registration, build and the lookup hot path.
//!
//! # Hot path
//!
//! `lookup` performs no heap allocation while walking: parameter positions
//! are collected as byte ranges into a pooled scratch buffer, and owned
//! values are materialised only once a route has matched.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use smallvec::SmallVec;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::radix::{Capture, RouteNode};
use super::segment;
use crate::error::RouteError;
use crate::pool::ScratchPool;
use crate::runtime_config::RouterConfig;
use crate::validator::ValidatorRegistry;

/// Maximum number of path parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Extracted parameters, in path order.
///
/// Names are shared with the tree (`Arc<str>`), values are per-request.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Successful lookup: the handler chain of the matched node plus the values
/// bound by every dynamic and named wildcard segment on the way.
#[derive(Debug, Clone)]
pub struct RouteMatch<'t, H> {
    /// Handler chain registered for the matched route
    pub handlers: &'t [H],
    /// Path parameters, empty when the route binds nothing
    pub params: ParamVec,
}

impl<H> RouteMatch<'_, H> {
    /// Get a parameter by name.
    ///
    /// If a name is bound twice on one route the last occurrence wins.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Convert params to a HashMap.
    /// Note: This allocates - use get() in hot paths instead
    #[must_use]
    pub fn params_map(&self) -> HashMap<String, String> {
        self.params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

/// Lifecycle of a tree. `reset` is the only way back to `Building`.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    /// Accepting registrations; lookups always miss
    Building,
    /// Immutable and servable
    Built,
    /// Build failed; nothing is servable until `reset`
    Failed(RouteError),
}

/// Route tree mapping request paths to handler chains.
///
/// ```
/// use routetree::{RouteTree, ValidatorRegistry};
///
/// let mut tree = RouteTree::new();
/// tree.insert("/blog/user/add", ["add_user"])?;
/// tree.insert(r"/blog/user/:id(\d+)/del", ["del_user"])?;
/// tree.build(&ValidatorRegistry::new())?;
///
/// let matched = tree.lookup("/blog/user/5/del").unwrap();
/// assert_eq!(matched.handlers, ["del_user"]);
/// assert_eq!(matched.get("id"), Some("5"));
/// assert!(tree.lookup("/blog/user/x/del").is_none());
/// # Ok::<(), routetree::RouteError>(())
/// ```
pub struct RouteTree<H> {
    root: RouteNode<H>,
    phase: Phase,
    /// Registered patterns in insertion order
    routes: Vec<String>,
    /// Path-level problems seen at insert time, reported by `build`
    deferred: Vec<RouteError>,
    config: RouterConfig,
    scratch: ScratchPool<Vec<Capture>>,
}

impl<H> Default for RouteTree<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> RouteTree<H> {
    /// Create an empty tree with [`RouterConfig::default`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    #[must_use]
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            root: RouteNode::root(),
            phase: Phase::Building,
            routes: Vec::new(),
            deferred: Vec::new(),
            scratch: ScratchPool::new(config.scratch_pool_size),
            config,
        }
    }

    /// Register `path` with a handler chain.
    ///
    /// Syntax problems in `path` are not reported here but by [`build`](Self::build),
    /// once every validator is known. Registering with no handlers is a no-op.
    ///
    /// # Errors
    ///
    /// [`RouteError::NotBuilding`] once the tree has been built (or failed to);
    /// call [`reset`](Self::reset) first.
    pub fn insert<I>(&mut self, path: &str, handlers: I) -> Result<(), RouteError>
    where
        I: IntoIterator<Item = H>,
    {
        if self.phase != Phase::Building {
            warn!(path = %path, "Route registered after build, ignoring");
            return Err(RouteError::NotBuilding);
        }

        let handlers: Vec<H> = handlers.into_iter().collect();
        if handlers.is_empty() {
            debug!(path = %path, "Route registered without handlers, ignoring");
            return Ok(());
        }

        if !path.starts_with('/') {
            self.deferred.push(RouteError::InvalidPath {
                path: path.to_string(),
            });
            return Ok(());
        }

        self.root.insert_raw(&segment::fragments(path), handlers);
        self.routes.push(path.to_string());
        debug!(path = %path, routes_count = self.routes.len(), "Route registered");
        Ok(())
    }

    /// Parse, slot, compile and compress every registration.
    ///
    /// On success the tree becomes immutable and servable. On failure nothing
    /// is servable and every later `build` returns the same error until
    /// [`reset`](Self::reset). Building an already built tree is a no-op.
    ///
    /// # Errors
    ///
    /// Any [`RouteError`] describing malformed syntax, an unknown validator or
    /// an ambiguous registration.
    pub fn build(&mut self, registry: &ValidatorRegistry) -> Result<(), RouteError> {
        match &self.phase {
            Phase::Built => return Ok(()),
            Phase::Failed(err) => return Err(err.clone()),
            Phase::Building => {}
        }

        let start = Instant::now();
        let raw = std::mem::take(&mut self.root);
        let compiled = match self.deferred.first() {
            Some(err) => Err(err.clone()),
            None => raw.compile("", false, registry),
        };

        match compiled {
            Ok(mut root) => {
                root.compress();
                self.root = root;
                self.phase = Phase::Built;

                let routes_summary: Vec<&str> =
                    self.routes.iter().take(10).map(String::as_str).collect();
                info!(
                    routes_count = self.routes.len(),
                    node_count = self.root.node_count(),
                    validators = registry.len(),
                    routes_summary = ?routes_summary,
                    duration_us = start.elapsed().as_micros(),
                    "Route tree built"
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    routes_count = self.routes.len(),
                    error = %err,
                    "Route tree build failed"
                );
                self.phase = Phase::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Discard every registration and compiled node.
    pub fn reset(&mut self) {
        debug!(routes_count = self.routes.len(), "Route tree reset");
        self.root = RouteNode::root();
        self.phase = Phase::Building;
        self.routes.clear();
        self.deferred.clear();
    }

    /// Match a request path exactly as given.
    ///
    /// Returns `None` when no route matches, when a constraint rejects a
    /// value, or when the tree is not built.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<RouteMatch<'_, H>> {
        if self.phase != Phase::Built {
            debug!(path = %path, "Lookup on a tree that is not built");
            return None;
        }

        let match_start = Instant::now();
        let mut captures = self.scratch.acquire();
        let node = self.root.find(path, &mut captures);
        let match_duration = match_start.elapsed();

        let Some(node) = node else {
            debug!(
                path = %path,
                duration_us = match_duration.as_micros(),
                "No route matched"
            );
            return None;
        };

        let params: ParamVec = captures
            .drain(..)
            .map(|(name, range)| (name, path[range].to_owned()))
            .collect();

        if match_duration > self.config.slow_lookup_threshold {
            warn!(
                path = %path,
                matched = %node.path(),
                duration_us = match_duration.as_micros(),
                "Slow route matching detected"
            );
        } else {
            debug!(
                path = %path,
                matched = %node.path(),
                params = ?params,
                duration_us = match_duration.as_micros(),
                "Route matched"
            );
        }

        Some(RouteMatch {
            handlers: node.handlers(),
            params,
        })
    }

    /// Match a raw request target such as `/files/a%20b?x=1#top`.
    ///
    /// The query string and fragment are dropped, the path is matched with
    /// [`lookup`](Self::lookup), and extracted values are percent-decoded when
    /// [`RouterConfig::decode_params`] is set. Values that do not decode to
    /// UTF-8 are kept as-is.
    #[must_use]
    pub fn resolve(&self, target: &str) -> Option<RouteMatch<'_, H>> {
        let path = target
            .find(['?', '#'])
            .map_or(target, |end| &target[..end]);

        let mut matched = self.lookup(path)?;
        if self.config.decode_params {
            for (_, value) in matched.params.iter_mut() {
                let decoded = match urlencoding::decode(value) {
                    Ok(Cow::Owned(decoded)) => decoded,
                    _ => continue,
                };
                *value = decoded;
            }
        }
        Some(matched)
    }

    /// Whether `build` has succeeded since the last `reset`.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.phase == Phase::Built
    }

    /// The error of the last failed `build`, if the tree is in that state.
    #[must_use]
    pub fn build_error(&self) -> Option<&RouteError> {
        match &self.phase {
            Phase::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Segment stored on the root node (`""` for an empty tree).
    #[must_use]
    pub fn path(&self) -> &str {
        self.root.path()
    }

    #[must_use]
    pub fn root(&self) -> &RouteNode<H> {
        &self.root
    }

    #[must_use]
    pub fn children(&self) -> Vec<&RouteNode<H>> {
        self.root.children()
    }

    #[must_use]
    pub fn child(&self, fragment: &str) -> Option<&RouteNode<H>> {
        self.root.child(fragment)
    }

    /// Whether the root itself is routable (e.g. a lone `/` registration).
    #[must_use]
    pub fn is_handler(&self) -> bool {
        self.root.is_handler()
    }

    /// Registered route patterns in insertion order.
    #[must_use]
    pub fn routes(&self) -> &[String] {
        &self.routes
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Scratch buffers currently parked in the pool.
    #[cfg(test)]
    pub(crate) fn scratch_idle(&self) -> usize {
        self.scratch.idle()
    }

    /// Indented rendering of the tree for diagnostics.
    #[must_use]
    pub fn dump(&self) -> String {
        self.to_string()
    }
}

impl<H> fmt::Display for RouteTree<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.render(f, 0)
    }
}

impl<H> fmt::Debug for RouteTree<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTree")
            .field("phase", &self.phase)
            .field("routes", &self.routes)
            .field("node_count", &self.root.node_count())
            .field("config", &self.config)
            .finish()
    }
}
