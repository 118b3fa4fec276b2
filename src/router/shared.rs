//! Lock-free publication of built route trees.
//!
//! Request threads read the current tree through [`SharedRouteTree::load`]
//! without taking a lock; a rebuilt tree replaces it atomically with
//! [`SharedRouteTree::publish`]. In-flight lookups keep the snapshot they
//! loaded, so a tree is never mutated while it is being read.

use arc_swap::ArcSwap;
use std::fmt;
use std::sync::Arc;
use tracing::info;

use super::core::{RouteMatch, RouteTree};
use crate::error::RouteError;

/// Shared handle to the currently served [`RouteTree`].
pub struct SharedRouteTree<H> {
    current: ArcSwap<RouteTree<H>>,
}

impl<H> SharedRouteTree<H> {
    /// Wrap a built tree.
    ///
    /// # Errors
    ///
    /// [`RouteError::NotBuilding`] if `tree` has not been built successfully.
    pub fn new(tree: RouteTree<H>) -> Result<Self, RouteError> {
        ensure_built(&tree)?;
        Ok(Self {
            current: ArcSwap::from_pointee(tree),
        })
    }

    /// Snapshot of the tree currently served.
    #[must_use]
    pub fn load(&self) -> Arc<RouteTree<H>> {
        self.current.load_full()
    }

    /// Run a lookup against the current tree without cloning the `Arc`.
    pub fn lookup_with<R, F>(&self, path: &str, f: F) -> R
    where
        F: FnOnce(Option<RouteMatch<'_, H>>) -> R,
    {
        let guard = self.current.load();
        f(guard.lookup(path))
    }

    /// Replace the served tree with a newly built one.
    ///
    /// # Errors
    ///
    /// [`RouteError::NotBuilding`] if `tree` has not been built successfully;
    /// the served tree is left untouched.
    pub fn publish(&self, tree: RouteTree<H>) -> Result<(), RouteError> {
        ensure_built(&tree)?;
        let routes_count = tree.routes().len();
        self.current.store(Arc::new(tree));
        info!(routes_count, "Route tree published");
        Ok(())
    }
}

impl<H> fmt::Debug for SharedRouteTree<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedRouteTree")
            .field("current", &*self.current.load())
            .finish()
    }
}

fn ensure_built<H>(tree: &RouteTree<H>) -> Result<(), RouteError> {
    if tree.is_built() {
        Ok(())
    } else {
        Err(tree.build_error().cloned().unwrap_or(RouteError::NotBuilding))
    }
}
