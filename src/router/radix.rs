//! Radix tree nodes for route matching
//!
//! A [`RouteNode`] goes through two shapes:
//!
//! - **Raw**: while routes are being registered every fragment of every path
//!   becomes one node, keyed by its raw text (`/blog`, `/:id(\d+)`, `/*`).
//! - **Compiled**: `build` classifies each raw child into the static map, the
//!   single dynamic slot or the single wildcard slot, compiles constraints,
//!   and finally collapses handler-less single-child static chains into one
//!   node (`/blog` + `/a` + `/b` becomes `/blog/a/b`).
//!
//! ## Matching
//!
//! The matcher walks the request path fragment by fragment. At every branch
//! point the candidates are tried in a fixed order:
//!
//! 1. the static child whose compressed segment is a prefix of the remaining
//!    path, ending on a `/` boundary;
//! 2. the dynamic child, which takes exactly one non-empty component and must
//!    satisfy its constraint;
//! 3. the wildcard child, which takes the shortest run of one or more
//!    components after which the rest of the route still matches.
//!
//! Once a static or dynamic candidate is taken the matcher commits to it; a
//! miss further down is a miss for the whole lookup. Only a wildcard searches,
//! and only over how many components it swallows.
//!
//! Captured values are recorded as byte ranges into the request path, so the
//! walk itself never allocates.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use super::constraint::Constraint;
use super::segment::{self, Segment};
use crate::error::RouteError;
use crate::validator::ValidatorRegistry;

/// Parameter name and the byte range of its value in the request path.
pub(crate) type Capture = (Arc<str>, Range<usize>);

/// Kind of a route node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Literal text matched by exact equality
    Static,
    /// `:name` placeholder matching one component
    Dynamic,
    /// `*` matching one or more components
    Wildcard,
}

/// One node of the route tree.
#[derive(Debug)]
pub struct RouteNode<H> {
    /// Literal fragment(s) this node stands for, e.g. `/blog/user` or `/:id`
    segment: String,
    kind: NodeKind,
    /// Bound name for dynamic and named wildcard nodes
    param_name: Option<Arc<str>>,
    constraint: Constraint,
    /// Static children keyed by their first fragment
    statics: BTreeMap<String, RouteNode<H>>,
    dynamic: Option<Box<RouteNode<H>>>,
    wildcard: Option<Box<RouteNode<H>>>,
    /// Handler chain, non-empty only on routable nodes
    handlers: Vec<H>,
}

impl<H> Default for RouteNode<H> {
    fn default() -> Self {
        Self::root()
    }
}

impl<H> RouteNode<H> {
    pub(crate) fn root() -> Self {
        Self::new(String::new())
    }

    fn new(segment: String) -> Self {
        Self {
            segment,
            kind: NodeKind::Static,
            param_name: None,
            constraint: Constraint::Any,
            statics: BTreeMap::new(),
            dynamic: None,
            wildcard: None,
            handlers: Vec::new(),
        }
    }

    /// Record a registration in the raw tree, one node per fragment.
    pub(crate) fn insert_raw(&mut self, fragments: &[&str], handlers: Vec<H>) {
        let mut node = self;
        for fragment in fragments {
            node = node
                .statics
                .entry((*fragment).to_string())
                .or_insert_with(|| RouteNode::new((*fragment).to_string()));
        }
        node.handlers.extend(handlers);
    }

    /// Turn a raw subtree into a compiled one.
    ///
    /// `prefix` is the registered text leading to this node, used for error
    /// reporting. `under_wildcard` rejects a second wildcard on one route.
    pub(crate) fn compile(
        mut self,
        prefix: &str,
        under_wildcard: bool,
        registry: &ValidatorRegistry,
    ) -> Result<Self, RouteError> {
        let raw_children = std::mem::take(&mut self.statics);

        for (fragment, child) in raw_children {
            let at = format!("{prefix}{fragment}");
            let parsed = segment::parse(&fragment)?;
            match parsed {
                Segment::Static(_) => {
                    let child = child.compile(&at, under_wildcard, registry)?;
                    self.statics.insert(fragment, child);
                }
                Segment::Dynamic { name, constraint } => {
                    if let Some(existing) = self.dynamic.as_deref() {
                        let at = position(prefix);
                        let existing = existing.segment.clone();
                        let conflicting = fragment.clone();
                        return Err(if existing_name_matches(&existing, name) {
                            RouteError::ConflictingConstraint {
                                at,
                                existing,
                                conflicting,
                            }
                        } else {
                            RouteError::AmbiguousParam {
                                at,
                                existing,
                                conflicting,
                            }
                        });
                    }
                    let constraint = Constraint::compile(constraint, &fragment, registry)?;
                    let mut child = child.compile(&at, under_wildcard, registry)?;
                    child.kind = NodeKind::Dynamic;
                    child.param_name = Some(Arc::from(name));
                    child.constraint = constraint;
                    self.dynamic = Some(Box::new(child));
                }
                Segment::Wildcard { name } => {
                    if under_wildcard {
                        return Err(RouteError::NestedWildcard { at });
                    }
                    if let Some(existing) = self.wildcard.as_deref() {
                        return Err(RouteError::AmbiguousParam {
                            at: position(prefix),
                            existing: existing.segment.clone(),
                            conflicting: fragment.clone(),
                        });
                    }
                    let mut child = child.compile(&at, true, registry)?;
                    child.kind = NodeKind::Wildcard;
                    child.param_name = name.map(Arc::from);
                    self.wildcard = Some(Box::new(child));
                }
            }
        }

        Ok(self)
    }

    /// Collapse runs of handler-less, single-child static nodes.
    pub(crate) fn compress(&mut self) {
        while self.kind == NodeKind::Static
            && self.handlers.is_empty()
            && self.dynamic.is_none()
            && self.wildcard.is_none()
            && self.statics.len() == 1
        {
            let Some((_, child)) = self.statics.pop_first() else {
                break;
            };
            self.segment.push_str(&child.segment);
            self.handlers = child.handlers;
            self.statics = child.statics;
            self.dynamic = child.dynamic;
            self.wildcard = child.wildcard;
        }

        for child in self.statics.values_mut() {
            child.compress();
        }
        if let Some(child) = self.dynamic.as_deref_mut() {
            child.compress();
        }
        if let Some(child) = self.wildcard.as_deref_mut() {
            child.compress();
        }
    }

    /// Match a full request path starting at this (root) node.
    pub(crate) fn find(&self, path: &str, captures: &mut Vec<Capture>) -> Option<&Self> {
        let rest = path.strip_prefix(self.segment.as_str())?;
        if !at_boundary(rest) {
            return None;
        }
        let mut walk = Walk {
            total: path.len(),
            captures,
        };
        self.descend(rest, &mut walk)
    }

    fn descend(&self, rest: &str, walk: &mut Walk<'_>) -> Option<&Self> {
        if rest.is_empty() {
            return self.terminal();
        }

        let fragment = segment::next_fragment(rest);

        if let Some(child) = self.statics.get(fragment) {
            if let Some(after) = rest.strip_prefix(child.segment.as_str()) {
                if at_boundary(after) {
                    return child.descend(after, walk);
                }
            }
        }

        if let Some(child) = self.dynamic.as_deref() {
            let value = &fragment[1..];
            if value.is_empty() || !child.constraint.accepts(value) {
                return None;
            }
            if let Some(name) = &child.param_name {
                let start = walk.total - rest.len() + 1;
                walk.captures
                    .push((Arc::clone(name), start..start + value.len()));
            }
            return child.descend(&rest[fragment.len()..], walk);
        }

        if let Some(child) = self.wildcard.as_deref() {
            return child.swallow(rest, walk);
        }

        None
    }

    /// Wildcard matching: consume the shortest run of components that lets
    /// the remainder of the route align, or everything on a terminal node.
    fn swallow(&self, rest: &str, walk: &mut Walk<'_>) -> Option<&Self> {
        let start = walk.total - rest.len();
        let mark = walk.captures.len();
        let mut consumed = 0;

        while consumed < rest.len() {
            consumed += segment::next_fragment(&rest[consumed..]).len();
            // a lone "/" is an empty component, keep going
            if consumed <= 1 {
                continue;
            }
            if let Some(name) = &self.param_name {
                walk.captures
                    .push((Arc::clone(name), start + 1..start + consumed));
            }

            let after = &rest[consumed..];
            let found = if after.is_empty() {
                self.terminal()
            } else {
                self.descend(after, walk)
            };
            if found.is_some() {
                return found;
            }
            walk.captures.truncate(mark);
        }

        None
    }

    #[inline]
    fn terminal(&self) -> Option<&Self> {
        (!self.handlers.is_empty()).then_some(self)
    }

    /// The literal segment stored on this node.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.segment
    }

    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    #[must_use]
    pub fn is_static(&self) -> bool {
        self.kind == NodeKind::Static
    }

    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.kind == NodeKind::Dynamic
    }

    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.kind == NodeKind::Wildcard
    }

    /// Whether a request ending exactly here is routable.
    #[must_use]
    pub fn is_handler(&self) -> bool {
        !self.handlers.is_empty()
    }

    #[must_use]
    pub fn param_name(&self) -> Option<&str> {
        self.param_name.as_deref()
    }

    #[must_use]
    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    #[must_use]
    pub fn handlers(&self) -> &[H] {
        &self.handlers
    }

    /// Children in matching priority: statics (sorted), dynamic, wildcard.
    pub fn iter_children(&self) -> impl Iterator<Item = &RouteNode<H>> {
        self.statics
            .values()
            .chain(self.dynamic.as_deref())
            .chain(self.wildcard.as_deref())
    }

    #[must_use]
    pub fn children(&self) -> Vec<&RouteNode<H>> {
        self.iter_children().collect()
    }

    /// The child whose stored segment equals `fragment` exactly.
    #[must_use]
    pub fn child(&self, fragment: &str) -> Option<&RouteNode<H>> {
        self.iter_children().find(|c| c.segment == fragment)
    }

    /// Nodes in this subtree, including this one.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.iter_children().map(RouteNode::node_count).sum::<usize>()
    }

    pub(crate) fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let segment = if self.segment.is_empty() && depth == 0 {
            "<root>"
        } else {
            &self.segment
        };
        write!(f, "{:indent$}{segment}", "", indent = depth * 2)?;
        match self.kind {
            NodeKind::Static => {}
            NodeKind::Dynamic => write!(f, " [dynamic {:?}]", self.constraint)?,
            NodeKind::Wildcard => write!(f, " [wildcard]")?,
        }
        if !self.handlers.is_empty() {
            write!(f, " ({} handler(s))", self.handlers.len())?;
        }
        writeln!(f)?;
        for child in self.iter_children() {
            child.render(f, depth + 1)?;
        }
        Ok(())
    }
}

struct Walk<'c> {
    total: usize,
    captures: &'c mut Vec<Capture>,
}

#[inline]
fn at_boundary(rest: &str) -> bool {
    rest.is_empty() || rest.starts_with('/')
}

fn position(prefix: &str) -> String {
    if prefix.is_empty() {
        "/".to_string()
    } else {
        prefix.to_string()
    }
}

fn existing_name_matches(existing: &str, name: &str) -> bool {
    matches!(
        segment::parse(existing),
        Ok(Segment::Dynamic { name: existing_name, .. }) if existing_name == name
    )
}
