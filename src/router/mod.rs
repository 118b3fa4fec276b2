//! # Router Module
//!
//! The router module maps request paths to registered handler chains using a
//! prefix-compressed route tree.
//!
//! ## Path syntax
//!
//! ```text
//!  /literal              static segment, exact match
//!  /:name                dynamic segment, any non-empty component
//!  /:name(regex)         dynamic segment, component must fully match regex
//!  /:name|validator|     dynamic segment, component must pass a named validator
//!  /*                    wildcard, one or more components
//!  /*name                wildcard that binds what it consumed
//! ```
//!
//! ## Architecture
//!
//! The tree has an explicit two-phase lifecycle:
//!
//! 1. **Building**: [`RouteTree::insert`] records raw registrations, one node
//!    per fragment. [`RouteTree::build`] then parses every fragment, slots
//!    dynamic and wildcard children, compiles constraints against a
//!    [`ValidatorRegistry`](crate::ValidatorRegistry) and compresses static
//!    chains. All syntax and ambiguity errors surface here.
//!
//! 2. **Built**: the tree is immutable. [`RouteTree::lookup`] takes `&self`
//!    and can be called from any number of threads; [`SharedRouteTree`]
//!    publishes rebuilt trees without blocking readers.
//!
//! [`RouteTree::reset`] is the only way back to building.
//!
//! ## Example
//!
//! ```rust
//! use routetree::{RouteTree, ValidatorRegistry};
//!
//! let mut validators = ValidatorRegistry::new();
//! validators.register("isNum", |s: &str| s.bytes().all(|b| b.is_ascii_digit()));
//!
//! let mut tree = RouteTree::new();
//! tree.insert("/blog/:id|isNum|", ["show_post"])?;
//! tree.insert("/blog/:id|isNum|/*/name", ["post_name"])?;
//! tree.build(&validators)?;
//!
//! let post = tree.lookup("/blog/10001").unwrap();
//! assert_eq!(post.get("id"), Some("10001"));
//!
//! let name = tree.lookup("/blog/10001/abc/d/name").unwrap();
//! assert_eq!(name.handlers, ["post_name"]);
//!
//! assert!(tree.lookup("/blog/abc").is_none());
//! # Ok::<(), routetree::RouteError>(())
//! ```
//!
//! ## Performance
//!
//! Lookup cost is bounded by path length and tree depth, not by the number of
//! routes. Only a wildcard followed by further segments tries more than one
//! split of the remaining path.

mod constraint;
mod core;
mod radix;
mod segment;
mod shared;

pub use constraint::Constraint;
pub use self::core::{ParamVec, RouteMatch, RouteTree, MAX_INLINE_PARAMS};
pub use radix::{NodeKind, RouteNode};
pub use shared::SharedRouteTree;
