//! # routetree
//!
//! **routetree** is a request-path router: it maps HTTP request paths to
//! registered handler chains through a prefix-compressed radix tree with
//! typed segments and value constraints.
//!
//! ## Overview
//!
//! Routes are registered as path patterns:
//!
//! | Pattern | Matches |
//! |---------|---------|
//! | `/blog/user/add` | exactly that path |
//! | `/blog/:id` | one non-empty component, bound as `id` |
//! | `/blog/:id(\d+)` | one component fully matching the regex |
//! | `/blog/:id\|isNum\|` | one component accepted by the `isNum` validator |
//! | `/files/*` | one or more components |
//! | `/files/*path` | one or more components, bound as `path` |
//!
//! At every branch point a static child beats the dynamic child, which beats
//! the wildcard child, so `/blog/user/add` and `/blog/user/:id/del` coexist.
//!
//! ## Architecture
//!
//! - **[`router`]** - segment parsing, tree build, compression and matching
//! - **[`validator`]** - named validator functions referenced by `|name|`
//! - **[`error`]** - build-time errors
//! - **[`runtime_config`]** - environment-driven tuning
//! - **[`pool`]** - scratch buffers for the lookup hot path
//! - **[`table`]** - route tables loaded from YAML, JSON or TOML
//! - **[`logging`]** - `tracing` subscriber setup for binaries
//! - **[`cli`]** - the `routetree` command
//!
//! ### Lookup Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Tree as RouteTree
//!     participant Pool as ScratchPool
//!     participant Node as RouteNode
//!
//!     Caller->>Tree: lookup("/blog/42/comments")
//!     Tree->>Pool: acquire capture buffer
//!     Tree->>Node: find(path)
//!     Node->>Node: static child? dynamic child? wildcard?
//!     Node->>Node: constraint.accepts("42")
//!     Node-->>Tree: matched node + capture ranges
//!     Tree->>Pool: release buffer
//!     Tree-->>Caller: RouteMatch { handlers, params }
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use routetree::{RouteTree, ValidatorRegistry};
//!
//! let mut tree = RouteTree::new();
//! tree.insert("/blog/user/add", ["add_user"])?;
//! tree.insert("/blog/user/:id|isNum|/del", ["auth", "del_user"])?;
//! tree.insert("/static/*file", ["serve_file"])?;
//! tree.build(&ValidatorRegistry::with_builtins())?;
//!
//! let matched = tree.lookup("/blog/user/7/del").unwrap();
//! assert_eq!(matched.handlers, ["auth", "del_user"]);
//! assert_eq!(matched.get("id"), Some("7"));
//!
//! let file = tree.resolve("/static/css/site%20v2.css?v=3").unwrap();
//! assert_eq!(file.get("file"), Some("css/site v2.css"));
//! # Ok::<(), routetree::RouteError>(())
//! ```
//!
//! ## Lifecycle
//!
//! A tree is built once and then served read-only. Syntax errors, unknown
//! validators and ambiguous registrations all surface from
//! [`RouteTree::build`]; lookups never fail, they only miss. To change the
//! routes of a running service, build a new tree and swap it in through
//! [`SharedRouteTree::publish`].

pub mod cli;
pub mod error;
pub mod logging;
pub mod pool;
pub mod router;
pub mod runtime_config;
pub mod table;
pub mod validator;

pub use error::RouteError;
pub use router::{NodeKind, RouteMatch, RouteNode, RouteTree, SharedRouteTree};
pub use runtime_config::RouterConfig;
pub use table::{RouteEntry, RouteTable};
pub use validator::{ValidatorFn, ValidatorRegistry};
