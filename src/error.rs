use std::fmt;

/// Error produced while registering or compiling routes.
///
/// Everything structural is reported from [`RouteTree::build`](crate::router::RouteTree::build);
/// `insert` only fails when the tree has already left the building phase.
/// Request-time misses are never errors, they are plain `None` lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// Registration path is empty or does not start with `/`
    InvalidPath {
        /// The offending registration path
        path: String,
    },
    /// `:name(` without the closing `)`
    UnclosedRegex {
        /// Raw path component
        segment: String,
    },
    /// `)` appears before `(`, or trailing text follows the closing `)`
    ReversedRegex {
        /// Raw path component
        segment: String,
    },
    /// The enclosed pattern is not a valid regular expression
    InvalidRegex {
        /// Raw path component
        segment: String,
        /// Message reported by the regex compiler
        message: String,
    },
    /// Missing trailing pipe, empty validator name or chained validators
    MalformedValidator {
        /// Raw path component
        segment: String,
    },
    /// Validator name is not present in the registry handed to `build`
    UnknownValidator {
        /// Raw path component
        segment: String,
        /// Validator name that failed to resolve
        name: String,
    },
    /// `:` or `:(...)` without a parameter name
    EmptyParamName {
        /// Raw path component
        segment: String,
    },
    /// Two differently named parameters compete for one tree position
    AmbiguousParam {
        /// Registered prefix leading to the contested position
        at: String,
        /// Segment already occupying the slot
        existing: String,
        /// Segment that tried to take the slot
        conflicting: String,
    },
    /// Same parameter name registered with different constraints at one position
    ConflictingConstraint {
        /// Registered prefix leading to the contested position
        at: String,
        /// Segment already occupying the slot
        existing: String,
        /// Segment that tried to take the slot
        conflicting: String,
    },
    /// A route may carry at most one wildcard segment
    NestedWildcard {
        /// Registered prefix ending at the second wildcard
        at: String,
    },
    /// The tree is built (or failed) and must be reset before registering again
    NotBuilding,
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::InvalidPath { path } => {
                write!(f, "invalid route path '{path}': paths must start with '/'")
            }
            RouteError::UnclosedRegex { segment } => {
                write!(f, "regex constraint in '{segment}' is missing its closing ')'")
            }
            RouteError::ReversedRegex { segment } => write!(
                f,
                "regex constraint in '{segment}' has mismatched delimiters, \
                expected ':name(pattern)'"
            ),
            RouteError::InvalidRegex { segment, message } => {
                write!(f, "regex constraint in '{segment}' does not compile: {message}")
            }
            RouteError::MalformedValidator { segment } => write!(
                f,
                "validator constraint in '{segment}' is malformed, \
                expected exactly one name as ':name|validator|'"
            ),
            RouteError::UnknownValidator { segment, name } => {
                write!(f, "validator '{name}' used by '{segment}' is not registered")
            }
            RouteError::EmptyParamName { segment } => {
                write!(f, "dynamic segment '{segment}' has no parameter name")
            }
            RouteError::AmbiguousParam {
                at,
                existing,
                conflicting,
            } => write!(
                f,
                "ambiguous route at '{at}': '{conflicting}' conflicts with registered '{existing}'"
            ),
            RouteError::ConflictingConstraint {
                at,
                existing,
                conflicting,
            } => write!(
                f,
                "conflicting constraints at '{at}': '{conflicting}' differs from registered '{existing}'"
            ),
            RouteError::NestedWildcard { at } => {
                write!(f, "route '{at}' has more than one wildcard segment")
            }
            RouteError::NotBuilding => {
                write!(f, "route tree is no longer accepting registrations, call reset() first")
            }
        }
    }
}

impl std::error::Error for RouteError {}
