//! Named validator functions for `:name|validator|` segments.
//!
//! The registry is owned by the surrounding application and handed to
//! [`RouteTree::build`](crate::router::RouteTree::build), which resolves every
//! validator name exactly once. Lookups call the cached function directly.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A validator accepts or rejects one extracted path component.
pub type ValidatorFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;

static SLUG_REGEX: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").ok());

/// Name → validator lookup table.
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    validators: HashMap<String, ValidatorFn>,
}

impl ValidatorRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the built-in validators:
    ///
    /// | name      | accepts                                  |
    /// |-----------|------------------------------------------|
    /// | `isNum`   | one or more ASCII digits                 |
    /// | `isAlpha` | one or more ASCII letters                |
    /// | `isAlnum` | one or more ASCII letters or digits      |
    /// | `isSlug`  | lowercase words joined by single hyphens |
    /// | `isUlid`  | a canonical ULID string                  |
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("isNum", |s: &str| {
            !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
        });
        registry.register("isAlpha", |s: &str| {
            !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphabetic())
        });
        registry.register("isAlnum", |s: &str| {
            !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric())
        });
        registry.register("isSlug", |s: &str| {
            SLUG_REGEX.as_ref().is_some_and(|re| re.is_match(s))
        });
        registry.register("isUlid", |s: &str| ulid::Ulid::from_string(s).is_ok());
        registry
    }

    /// Register (or replace) a validator under `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, validator: F) -> &mut Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.validators.insert(name.into(), Arc::new(validator));
        self
    }

    /// Resolve a validator by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ValidatorFn> {
        self.validators.get(name).cloned()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("validators", &self.names())
            .finish()
    }
}
