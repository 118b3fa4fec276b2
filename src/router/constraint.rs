use regex::Regex;
use std::fmt;
use std::sync::Arc;

use super::segment::ConstraintSpec;
use crate::error::RouteError;
use crate::validator::{ValidatorFn, ValidatorRegistry};

/// Compiled value constraint of a dynamic segment.
///
/// Resolved once at build time; lookups only call [`Constraint::accepts`].
#[derive(Clone, Default)]
pub enum Constraint {
    /// Any non-empty value
    #[default]
    Any,
    /// Value must match the whole pattern
    Pattern(Regex),
    /// Value must satisfy a registered validator
    Validator {
        name: Arc<str>,
        check: ValidatorFn,
    },
}

impl Constraint {
    pub(crate) fn compile(
        spec: ConstraintSpec<'_>,
        segment: &str,
        registry: &ValidatorRegistry,
    ) -> Result<Self, RouteError> {
        match spec {
            ConstraintSpec::Any => Ok(Constraint::Any),
            ConstraintSpec::Regex(pattern) => {
                // Anchored so the pattern has to cover the whole component.
                let anchored = format!("^(?:{pattern})$");
                Regex::new(&anchored)
                    .map(Constraint::Pattern)
                    .map_err(|e| RouteError::InvalidRegex {
                        segment: segment.to_string(),
                        message: e.to_string(),
                    })
            }
            ConstraintSpec::Validator(name) => match registry.get(name) {
                Some(check) => Ok(Constraint::Validator {
                    name: Arc::from(name),
                    check,
                }),
                None => Err(RouteError::UnknownValidator {
                    segment: segment.to_string(),
                    name: name.to_string(),
                }),
            },
        }
    }

    /// Check an extracted, non-empty component against the constraint.
    #[inline]
    #[must_use]
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Constraint::Any => true,
            Constraint::Pattern(re) => re.is_match(value),
            Constraint::Validator { check, .. } => check(value),
        }
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Any => write!(f, "Any"),
            Constraint::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Constraint::Validator { name, .. } => {
                f.debug_struct("Validator").field("name", name).finish()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_accepts_everything() {
        let c = Constraint::compile(ConstraintSpec::Any, "/:id", &ValidatorRegistry::new()).unwrap();
        assert!(c.accepts("abc"));
    }

    #[test]
    fn test_pattern_requires_full_match() {
        let c = Constraint::compile(
            ConstraintSpec::Regex(r"\d+"),
            r"/:id(\d+)",
            &ValidatorRegistry::new(),
        )
        .unwrap();
        assert!(c.accepts("10001"));
        assert!(!c.accepts("abc"));
        assert!(!c.accepts("10001abc"));
    }

    #[test]
    fn test_user_anchors_are_harmless() {
        let c = Constraint::compile(
            ConstraintSpec::Regex(r"^\d+$"),
            r"/:id(^\d+$)",
            &ValidatorRegistry::new(),
        )
        .unwrap();
        assert!(c.accepts("42"));
        assert!(!c.accepts("4a2"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Constraint::compile(
            ConstraintSpec::Regex("[a-"),
            "/:id([a-)",
            &ValidatorRegistry::new(),
        )
        .unwrap_err();
        assert!(matches!(err, RouteError::InvalidRegex { .. }));
    }

    #[test]
    fn test_validator_resolution() {
        let registry = ValidatorRegistry::with_builtins();
        let c = Constraint::compile(ConstraintSpec::Validator("isNum"), "/:id|isNum|", &registry)
            .unwrap();
        assert!(c.accepts("7"));
        assert!(!c.accepts("x"));
        assert_eq!(format!("{c:?}"), r#"Validator { name: "isNum" }"#);

        let err = Constraint::compile(ConstraintSpec::Validator("less4"), "/:id|less4|", &registry)
            .unwrap_err();
        assert_eq!(
            err,
            RouteError::UnknownValidator {
                segment: "/:id|less4|".to_string(),
                name: "less4".to_string()
            }
        );
    }
}
