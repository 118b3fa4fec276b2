//! Segment parser for registration paths.
//!
//! A registration path is cut into fragments, each starting with its `/`
//! delimiter (`/blog/:id` becomes `/blog` and `/:id`). The text after the
//! delimiter is a *component*, classified here as one of:
//!
//! ```text
//!  Syntax                Kind
//!  literal               static segment
//!  :name                 dynamic segment, any non-empty value
//!  :name(regex)          dynamic segment constrained by a regular expression
//!  :name|validator|      dynamic segment constrained by a named validator
//!  *                     wildcard, binds nothing
//!  *name                 wildcard, binds the consumed remainder as `name`
//! ```

use crate::error::RouteError;

/// Constraint syntax attached to a dynamic segment, not yet compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConstraintSpec<'a> {
    Any,
    Regex(&'a str),
    Validator(&'a str),
}

/// A classified path component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Static(&'a str),
    Dynamic {
        name: &'a str,
        constraint: ConstraintSpec<'a>,
    },
    Wildcard {
        name: Option<&'a str>,
    },
}

/// Split a registration or request path into `/`-led fragments.
///
/// `"/"` yields a single `"/"` fragment and a trailing slash yields a final
/// `"/"` fragment, so `/blog` and `/blog/` stay distinct routes.
pub(crate) fn fragments(path: &str) -> Vec<&str> {
    let mut bounds: Vec<usize> = path.match_indices('/').map(|(i, _)| i).collect();
    bounds.push(path.len());
    bounds.windows(2).map(|w| &path[w[0]..w[1]]).collect()
}

/// The first fragment of `rest`, which must start with `/`.
#[inline]
pub(crate) fn next_fragment(rest: &str) -> &str {
    match rest.get(1..).and_then(|tail| tail.find('/')) {
        Some(i) => &rest[..i + 1],
        None => rest,
    }
}

/// Classify one fragment (including its leading `/`).
pub(crate) fn parse(fragment: &str) -> Result<Segment<'_>, RouteError> {
    let component = fragment.strip_prefix('/').unwrap_or(fragment);

    if let Some(body) = component.strip_prefix(':') {
        return parse_dynamic(fragment, body);
    }
    if let Some(name) = component.strip_prefix('*') {
        return Ok(Segment::Wildcard {
            name: (!name.is_empty()).then_some(name),
        });
    }
    Ok(Segment::Static(component))
}

fn parse_dynamic<'a>(fragment: &str, body: &'a str) -> Result<Segment<'a>, RouteError> {
    let open = body.find('(');
    let close = body.find(')');
    let pipe = body.find('|');

    // A ')' ahead of every opening delimiter can never be balanced.
    if let Some(close) = close {
        let opened_before = [open, pipe].into_iter().flatten().any(|i| i < close);
        if !opened_before {
            return Err(RouteError::ReversedRegex {
                segment: fragment.to_string(),
            });
        }
    }

    let name_end = [open, pipe].into_iter().flatten().min();
    let name = &body[..name_end.unwrap_or(body.len())];
    if name.is_empty() {
        return Err(RouteError::EmptyParamName {
            segment: fragment.to_string(),
        });
    }

    let constraint = match name_end {
        None => ConstraintSpec::Any,
        Some(i) if Some(i) == open => {
            let rest = &body[i + 1..];
            if !rest.contains(')') {
                return Err(RouteError::UnclosedRegex {
                    segment: fragment.to_string(),
                });
            }
            match rest.strip_suffix(')') {
                Some(pattern) if !pattern.is_empty() => ConstraintSpec::Regex(pattern),
                Some(_) => {
                    return Err(RouteError::InvalidRegex {
                        segment: fragment.to_string(),
                        message: "empty pattern".to_string(),
                    })
                }
                // text after the closing ')'
                None => {
                    return Err(RouteError::ReversedRegex {
                        segment: fragment.to_string(),
                    })
                }
            }
        }
        Some(i) => {
            let rest = &body[i + 1..];
            match rest.strip_suffix('|') {
                Some(validator) if !validator.is_empty() && !validator.contains('|') => {
                    ConstraintSpec::Validator(validator)
                }
                _ => {
                    return Err(RouteError::MalformedValidator {
                        segment: fragment.to_string(),
                    })
                }
            }
        }
    };

    Ok(Segment::Dynamic { name, constraint })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragments_root_and_trailing_slash() {
        assert_eq!(fragments("/"), vec!["/"]);
        assert_eq!(fragments("/blog"), vec!["/blog"]);
        assert_eq!(fragments("/blog/"), vec!["/blog", "/"]);
        assert_eq!(fragments("/blog/:id/*/name"), vec!["/blog", "/:id", "/*", "/name"]);
    }

    #[test]
    fn test_next_fragment() {
        assert_eq!(next_fragment("/a/b/c"), "/a");
        assert_eq!(next_fragment("/abc"), "/abc");
        assert_eq!(next_fragment("/"), "/");
        assert_eq!(next_fragment("//x"), "/");
    }

    #[test]
    fn test_static_segment() {
        assert_eq!(parse("/blog").unwrap(), Segment::Static("blog"));
        assert_eq!(parse("/").unwrap(), Segment::Static(""));
    }

    #[test]
    fn test_plain_dynamic() {
        assert_eq!(
            parse("/:id").unwrap(),
            Segment::Dynamic {
                name: "id",
                constraint: ConstraintSpec::Any
            }
        );
    }

    #[test]
    fn test_regex_dynamic_keeps_inner_groups() {
        assert_eq!(
            parse(r"/:id(^\d+$)").unwrap(),
            Segment::Dynamic {
                name: "id",
                constraint: ConstraintSpec::Regex(r"^\d+$")
            }
        );
        assert_eq!(
            parse("/:kind(a|(b))").unwrap(),
            Segment::Dynamic {
                name: "kind",
                constraint: ConstraintSpec::Regex("a|(b)")
            }
        );
    }

    #[test]
    fn test_regex_missing_close() {
        assert!(matches!(
            parse(r"/:id(^\d+$"),
            Err(RouteError::UnclosedRegex { .. })
        ));
    }

    #[test]
    fn test_regex_reversed() {
        assert!(matches!(
            parse(r"/:id)^\d+$("),
            Err(RouteError::ReversedRegex { .. })
        ));
        assert!(matches!(
            parse(r"/:id(\d+)x"),
            Err(RouteError::ReversedRegex { .. })
        ));
    }

    #[test]
    fn test_validator_forms() {
        assert_eq!(
            parse("/:id|isNum|").unwrap(),
            Segment::Dynamic {
                name: "id",
                constraint: ConstraintSpec::Validator("isNum")
            }
        );
        for bad in ["/:id|isNum", "/:id||", "/:id|isNum|less4|"] {
            assert!(
                matches!(parse(bad), Err(RouteError::MalformedValidator { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_empty_param_name() {
        assert!(matches!(parse("/:"), Err(RouteError::EmptyParamName { .. })));
        assert!(matches!(
            parse(r"/:(\d+)"),
            Err(RouteError::EmptyParamName { .. })
        ));
    }

    #[test]
    fn test_wildcards() {
        assert_eq!(parse("/*").unwrap(), Segment::Wildcard { name: None });
        assert_eq!(
            parse("/*filepath").unwrap(),
            Segment::Wildcard {
                name: Some("filepath")
            }
        );
    }
}
