//! The `filter` query-parameter mini-language
//!
//! A filter is a comma-separated list of `name:value` components:
//!
//! ```text
//! filter=name:Felix,address:Test
//! ```
//!
//! In the default equality mode each component becomes `name == value`.
//! A component whose name ends in `_option` switches the whole filter into
//! range (prefix) mode, where each ordinary component `name:value` becomes
//! `name >= value AND name < successor(value)`. Option components are markers
//! only and never become predicates themselves.
//!
//! ```text
//! filter=name:ABC,name_option:      ->  name >= "ABC" AND name < "ABD"
//! ```

use thiserror::Error;
use tracing::debug;

use crate::repository::FilterCondition;

/// Name suffix that marks a component as a range-mode switch
pub const OPTION_SUFFIX: &str = "_option";

/// Filter parse failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// A component is not of the form `<name>:<value>`
    #[error("filter component `{component}` must be of format <name>:<value>")]
    BadSyntax {
        /// The offending component, as received
        component: String,
    },
}

/// How ordinary components are turned into predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// `name == value`
    #[default]
    Equality,
    /// `value <= name < successor(value)`
    Range,
}

/// A parsed filter, ready to hand to the store
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSet {
    /// Mode selected by the presence of option markers
    pub mode: FilterMode,
    /// Predicates, ANDed, in the order the components appeared
    pub conditions: Vec<FilterCondition>,
}

impl FilterSet {
    /// Whether the filter holds no predicates
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Parse a raw `filter` parameter
///
/// # Example
///
/// ```rust
/// use entity_rest::filter::{parse_filter, FilterMode};
/// use entity_rest::repository::FilterCondition;
///
/// let set = parse_filter("name:ABC,name_option:").unwrap();
/// assert_eq!(set.mode, FilterMode::Range);
/// assert_eq!(
///     set.conditions,
///     vec![FilterCondition::gte("name", "ABC"), FilterCondition::lt("name", "ABD")]
/// );
///
/// assert!(parse_filter("name=ABC").is_err());
/// ```
pub fn parse_filter(raw: &str) -> Result<FilterSet, FilterError> {
    let mut components = Vec::new();
    let mut mode = FilterMode::Equality;

    for component in raw.split(',').filter(|component| !component.is_empty()) {
        let (name, value) = split_component(component)?;
        if name.ends_with(OPTION_SUFFIX) {
            mode = FilterMode::Range;
            continue;
        }
        if value.is_empty() {
            return Err(bad_syntax(component));
        }
        components.push((name, value));
    }

    let mut conditions = Vec::with_capacity(components.len() * 2);
    for (name, value) in components {
        match mode {
            FilterMode::Equality => conditions.push(FilterCondition::eq(name, value)),
            FilterMode::Range => {
                conditions.push(FilterCondition::gte(name, value));
                match successor(value) {
                    Some(upper) => conditions.push(FilterCondition::lt(name, upper)),
                    None => debug!(attribute = name, "range filter has no upper bound"),
                }
            }
        }
    }

    debug!(filter = raw, ?mode, count = conditions.len(), "parsed filter");
    Ok(FilterSet { mode, conditions })
}

fn split_component(component: &str) -> Result<(&str, &str), FilterError> {
    let mut parts = component.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(name), Some(value), None) if !name.is_empty() => Ok((name, value)),
        _ => Err(bad_syntax(component)),
    }
}

fn bad_syntax(component: &str) -> FilterError {
    FilterError::BadSyntax {
        component: component.to_string(),
    }
}

/// The smallest string greater than every string starting with `value`
///
/// Increments the code point of the last character, skipping the surrogate
/// range. Returns `None` when the last character is already `char::MAX` or
/// the value is empty.
///
/// # Example
///
/// ```rust
/// use entity_rest::filter::successor;
///
/// assert_eq!(successor("abc").as_deref(), Some("abd"));
/// assert_eq!(successor("a\u{D7FF}").as_deref(), Some("a\u{E000}"));
/// assert_eq!(successor(""), None);
/// ```
#[must_use]
pub fn successor(value: &str) -> Option<String> {
    let (index, last) = value.char_indices().next_back()?;
    let next = match last {
        '\u{D7FF}' => '\u{E000}',
        char::MAX => return None,
        other => char::from_u32(u32::from(other) + 1)?,
    };
    let mut upper = String::with_capacity(value.len() + 1);
    upper.push_str(&value[..index]);
    upper.push(next);
    Some(upper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::FilterOperator;

    #[test]
    fn test_equality_mode() {
        let set = parse_filter("name:Felix,address:Test").unwrap();
        assert_eq!(set.mode, FilterMode::Equality);
        assert_eq!(
            set.conditions,
            vec![
                FilterCondition::eq("name", "Felix"),
                FilterCondition::eq("address", "Test"),
            ]
        );
    }

    #[test]
    fn test_empty_components_are_skipped() {
        let set = parse_filter("name:Felix,,").unwrap();
        assert_eq!(set.conditions, vec![FilterCondition::eq("name", "Felix")]);
        assert!(parse_filter("").unwrap().is_empty());
    }

    #[test]
    fn test_range_mode_from_option_marker() {
        let set = parse_filter("name_option:,name:Fel").unwrap();
        assert_eq!(set.mode, FilterMode::Range);
        assert_eq!(
            set.conditions,
            vec![
                FilterCondition::gte("name", "Fel"),
                FilterCondition::lt("name", "Fem"),
            ]
        );
    }

    #[test]
    fn test_option_marker_alone_yields_no_predicates() {
        let set = parse_filter("name_option:yes").unwrap();
        assert_eq!(set.mode, FilterMode::Range);
        assert!(set.is_empty());
    }

    #[test]
    fn test_range_applies_to_every_component() {
        let set = parse_filter("name:A,surname:B,x_option:").unwrap();
        let operators: Vec<_> = set.conditions.iter().map(|c| c.operator).collect();
        assert_eq!(
            operators,
            vec![
                FilterOperator::GreaterThanOrEqual,
                FilterOperator::LessThan,
                FilterOperator::GreaterThanOrEqual,
                FilterOperator::LessThan,
            ]
        );
    }

    #[test]
    fn test_bad_syntax() {
        for raw in ["name", "name:a:b", ":value", "name:", "a:b,broken"] {
            assert!(
                matches!(parse_filter(raw), Err(FilterError::BadSyntax { .. })),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_bad_syntax_reports_component() {
        let err = parse_filter("name:Felix,surname").unwrap_err();
        assert_eq!(
            err.to_string(),
            "filter component `surname` must be of format <name>:<value>"
        );
    }

    #[test]
    fn test_successor_edges() {
        assert_eq!(successor("ABC").as_deref(), Some("ABD"));
        assert_eq!(successor("z").as_deref(), Some("{"));
        assert_eq!(successor("né").as_deref(), Some("nê"));
        assert_eq!(successor("x\u{10FFFF}"), None);
    }

    #[test]
    fn test_max_char_drops_upper_bound() {
        let set = parse_filter("name:\u{10FFFF},name_option:").unwrap();
        assert_eq!(set.conditions, vec![FilterCondition::gte("name", "\u{10FFFF}")]);
    }
}
