//! Value predicates for validation constraints.

use std::fmt;

use metagraph_core::{MetaError, MetaResult, NodePath, Value, ValueType};
use regex_lite::Regex;

/// A predicate over an attribute value.
///
/// Predicates only ever see non-null values: the engine skips null unless
/// the attribute is declared required, and required-null is rejected
/// before any predicate runs.
#[derive(Debug, Clone)]
pub enum ValuePredicate {
    /// String value must be non-empty.
    NonEmpty,
    /// Value must conform to the given declared type.
    OfType(ValueType),
    /// Integer value within the inclusive range.
    IntRange { min: Option<i64>, max: Option<i64> },
    /// String length within the inclusive range.
    LengthRange {
        min: Option<usize>,
        max: Option<usize>,
    },
    /// String value must match the regex.
    Matches { pattern: String, regex: Regex },
    /// Value must be one of the listed values.
    OneOf(Vec<Value>),
}

impl ValuePredicate {
    /// Build a regex predicate; a malformed pattern is a configuration
    /// error at registration time, not a runtime failure.
    pub fn matches(pattern: impl Into<String>) -> MetaResult<Self> {
        let pattern = pattern.into();
        let regex = Regex::new(&pattern).map_err(|e| {
            MetaError::configuration(
                NodePath::new(),
                format!("invalid constraint pattern '{}': {}", pattern, e),
            )
        })?;
        Ok(Self::Matches { pattern, regex })
    }

    pub fn int_range(min: Option<i64>, max: Option<i64>) -> Self {
        Self::IntRange { min, max }
    }

    pub fn max_length(max: usize) -> Self {
        Self::LengthRange {
            min: None,
            max: Some(max),
        }
    }

    /// Whether the value satisfies this predicate.
    pub fn check(&self, value: &Value) -> bool {
        match self {
            ValuePredicate::NonEmpty => value.as_str().map(|s| !s.is_empty()).unwrap_or(false),
            ValuePredicate::OfType(vt) => vt.accepts(value),
            ValuePredicate::IntRange { min, max } => match value.as_int() {
                Some(i) => min.map_or(true, |m| i >= m) && max.map_or(true, |m| i <= m),
                None => false,
            },
            ValuePredicate::LengthRange { min, max } => match value.as_str() {
                Some(s) => {
                    let len = s.chars().count();
                    min.map_or(true, |m| len >= m) && max.map_or(true, |m| len <= m)
                }
                None => false,
            },
            ValuePredicate::Matches { regex, .. } => {
                value.as_str().map(|s| regex.is_match(s)).unwrap_or(false)
            }
            ValuePredicate::OneOf(allowed) => allowed.contains(value),
        }
    }
}

impl fmt::Display for ValuePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValuePredicate::NonEmpty => f.write_str("non-empty"),
            ValuePredicate::OfType(vt) => write!(f, "of type {}", vt),
            ValuePredicate::IntRange { min, max } => write!(
                f,
                "in range [{}, {}]",
                min.map_or("..".to_string(), |m| m.to_string()),
                max.map_or("..".to_string(), |m| m.to_string()),
            ),
            ValuePredicate::LengthRange { min, max } => write!(
                f,
                "length in [{}, {}]",
                min.map_or("..".to_string(), |m| m.to_string()),
                max.map_or("..".to_string(), |m| m.to_string()),
            ),
            ValuePredicate::Matches { pattern, .. } => write!(f, "matches /{}/", pattern),
            ValuePredicate::OneOf(values) => {
                f.write_str("one of [")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                f.write_str("]")
            }
        }
    }
}
