//! Filter type definitions
//!
//! A filter is an ordered list of `(key, value, operator)` conditions and
//! a combination mode. Operator and combination names parse from their
//! upper snake case form, case-insensitively.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{FilterError, FilterResult};

/// Comparison applied by one condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum Operator {
    /// Field equals probe
    Equal,
    /// Field differs from probe
    NotEqual,
    /// Field > probe
    GreaterThan,
    /// Field < probe
    LessThan,
    /// Field >= probe
    GreaterThanOrEqual,
    /// Field <= probe
    LessThanOrEqual,
    /// Field is a member of the probe list
    In,
    /// Field is not a member of the probe list
    NotIn,
    /// Probe is contained in the field
    Like,
    /// Probe is not contained in the field
    NotLike,
    /// Probe is contained in the field
    Contains,
    /// Probe is not contained in the field
    NotContains,
    /// Field is null, probe ignored
    IsNull,
    /// Field is not null, probe ignored
    IsNotNull,
}

impl Operator {
    /// Upper snake case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "EQUAL",
            Operator::NotEqual => "NOT_EQUAL",
            Operator::GreaterThan => "GREATER_THAN",
            Operator::LessThan => "LESS_THAN",
            Operator::GreaterThanOrEqual => "GREATER_THAN_OR_EQUAL",
            Operator::LessThanOrEqual => "LESS_THAN_OR_EQUAL",
            Operator::In => "IN",
            Operator::NotIn => "NOT_IN",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT_LIKE",
            Operator::Contains => "CONTAINS",
            Operator::NotContains => "NOT_CONTAINS",
            Operator::IsNull => "IS_NULL",
            Operator::IsNotNull => "IS_NOT_NULL",
        }
    }

    const ALL: [Operator; 14] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::GreaterThan,
        Operator::LessThan,
        Operator::GreaterThanOrEqual,
        Operator::LessThanOrEqual,
        Operator::In,
        Operator::NotIn,
        Operator::Like,
        Operator::NotLike,
        Operator::Contains,
        Operator::NotContains,
        Operator::IsNull,
        Operator::IsNotNull,
    ];
}

impl FromStr for Operator {
    type Err = FilterError;

    fn from_str(s: &str) -> FilterResult<Self> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FilterError::UnknownOperator(s.to_string()))
    }
}

impl TryFrom<String> for Operator {
    type Error = FilterError;

    fn try_from(s: String) -> FilterResult<Self> {
        s.parse()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the conditions of a filter combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum Combination {
    /// Every condition must hold
    #[default]
    And,
    /// At least one condition must hold
    Or,
}

impl Combination {
    /// Upper case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Combination::And => "AND",
            Combination::Or => "OR",
        }
    }
}

impl FromStr for Combination {
    type Err = FilterError;

    fn from_str(s: &str) -> FilterResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Combination::And),
            "OR" => Ok(Combination::Or),
            _ => Err(FilterError::UnknownCombination(s.to_string())),
        }
    }
}

impl TryFrom<String> for Combination {
    type Error = FilterError;

    fn try_from(s: String) -> FilterResult<Self> {
        s.parse()
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One predicate over a named field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    /// Field name
    pub key: String,
    /// Probe value
    #[serde(default)]
    pub value: Value,
    /// Comparison
    pub operator: Operator,
}

impl FilterCondition {
    /// Create a condition
    pub fn new(key: impl Into<String>, value: impl Into<Value>, operator: Operator) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            operator,
        }
    }

    /// `key == value`
    pub fn equal(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(key, value, Operator::Equal)
    }

    /// `value` contained in `key`
    pub fn contains(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(key, value, Operator::Contains)
    }

    /// `key` is null.
    ///
    /// The probe is `true`: a blank probe would make the condition a
    /// placeholder that matches everything.
    pub fn is_null(key: impl Into<String>) -> Self {
        Self::new(key, true, Operator::IsNull)
    }
}

/// Conditions plus their combination mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default)]
    conditions: Vec<FilterCondition>,
    #[serde(default)]
    combination: Combination,
}

impl Filter {
    /// Empty filter with the given mode
    pub fn new(combination: Combination) -> Self {
        Self {
            conditions: Vec::new(),
            combination,
        }
    }

    /// All conditions must hold
    pub fn and(conditions: Vec<FilterCondition>) -> Self {
        Self {
            conditions,
            combination: Combination::And,
        }
    }

    /// At least one condition must hold
    pub fn or(conditions: Vec<FilterCondition>) -> Self {
        Self {
            conditions,
            combination: Combination::Or,
        }
    }

    /// Parses `{"combination": "...", "conditions": [...]}`.
    ///
    /// # Errors
    ///
    /// Unknown combination or operator names, or a malformed shape.
    pub fn from_json(value: &Value) -> FilterResult<Self> {
        serde_json::from_value(value.clone()).map_err(|e| FilterError::Invalid(e.to_string()))
    }

    /// Builder-style append
    pub fn with(mut self, condition: FilterCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Append a condition
    pub fn push(&mut self, condition: FilterCondition) {
        self.conditions.push(condition);
    }

    /// Conditions in order
    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }

    /// Combination mode
    pub fn combination(&self) -> Combination {
        self.combination
    }

    /// Whether the filter has no conditions
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}
