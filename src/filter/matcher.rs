//! Predicate evaluation against entities
//!
//! A condition whose probe is null, an empty string, an empty list, or
//! equal to the field's declared default always holds. Callers use this to
//! keep one filter object with placeholder values for fields they do not
//! want to constrain.

use std::cmp::Ordering;

use serde_json::Value;

use super::types::{Combination, Filter, FilterCondition, Operator};
use crate::entity::{Entity, EntityField};
use crate::value::{compare_values, is_blank, values_equal};

impl Entity {
    /// Evaluates one condition against this entity.
    ///
    /// A key the entity does not have never matches.
    pub fn matches_condition(&self, key: &str, value: &Value, operator: Operator) -> bool {
        match self.get_field(key) {
            Some(field) => field_matches(field, value, operator),
            None => false,
        }
    }

    /// Evaluates a whole filter.
    ///
    /// A filter without conditions matches everything.
    pub fn matches_criteria(&self, filter: &Filter) -> bool {
        if filter.is_empty() {
            return true;
        }
        let mut results = filter
            .conditions()
            .iter()
            .map(|c| self.matches(c));
        match filter.combination() {
            Combination::And => results.all(|hit| hit),
            Combination::Or => results.any(|hit| hit),
        }
    }

    fn matches(&self, condition: &FilterCondition) -> bool {
        self.matches_condition(&condition.key, &condition.value, condition.operator)
    }
}

/// Keeps the entities matching `filter`, preserving order.
pub fn filter_entities(entities: Vec<Entity>, filter: &Filter) -> Vec<Entity> {
    entities
        .into_iter()
        .filter(|e| e.matches_criteria(filter))
        .collect()
}

fn field_matches(field: &EntityField, probe: &Value, operator: Operator) -> bool {
    let actual = field.value();

    if is_pass_through(field, probe) {
        return true;
    }

    match operator {
        Operator::Equal => values_equal(actual, probe),
        Operator::NotEqual => !values_equal(actual, probe),
        Operator::GreaterThan => ordering_is(actual, probe, |o| o == Ordering::Greater),
        Operator::LessThan => ordering_is(actual, probe, |o| o == Ordering::Less),
        Operator::GreaterThanOrEqual => ordering_is(actual, probe, |o| o != Ordering::Less),
        Operator::LessThanOrEqual => ordering_is(actual, probe, |o| o != Ordering::Greater),
        Operator::In => membership(actual, probe).unwrap_or(false),
        Operator::NotIn => membership(actual, probe).map_or(false, |found| !found),
        Operator::Like | Operator::Contains => containment(actual, probe).unwrap_or(false),
        Operator::NotLike | Operator::NotContains => {
            containment(actual, probe).map_or(false, |found| !found)
        }
        Operator::IsNull => actual.is_null(),
        Operator::IsNotNull => !actual.is_null(),
    }
}

fn is_pass_through(field: &EntityField, probe: &Value) -> bool {
    is_blank(probe)
        || field
            .default_value()
            .is_some_and(|default| values_equal(default, probe))
}

/// Incomparable kinds never match.
fn ordering_is(actual: &Value, probe: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
    compare_values(actual, probe).is_some_and(accept)
}

/// `None` when the probe is not a list.
fn membership(actual: &Value, probe: &Value) -> Option<bool> {
    let candidates = probe.as_array()?;
    Some(candidates.iter().any(|c| values_equal(actual, c)))
}

/// `None` when containment is undefined for the pair of kinds.
fn containment(actual: &Value, probe: &Value) -> Option<bool> {
    match (actual, probe) {
        (Value::String(haystack), Value::String(needle)) => Some(haystack.contains(needle.as_str())),
        (Value::Array(items), needle) => Some(items.iter().any(|item| values_equal(item, needle))),
        (Value::Object(map), Value::String(key)) => Some(map.contains_key(key)),
        _ => None,
    }
}
