//! Id generation policies
//!
//! - INT: next integer above every id the table has ever handed out
//! - STR: fixed-length random alphanumeric string
//! - UUID: version-4 UUID string

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::{Entity, EntityId};

/// Default length of random string ids
pub const DEFAULT_STRING_ID_LENGTH: usize = 16;

/// Draws tried before a string id space counts as exhausted
pub const MAX_STRING_ID_ATTEMPTS: usize = 1024;

/// Id policy of a data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IdType {
    /// Sequential integers
    #[default]
    Int,
    /// Random alphanumeric strings
    Str,
    /// Version-4 UUIDs
    Uuid,
}

impl IdType {
    /// Upper case name
    pub fn as_str(&self) -> &'static str {
        match self {
            IdType::Int => "INT",
            IdType::Str => "STR",
            IdType::Uuid => "UUID",
        }
    }
}

impl fmt::Display for IdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INT" => Ok(IdType::Int),
            "STR" => Ok(IdType::Str),
            "UUID" => Ok(IdType::Uuid),
            other => Err(format!("id type must be INT, STR or UUID, got '{}'", other)),
        }
    }
}

/// Next sequential id.
///
/// Never below `row count + 1`, never at or below an existing integer id,
/// never at or below `high_water` (the last id handed out for the table).
pub fn sequential_id(existing: &[Entity], high_water: i64) -> i64 {
    let max_existing = existing
        .iter()
        .filter_map(|e| e.id().and_then(EntityId::as_int))
        .max()
        .unwrap_or(0);
    let count = i64::try_from(existing.len()).unwrap_or(i64::MAX);
    count.max(max_existing).max(high_water).saturating_add(1)
}

/// Random alphanumeric string of `length` characters
pub fn random_string_id(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Random string id not yet used by `existing`.
///
/// `None` after [`MAX_STRING_ID_ATTEMPTS`] colliding draws.
pub fn unused_string_id(existing: &[Entity], length: usize) -> Option<String> {
    let taken: HashSet<String> = existing
        .iter()
        .filter_map(|e| e.id().map(EntityId::to_string))
        .collect();
    (0..MAX_STRING_ID_ATTEMPTS)
        .map(|_| random_string_id(length))
        .find(|candidate| !taken.contains(candidate))
}

/// Version-4 UUID in hyphenated form
pub fn uuid_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldBase, FieldType};
    use serde_json::json;

    fn with_ids(ids: &[i64]) -> Vec<Entity> {
        let schema = vec![FieldBase::standard("n", FieldType::Int)];
        ids.iter()
            .map(|id| Entity::with_id(*id, &schema, json!({}).as_object().cloned().unwrap()).unwrap())
            .collect()
    }

    #[test]
    fn test_sequential_on_empty_table() {
        assert_eq!(sequential_id(&[], 0), 1);
    }

    #[test]
    fn test_sequential_skips_existing_ids() {
        assert_eq!(sequential_id(&with_ids(&[1, 2]), 0), 3);
        // row 1 deleted: count is 1 but id 2 is live
        assert_eq!(sequential_id(&with_ids(&[2]), 0), 3);
    }

    #[test]
    fn test_sequential_never_reuses_high_water() {
        // every row deleted after handing out 1 and 2
        assert_eq!(sequential_id(&[], 2), 3);
        assert_eq!(sequential_id(&with_ids(&[1]), 2), 3);
    }

    #[test]
    fn test_random_string_shape() {
        let id = random_string_id(DEFAULT_STRING_ID_LENGTH);
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(random_string_id(4).len(), 4);
    }

    #[test]
    fn test_unused_string_id_avoids_taken() {
        let schema = vec![FieldBase::standard("n", FieldType::Int)];
        let taken: Vec<Entity> = ["a", "b"]
            .iter()
            .map(|id| Entity::with_id(*id, &schema, json!({}).as_object().cloned().unwrap()).unwrap())
            .collect();
        let id = unused_string_id(&taken, 8).unwrap();
        assert_eq!(id.len(), 8);
    }

    #[test]
    fn test_unused_string_id_gives_up_when_exhausted() {
        let schema = vec![FieldBase::standard("n", FieldType::Int)];
        let empty = vec![Entity::with_id("", &schema, json!({}).as_object().cloned().unwrap()).unwrap()];
        assert_eq!(unused_string_id(&empty, 0), None);
        assert_eq!(unused_string_id(&[], 0), Some(String::new()));
    }

    #[test]
    fn test_uuid_shape() {
        let id = uuid_id();
        let parsed = Uuid::parse_str(&id).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn test_id_type_parsing() {
        assert_eq!("int".parse::<IdType>().unwrap(), IdType::Int);
        assert_eq!("UUID".parse::<IdType>().unwrap(), IdType::Uuid);
        assert!("float".parse::<IdType>().is_err());
        assert_eq!(serde_json::to_value(IdType::Str).unwrap(), json!("STR"));
    }
}
