//! Record instances
//!
//! An entity is an ordered list of bound field values plus an optional id.
//! Every construction path goes through [`EntityField::new`], so defaults
//! and mandatory checks behave the same for caller-built entities and for
//! entities read back from a backend.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::field::EntityField;
use super::id::EntityId;
use crate::schema::{find_field, FieldBase, SchemaError, SchemaResult, ID_KEY};

/// Persisted shape of an entity: the `id` key plus one key per field.
pub type Record = Map<String, Value>;

/// Reads the id of a stored record.
///
/// # Errors
///
/// Returns `STORE_MALFORMED_RECORD` if `id` is absent or not an int/string.
pub fn record_id(record: &Record) -> SchemaResult<EntityId> {
    let value = record.get(ID_KEY).ok_or_else(SchemaError::record_missing_id)?;
    EntityId::from_value(value)
}

/// One record instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: Option<EntityId>,
    fields: Vec<EntityField>,
    errors: Vec<String>,
}

impl Entity {
    /// Builds an entity from caller values.
    ///
    /// Fields missing from `values` are treated as null. A non-null `id`
    /// key in `values` becomes the entity id.
    ///
    /// # Errors
    ///
    /// - `STORE_UNKNOWN_FIELD` for a key the schema does not declare
    /// - `STORE_CONSTRAINT_VIOLATION` for a null mandatory field
    /// - `STORE_MALFORMED_RECORD` for an `id` that is not an int or string
    pub fn new(schema: &[FieldBase], mut values: Record) -> SchemaResult<Self> {
        let id = match values.remove(ID_KEY) {
            None | Some(Value::Null) => None,
            Some(raw) => Some(EntityId::from_value(&raw)?),
        };
        if let Some(unknown) = values.keys().find(|k| find_field(schema, k).is_none()) {
            return Err(SchemaError::unknown_field(unknown.as_str()));
        }

        let fields = schema
            .iter()
            .map(|base| EntityField::new(base, values.remove(base.name()).unwrap_or(Value::Null)))
            .collect::<SchemaResult<Vec<_>>>()?;

        Ok(Self {
            id,
            fields,
            errors: Vec::new(),
        })
    }

    /// Builds an entity with an explicit id.
    pub fn with_id(
        id: impl Into<EntityId>,
        schema: &[FieldBase],
        values: Record,
    ) -> SchemaResult<Self> {
        let mut entity = Self::new(schema, values)?;
        entity.id = Some(id.into());
        Ok(entity)
    }

    /// Builds an entity from a JSON object.
    ///
    /// # Errors
    ///
    /// Same as [`Entity::new`], plus `STORE_MALFORMED_RECORD` if `value`
    /// is not an object.
    pub fn from_json(schema: &[FieldBase], value: &Value) -> SchemaResult<Self> {
        match value {
            Value::Object(map) => Self::new(schema, map.clone()),
            other => Err(SchemaError::not_an_object(other)),
        }
    }

    /// Reconstructs an entity from a stored record.
    ///
    /// # Errors
    ///
    /// A record without `id` is malformed; otherwise same as [`Entity::new`].
    pub fn from_record(schema: &[FieldBase], record: &Record) -> SchemaResult<Self> {
        let id = record_id(record)?;
        let mut entity = Self::new(schema, record.clone())?;
        entity.id = Some(id);
        Ok(entity)
    }

    /// Re-binds this entity's values to another schema, keeping the id.
    pub fn rebind(&self, schema: &[FieldBase]) -> SchemaResult<Self> {
        let mut entity = Self::new(schema, self.values())?;
        entity.id = self.id.clone();
        Ok(entity)
    }

    /// Entity id, `None` until assigned
    pub fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }

    /// Assigns the id
    pub fn set_id(&mut self, id: impl Into<EntityId>) {
        self.id = Some(id.into());
    }

    /// Bound fields in schema order
    pub fn fields(&self) -> &[EntityField] {
        &self.fields
    }

    /// Looks up a bound field
    pub fn get_field(&self, name: &str) -> Option<&EntityField> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Looks up a field value
    pub fn get_value(&self, name: &str) -> Option<&Value> {
        self.get_field(name).map(EntityField::value)
    }

    /// Replaces one field value, re-running default substitution and the
    /// mandatory check.
    ///
    /// # Errors
    ///
    /// `STORE_UNKNOWN_FIELD` if the entity has no such field, or the
    /// errors of [`EntityField::new`]. The entity is unchanged on error.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> SchemaResult<()> {
        let slot = self
            .fields
            .iter_mut()
            .find(|f| f.name() == name)
            .ok_or_else(|| SchemaError::unknown_field(name))?;
        *slot = EntityField::new(slot.base(), value.into())?;
        Ok(())
    }

    /// Field values without the id
    pub fn values(&self) -> Record {
        self.fields
            .iter()
            .map(|f| (f.name().to_string(), f.value().clone()))
            .collect()
    }

    /// Checks every mandatory field holds a value.
    ///
    /// Errors from a previous call are discarded, so repeated calls never
    /// accumulate duplicate messages.
    pub fn validate(&mut self) -> bool {
        self.errors = self
            .fields
            .iter()
            .filter(|f| f.key_type().is_mandatory() && f.is_null())
            .map(|f| format!("Field '{}' is {} and must not be null", f.name(), f.key_type()))
            .collect();
        self.errors.is_empty()
    }

    /// Messages from the last [`validate`](Self::validate) call
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Record form: `id` plus every field
    pub fn serialize(&self) -> Record {
        let mut record = self.values();
        record.insert(
            ID_KEY.to_string(),
            self.id.as_ref().map_or(Value::Null, EntityId::to_value),
        );
        record
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Entity::serialize(self).serialize(serializer)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(Entity::serialize(self)))
    }
}
