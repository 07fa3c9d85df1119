//! Registry of named tables with an id policy
//!
//! Every operation names its table. Operations on a name that is not
//! registered return `Ok(None)` (or `Ok(false)`), never an error.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use super::id_gen::{sequential_id, unused_string_id, uuid_id, IdType, MAX_STRING_ID_ATTEMPTS};
use crate::config::{ConfigResult, DataSourceConfig};
use crate::entity::{Entity, EntityId};
use crate::filter::Filter;
use crate::observability::{log_event, Event};
use crate::schema::SchemaError;
use crate::table::{DataTable, TableError, TableResult};

/// Named tables plus id assignment.
#[derive(Debug, Default)]
pub struct DataSource {
    config: DataSourceConfig,
    tables: BTreeMap<String, Box<dyn DataTable>>,
    /// Last sequential id handed out per table
    high_water: HashMap<String, i64>,
}

impl DataSource {
    /// Create an empty data source.
    ///
    /// # Errors
    ///
    /// `ConfigError::Invalid` if `config` fails validation.
    pub fn new(config: DataSourceConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    /// Shorthand for the two id settings, other settings at their defaults
    pub fn with_id_policy(auto_increment: bool, id_type: IdType) -> Self {
        Self::with_config(DataSourceConfig {
            auto_increment,
            id_type,
            ..DataSourceConfig::default()
        })
    }

    fn with_config(config: DataSourceConfig) -> Self {
        Self {
            config,
            tables: BTreeMap::new(),
            high_water: HashMap::new(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &DataSourceConfig {
        &self.config
    }

    /// Registers a table under its own name.
    ///
    /// Returns false, leaving the registry untouched, if the name is taken.
    pub fn add_table(&mut self, table: impl DataTable + 'static) -> bool {
        self.add_boxed_table(Box::new(table))
    }

    /// Registers an already boxed table
    pub fn add_boxed_table(&mut self, table: Box<dyn DataTable>) -> bool {
        let name = table.name().to_string();
        if self.tables.contains_key(&name) {
            log_event(Event::TableRegisterSkipped, &name, "name already registered");
            return false;
        }
        log_event(Event::TableRegistered, &name, "");
        self.tables.insert(name, table);
        true
    }

    /// Unregisters a table and hands it back. Stored data is untouched.
    pub fn drop(&mut self, name: &str) -> Option<Box<dyn DataTable>> {
        let table = self.tables.remove(name)?;
        self.high_water.remove(name);
        log_event(Event::TableDropped, name, "");
        Some(table)
    }

    /// Looks up a table
    pub fn get_table(&self, name: &str) -> Option<&dyn DataTable> {
        self.tables.get(name).map(|t| t.as_ref())
    }

    /// Looks up a table for writing
    pub fn get_table_mut(&mut self, name: &str) -> Option<&mut (dyn DataTable + 'static)> {
        self.tables.get_mut(name).map(|t| t.as_mut())
    }

    /// Registered names in order
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    /// Every entity of a table
    pub fn get_all(&self, table: &str) -> TableResult<Option<Vec<Entity>>> {
        self.get_table(table).map(|t| t.get_all()).transpose()
    }

    /// One entity by id
    pub fn get_by_id(&self, table: &str, id: &EntityId) -> TableResult<Option<Entity>> {
        match self.get_table(table) {
            Some(t) => t.get_by_id(id),
            None => Ok(None),
        }
    }

    /// Entities matching a filter
    pub fn get_by_filter(&self, table: &str, filter: &Filter) -> TableResult<Option<Vec<Entity>>> {
        self.get_table(table).map(|t| t.get_by_filter(filter)).transpose()
    }

    /// Entities matching every filter
    pub fn get_by_filters(
        &self,
        table: &str,
        filters: &[Filter],
    ) -> TableResult<Option<Vec<Entity>>> {
        self.get_table(table).map(|t| t.get_by_filters(filters)).transpose()
    }

    /// Entity holding `value` on a unique field
    pub fn get_unique(
        &self,
        table: &str,
        field_name: &str,
        value: &Value,
    ) -> TableResult<Option<Entity>> {
        match self.get_table(table) {
            Some(t) => t.get_unique(field_name, value),
            None => Ok(None),
        }
    }

    /// Inserts an entity, assigning its id per the configured policy.
    ///
    /// With auto-increment any id on `entity` is replaced. Without it the
    /// caller's id is required, and `Ok(None)` is returned if it is taken.
    ///
    /// # Errors
    ///
    /// Missing caller id, constraint violations, an exhausted string id
    /// space and backend failures.
    pub fn insert(&mut self, table: &str, mut entity: Entity) -> TableResult<Option<Entity>> {
        let Some(target) = self.tables.get_mut(table) else {
            return Ok(None);
        };
        if !assign_id(&self.config, &mut self.high_water, target.as_ref(), &mut entity)? {
            return Ok(None);
        }
        target.insert(entity).map(Some)
    }

    /// Inserts entities one at a time, assigning ids as [`insert`](Self::insert).
    ///
    /// Stops at the first failure; earlier entities stay committed. A taken
    /// caller id is reported as `DuplicateEntity`.
    pub fn insert_many(
        &mut self,
        table: &str,
        entities: Vec<Entity>,
    ) -> TableResult<Option<Vec<Entity>>> {
        let Some(target) = self.tables.get_mut(table) else {
            return Ok(None);
        };
        let mut inserted = Vec::with_capacity(entities.len());
        for mut entity in entities {
            if !assign_id(&self.config, &mut self.high_water, target.as_ref(), &mut entity)? {
                let id = entity.id().cloned().ok_or_else(SchemaError::missing_id)?;
                return Err(TableError::DuplicateEntity(id));
            }
            inserted.push(target.insert(entity)?);
        }
        Ok(Some(inserted))
    }

    /// Replaces an entity
    pub fn update(
        &mut self,
        table: &str,
        id: &EntityId,
        entity: Entity,
    ) -> TableResult<Option<Entity>> {
        match self.tables.get_mut(table) {
            Some(t) => t.update(id, entity),
            None => Ok(None),
        }
    }

    /// Removes an entity. False if the table or the entity is absent.
    pub fn delete(&mut self, table: &str, id: &EntityId) -> TableResult<bool> {
        match self.tables.get_mut(table) {
            Some(t) => t.delete(id),
            None => Ok(false),
        }
    }

    /// Removes every entity of a table. False if the table is absent.
    pub fn clear(&mut self, table: &str) -> TableResult<bool> {
        match self.tables.get_mut(table) {
            Some(t) => t.clear().map(|()| true),
            None => Ok(false),
        }
    }
}

/// Applies the id policy to `entity`.
///
/// Returns false when ids are caller-supplied and the id already exists.
fn assign_id(
    config: &DataSourceConfig,
    high_water: &mut HashMap<String, i64>,
    table: &dyn DataTable,
    entity: &mut Entity,
) -> TableResult<bool> {
    if !config.auto_increment {
        let id = entity.id().ok_or_else(SchemaError::missing_id)?;
        if table.get_by_id(id)?.is_some() {
            log_event(
                Event::InsertRejected,
                table.name(),
                &format!("id {} already exists", id),
            );
            return Ok(false);
        }
        return Ok(true);
    }

    let id = match config.id_type {
        IdType::Int => {
            let existing = table.get_all()?;
            let last = high_water.entry(table.name().to_string()).or_insert(0);
            let next = sequential_id(&existing, *last);
            *last = next;
            EntityId::Int(next)
        }
        IdType::Str => {
            let existing = table.get_all()?;
            match unused_string_id(&existing, config.string_id_length) {
                Some(id) => EntityId::Str(id),
                None => {
                    log_event(Event::InsertRejected, table.name(), "string id space exhausted");
                    return Err(TableError::IdSpaceExhausted {
                        table: table.name().to_string(),
                        attempts: MAX_STRING_ID_ATTEMPTS,
                    });
                }
            }
        }
        IdType::Uuid => EntityId::Str(uuid_id()),
    };
    log_event(Event::IdAllocated, table.name(), &format!("id={}", id));
    entity.set_id(id);
    Ok(true)
}
