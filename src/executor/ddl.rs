/// DDL operations
///
/// CREATE KEYSPACE, CREATE TYPE, CREATE TABLE, TRUNCATE

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::catalog::{Catalog, Keyspace, Table};
use crate::core::{Column, CqlError, DataType, TableSchema, UserType};

pub struct DdlExecutor;

impl DdlExecutor {
    pub fn create_keyspace(
        catalog: &mut Catalog,
        name: &str,
        replication_factor: u32,
        if_not_exists: bool,
    ) -> Result<(), CqlError> {
        if catalog.keyspaces.contains_key(name) {
            return Self::already_exists(if_not_exists, format!("Keyspace '{name}'"));
        }
        if replication_factor == 0 {
            return Err(CqlError::InvalidRequest(
                "replication_factor must be at least 1".to_string(),
            ));
        }
        catalog.keyspaces.insert(
            name.to_string(),
            Keyspace {
                replication_factor,
                types: HashMap::new(),
                tables: HashMap::new(),
            },
        );
        debug!(keyspace = name, "keyspace created");
        Ok(())
    }

    /// Fields may reference types created earlier in the same keyspace.
    pub fn create_type(
        catalog: &mut Catalog,
        name: &str,
        fields: &[(String, DataType)],
        if_not_exists: bool,
    ) -> Result<(), CqlError> {
        let (keyspace, name) = catalog.resolve(name)?;
        let ks = catalog.keyspace_mut(&keyspace)?;
        if ks.types.contains_key(name) {
            return Self::already_exists(if_not_exists, format!("Type '{keyspace}.{name}'"));
        }
        if fields.is_empty() {
            return Err(CqlError::InvalidRequest(format!("Type '{name}' has no fields")));
        }
        for (i, (field, data_type)) in fields.iter().enumerate() {
            if fields[..i].iter().any(|(f, _)| f == field) {
                return Err(CqlError::InvalidRequest(format!(
                    "Duplicate field name {field} in type {name}"
                )));
            }
            Self::check_references(&ks.types, data_type)?;
        }
        let user_type = UserType {
            name: name.to_string(),
            fields: fields.to_vec(),
        };
        ks.types.insert(name.to_string(), user_type);
        debug!(keyspace = %keyspace, user_type = name, "type created");
        Ok(())
    }

    pub fn create_table(
        catalog: &mut Catalog,
        name: &str,
        columns: &[Column],
        if_not_exists: bool,
    ) -> Result<(), CqlError> {
        let (keyspace, name) = catalog.resolve(name)?;
        let ks = catalog.keyspace_mut(&keyspace)?;
        if ks.tables.contains_key(name) {
            return Self::already_exists(if_not_exists, format!("Table '{keyspace}.{name}'"));
        }
        let schema = TableSchema::new(name, columns.to_vec())?;
        for column in &schema.columns {
            Self::check_references(&ks.types, &column.data_type)?;
        }
        ks.tables.insert(
            name.to_string(),
            Table {
                schema,
                rows: BTreeMap::new(),
            },
        );
        debug!(keyspace = %keyspace, table = name, "table created");
        Ok(())
    }

    pub fn truncate(catalog: &mut Catalog, table: &str) -> Result<(), CqlError> {
        let (ks, name) = catalog.keyspace_for_table(table)?;
        if let Some(table) = ks.tables.get_mut(&name) {
            let removed = table.rows.len();
            table.rows.clear();
            debug!(table = %name, removed, "table truncated");
        }
        Ok(())
    }

    fn check_references(
        types: &HashMap<String, UserType>,
        data_type: &DataType,
    ) -> Result<(), CqlError> {
        data_type
            .referenced_types()
            .into_iter()
            .find(|name| !types.contains_key(*name))
            .map_or(Ok(()), |missing| Err(CqlError::TypeNotFound(missing.to_string())))
    }

    fn already_exists(if_not_exists: bool, what: String) -> Result<(), CqlError> {
        if if_not_exists {
            Ok(())
        } else {
            Err(CqlError::AlreadyExists(what))
        }
    }
}
