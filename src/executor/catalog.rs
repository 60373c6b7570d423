/// In-memory schema and data: keyspaces holding user types and tables.

use std::collections::{BTreeMap, HashMap};

use crate::core::{CqlError, TableSchema, UserType, Value};

#[derive(Debug, Default)]
pub struct Catalog {
    pub keyspaces: HashMap<String, Keyspace>,
    /// Keyspace used for unqualified names.
    pub current: Option<String>,
}

#[derive(Debug)]
pub struct Keyspace {
    pub replication_factor: u32,
    pub types: HashMap<String, UserType>,
    pub tables: HashMap<String, Table>,
}

#[derive(Debug)]
pub struct Table {
    pub schema: TableSchema,
    /// Rows by primary key value.
    pub rows: BTreeMap<Value, StoredRow>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredRow {
    /// Set by INSERT. A row without it exists only while it has a cell.
    pub live: bool,
    /// Non-key cells. Null cells are absent.
    pub cells: BTreeMap<String, Value>,
}

impl StoredRow {
    pub fn exists(&self) -> bool {
        self.live || !self.cells.is_empty()
    }
}

impl Catalog {
    pub fn use_keyspace(&mut self, name: &str) -> Result<(), CqlError> {
        if !self.keyspaces.contains_key(name) {
            return Err(CqlError::KeyspaceNotFound(name.to_string()));
        }
        self.current = Some(name.to_string());
        Ok(())
    }

    /// Splits `ks.name`, falling back to the current keyspace.
    pub fn resolve<'a>(&self, name: &'a str) -> Result<(String, &'a str), CqlError> {
        match name.split_once('.') {
            Some((keyspace, object)) => Ok((keyspace.to_string(), object)),
            None => self
                .current
                .clone()
                .map(|keyspace| (keyspace, name))
                .ok_or(CqlError::NoKeyspace),
        }
    }

    pub fn keyspace(&self, name: &str) -> Result<&Keyspace, CqlError> {
        self.keyspaces
            .get(name)
            .ok_or_else(|| CqlError::KeyspaceNotFound(name.to_string()))
    }

    pub fn keyspace_mut(&mut self, name: &str) -> Result<&mut Keyspace, CqlError> {
        self.keyspaces
            .get_mut(name)
            .ok_or_else(|| CqlError::KeyspaceNotFound(name.to_string()))
    }

    /// Keyspace owning `table`, checked to contain it.
    pub fn keyspace_for_table(&mut self, table: &str) -> Result<(&mut Keyspace, String), CqlError> {
        let (keyspace, name) = self.resolve(table)?;
        let ks = self.keyspace_mut(&keyspace)?;
        if !ks.tables.contains_key(name) {
            return Err(CqlError::TableNotFound(format!("{keyspace}.{name}")));
        }
        Ok((ks, name.to_string()))
    }

    pub fn table(&self, table: &str) -> Result<(&Keyspace, &Table), CqlError> {
        let (keyspace, name) = self.resolve(table)?;
        let ks = self.keyspace(&keyspace)?;
        let table = ks
            .tables
            .get(name)
            .ok_or_else(|| CqlError::TableNotFound(format!("{keyspace}.{name}")))?;
        Ok((ks, table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_names() {
        let mut catalog = Catalog::default();
        assert!(matches!(catalog.resolve("videos"), Err(CqlError::NoKeyspace)));
        assert_eq!(catalog.resolve("ks.videos").unwrap(), ("ks".to_string(), "videos"));

        assert!(matches!(catalog.use_keyspace("ks"), Err(CqlError::KeyspaceNotFound(_))));
        catalog.keyspaces.insert(
            "ks".to_string(),
            Keyspace {
                replication_factor: 1,
                types: HashMap::new(),
                tables: HashMap::new(),
            },
        );
        catalog.use_keyspace("ks").unwrap();
        assert_eq!(catalog.resolve("videos").unwrap(), ("ks".to_string(), "videos"));
    }

    #[test]
    fn test_stored_row_existence() {
        let mut row = StoredRow::default();
        assert!(!row.exists());
        row.cells.insert("title".to_string(), Value::from("x"));
        assert!(row.exists());
        row.cells.clear();
        row.live = true;
        assert!(row.exists());
    }
}
