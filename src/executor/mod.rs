/// Executor module - runs statements against the in-memory catalog
///
/// Structure:
/// - catalog: keyspaces, user types, tables and stored rows
/// - ddl: CREATE KEYSPACE/TYPE/TABLE, TRUNCATE
/// - dml: INSERT, UPDATE with collection assignments
/// - queries: SELECT

pub mod catalog;
pub mod ddl;
pub mod dml;
pub mod queries;

pub use catalog::Catalog;
pub use ddl::DdlExecutor;
pub use dml::DmlExecutor;
pub use queries::QueryExecutor;

use crate::core::{CqlError, UserType};
use crate::query::Statement;
use crate::session::ResultSet;

/// Dispatches fully bound statements to the DDL, DML and query executors.
#[derive(Debug, Default)]
pub struct Executor {
    catalog: Catalog,
}

impl Executor {
    pub fn use_keyspace(&mut self, keyspace: &str) -> Result<(), CqlError> {
        self.catalog.use_keyspace(keyspace)
    }

    pub fn current_keyspace(&self) -> Option<&str> {
        self.catalog.current.as_deref()
    }

    /// Looks up a user type, by `ks.name` or in the current keyspace.
    pub fn user_type(&self, name: &str) -> Result<UserType, CqlError> {
        let (keyspace, name) = self.catalog.resolve(name)?;
        self.catalog
            .keyspace(&keyspace)?
            .types
            .get(name)
            .cloned()
            .ok_or_else(|| CqlError::TypeNotFound(format!("{keyspace}.{name}")))
    }

    /// Checks that the objects a statement refers to exist, as the server
    /// does when preparing.
    pub fn validate(&self, statement: &Statement) -> Result<(), CqlError> {
        match statement {
            Statement::Insert { table, values } => {
                let (_, table) = self.catalog.table(table)?;
                values
                    .iter()
                    .try_for_each(|(column, _)| table.schema.column(column).map(|_| ()))
            }
            Statement::Update {
                table,
                assignments,
                filter,
            } => {
                let (_, table) = self.catalog.table(table)?;
                assignments
                    .iter()
                    .map(|a| a.column())
                    .chain(filter.iter().map(|r| r.column.as_str()))
                    .try_for_each(|column| table.schema.column(column).map(|_| ()))
            }
            Statement::Select {
                table,
                columns,
                filter,
            } => {
                let (_, table) = self.catalog.table(table)?;
                columns
                    .iter()
                    .chain(filter.iter().map(|r| &r.column))
                    .try_for_each(|column| table.schema.column(column).map(|_| ()))
            }
            Statement::Truncate { table } => self.catalog.table(table).map(|_| ()),
            _ => Ok(()),
        }
    }

    pub fn execute(&mut self, statement: &Statement) -> Result<ResultSet, CqlError> {
        match statement {
            Statement::CreateKeyspace {
                name,
                replication_factor,
                if_not_exists,
            } => DdlExecutor::create_keyspace(
                &mut self.catalog,
                name,
                *replication_factor,
                *if_not_exists,
            )
            .map(|()| ResultSet::empty()),
            Statement::CreateType {
                name,
                fields,
                if_not_exists,
            } => DdlExecutor::create_type(&mut self.catalog, name, fields, *if_not_exists)
                .map(|()| ResultSet::empty()),
            Statement::CreateTable {
                name,
                columns,
                if_not_exists,
            } => DdlExecutor::create_table(&mut self.catalog, name, columns, *if_not_exists)
                .map(|()| ResultSet::empty()),
            Statement::Truncate { table } => {
                DdlExecutor::truncate(&mut self.catalog, table).map(|()| ResultSet::empty())
            }
            Statement::Insert { table, values } => {
                DmlExecutor::insert(&mut self.catalog, table, values).map(|()| ResultSet::empty())
            }
            Statement::Update {
                table,
                assignments,
                filter,
            } => DmlExecutor::update(&mut self.catalog, table, assignments, filter)
                .map(|()| ResultSet::empty()),
            Statement::Select {
                table,
                columns,
                filter,
            } => QueryExecutor::select(&self.catalog, table, columns, filter),
        }
    }
}
