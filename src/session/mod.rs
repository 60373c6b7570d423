//! Sessions execute statements against a keyspace.
//!
//! [`MemorySession`] keeps everything in process; `CassandraSession` (behind
//! the `cassandra` feature) talks to a live cluster through the scylla driver.

use std::future::Future;

use crate::core::{CqlError, Row, UserType};
use crate::query::Statement;

pub mod prepared;
pub mod memory;
#[cfg(feature = "cassandra")]
pub mod cassandra;

pub use prepared::{BoundStatement, PreparedStatement};
pub use memory::MemorySession;
#[cfg(feature = "cassandra")]
pub use cassandra::CassandraSession;

pub trait Session {
    /// Makes `keyspace` the default for unqualified names.
    fn use_keyspace(&self, keyspace: &str) -> impl Future<Output = Result<(), CqlError>> + Send;

    /// Executes a statement whose terms are all literal values.
    fn execute(
        &self,
        statement: &Statement,
    ) -> impl Future<Output = Result<ResultSet, CqlError>> + Send;

    fn prepare(
        &self,
        statement: Statement,
    ) -> impl Future<Output = Result<PreparedStatement, CqlError>> + Send;

    fn execute_prepared(
        &self,
        bound: &BoundStatement,
    ) -> impl Future<Output = Result<ResultSet, CqlError>> + Send;

    /// Schema metadata of a user-defined type, by `ks.name` or in the current
    /// keyspace. Fails with [`CqlError::TypeNotFound`] when it is not defined.
    fn user_type(&self, name: &str) -> impl Future<Output = Result<UserType, CqlError>> + Send;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl ResultSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// First row, if any.
    pub fn one(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn into_one(self) -> Option<Row> {
        self.rows.into_iter().next()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
