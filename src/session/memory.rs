use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use super::{BoundStatement, PreparedStatement, ResultSet, Session};
use crate::core::{CqlError, UserType};
use crate::executor::Executor;
use crate::query::Statement;

/// Session over an in-process [`Executor`].
#[derive(Debug, Default)]
pub struct MemorySession {
    executor: Mutex<Executor>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    fn executor(&self) -> MutexGuard<'_, Executor> {
        self.executor.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current_keyspace(&self) -> Option<String> {
        self.executor().current_keyspace().map(ToString::to_string)
    }

    fn run(&self, statement: &Statement) -> Result<ResultSet, CqlError> {
        debug!(cql = %statement, "executing");
        self.executor().execute(statement)
    }
}

impl Session for MemorySession {
    async fn use_keyspace(&self, keyspace: &str) -> Result<(), CqlError> {
        self.executor().use_keyspace(keyspace)?;
        debug!(keyspace, "using keyspace");
        Ok(())
    }

    async fn execute(&self, statement: &Statement) -> Result<ResultSet, CqlError> {
        self.run(statement)
    }

    async fn prepare(&self, statement: Statement) -> Result<PreparedStatement, CqlError> {
        self.executor().validate(&statement)?;
        let prepared = PreparedStatement::new(statement);
        debug!(cql = prepared.query(), markers = prepared.markers().len(), "prepared");
        Ok(prepared)
    }

    async fn execute_prepared(&self, bound: &BoundStatement) -> Result<ResultSet, CqlError> {
        let statement = bound.statement()?;
        self.run(&statement)
    }

    async fn user_type(&self, name: &str) -> Result<UserType, CqlError> {
        self.executor().user_type(name)
    }
}
