use thiserror::Error;

#[derive(Error, Debug)]
pub enum CqlError {
    #[error("Keyspace '{0}' does not exist")]
    KeyspaceNotFound(String),
    #[error("No keyspace has been specified")]
    NoKeyspace,
    #[error("Table '{0}' does not exist")]
    TableNotFound(String),
    #[error("Type '{0}' does not exist")]
    TypeNotFound(String),
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),
    #[error("{0} already exists")]
    AlreadyExists(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },
    #[error("Unexpected null value for '{0}'")]
    UnexpectedNull(String),
    #[error("Bind marker '{0}' has no value")]
    UnboundMarker(String),
    #[error("Expected {expected} bound values, got {actual}")]
    BindCount { expected: usize, actual: usize },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("JSON Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Driver error: {0}")]
    Driver(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CqlError {
    pub fn driver<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Driver(Box::new(err))
    }

    pub fn mismatch(expected: impl ToString, actual: impl ToString) -> Self {
        Self::TypeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

impl From<config::ConfigError> for CqlError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
