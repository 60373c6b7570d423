// killrvideo-collections - set, list, map and user-defined type columns
// through a CQL query builder and prepared statements

// Clippy configuration - allow non-critical warnings for a sample crate
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::future_not_send)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::option_if_let_else)]

// CQL value model (values, types, rows, errors)
pub mod core;

// Query builder and statement AST
pub mod query;

// In-memory statement execution
pub mod executor;

// Sessions (in-memory, Cassandra)
pub mod session;

// The videos domain (schema, DTOs, codec, repository)
pub mod video;

// Scripted walkthrough
pub mod sample;

// Configuration and logging
pub mod config;
pub mod logging;

// Re-export commonly used types for convenience
pub use crate::config::{Backend, ConfigOverrides, SampleConfig};
pub use crate::core::{CqlError, DataType, FromValue, Row, UdtValue, UserType, Value};
pub use crate::query::{Assignment, Statement, Term};
pub use crate::session::{BoundStatement, MemorySession, PreparedStatement, ResultSet, Session};
pub use crate::video::{UdtCodec, Video, VideoCollections, VideoFormat, VideoRepository};
