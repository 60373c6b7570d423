// Module declarations
pub mod error;
pub mod value;
pub mod data_type;
pub mod user_type;
pub mod column;
pub mod table;
pub mod row;

// Re-exports for convenience
pub use error::CqlError;
pub use value::{FromValue, UdtValue, Value};
pub use data_type::DataType;
pub use user_type::UserType;
pub use column::Column;
pub use table::TableSchema;
pub use row::Row;
