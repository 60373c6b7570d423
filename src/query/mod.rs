// Statement AST
pub mod statement;

// Query builder (insert/update/select, collection assignments)
pub mod builder;

// CQL text rendering
mod render;

pub use statement::{Assignment, Relation, Statement, Term};
pub use builder::{
    add, add_all, append, append_all, bind_marker, create_keyspace, create_table, create_type,
    insert_into, named_marker, prepend, prepend_all, put, put_all, remove, remove_all,
    remove_key, select, set, set_idx, truncate, update,
};
