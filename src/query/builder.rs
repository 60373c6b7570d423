//! Fluent statement construction, named after the usual CQL query-builder
//! vocabulary: `insert_into(..).value(..)`, `update(..).with(add(..))`,
//! `select(..).column(..).where_eq(..)`.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use super::statement::{Assignment, Relation, Statement, Term};
use crate::core::{Column, DataType, UdtValue, UserType, Value};

/// Anonymous `?` marker, bound by position.
#[must_use]
pub const fn bind_marker() -> Term {
    Term::Marker(None)
}

/// Named marker, bound by position or by name.
pub fn named_marker(name: impl Into<String>) -> Term {
    Term::Marker(Some(name.into()))
}

impl From<Value> for Term {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

macro_rules! term_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Term {
                fn from(value: $ty) -> Self {
                    Self::Value(value.into())
                }
            }
        )*
    };
}

term_from!(i32, String, &str, Uuid, DateTime<Utc>, UdtValue);

impl<T: Into<Value>> From<Vec<T>> for Term {
    fn from(value: Vec<T>) -> Self {
        Self::Value(value.into())
    }
}

impl<T: Into<Value>> From<BTreeSet<T>> for Term {
    fn from(value: BTreeSet<T>) -> Self {
        Self::Value(value.into())
    }
}

impl<K: Into<Value>, V: Into<Value>> From<BTreeMap<K, V>> for Term {
    fn from(value: BTreeMap<K, V>) -> Self {
        Self::Value(value.into())
    }
}

// ---- Assignments ----

/// `column = value`, replacing the whole cell.
pub fn set(column: impl Into<String>, value: impl Into<Term>) -> Assignment {
    Assignment::Set {
        column: column.into(),
        value: value.into(),
    }
}

/// `column[index] = value` on a list.
pub fn set_idx(
    column: impl Into<String>,
    index: impl Into<Term>,
    value: impl Into<Term>,
) -> Assignment {
    Assignment::SetElement {
        column: column.into(),
        key: index.into(),
        value: value.into(),
    }
}

/// `column[key] = value` on a map.
pub fn put(
    column: impl Into<String>,
    key: impl Into<Term>,
    value: impl Into<Term>,
) -> Assignment {
    Assignment::SetElement {
        column: column.into(),
        key: key.into(),
        value: value.into(),
    }
}

/// Merges a whole map into a map column.
pub fn put_all(column: impl Into<String>, entries: impl Into<Term>) -> Assignment {
    Assignment::Add {
        column: column.into(),
        elements: entries.into(),
    }
}

/// Adds one element to a set column.
pub fn add(column: impl Into<String>, element: impl Into<Value>) -> Assignment {
    Assignment::Add {
        column: column.into(),
        elements: Term::Value(Value::Set(BTreeSet::from([element.into()]))),
    }
}

/// Adds a set of elements (or a marker bound to one) to a set column.
pub fn add_all(column: impl Into<String>, elements: impl Into<Term>) -> Assignment {
    Assignment::Add {
        column: column.into(),
        elements: elements.into(),
    }
}

/// Removes one element from a set column, or one key from a map column.
pub fn remove(column: impl Into<String>, element: impl Into<Value>) -> Assignment {
    Assignment::Subtract {
        column: column.into(),
        elements: Term::Value(Value::Set(BTreeSet::from([element.into()]))),
    }
}

/// Subtracts a collection: set difference, map key removal, or removal of
/// every occurrence of the given list elements.
pub fn remove_all(column: impl Into<String>, elements: impl Into<Term>) -> Assignment {
    Assignment::Subtract {
        column: column.into(),
        elements: elements.into(),
    }
}

/// Removes one key from a map column.
pub fn remove_key(column: impl Into<String>, key: impl Into<Value>) -> Assignment {
    remove(column, key)
}

/// Appends one element to a list column.
pub fn append(column: impl Into<String>, element: impl Into<Value>) -> Assignment {
    Assignment::Add {
        column: column.into(),
        elements: Term::Value(Value::List(vec![element.into()])),
    }
}

pub fn append_all(column: impl Into<String>, elements: impl Into<Term>) -> Assignment {
    Assignment::Add {
        column: column.into(),
        elements: elements.into(),
    }
}

/// Prepends one element to a list column.
pub fn prepend(column: impl Into<String>, element: impl Into<Value>) -> Assignment {
    Assignment::Prepend {
        column: column.into(),
        elements: Term::Value(Value::List(vec![element.into()])),
    }
}

pub fn prepend_all(column: impl Into<String>, elements: impl Into<Term>) -> Assignment {
    Assignment::Prepend {
        column: column.into(),
        elements: elements.into(),
    }
}

// ---- Statements ----

pub fn insert_into(table: impl Into<String>) -> InsertBuilder {
    InsertBuilder {
        table: table.into(),
        values: Vec::new(),
    }
}

pub fn update(table: impl Into<String>) -> UpdateBuilder {
    UpdateBuilder {
        table: table.into(),
        assignments: Vec::new(),
        filter: Vec::new(),
    }
}

pub fn select(table: impl Into<String>) -> SelectBuilder {
    SelectBuilder {
        table: table.into(),
        columns: Vec::new(),
        filter: Vec::new(),
    }
}

pub fn truncate(table: impl Into<String>) -> Statement {
    Statement::Truncate {
        table: table.into(),
    }
}

pub fn create_keyspace(name: impl Into<String>, replication_factor: u32) -> Statement {
    Statement::CreateKeyspace {
        name: name.into(),
        replication_factor,
        if_not_exists: true,
    }
}

pub fn create_type(user_type: &UserType) -> Statement {
    Statement::CreateType {
        name: user_type.name.clone(),
        fields: user_type.fields.clone(),
        if_not_exists: true,
    }
}

pub fn create_table(name: impl Into<String>) -> CreateTableBuilder {
    CreateTableBuilder {
        name: name.into(),
        columns: Vec::new(),
    }
}

#[derive(Debug, Clone)]
pub struct InsertBuilder {
    table: String,
    values: Vec<(String, Term)>,
}

impl InsertBuilder {
    #[must_use]
    pub fn value(mut self, column: impl Into<String>, term: impl Into<Term>) -> Self {
        self.values.push((column.into(), term.into()));
        self
    }

    pub fn build(self) -> Statement {
        Statement::Insert {
            table: self.table,
            values: self.values,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdateBuilder {
    table: String,
    assignments: Vec<Assignment>,
    filter: Vec<Relation>,
}

impl UpdateBuilder {
    #[must_use]
    pub fn with(mut self, assignment: Assignment) -> Self {
        self.assignments.push(assignment);
        self
    }

    #[must_use]
    pub fn where_eq(mut self, column: impl Into<String>, value: impl Into<Term>) -> Self {
        self.filter.push(Relation {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    pub fn build(self) -> Statement {
        Statement::Update {
            table: self.table,
            assignments: self.assignments,
            filter: self.filter,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SelectBuilder {
    table: String,
    columns: Vec<String>,
    filter: Vec<Relation>,
}

impl SelectBuilder {
    #[must_use]
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.columns.push(column.into());
        self
    }

    #[must_use]
    pub fn where_eq(mut self, column: impl Into<String>, value: impl Into<Term>) -> Self {
        self.filter.push(Relation {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    pub fn build(self) -> Statement {
        Statement::Select {
            table: self.table,
            columns: self.columns,
            filter: self.filter,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateTableBuilder {
    name: String,
    columns: Vec<Column>,
}

impl CreateTableBuilder {
    #[must_use]
    pub fn partition_key(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        self.columns.push(Column::primary_key(name, data_type));
        self
    }

    #[must_use]
    pub fn column(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        self.columns.push(Column::new(name, data_type));
        self
    }

    pub fn build(self) -> Statement {
        Statement::CreateTable {
            name: self.name,
            columns: self.columns,
            if_not_exists: true,
        }
    }
}

impl From<InsertBuilder> for Statement {
    fn from(builder: InsertBuilder) -> Self {
        builder.build()
    }
}

impl From<UpdateBuilder> for Statement {
    fn from(builder: UpdateBuilder) -> Self {
        builder.build()
    }
}

impl From<SelectBuilder> for Statement {
    fn from(builder: SelectBuilder) -> Self {
        builder.build()
    }
}

impl From<CreateTableBuilder> for Statement {
    fn from(builder: CreateTableBuilder) -> Self {
        builder.build()
    }
}
