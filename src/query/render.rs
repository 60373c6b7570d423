use std::fmt;

use super::statement::{Assignment, Relation, Statement};

impl fmt::Display for Statement {
    /// Renders CQL text. Every term, literal or marker, becomes a `?`
    /// placeholder; the values travel separately.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateKeyspace {
                name,
                replication_factor,
                if_not_exists,
            } => write!(
                f,
                "CREATE KEYSPACE {}{name} WITH replication = {{'class': 'SimpleStrategy', 'replication_factor': {replication_factor}}}",
                if_not_exists_clause(*if_not_exists)
            ),
            Self::CreateType {
                name,
                fields,
                if_not_exists,
            } => {
                write!(f, "CREATE TYPE {}{name} (", if_not_exists_clause(*if_not_exists))?;
                for (i, (field, data_type)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{field} {data_type}")?;
                }
                write!(f, ")")
            }
            Self::CreateTable {
                name,
                columns,
                if_not_exists,
            } => {
                write!(f, "CREATE TABLE {}{name} (", if_not_exists_clause(*if_not_exists))?;
                for column in columns {
                    write!(f, "{} {}, ", column.name, column.data_type)?;
                }
                let keys: Vec<&str> = columns
                    .iter()
                    .filter(|c| c.primary_key)
                    .map(|c| c.name.as_str())
                    .collect();
                write!(f, "PRIMARY KEY ({}))", keys.join(", "))
            }
            Self::Truncate { table } => write!(f, "TRUNCATE {table}"),
            Self::Insert { table, values } => {
                let names: Vec<&str> = values.iter().map(|(c, _)| c.as_str()).collect();
                let marks = vec!["?"; values.len()];
                write!(
                    f,
                    "INSERT INTO {table} ({}) VALUES ({})",
                    names.join(", "),
                    marks.join(", ")
                )
            }
            Self::Update {
                table,
                assignments,
                filter,
            } => {
                write!(f, "UPDATE {table} SET ")?;
                for (i, assignment) in assignments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{assignment}")?;
                }
                write_where(f, filter)
            }
            Self::Select {
                table,
                columns,
                filter,
            } => {
                let projection = if columns.is_empty() {
                    "*".to_string()
                } else {
                    columns.join(", ")
                };
                write!(f, "SELECT {projection} FROM {table}")?;
                write_where(f, filter)
            }
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set { column, .. } => write!(f, "{column} = ?"),
            Self::SetElement { column, .. } => write!(f, "{column}[?] = ?"),
            Self::Add { column, .. } => write!(f, "{column} = {column} + ?"),
            Self::Prepend { column, .. } => write!(f, "{column} = ? + {column}"),
            Self::Subtract { column, .. } => write!(f, "{column} = {column} - ?"),
        }
    }
}

const fn if_not_exists_clause(if_not_exists: bool) -> &'static str {
    if if_not_exists { "IF NOT EXISTS " } else { "" }
}

fn write_where(f: &mut fmt::Formatter<'_>, filter: &[Relation]) -> fmt::Result {
    for (i, relation) in filter.iter().enumerate() {
        let keyword = if i == 0 { " WHERE" } else { " AND" };
        write!(f, "{keyword} {} = ?", relation.column)?;
    }
    Ok(())
}
