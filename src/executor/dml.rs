/// DML operations
///
/// INSERT and UPDATE with collection assignments. Both are upserts: the row
/// is created when the key is new.

use std::collections::HashMap;

use tracing::trace;

use super::catalog::{Catalog, StoredRow};
use crate::core::{CqlError, DataType, TableSchema, UserType, Value};
use crate::query::{Assignment, Relation, Term};

pub struct DmlExecutor;

impl DmlExecutor {
    /// Writes every listed column. Collections are replaced whole; columns
    /// not listed keep their previous value.
    pub fn insert(
        catalog: &mut Catalog,
        table: &str,
        values: &[(String, Term)],
    ) -> Result<(), CqlError> {
        let (ks, name) = catalog.keyspace_for_table(table)?;
        let types = &ks.types;
        let Some(table) = ks.tables.get_mut(&name) else {
            return Err(CqlError::TableNotFound(name));
        };
        let key_column = table.schema.key_column().name.clone();

        let mut key = None;
        let mut cells = Vec::with_capacity(values.len());
        for (column, term) in values {
            let value = bound(term)?;
            let column = table.schema.column(column)?;
            column.data_type.check(value, types)?;
            if column.primary_key {
                key = Some(value.clone());
            } else {
                cells.push((column.name.clone(), value.clone().normalize()));
            }
        }
        let key = Self::require_key(key, &key_column)?;

        trace!(table = %name, key = %key, "row inserted");
        let row = table.rows.entry(key).or_default();
        row.live = true;
        for (column, value) in cells {
            write_cell(row, column, value);
        }
        Ok(())
    }

    /// Applies all assignments to one row, atomically: on error nothing is
    /// written.
    pub fn update(
        catalog: &mut Catalog,
        table: &str,
        assignments: &[Assignment],
        filter: &[Relation],
    ) -> Result<(), CqlError> {
        let (ks, name) = catalog.keyspace_for_table(table)?;
        let types = &ks.types;
        let Some(table) = ks.tables.get_mut(&name) else {
            return Err(CqlError::TableNotFound(name));
        };
        let key = key_from_filter(&table.schema, filter)?;

        let mut row = table.rows.get(&key).cloned().unwrap_or_default();
        for assignment in assignments {
            let column = table.schema.column(assignment.column())?;
            if column.primary_key {
                return Err(CqlError::InvalidRequest(format!(
                    "PRIMARY KEY part {} found in SET part",
                    column.name
                )));
            }
            let current = row.cells.get(&column.name).cloned();
            let next = Self::apply(&column.name, &column.data_type, current, assignment, types)?;
            write_cell(&mut row, column.name.clone(), next);
        }

        trace!(table = %name, key = %key, assignments = assignments.len(), "row updated");
        if row.exists() {
            table.rows.insert(key, row);
        } else {
            table.rows.remove(&key);
        }
        Ok(())
    }

    fn apply(
        column: &str,
        data_type: &DataType,
        current: Option<Value>,
        assignment: &Assignment,
        types: &HashMap<String, UserType>,
    ) -> Result<Value, CqlError> {
        match assignment {
            Assignment::Set { value, .. } => {
                let value = bound(value)?;
                data_type.check(value, types)?;
                Ok(value.clone())
            }
            Assignment::Add { elements, .. } => {
                let elements = bound(elements)?;
                data_type.check(elements, types)?;
                Self::add(column, data_type, current, elements.clone())
            }
            Assignment::Prepend { elements, .. } => {
                let elements = bound(elements)?;
                data_type.check(elements, types)?;
                match (data_type, elements.clone()) {
                    (DataType::List(_), Value::Null) => Ok(current.unwrap_or(Value::Null)),
                    (DataType::List(_), Value::List(mut items)) => {
                        if let Some(Value::List(existing)) = current {
                            items.extend(existing);
                        }
                        Ok(Value::List(items))
                    }
                    _ => Err(invalid_operation(column, "? + ", "")),
                }
            }
            Assignment::Subtract { elements, .. } => {
                let elements = bound(elements)?;
                Self::subtract(column, data_type, current, elements, types)
            }
            Assignment::SetElement { key, value, .. } => {
                let key = bound(key)?;
                let value = bound(value)?;
                Self::set_element(column, data_type, current, key, value, types)
            }
        }
    }

    fn add(
        column: &str,
        data_type: &DataType,
        current: Option<Value>,
        elements: Value,
    ) -> Result<Value, CqlError> {
        match (data_type, current, elements) {
            (DataType::Set(_) | DataType::List(_) | DataType::Map(_, _), current, Value::Null) => {
                Ok(current.unwrap_or(Value::Null))
            }
            (DataType::Set(_), current, Value::Set(added)) => {
                let mut set = match current {
                    Some(Value::Set(set)) => set,
                    _ => Default::default(),
                };
                set.extend(added);
                Ok(Value::Set(set))
            }
            (DataType::List(_), current, Value::List(appended)) => {
                let mut list = match current {
                    Some(Value::List(list)) => list,
                    _ => Vec::new(),
                };
                list.extend(appended);
                Ok(Value::List(list))
            }
            (DataType::Map(_, _), current, Value::Map(entries)) => {
                let mut map = match current {
                    Some(Value::Map(map)) => map,
                    _ => Default::default(),
                };
                map.extend(entries);
                Ok(Value::Map(map))
            }
            _ => Err(invalid_operation(column, column, " + ?")),
        }
    }

    fn subtract(
        column: &str,
        data_type: &DataType,
        current: Option<Value>,
        elements: &Value,
        types: &HashMap<String, UserType>,
    ) -> Result<Value, CqlError> {
        match (data_type, elements) {
            (DataType::Set(_), _) => {
                data_type.check(elements, types)?;
                match (current, elements) {
                    (Some(Value::Set(mut set)), Value::Set(removed)) => {
                        set.retain(|item| !removed.contains(item));
                        Ok(Value::Set(set))
                    }
                    (current, _) => Ok(current.unwrap_or(Value::Null)),
                }
            }
            (DataType::Map(key_type, _), _) => {
                // The right-hand side is a set of keys.
                DataType::Set(key_type.clone()).check(elements, types)?;
                match (current, elements) {
                    (Some(Value::Map(mut map)), Value::Set(keys)) => {
                        map.retain(|k, _| !keys.contains(k));
                        Ok(Value::Map(map))
                    }
                    (current, _) => Ok(current.unwrap_or(Value::Null)),
                }
            }
            (DataType::List(_), _) => {
                data_type.check(elements, types)?;
                match (current, elements) {
                    (Some(Value::List(mut list)), Value::List(removed)) => {
                        list.retain(|item| !removed.contains(item));
                        Ok(Value::List(list))
                    }
                    (current, _) => Ok(current.unwrap_or(Value::Null)),
                }
            }
            _ => Err(invalid_operation(column, column, " - ?")),
        }
    }

    fn set_element(
        column: &str,
        data_type: &DataType,
        current: Option<Value>,
        key: &Value,
        value: &Value,
        types: &HashMap<String, UserType>,
    ) -> Result<Value, CqlError> {
        match data_type {
            DataType::List(element_type) => {
                let Value::Int(index) = key else {
                    return Err(CqlError::mismatch("int", key.kind()));
                };
                element_type.check(value, types)?;
                let Some(Value::List(mut list)) = current else {
                    return Err(CqlError::InvalidRequest(
                        "Attempted to set an element on a list which is null".to_string(),
                    ));
                };
                let position = usize::try_from(*index)
                    .ok()
                    .filter(|i| *i < list.len())
                    .ok_or_else(|| {
                        CqlError::InvalidRequest(format!(
                            "Invalid index {index} (list size {})",
                            list.len()
                        ))
                    })?;
                if value.is_null() {
                    list.remove(position);
                } else {
                    list[position] = value.clone();
                }
                Ok(Value::List(list))
            }
            DataType::Map(key_type, value_type) => {
                if key.is_null() {
                    return Err(CqlError::InvalidRequest(
                        "Invalid null map key".to_string(),
                    ));
                }
                key_type.check(key, types)?;
                value_type.check(value, types)?;
                let mut map = match current {
                    Some(Value::Map(map)) => map,
                    _ => Default::default(),
                };
                if value.is_null() {
                    map.remove(key);
                } else {
                    map.insert(key.clone(), value.clone());
                }
                Ok(Value::Map(map))
            }
            _ => Err(CqlError::InvalidRequest(format!(
                "Invalid operation ({column}[?] = ?) for non collection column {column}"
            ))),
        }
    }

    fn require_key(key: Option<Value>, key_column: &str) -> Result<Value, CqlError> {
        match key {
            Some(key) if !key.is_null() => Ok(key),
            Some(_) => Err(CqlError::InvalidRequest(format!(
                "Invalid null value in condition for column {key_column}"
            ))),
            None => Err(CqlError::InvalidRequest(format!(
                "Some partition key parts are missing: {key_column}"
            ))),
        }
    }
}

/// The single primary key value a WHERE clause pins down.
pub(super) fn key_from_filter(
    schema: &TableSchema,
    filter: &[Relation],
) -> Result<Value, CqlError> {
    let key_column = schema.key_column();
    let mut key = None;
    for relation in filter {
        let column = schema.column(&relation.column)?;
        if !column.primary_key {
            return Err(CqlError::InvalidRequest(format!(
                "Non PRIMARY KEY columns found in where clause: {}",
                column.name
            )));
        }
        if key.is_some() {
            return Err(CqlError::InvalidRequest(format!(
                "{} cannot be restricted by more than one relation if it includes an Equal",
                column.name
            )));
        }
        let value = bound(&relation.value)?;
        column.data_type.check(value, &HashMap::new())?;
        key = Some(value.clone());
    }
    DmlExecutor::require_key(key, &key_column.name)
}

pub(super) fn bound(term: &Term) -> Result<&Value, CqlError> {
    match term {
        Term::Value(value) => Ok(value),
        Term::Marker(name) => Err(CqlError::UnboundMarker(
            name.clone().unwrap_or_else(|| "?".to_string()),
        )),
    }
}

fn write_cell(row: &mut StoredRow, column: String, value: Value) {
    match value.normalize() {
        Value::Null => {
            row.cells.remove(&column);
        }
        value => {
            row.cells.insert(column, value);
        }
    }
}

fn invalid_operation(column: &str, lhs: &str, rhs: &str) -> CqlError {
    CqlError::InvalidRequest(format!(
        "Invalid operation ({column} = {lhs}{rhs}) for non list/set/map column {column}"
    ))
}
