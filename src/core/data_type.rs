use std::collections::HashMap;
use std::fmt;

use super::error::CqlError;
use super::user_type::UserType;
use super::value::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    Int,
    Text,
    Timestamp,
    Uuid,
    Set(Box<DataType>),
    List(Box<DataType>),
    Map(Box<DataType>, Box<DataType>),
    /// Reference to a user-defined type by name.
    Udt(String),
}

impl DataType {
    pub fn set_of(element: Self) -> Self {
        Self::Set(Box::new(element))
    }

    pub fn list_of(element: Self) -> Self {
        Self::List(Box::new(element))
    }

    pub fn map_of(key: Self, value: Self) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    pub fn udt(name: impl Into<String>) -> Self {
        Self::Udt(name.into())
    }

    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::Set(_) | Self::List(_) | Self::Map(_, _))
    }

    /// Names of every user-defined type this type refers to.
    pub fn referenced_types(&self) -> Vec<&str> {
        match self {
            Self::Udt(name) => vec![name.as_str()],
            Self::Set(inner) | Self::List(inner) => inner.referenced_types(),
            Self::Map(k, v) => {
                let mut names = k.referenced_types();
                names.extend(v.referenced_types());
                names
            }
            _ => Vec::new(),
        }
    }

    /// Checks that `value` can be stored in a cell of this type.
    ///
    /// `types` resolves user-defined type names. Null is accepted at the top
    /// level; collection elements and map keys must not be null.
    pub fn check(&self, value: &Value, types: &HashMap<String, UserType>) -> Result<(), CqlError> {
        if value.is_null() {
            return Ok(());
        }
        self.check_element(value, types)
    }

    fn check_element(
        &self,
        value: &Value,
        types: &HashMap<String, UserType>,
    ) -> Result<(), CqlError> {
        match (self, value) {
            (Self::Int, Value::Int(_))
            | (Self::Text, Value::Text(_))
            | (Self::Timestamp, Value::Timestamp(_))
            | (Self::Uuid, Value::Uuid(_)) => Ok(()),
            (Self::Set(inner), Value::Set(items)) => {
                items.iter().try_for_each(|item| inner.check_element(item, types))
            }
            (Self::List(inner), Value::List(items)) => {
                items.iter().try_for_each(|item| inner.check_element(item, types))
            }
            (Self::Map(key, val), Value::Map(entries)) => entries.iter().try_for_each(|(k, v)| {
                key.check_element(k, types)?;
                val.check_element(v, types)
            }),
            (Self::Udt(name), Value::Udt(udt)) => {
                let user_type = types
                    .get(name)
                    .ok_or_else(|| CqlError::TypeNotFound(name.clone()))?;
                if udt.type_name != *name {
                    return Err(CqlError::mismatch(name, &udt.type_name));
                }
                for (field, field_value) in &udt.fields {
                    let field_type = user_type
                        .field_type(field)
                        .ok_or_else(|| CqlError::ColumnNotFound(format!("{name}.{field}")))?;
                    field_type.check(field_value, types)?;
                }
                Ok(())
            }
            (expected, actual) => Err(CqlError::mismatch(expected, actual.kind())),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Text => write!(f, "text"),
            Self::Timestamp => write!(f, "timestamp"),
            Self::Uuid => write!(f, "uuid"),
            Self::Set(inner) => write!(f, "set<{}>", Frozen(inner)),
            Self::List(inner) => write!(f, "list<{}>", Frozen(inner)),
            Self::Map(k, v) => write!(f, "map<{}, {}>", Frozen(k), Frozen(v)),
            Self::Udt(name) => write!(f, "{name}"),
        }
    }
}

/// Types nested inside a collection are written frozen.
struct Frozen<'a>(&'a DataType);

impl fmt::Display for Frozen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            DataType::Udt(_) | DataType::Set(_) | DataType::List(_) | DataType::Map(_, _) => {
                write!(f, "frozen<{}>", self.0)
            }
            other => write!(f, "{other}"),
        }
    }
}
