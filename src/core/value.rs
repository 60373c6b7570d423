use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use uuid::Uuid;

use super::error::CqlError;

/// A CQL value as bound to a statement or read back from a row.
///
/// The derived ordering gives sets and map keys a deterministic order, the
/// same way the server keeps them sorted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    Null,
    Int(i32),
    Text(String),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
    Set(BTreeSet<Value>),
    List(Vec<Value>),
    Map(BTreeMap<Value, Value>),
    Udt(UdtValue),
}

/// Value of a user-defined type. Fields keep the declaration order of the type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UdtValue {
    pub type_name: String,
    pub fields: Vec<(String, Value)>,
}

impl UdtValue {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Sets a declared field, returning the value for chaining.
    pub fn set(mut self, name: &str, value: impl Into<Value>) -> Result<Self, CqlError> {
        let slot = self
            .fields
            .iter_mut()
            .find(|(n, _)| n == name)
            .ok_or_else(|| CqlError::ColumnNotFound(format!("{}.{name}", self.type_name)))?;
        slot.1 = value.into();
        Ok(self)
    }

    pub fn set_int(self, name: &str, value: i32) -> Result<Self, CqlError> {
        self.set(name, value)
    }

    pub fn get_int(&self, name: &str) -> Result<i32, CqlError> {
        match self.field(name) {
            Some(Value::Int(i)) => Ok(*i),
            Some(Value::Null) => Err(CqlError::UnexpectedNull(name.to_string())),
            Some(other) => Err(CqlError::mismatch("int", other.kind())),
            None => Err(CqlError::ColumnNotFound(format!("{}.{name}", self.type_name))),
        }
    }
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short type label used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int(_) => "int",
            Self::Text(_) => "text",
            Self::Timestamp(_) => "timestamp",
            Self::Uuid(_) => "uuid",
            Self::Set(_) => "set",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Udt(_) => "udt",
        }
    }

    /// Collections with no element are stored as null.
    #[must_use]
    pub fn normalize(self) -> Self {
        match self {
            Self::Set(s) if s.is_empty() => Self::Null,
            Self::List(l) if l.is_empty() => Self::Null,
            Self::Map(m) if m.is_empty() => Self::Null,
            other => other,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Self::Timestamp(t) => write!(f, "'{}'", t.format("%Y-%m-%d %H:%M:%S%.3f%z")),
            Self::Uuid(u) => write!(f, "{u}"),
            Self::Set(items) => {
                write!(f, "{{")?;
                write_joined(f, items.iter())?;
                write!(f, "}}")
            }
            Self::List(items) => {
                write!(f, "[")?;
                write_joined(f, items.iter())?;
                write!(f, "]")
            }
            Self::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Self::Udt(udt) => write!(f, "{udt}"),
        }
    }
}

impl fmt::Display for UdtValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, "}}")
    }
}

fn write_joined<'a>(
    f: &mut fmt::Formatter<'_>,
    items: impl Iterator<Item = &'a Value>,
) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<UdtValue> for Value {
    fn from(value: UdtValue) -> Self {
        Self::Udt(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<BTreeSet<T>> for Value {
    fn from(value: BTreeSet<T>) -> Self {
        Self::Set(value.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<Value>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(value: BTreeMap<K, V>) -> Self {
        Self::Map(value.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Conversion out of a [`Value`], the reading half of a codec.
///
/// Null reads back as an empty container for collection targets, mirroring
/// how drivers hand out empty collections for null cells.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, CqlError>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, CqlError> {
        Ok(value.clone())
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Result<Self, CqlError> {
        match value {
            Value::Int(i) => Ok(*i),
            other => Err(CqlError::mismatch("int", other.kind())),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, CqlError> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            other => Err(CqlError::mismatch("text", other.kind())),
        }
    }
}

impl FromValue for Uuid {
    fn from_value(value: &Value) -> Result<Self, CqlError> {
        match value {
            Value::Uuid(u) => Ok(*u),
            other => Err(CqlError::mismatch("uuid", other.kind())),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: &Value) -> Result<Self, CqlError> {
        match value {
            Value::Timestamp(t) => Ok(*t),
            other => Err(CqlError::mismatch("timestamp", other.kind())),
        }
    }
}

impl FromValue for UdtValue {
    fn from_value(value: &Value) -> Result<Self, CqlError> {
        match value {
            Value::Udt(udt) => Ok(udt.clone()),
            other => Err(CqlError::mismatch("udt", other.kind())),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, CqlError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self, CqlError> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::List(items) => items.iter().map(T::from_value).collect(),
            other => Err(CqlError::mismatch("list", other.kind())),
        }
    }
}

impl<T: FromValue + Ord> FromValue for BTreeSet<T> {
    fn from_value(value: &Value) -> Result<Self, CqlError> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Set(items) => items.iter().map(T::from_value).collect(),
            other => Err(CqlError::mismatch("set", other.kind())),
        }
    }
}

impl<K: FromValue + Ord, V: FromValue> FromValue for BTreeMap<K, V> {
    fn from_value(value: &Value) -> Result<Self, CqlError> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Map(entries) => entries
                .iter()
                .map(|(k, v)| -> Result<_, CqlError> { Ok((K::from_value(k)?, V::from_value(v)?)) })
                .collect(),
            other => Err(CqlError::mismatch("map", other.kind())),
        }
    }
}
