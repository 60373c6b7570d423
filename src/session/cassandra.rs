//! Session backed by a live Cassandra (or ScyllaDB) cluster.
//!
//! Statements are rendered to CQL text and values travel as driver
//! [`CqlValue`]s. Server-side prepared statements are cached by query text.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::DateTime;
use scylla::client::session::Session as DriverSession;
use scylla::client::session_builder::SessionBuilder;
use scylla::cluster::metadata::{CollectionType, ColumnType, NativeType, UserDefinedType};
use scylla::response::query_result::QueryResult;
use scylla::statement::prepared::PreparedStatement as DriverPrepared;
use scylla::value::{CqlTimestamp, CqlValue, Row as DriverRow};
use tracing::{debug, info};

use super::{BoundStatement, PreparedStatement, ResultSet, Session};
use crate::core::{CqlError, DataType, Row, UdtValue, UserType, Value};
use crate::query::Statement;

pub struct CassandraSession {
    session: DriverSession,
    keyspace: Mutex<Option<String>>,
    prepared: Mutex<HashMap<String, DriverPrepared>>,
}

impl CassandraSession {
    pub async fn connect(contact_point: &str) -> Result<Self, CqlError> {
        let session = SessionBuilder::new()
            .known_node(contact_point)
            .build()
            .await
            .map_err(CqlError::driver)?;
        info!(contact_point, "connected to cluster");
        Ok(Self {
            session,
            keyspace: Mutex::new(None),
            prepared: Mutex::new(HashMap::new()),
        })
    }

    fn keyspace(&self) -> Option<String> {
        self.keyspace
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn bind(&self, values: Vec<Value>) -> Result<Vec<Option<CqlValue>>, CqlError> {
        let keyspace = self.keyspace();
        values
            .into_iter()
            .map(|v| to_driver(v, keyspace.as_deref()))
            .collect()
    }

    async fn server_prepared(&self, query: &str) -> Result<DriverPrepared, CqlError> {
        let cached = self
            .prepared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(query)
            .cloned();
        if let Some(prepared) = cached {
            return Ok(prepared);
        }
        let prepared = self
            .session
            .prepare(query.to_string())
            .await
            .map_err(CqlError::driver)?;
        self.prepared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(query.to_string(), prepared.clone());
        Ok(prepared)
    }

    fn cached_user_type(&self, keyspace: &str, name: &str) -> Option<Result<UserType, CqlError>> {
        let cluster_state = self.session.get_cluster_state();
        cluster_state
            .get_keyspace(keyspace)
            .and_then(|ks| ks.user_defined_types.get(name))
            .map(|udt| user_type_from_driver(udt))
    }
}

impl Session for CassandraSession {
    async fn use_keyspace(&self, keyspace: &str) -> Result<(), CqlError> {
        self.session
            .use_keyspace(keyspace, false)
            .await
            .map_err(CqlError::driver)?;
        *self.keyspace.lock().unwrap_or_else(PoisonError::into_inner) = Some(keyspace.to_string());
        debug!(keyspace, "using keyspace");
        Ok(())
    }

    async fn execute(&self, statement: &Statement) -> Result<ResultSet, CqlError> {
        let values = statement
            .values()
            .ok_or_else(|| CqlError::UnboundMarker(statement.markers().join(", ")))?;
        let values = self.bind(values)?;
        let query = statement.to_string();
        debug!(cql = %query, "executing");
        let result = self
            .session
            .query_unpaged(query, values)
            .await
            .map_err(CqlError::driver)?;
        into_result_set(result)
    }

    async fn prepare(&self, statement: Statement) -> Result<PreparedStatement, CqlError> {
        let prepared = PreparedStatement::new(statement);
        self.server_prepared(prepared.query()).await?;
        debug!(cql = prepared.query(), "prepared");
        Ok(prepared)
    }

    async fn execute_prepared(&self, bound: &BoundStatement) -> Result<ResultSet, CqlError> {
        let driver_prepared = self.server_prepared(bound.prepared().query()).await?;
        let values = self.bind(bound.values()?)?;
        let result = self
            .session
            .execute_unpaged(&driver_prepared, values)
            .await
            .map_err(CqlError::driver)?;
        into_result_set(result)
    }

    async fn user_type(&self, name: &str) -> Result<UserType, CqlError> {
        let (keyspace, name) = match name.split_once('.') {
            Some((keyspace, name)) => (keyspace.to_string(), name),
            None => (self.keyspace().ok_or(CqlError::NoKeyspace)?, name),
        };
        if let Some(found) = self.cached_user_type(&keyspace, name) {
            return found;
        }
        // The type may have been created after the last metadata fetch.
        self.session
            .refresh_metadata()
            .await
            .map_err(CqlError::driver)?;
        self.cached_user_type(&keyspace, name)
            .unwrap_or_else(|| Err(CqlError::TypeNotFound(format!("{keyspace}.{name}"))))
    }
}

fn user_type_from_driver(udt: &UserDefinedType<'_>) -> Result<UserType, CqlError> {
    let fields = udt
        .field_types
        .iter()
        .map(|(field, column_type)| -> Result<_, CqlError> {
            Ok((field.to_string(), data_type_from_driver(column_type)?))
        })
        .collect::<Result<Vec<_>, CqlError>>()?;
    Ok(UserType {
        name: udt.name.to_string(),
        fields,
    })
}

fn data_type_from_driver(column_type: &ColumnType<'_>) -> Result<DataType, CqlError> {
    let unsupported = || CqlError::InvalidRequest(format!("unsupported CQL type: {column_type:?}"));
    match column_type {
        ColumnType::Native(NativeType::Int) => Ok(DataType::Int),
        ColumnType::Native(NativeType::Text | NativeType::Ascii) => Ok(DataType::Text),
        ColumnType::Native(NativeType::Timestamp) => Ok(DataType::Timestamp),
        ColumnType::Native(NativeType::Uuid) => Ok(DataType::Uuid),
        ColumnType::Collection { typ, .. } => match typ {
            CollectionType::Set(inner) => Ok(DataType::set_of(data_type_from_driver(inner)?)),
            CollectionType::List(inner) => Ok(DataType::list_of(data_type_from_driver(inner)?)),
            CollectionType::Map(key, value) => Ok(DataType::map_of(
                data_type_from_driver(key)?,
                data_type_from_driver(value)?,
            )),
            _ => Err(unsupported()),
        },
        ColumnType::UserDefinedType { definition, .. } => {
            Ok(DataType::udt(definition.name.to_string()))
        }
        _ => Err(unsupported()),
    }
}

fn into_result_set(result: QueryResult) -> Result<ResultSet, CqlError> {
    if !result.is_rows() {
        return Ok(ResultSet::empty());
    }
    let rows_result = result.into_rows_result().map_err(CqlError::driver)?;
    let columns: Vec<String> = rows_result
        .column_specs()
        .iter()
        .map(|spec| spec.name().to_string())
        .collect();
    let mut rows = Vec::new();
    for row in rows_result.rows::<DriverRow>().map_err(CqlError::driver)? {
        let row = row.map_err(CqlError::driver)?;
        let values = row
            .columns
            .into_iter()
            .map(from_driver)
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(Row::new(columns.clone(), values));
    }
    Ok(ResultSet { columns, rows })
}

fn to_driver(value: Value, keyspace: Option<&str>) -> Result<Option<CqlValue>, CqlError> {
    let element = |v: Value| {
        to_driver(v, keyspace)?
            .ok_or_else(|| CqlError::InvalidRequest("null element in collection".to_string()))
    };
    let value = match value {
        Value::Null => return Ok(None),
        Value::Int(i) => CqlValue::Int(i),
        Value::Text(s) => CqlValue::Text(s),
        Value::Timestamp(t) => CqlValue::Timestamp(CqlTimestamp(t.timestamp_millis())),
        Value::Uuid(u) => CqlValue::Uuid(u),
        Value::Set(items) => {
            CqlValue::Set(items.into_iter().map(element).collect::<Result<_, _>>()?)
        }
        Value::List(items) => {
            CqlValue::List(items.into_iter().map(element).collect::<Result<_, _>>()?)
        }
        Value::Map(entries) => CqlValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| -> Result<_, CqlError> { Ok((element(k)?, element(v)?)) })
                .collect::<Result<_, CqlError>>()?,
        ),
        Value::Udt(udt) => CqlValue::UserDefinedType {
            keyspace: keyspace.ok_or(CqlError::NoKeyspace)?.to_string(),
            name: udt.type_name,
            fields: udt
                .fields
                .into_iter()
                .map(|(name, v)| -> Result<_, CqlError> { Ok((name, to_driver(v, keyspace)?)) })
                .collect::<Result<_, CqlError>>()?,
        },
    };
    Ok(Some(value))
}

fn from_driver(value: Option<CqlValue>) -> Result<Value, CqlError> {
    let Some(value) = value else {
        return Ok(Value::Null);
    };
    let element = |v: CqlValue| from_driver(Some(v));
    Ok(match value {
        CqlValue::Empty => Value::Null,
        CqlValue::Int(i) => Value::Int(i),
        CqlValue::Text(s) | CqlValue::Ascii(s) => Value::Text(s),
        CqlValue::Uuid(u) => Value::Uuid(u),
        CqlValue::Timestamp(CqlTimestamp(millis)) => DateTime::from_timestamp_millis(millis)
            .map(Value::Timestamp)
            .ok_or_else(|| CqlError::InvalidRequest(format!("timestamp out of range: {millis}")))?,
        CqlValue::Set(items) => {
            Value::Set(items.into_iter().map(element).collect::<Result<_, _>>()?)
        }
        CqlValue::List(items) => {
            Value::List(items.into_iter().map(element).collect::<Result<_, _>>()?)
        }
        CqlValue::Map(entries) => Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| -> Result<_, CqlError> { Ok((element(k)?, element(v)?)) })
                .collect::<Result<_, CqlError>>()?,
        ),
        CqlValue::UserDefinedType { name, fields, .. } => Value::Udt(UdtValue {
            type_name: name,
            fields: fields
                .into_iter()
                .map(|(field, v)| -> Result<_, CqlError> { Ok((field, from_driver(v)?)) })
                .collect::<Result<_, CqlError>>()?,
        }),
        other => {
            return Err(CqlError::InvalidRequest(format!(
                "unsupported CQL value: {other:?}"
            )));
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{SubsecRound, Utc};
    use std::collections::BTreeMap;

    fn format(width: i32, height: i32) -> Value {
        Value::Udt(UdtValue {
            type_name: "video_format".to_string(),
            fields: vec![
                ("width".to_string(), Value::Int(width)),
                ("height".to_string(), Value::Int(height)),
            ],
        })
    }

    #[test]
    fn test_udt_map_round_trip() {
        let formats = Value::Map(BTreeMap::from([
            (Value::from("hd"), format(1920, 1080)),
            (Value::from("mp4"), format(640, 480)),
        ]));
        let driver = to_driver(formats.clone(), Some("killrvideo")).unwrap();

        let Some(CqlValue::Map(entries)) = &driver else {
            panic!("expected a map, got {driver:?}");
        };
        let CqlValue::UserDefinedType { keyspace, name, fields } = &entries[0].1 else {
            panic!("expected a UDT, got {:?}", entries[0].1);
        };
        assert_eq!(keyspace, "killrvideo");
        assert_eq!(name, "video_format");
        let names: Vec<&str> = fields.iter().map(|(f, _)| f.as_str()).collect();
        assert_eq!(names, vec!["width", "height"]);

        assert_eq!(from_driver(driver).unwrap(), formats);
    }

    #[test]
    fn test_timestamp_keeps_milliseconds() {
        let upload = Utc::now().trunc_subsecs(3);
        let driver = to_driver(Value::Timestamp(upload), None).unwrap();
        assert_eq!(
            driver,
            Some(CqlValue::Timestamp(CqlTimestamp(upload.timestamp_millis())))
        );
        assert_eq!(from_driver(driver).unwrap(), Value::Timestamp(upload));
    }

    #[test]
    fn test_udt_needs_a_keyspace() {
        assert!(matches!(
            to_driver(format(1, 1), None),
            Err(CqlError::NoKeyspace)
        ));
    }

    #[test]
    fn test_null_element_rejected() {
        assert!(matches!(
            to_driver(Value::List(vec![Value::Int(1), Value::Null]), None),
            Err(CqlError::InvalidRequest(_))
        ));
        assert_eq!(to_driver(Value::Null, None).unwrap(), None);
    }

    #[test]
    fn test_empty_and_missing_read_as_null() {
        assert_eq!(from_driver(Some(CqlValue::Empty)).unwrap(), Value::Null);
        assert_eq!(from_driver(None).unwrap(), Value::Null);
        assert_eq!(
            from_driver(Some(CqlValue::Ascii("x".to_string()))).unwrap(),
            Value::from("x")
        );
    }
}
