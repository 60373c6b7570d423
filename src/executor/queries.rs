/// SELECT by primary key, or a full scan when there is no WHERE clause.

use super::catalog::Catalog;
use super::dml::key_from_filter;
use crate::core::{CqlError, Row, Value};
use crate::query::Relation;
use crate::session::ResultSet;

pub struct QueryExecutor;

impl QueryExecutor {
    pub fn select(
        catalog: &Catalog,
        table: &str,
        columns: &[String],
        filter: &[Relation],
    ) -> Result<ResultSet, CqlError> {
        let (_, table) = catalog.table(table)?;
        let schema = &table.schema;

        let projection: Vec<String> = if columns.is_empty() {
            schema.columns.iter().map(|c| c.name.clone()).collect()
        } else {
            for column in columns {
                schema.column(column)?;
            }
            columns.to_vec()
        };
        let key_column = &schema.key_column().name;

        let keys: Vec<&Value> = if filter.is_empty() {
            table.rows.keys().collect()
        } else {
            let key = key_from_filter(schema, filter)?;
            table.rows.get_key_value(&key).map(|(k, _)| k).into_iter().collect()
        };

        let rows = keys
            .into_iter()
            .filter_map(|key| table.rows.get(key).map(|row| (key, row)))
            .filter(|(_, row)| row.exists())
            .map(|(key, row)| {
                let values = projection
                    .iter()
                    .map(|column| {
                        if column == key_column {
                            key.clone()
                        } else {
                            row.cells.get(column).cloned().unwrap_or(Value::Null)
                        }
                    })
                    .collect();
                Row::new(projection.clone(), values)
            })
            .collect();

        Ok(ResultSet {
            columns: projection,
            rows,
        })
    }
}
