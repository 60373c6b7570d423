use crate::core::{CqlError, Value};
use crate::query::{Statement, Term};

/// A statement prepared once and executed many times with different values.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedStatement {
    statement: Statement,
    query: String,
    markers: Vec<String>,
}

impl PreparedStatement {
    pub fn new(statement: Statement) -> Self {
        let query = statement.to_string();
        let markers = statement.markers();
        Self {
            statement,
            query,
            markers,
        }
    }

    /// Rendered CQL text.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    /// Starts a binding with every marker unset.
    pub fn bind(&self) -> BoundStatement {
        BoundStatement {
            prepared: self.clone(),
            values: vec![None; self.markers.len()],
        }
    }

    /// Binds all markers by position.
    pub fn bind_values<I, V>(&self, values: I) -> Result<BoundStatement, CqlError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Option<Value>> = values.into_iter().map(|v| Some(v.into())).collect();
        if values.len() != self.markers.len() {
            return Err(CqlError::BindCount {
                expected: self.markers.len(),
                actual: values.len(),
            });
        }
        Ok(BoundStatement {
            prepared: self.clone(),
            values,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundStatement {
    prepared: PreparedStatement,
    values: Vec<Option<Value>>,
}

impl BoundStatement {
    pub fn prepared(&self) -> &PreparedStatement {
        &self.prepared
    }

    /// Sets every marker carrying `name`.
    pub fn set(mut self, name: &str, value: impl Into<Value>) -> Result<Self, CqlError> {
        let value = value.into();
        let mut found = false;
        for (slot, marker) in self.values.iter_mut().zip(&self.prepared.markers) {
            if marker == name {
                *slot = Some(value.clone());
                found = true;
            }
        }
        if found {
            Ok(self)
        } else {
            Err(CqlError::InvalidRequest(format!("Unknown bind marker '{name}'")))
        }
    }

    pub fn set_at(mut self, position: usize, value: impl Into<Value>) -> Result<Self, CqlError> {
        let expected = self.values.len();
        let slot = self
            .values
            .get_mut(position)
            .ok_or_else(|| CqlError::BindCount {
                expected,
                actual: position.saturating_add(1),
            })?;
        *slot = Some(value.into());
        Ok(self)
    }

    /// Values in marker order; fails on the first unset marker.
    pub fn values(&self) -> Result<Vec<Value>, CqlError> {
        self.values
            .iter()
            .zip(&self.prepared.markers)
            .map(|(value, marker)| {
                value
                    .clone()
                    .ok_or_else(|| CqlError::UnboundMarker(marker.clone()))
            })
            .collect()
    }

    /// The prepared statement with every marker replaced by its value.
    pub fn statement(&self) -> Result<Statement, CqlError> {
        let values = self.values()?;
        let mut statement = self.prepared.statement.clone();
        let mut values = values.into_iter();
        for term in statement.terms_mut() {
            if term.is_marker() {
                if let Some(value) = values.next() {
                    *term = Term::Value(value);
                }
            }
        }
        Ok(statement)
    }
}
