use super::data_type::DataType;
use super::value::{UdtValue, Value};

/// Definition of a user-defined type: a name and ordered, typed fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserType {
    pub name: String,
    pub fields: Vec<(String, DataType)>,
}

impl UserType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        self.fields.push((name.into(), data_type));
        self
    }

    pub fn field_type(&self, name: &str) -> Option<&DataType> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    /// Empty value of this type, every field null.
    pub fn new_value(&self) -> UdtValue {
        UdtValue {
            type_name: self.name.clone(),
            fields: self
                .fields
                .iter()
                .map(|(name, _)| (name.clone(), Value::Null))
                .collect(),
        }
    }
}
