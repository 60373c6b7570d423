use crate::core::{Column, DataType, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateKeyspace {
        name: String,
        replication_factor: u32,
        if_not_exists: bool,
    },
    CreateType {
        name: String,
        fields: Vec<(String, DataType)>,
        if_not_exists: bool,
    },
    CreateTable {
        name: String,
        columns: Vec<Column>,
        if_not_exists: bool,
    },
    Truncate {
        table: String,
    },
    Insert {
        table: String,
        values: Vec<(String, Term)>,
    },
    Update {
        table: String,
        assignments: Vec<Assignment>,
        filter: Vec<Relation>,
    },
    Select {
        table: String,
        /// Empty means `*`.
        columns: Vec<String>,
        filter: Vec<Relation>,
    },
}

/// Right-hand side of an assignment or relation.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Value(Value),
    /// `?` in the rendered statement. Named markers can be bound by name.
    Marker(Option<String>),
}

impl Term {
    #[must_use]
    pub const fn is_marker(&self) -> bool {
        matches!(self, Self::Marker(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    /// `c = ?`
    Set { column: String, value: Term },
    /// `c[?] = ?`: list element by index, or map entry by key.
    SetElement { column: String, key: Term, value: Term },
    /// `c = c + ?`: set union, list append, map merge.
    Add { column: String, elements: Term },
    /// `c = ? + c`: list prepend.
    Prepend { column: String, elements: Term },
    /// `c = c - ?`: set difference, list remove-all, map key removal.
    Subtract { column: String, elements: Term },
}

impl Assignment {
    pub fn column(&self) -> &str {
        match self {
            Self::Set { column, .. }
            | Self::SetElement { column, .. }
            | Self::Add { column, .. }
            | Self::Prepend { column, .. }
            | Self::Subtract { column, .. } => column,
        }
    }

    pub(crate) fn terms(&self) -> Vec<&Term> {
        match self {
            Self::Set { value, .. } => vec![value],
            Self::SetElement { key, value, .. } => vec![key, value],
            Self::Add { elements, .. }
            | Self::Prepend { elements, .. }
            | Self::Subtract { elements, .. } => vec![elements],
        }
    }

    pub(crate) fn terms_mut(&mut self) -> Vec<&mut Term> {
        match self {
            Self::Set { value, .. } => vec![value],
            Self::SetElement { key, value, .. } => vec![key, value],
            Self::Add { elements, .. }
            | Self::Prepend { elements, .. }
            | Self::Subtract { elements, .. } => vec![elements],
        }
    }
}

/// `column = term` in a WHERE clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub column: String,
    pub value: Term,
}

impl Statement {
    /// Terms in the order their `?` placeholders appear in the rendered CQL.
    pub fn terms(&self) -> Vec<&Term> {
        match self {
            Self::Insert { values, .. } => values.iter().map(|(_, t)| t).collect(),
            Self::Update {
                assignments,
                filter,
                ..
            } => assignments
                .iter()
                .flat_map(Assignment::terms)
                .chain(filter.iter().map(|r| &r.value))
                .collect(),
            Self::Select { filter, .. } => filter.iter().map(|r| &r.value).collect(),
            _ => Vec::new(),
        }
    }

    pub(crate) fn terms_mut(&mut self) -> Vec<&mut Term> {
        match self {
            Self::Insert { values, .. } => values.iter_mut().map(|(_, t)| t).collect(),
            Self::Update {
                assignments,
                filter,
                ..
            } => assignments
                .iter_mut()
                .flat_map(Assignment::terms_mut)
                .chain(filter.iter_mut().map(|r| &mut r.value))
                .collect(),
            Self::Select { filter, .. } => filter.iter_mut().map(|r| &mut r.value).collect(),
            _ => Vec::new(),
        }
    }

    /// Names of the bind markers, in order. Anonymous markers are named `$n`.
    pub fn markers(&self) -> Vec<String> {
        self.terms()
            .into_iter()
            .filter(|t| t.is_marker())
            .enumerate()
            .map(|(i, t)| match t {
                Term::Marker(Some(name)) => name.clone(),
                _ => format!("${i}"),
            })
            .collect()
    }

    /// Bound values in rendering order, or `None` when a marker is left.
    pub fn values(&self) -> Option<Vec<Value>> {
        self.terms()
            .into_iter()
            .map(|t| match t {
                Term::Value(v) => Some(v.clone()),
                Term::Marker(_) => None,
            })
            .collect()
    }
}
