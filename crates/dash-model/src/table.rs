#![deny(unsafe_code)]

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{CategoryLabels, ColumnName, ModelError, RowId, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "labels", rename_all = "snake_case")]
pub enum ColumnKind {
    Text,
    Number,
    Category(CategoryLabels),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: ColumnName,
    pub kind: ColumnKind,
}

impl Column {
    pub fn new(name: ColumnName, kind: ColumnKind) -> Self {
        Self { name, kind }
    }

    pub fn labels(&self) -> Option<&CategoryLabels> {
        match &self.kind {
            ColumnKind::Category(labels) => Some(labels),
            _ => None,
        }
    }

    /// Display string for a cell of this column. Categories render through
    /// the column's labels.
    pub fn render(&self, value: &Value) -> String {
        match (value, self.labels()) {
            (Value::Category(category), Some(labels)) => labels.label(*category).to_string(),
            _ => value.to_string(),
        }
    }
}

/// Ordered, fixed column set of a table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Result<Self, ModelError> {
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(ModelError::DuplicateColumn(column.name.to_string()));
            }
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name.as_str() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &ColumnName> {
        self.columns.iter().map(|c| &c.name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    pub cells: BTreeMap<ColumnName, Value>,
}

impl Row {
    pub fn new(id: RowId) -> Self {
        Self {
            id,
            cells: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, column: ColumnName, value: Value) -> Self {
        self.cells.insert(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells.get(column)
    }
}

/// Rows sharing one schema, addressable by id.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    schema: Schema,
    rows: Vec<Row>,
    #[serde(skip)]
    index: HashMap<RowId, usize>,
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.schema == other.schema && self.rows == other.rows
    }
}

impl Table {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Append a row. Every schema column must have a cell, no other cells are
    /// allowed, and the id must be new.
    pub fn push_row(&mut self, row: Row) -> Result<(), ModelError> {
        if self.index.contains_key(&row.id) {
            return Err(ModelError::DuplicateRowId(row.id.to_string()));
        }
        if let Some(extra) = row.cells.keys().find(|name| !self.schema.contains(name.as_str())) {
            return Err(ModelError::UnknownColumn(extra.to_string()));
        }
        if let Some(missing) = self.schema.names().find(|name| !row.cells.contains_key(*name)) {
            return Err(ModelError::MissingCell {
                row: row.id.to_string(),
                column: missing.to_string(),
            });
        }
        self.index.insert(row.id.clone(), self.rows.len());
        self.rows.push(row);
        Ok(())
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn row(&self, id: &str) -> Option<&Row> {
        self.position(id).map(|i| &self.rows[i])
    }

    /// Mutable access to one cell. The row id and schema are never changed
    /// through this handle.
    pub fn cell_mut(&mut self, id: &str, column: &str) -> Option<&mut Value> {
        let position = self.position(id)?;
        self.rows[position].cells.get_mut(column)
    }
}
