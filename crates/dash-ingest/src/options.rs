//! Options controlling how a CSV file becomes a typed table.

use std::collections::BTreeMap;

use dash_model::CategoryLabels;
use serde::{Deserialize, Serialize};

/// Where row ids come from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "column", rename_all = "snake_case")]
pub enum IdSource {
    /// A column holding a unique, non-empty key per row.
    Column(String),
    /// Several columns whose values, joined with `-`, are unique per row
    /// (e.g. a country code and a year). An empty list means row numbers.
    Columns(Vec<String>),
    /// The 0-based position of the row in the file.
    #[default]
    RowNumber,
}

/// Load options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    pub id: IdSource,
    /// Columns parsed as categories, with the labels used in the file.
    pub category_columns: BTreeMap<String, CategoryLabels>,
    /// Append a text column with this name holding each row's id, unless the
    /// file already has a column of that name.
    pub id_as_column: Option<String>,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_id_column(mut self, column: impl Into<String>) -> Self {
        self.id = IdSource::Column(column.into());
        self
    }

    #[must_use]
    pub fn with_id_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.id = IdSource::Columns(columns.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_id_as_column(mut self, column: impl Into<String>) -> Self {
        self.id_as_column = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, column: impl Into<String>, labels: CategoryLabels) -> Self {
        self.category_columns.insert(column.into(), labels);
        self
    }
}
