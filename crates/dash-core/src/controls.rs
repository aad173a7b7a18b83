//! Control definitions handed to the render target.

use std::collections::BTreeSet;

use dash_model::{ColumnKind, ColumnName, Schema, Value};
use serde::{Deserialize, Serialize};

/// One choice of a dropdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: Value,
}

/// A single-select dropdown bound to equality on one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropdownControl {
    pub id: String,
    pub column: ColumnName,
    pub options: Vec<DropdownOption>,
    pub default: Value,
}

impl DropdownControl {
    pub fn accepts(&self, value: &Value) -> bool {
        self.options.iter().any(|option| option.value == *value)
    }
}

/// Clicking a region of `chart` cycles the row's category in `column`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleControl {
    pub chart: String,
    pub column: ColumnName,
}

/// Interactive table settings of a layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableControl {
    pub id: String,
    pub page_size: usize,
    /// Columns the user may hide. Every column is sortable, filterable,
    /// deletable and selectable.
    pub hideable: BTreeSet<ColumnName>,
    pub row_selectable: bool,
    pub row_deletable: bool,
}

/// Column metadata for the render target's table widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub id: ColumnName,
    pub name: String,
    pub kind: String,
    pub sortable: bool,
    pub filterable: bool,
    pub hideable: bool,
    pub deletable: bool,
    pub selectable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub id: String,
    pub columns: Vec<ColumnDefinition>,
    pub page_size: usize,
    pub row_selectable: bool,
    pub row_deletable: bool,
}

impl TableDefinition {
    pub fn from_schema(control: &TableControl, schema: &Schema) -> Self {
        let columns = schema
            .columns()
            .iter()
            .map(|column| ColumnDefinition {
                id: column.name.clone(),
                name: column.name.to_string(),
                kind: match column.kind {
                    ColumnKind::Text => "text",
                    ColumnKind::Number => "numeric",
                    ColumnKind::Category(_) => "category",
                }
                .to_string(),
                sortable: true,
                filterable: true,
                hideable: control.hideable.contains(&column.name),
                deletable: true,
                selectable: true,
            })
            .collect();
        Self {
            id: control.id.clone(),
            columns,
            page_size: control.page_size,
            row_selectable: control.row_selectable,
            row_deletable: control.row_deletable,
        }
    }
}

/// Everything the render target needs to draw the controls of one dashboard.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlSet {
    pub table: Option<TableDefinition>,
    pub dropdown: Option<DropdownControl>,
    /// Ids of charts that emit click events.
    pub clickable_charts: Vec<String>,
}
