//! Interaction state and its event transitions.
//!
//! [`InteractionState::apply`] is a pure transition: it returns a new state
//! in which only the fields named by the event differ. Events that name a
//! column outside the schema are rejected and leave the caller's state as it
//! was.

use std::collections::{BTreeMap, BTreeSet};

use dash_model::{Column, ColumnName, RowId, Schema, Value};
use serde::{Deserialize, Serialize};

use crate::error::EventError;
use crate::filter::{Predicate, parse_filter_query};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: ColumnName,
    pub direction: SortDirection,
}

/// Reference to a single table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRef {
    pub row_id: RowId,
    pub column: String,
}

/// Events emitted by the render target's controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InteractionEvent {
    /// Replace the predicate on one column.
    SetFilter { column: String, predicate: Predicate },
    ClearFilter { column: String },
    /// Replace every filter with a parsed native filter expression.
    SetFilterQuery { query: String },
    SetSort {
        column: String,
        #[serde(default)]
        direction: SortDirection,
    },
    ClearSort,
    SetPage { index: usize },
    SetSelection {
        #[serde(default)]
        row_ids: Vec<RowId>,
        #[serde(default)]
        column_ids: Vec<String>,
    },
    /// Single-select control; replaces the prior value.
    SetDropdown { value: Value },
    SetActiveCell { cell: Option<CellRef> },
    HideColumn { column: String },
    ShowColumn { column: String },
    DeleteColumn { column: String },
    DeleteRow { row_id: RowId },
}

impl InteractionEvent {
    /// Short event name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            InteractionEvent::SetFilter { .. } => "set_filter",
            InteractionEvent::ClearFilter { .. } => "clear_filter",
            InteractionEvent::SetFilterQuery { .. } => "set_filter_query",
            InteractionEvent::SetSort { .. } => "set_sort",
            InteractionEvent::ClearSort => "clear_sort",
            InteractionEvent::SetPage { .. } => "set_page",
            InteractionEvent::SetSelection { .. } => "set_selection",
            InteractionEvent::SetDropdown { .. } => "set_dropdown",
            InteractionEvent::SetActiveCell { .. } => "set_active_cell",
            InteractionEvent::HideColumn { .. } => "hide_column",
            InteractionEvent::ShowColumn { .. } => "show_column",
            InteractionEvent::DeleteColumn { .. } => "delete_column",
            InteractionEvent::DeleteRow { .. } => "delete_row",
        }
    }
}

/// Current values of every user control. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionState {
    /// Conjunctive filters, one predicate per column.
    pub filters: BTreeMap<ColumnName, Predicate>,
    pub sort: Option<SortKey>,
    /// 0-based page index.
    pub page: usize,
    pub selected_rows: BTreeSet<RowId>,
    pub selected_columns: BTreeSet<ColumnName>,
    pub active_cell: Option<CellRef>,
    pub dropdown: Option<Value>,
    pub hidden_columns: BTreeSet<ColumnName>,
    pub deleted_columns: BTreeSet<ColumnName>,
    pub deleted_rows: BTreeSet<RowId>,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_dropdown(mut self, value: Value) -> Self {
        self.dropdown = Some(value);
        self
    }

    /// Apply one event, returning the next state.
    pub fn apply(&self, schema: &Schema, event: &InteractionEvent) -> Result<Self, EventError> {
        let mut next = self.clone();
        match event {
            InteractionEvent::SetFilter { column, predicate } => {
                let column = self.resolve(schema, column)?;
                let predicate = predicate.coerce(column)?;
                next.filters.insert(column.name.clone(), predicate);
            }
            InteractionEvent::ClearFilter { column } => {
                let column = self.resolve(schema, column)?;
                next.filters.remove(&column.name);
            }
            InteractionEvent::SetFilterQuery { query } => {
                let mut filters = BTreeMap::new();
                for (name, predicate) in parse_filter_query(query)? {
                    let column = self.resolve(schema, &name)?;
                    filters.insert(column.name.clone(), predicate.coerce(column)?);
                }
                next.filters = filters;
            }
            InteractionEvent::SetSort { column, direction } => {
                let column = self.resolve(schema, column)?;
                next.sort = Some(SortKey {
                    column: column.name.clone(),
                    direction: *direction,
                });
            }
            InteractionEvent::ClearSort => next.sort = None,
            InteractionEvent::SetPage { index } => next.page = *index,
            InteractionEvent::SetSelection {
                row_ids,
                column_ids,
            } => {
                let mut columns = BTreeSet::new();
                for name in column_ids {
                    columns.insert(self.resolve(schema, name)?.name.clone());
                }
                next.selected_rows = row_ids.iter().cloned().collect();
                next.selected_columns = columns;
            }
            InteractionEvent::SetDropdown { value } => next.dropdown = Some(value.clone()),
            InteractionEvent::SetActiveCell { cell } => {
                if let Some(cell) = cell {
                    self.resolve(schema, &cell.column)?;
                }
                next.active_cell = cell.clone();
            }
            InteractionEvent::HideColumn { column } => {
                let column = self.resolve(schema, column)?;
                next.hidden_columns.insert(column.name.clone());
            }
            InteractionEvent::ShowColumn { column } => {
                let column = self.resolve(schema, column)?;
                next.hidden_columns.remove(&column.name);
            }
            InteractionEvent::DeleteColumn { column } => {
                let name = self.resolve(schema, column)?.name.clone();
                next.filters.remove(&name);
                if next.sort.as_ref().is_some_and(|key| key.column == name) {
                    next.sort = None;
                }
                next.selected_columns.remove(&name);
                next.hidden_columns.remove(&name);
                if next
                    .active_cell
                    .as_ref()
                    .is_some_and(|cell| cell.column == name.as_str())
                {
                    next.active_cell = None;
                }
                next.deleted_columns.insert(name);
            }
            InteractionEvent::DeleteRow { row_id } => {
                next.selected_rows.remove(row_id);
                if next
                    .active_cell
                    .as_ref()
                    .is_some_and(|cell| cell.row_id == *row_id)
                {
                    next.active_cell = None;
                }
                next.deleted_rows.insert(row_id.clone());
            }
        }
        Ok(next)
    }

    /// Look a column up in the schema; deleted columns count as absent.
    fn resolve<'s>(&self, schema: &'s Schema, name: &str) -> Result<&'s Column, EventError> {
        schema
            .column(name.trim())
            .filter(|column| !self.deleted_columns.contains(&column.name))
            .ok_or_else(|| EventError::InvalidColumn {
                column: name.to_string(),
            })
    }
}
