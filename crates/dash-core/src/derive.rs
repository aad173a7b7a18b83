//! The derivation engine.
//!
//! [`derive`] is a pure function of the base table, the interaction state and
//! the layout. It recomputes the whole view on every call.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use dash_model::{ColumnName, RowId, Schema, Table, Value};
use serde::Serialize;

use crate::chart::{ChartBuilder, ChartContext, ChartSpec};
use crate::controls::{
    ControlSet, DropdownControl, TableControl, TableDefinition, ToggleControl,
};
use crate::filter::Predicate;
use crate::state::{CellRef, InteractionState, SortDirection};

/// Static description of a dashboard: fixed filters, controls and charts.
#[derive(Debug, Default)]
pub struct ViewLayout {
    pub name: String,
    /// Filters applied before any user filter. Operands must already be of
    /// the column's kind.
    pub base_filter: Vec<(ColumnName, Predicate)>,
    pub table: Option<TableControl>,
    pub dropdown: Option<DropdownControl>,
    /// Caption template; `{}` is replaced by the dropdown value.
    pub caption: Option<String>,
    /// Click-to-cycle binding, if the dashboard has one.
    pub toggle: Option<ToggleControl>,
    pub charts: Vec<Box<dyn ChartBuilder>>,
}

impl ViewLayout {
    /// Rows per page, or `None` when every row is on one page.
    pub fn page_size(&self) -> Option<usize> {
        self.table
            .as_ref()
            .map(|table| table.page_size)
            .filter(|size| *size > 0)
    }

    /// Replace the page size. A layout without a table gets a plain one.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        match &mut self.table {
            Some(table) => table.page_size = page_size,
            None => {
                self.table = Some(TableControl {
                    id: format!("{}-table", self.name),
                    page_size,
                    hideable: BTreeSet::new(),
                    row_selectable: false,
                    row_deletable: false,
                });
            }
        }
        self
    }

    /// Control definitions for the render target.
    pub fn controls(&self, schema: &Schema) -> ControlSet {
        ControlSet {
            table: self
                .table
                .as_ref()
                .map(|control| TableDefinition::from_schema(control, schema)),
            dropdown: self.dropdown.clone(),
            clickable_charts: self
                .toggle
                .iter()
                .map(|toggle| toggle.chart.clone())
                .collect(),
        }
    }

    /// The interaction state a fresh session starts from.
    pub fn initial_state(&self) -> InteractionState {
        match &self.dropdown {
            Some(dropdown) => InteractionState::new().with_dropdown(dropdown.default.clone()),
            None => InteractionState::new(),
        }
    }
}

/// A row of the derived view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewRow {
    pub id: RowId,
    /// Position of the row in the base table.
    pub position: usize,
    pub selected: bool,
}

/// The current page over the filtered and sorted rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub index: usize,
    pub size: Option<usize>,
    pub page_count: usize,
    pub start: usize,
    pub end: usize,
}

impl PageWindow {
    fn new(index: usize, size: Option<usize>, total: usize) -> Self {
        let Some(size) = size else {
            return Self {
                index,
                size: None,
                page_count: 1,
                start: if index == 0 { 0 } else { total },
                end: total,
            };
        };
        let page_count = total.div_ceil(size).max(1);
        let start = index.saturating_mul(size).min(total);
        let end = start.saturating_add(size).min(total);
        Self {
            index,
            size: Some(size),
            page_count,
            start,
            end,
        }
    }
}

/// Read-only projection of the base table for one interaction state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedView {
    /// Columns still shown (schema order, minus hidden and deleted ones).
    pub columns: Vec<ColumnName>,
    /// Filtered and sorted rows across all pages.
    pub rows: Vec<ViewRow>,
    pub page: PageWindow,
    pub selected_columns: Vec<ColumnName>,
    pub active_cell: Option<CellRef>,
}

impl DerivedView {
    /// Rows on the current page.
    pub fn visible_rows(&self) -> &[ViewRow] {
        &self.rows[self.page.start..self.page.end]
    }

    pub fn has_column(&self, name: &ColumnName) -> bool {
        self.columns.contains(name)
    }
}

/// Result of one derivation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedOutput {
    pub view: DerivedView,
    pub charts: Vec<ChartSpec>,
    pub caption: Option<String>,
}

/// Derive the view and charts for `state` over `table`.
///
/// 1. keep rows passing the layout's base filter, the dropdown and the state
///    filters (deleted rows are dropped);
/// 2. stable-sort by the sort key;
/// 3. cut the current page;
/// 4. flag selected rows;
/// 5. build every chart whose columns are all visible.
pub fn derive(table: &Table, state: &InteractionState, layout: &ViewLayout) -> DerivedOutput {
    let schema = table.schema();
    let columns: Vec<ColumnName> = schema
        .names()
        .filter(|name| {
            !state.hidden_columns.contains(*name) && !state.deleted_columns.contains(*name)
        })
        .cloned()
        .collect();

    let mut filters: Vec<(&ColumnName, Predicate)> = layout
        .base_filter
        .iter()
        .map(|(column, predicate)| (column, predicate.clone()))
        .collect();
    if let (Some(dropdown), Some(value)) = (&layout.dropdown, &state.dropdown) {
        filters.push((&dropdown.column, dropdown_predicate(table, dropdown, value)));
    }
    filters.extend(
        state
            .filters
            .iter()
            .map(|(column, predicate)| (column, predicate.clone())),
    );

    let mut positions: Vec<usize> = table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| !state.deleted_rows.contains(&row.id))
        .filter(|(_, row)| {
            filters.iter().all(|(name, predicate)| {
                match (schema.column(name.as_str()), row.get(name.as_str())) {
                    (Some(column), Some(cell)) => predicate.matches(column, cell),
                    _ => false,
                }
            })
        })
        .map(|(position, _)| position)
        .collect();

    if let Some(key) = &state.sort {
        let cell = |position: usize| table.rows()[position].get(key.column.as_str());
        // `sort_by` is stable, so ties keep their table order.
        positions.sort_by(|a, b| sort_order(cell(*a), cell(*b), key.direction));
    }

    let rows: Vec<ViewRow> = positions
        .into_iter()
        .map(|position| {
            let id = table.rows()[position].id.clone();
            let selected = state.selected_rows.contains(&id);
            ViewRow {
                id,
                position,
                selected,
            }
        })
        .collect();
    let page = PageWindow::new(state.page, layout.page_size(), rows.len());

    let view = DerivedView {
        columns,
        rows,
        page,
        selected_columns: state.selected_columns.iter().cloned().collect(),
        active_cell: state.active_cell.clone(),
    };

    let ctx = ChartContext { table, view: &view };
    let charts = layout
        .charts
        .iter()
        .filter(|builder| {
            builder
                .required_columns()
                .into_iter()
                .all(|column| view.has_column(column))
        })
        .map(|builder| builder.build(&ctx))
        .collect();

    let caption = layout
        .caption
        .as_ref()
        .zip(state.dropdown.as_ref())
        .map(|(template, value)| template.replacen("{}", &value.to_string(), 1));

    DerivedOutput {
        view,
        charts,
        caption,
    }
}

/// Equality on the dropdown column, with the value coerced to the column's
/// kind. A value that cannot be coerced matches nothing.
fn dropdown_predicate(table: &Table, dropdown: &DropdownControl, value: &Value) -> Predicate {
    let predicate = Predicate::Eq(value.clone());
    match table.schema().column(dropdown.column.as_str()) {
        Some(column) => predicate.coerce(column).unwrap_or(predicate),
        None => predicate,
    }
}

/// Missing cells go last in both directions.
fn sort_order(a: Option<&Value>, b: Option<&Value>, direction: SortDirection) -> Ordering {
    let a = a.unwrap_or(&Value::Missing);
    let b = b.unwrap_or(&Value::Missing);
    match (a.is_missing(), b.is_missing()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => match direction {
            SortDirection::Asc => a.sort_cmp(b),
            SortDirection::Desc => b.sort_cmp(a),
        },
    }
}
