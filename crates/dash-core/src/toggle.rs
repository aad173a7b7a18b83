//! Click-driven category cycling.
//!
//! A click on a row cycles that row's category cell `A -> B -> Neutral -> A`.
//! There is no terminal state. Target resolution uses the whole table, not
//! the filtered view: a map shows every row, so a row hidden by a filter can
//! still be clicked.

use dash_model::{Category, RowId, Table, Value};
use serde::Serialize;

/// What a click did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ToggleOutcome {
    Toggled {
        row_id: RowId,
        from: Category,
        to: Category,
    },
    /// The click hit nothing addressable; the table is unchanged.
    NoTarget,
}

/// Cycle the category in `column` of the row `row_id`, in place. Every other
/// row and column is left untouched.
pub fn on_click(table: &mut Table, row_id: &str, column: &str) -> ToggleOutcome {
    let Some(id) = table.row(row_id).map(|row| row.id.clone()) else {
        return ToggleOutcome::NoTarget;
    };
    let Some(cell) = table.cell_mut(row_id, column) else {
        return ToggleOutcome::NoTarget;
    };
    let Value::Category(from) = *cell else {
        return ToggleOutcome::NoTarget;
    };
    let to = from.next();
    *cell = Value::Category(to);
    ToggleOutcome::Toggled {
        row_id: id,
        from,
        to,
    }
}
