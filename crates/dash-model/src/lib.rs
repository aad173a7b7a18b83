//! Data model shared by the dashboard crates.
//!
//! A [`Table`] is an ordered sequence of [`Row`]s sharing a fixed [`Schema`].
//! Rows are addressed by a stable [`RowId`] taken from the data itself.

pub mod error;
pub mod ids;
pub mod table;
pub mod value;

pub use error::{ModelError, Result};
pub use ids::{ColumnName, RowId};
pub use table::{Column, ColumnKind, Row, Schema, Table};
pub use value::{Category, CategoryLabels, Value, format_number};
