//! Data source for the dashboards.
//!
//! The base table is read once, before any event is processed. Its schema is
//! fixed for the lifetime of the process.

pub mod csv_table;
pub mod error;
pub mod options;

pub use csv_table::{load, read_table};
pub use error::{LoadError, Result};
pub use options::{IdSource, LoadOptions};
