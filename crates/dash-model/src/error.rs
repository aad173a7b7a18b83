use thiserror::Error;

use crate::Category;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid column name: {0:?}")]
    InvalidColumnName(String),
    #[error("invalid row id: {0:?}")]
    InvalidRowId(String),
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),
    #[error("duplicate row id: {0}")]
    DuplicateRowId(String),
    #[error("unknown column: {0}")]
    UnknownColumn(String),
    #[error("row {row} has no value for column {column}")]
    MissingCell { row: String, column: String },
    #[error("duplicate category label {label:?} (used for {first:?} and {second:?})")]
    DuplicateCategoryLabel {
        label: String,
        first: Category,
        second: Category,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
