//! CSV loading with column kind inference.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use dash_model::{
    CategoryLabels, Column, ColumnKind, ColumnName, Row, RowId, Schema, Table, Value,
};

use crate::error::{LoadError, Result};
use crate::options::{IdSource, LoadOptions};

/// Joins the parts of a multi-column row id.
const KEY_SEPARATOR: &str = "-";

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Load the base table from a CSV file.
pub fn load(path: &Path, options: &LoadOptions) -> Result<Table> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LoadError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    let table = read_table(file, options, path)?;
    tracing::info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.schema().len(),
        "loaded base table"
    );
    Ok(table)
}

/// Parse CSV from any reader. `origin` is only used in error messages.
pub fn read_table<R: Read>(reader: R, options: &LoadOptions, origin: &Path) -> Result<Table> {
    let csv_error = |source: csv::Error| LoadError::CsvParse {
        path: origin.to_path_buf(),
        source,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers().map_err(csv_error)?.clone();
    let names = parse_headers(&headers, origin)?;
    if names.is_empty() {
        return Err(LoadError::EmptyTable {
            path: origin.to_path_buf(),
        });
    }
    for column in options.category_columns.keys() {
        require_column(&names, column, origin)?;
    }
    let id_columns: Vec<usize> = match &options.id {
        IdSource::Column(column) => vec![require_column(&names, column, origin)?],
        IdSource::Columns(columns) => columns
            .iter()
            .map(|column| require_column(&names, column, origin))
            .collect::<Result<_>>()?,
        IdSource::RowNumber => Vec::new(),
    };

    let mut records: Vec<(u64, Vec<String>)> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let line = record.position().map_or(0, csv::Position::line);
        if record.len() != names.len() {
            return Err(LoadError::RaggedRow {
                path: origin.to_path_buf(),
                line,
                expected: names.len(),
                found: record.len(),
            });
        }
        records.push((line, record.iter().map(normalize_cell).collect()));
    }
    if records.is_empty() {
        return Err(LoadError::EmptyTable {
            path: origin.to_path_buf(),
        });
    }

    let mut columns: Vec<Column> = names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let kind = match options.category_columns.get(name.as_str()) {
                Some(labels) => ColumnKind::Category(labels.clone()),
                None => infer_kind(records.iter().map(|(_, cells)| cells[idx].as_str())),
            };
            Column::new(name.clone(), kind)
        })
        .collect();
    let id_as_column = match &options.id_as_column {
        Some(name) if !names.iter().any(|existing| existing.as_str() == name.trim()) => {
            let name = ColumnName::new(name.as_str()).map_err(|_| LoadError::EmptyColumnName {
                path: origin.to_path_buf(),
                position: names.len(),
            })?;
            columns.push(Column::new(name.clone(), ColumnKind::Text));
            Some(name)
        }
        _ => None,
    };
    let schema = Schema::new(columns)?;

    let mut table = Table::new(schema.clone());
    for (position, (line, cells)) in records.into_iter().enumerate() {
        let id = if id_columns.is_empty() {
            RowId::from_index(position)
        } else {
            row_key(&id_columns, &cells, &names, line, origin)?
        };
        let mut row = Row::new(id.clone());
        for (column, raw) in schema.columns().iter().zip(cells) {
            let value = typed_value(column, raw, line, origin)?;
            row.cells.insert(column.name.clone(), value);
        }
        if let Some(name) = &id_as_column {
            row.cells
                .insert(name.clone(), Value::Text(id.as_str().to_string()));
        }
        table.push_row(row).map_err(|_| LoadError::DuplicateId {
            path: origin.to_path_buf(),
            line,
            id: id.to_string(),
        })?;
    }
    Ok(table)
}

/// Row id from the key columns of one record. Every part must be non-empty.
fn row_key(
    columns: &[usize],
    cells: &[String],
    names: &[ColumnName],
    line: u64,
    origin: &Path,
) -> Result<RowId> {
    let missing = |idx: usize| LoadError::MissingId {
        path: origin.to_path_buf(),
        line,
        column: names[idx].to_string(),
    };
    let mut parts = Vec::with_capacity(columns.len());
    for &idx in columns {
        if cells[idx].is_empty() {
            return Err(missing(idx));
        }
        parts.push(cells[idx].as_str());
    }
    RowId::new(parts.join(KEY_SEPARATOR)).map_err(|_| missing(columns[0]))
}

fn parse_headers(headers: &StringRecord, origin: &Path) -> Result<Vec<ColumnName>> {
    let mut names: Vec<ColumnName> = Vec::with_capacity(headers.len());
    for (position, raw) in headers.iter().enumerate() {
        let name = ColumnName::new(normalize_header(raw)).map_err(|_| {
            LoadError::EmptyColumnName {
                path: origin.to_path_buf(),
                position,
            }
        })?;
        if names.contains(&name) {
            return Err(LoadError::DuplicateColumn {
                path: origin.to_path_buf(),
                column: name.to_string(),
            });
        }
        names.push(name);
    }
    Ok(names)
}

fn require_column(names: &[ColumnName], column: &str, origin: &Path) -> Result<usize> {
    names
        .iter()
        .position(|name| name.as_str() == column)
        .ok_or_else(|| LoadError::MissingColumn {
            column: column.to_string(),
            path: origin.to_path_buf(),
        })
}

/// A column is numeric when it has at least one non-empty cell and every
/// non-empty cell parses as a finite number.
fn infer_kind<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnKind {
    let mut non_empty = 0usize;
    for cell in cells {
        if cell.is_empty() {
            continue;
        }
        if parse_number(cell).is_none() {
            return ColumnKind::Text;
        }
        non_empty += 1;
    }
    if non_empty == 0 {
        ColumnKind::Text
    } else {
        ColumnKind::Number
    }
}

fn typed_value(column: &Column, raw: String, line: u64, origin: &Path) -> Result<Value> {
    match &column.kind {
        ColumnKind::Category(labels) => parse_category(labels, &raw).ok_or_else(|| {
            LoadError::InvalidCategory {
                path: origin.to_path_buf(),
                line,
                column: column.name.to_string(),
                value: raw,
            }
        }),
        _ if raw.is_empty() => Ok(Value::Missing),
        ColumnKind::Number => Ok(parse_number(&raw).map_or(Value::Text(raw), Value::Number)),
        ColumnKind::Text => Ok(Value::Text(raw)),
    }
}

fn parse_category(labels: &CategoryLabels, raw: &str) -> Option<Value> {
    labels.parse(raw).map(Value::Category)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(contents: &str, options: &LoadOptions) -> Result<Table> {
        read_table(contents.as_bytes(), options, Path::new("test.csv"))
    }

    #[test]
    fn infers_number_and_text_columns() {
        let table = read("country,year,share\nFrance,2019,12.5\nSpain,2018,\n", &LoadOptions::new())
            .unwrap();
        let kinds: Vec<&ColumnKind> = table.schema().columns().iter().map(|c| &c.kind).collect();
        assert_eq!(
            kinds,
            vec![&ColumnKind::Text, &ColumnKind::Number, &ColumnKind::Number]
        );
        assert_eq!(table.rows()[1].get("share"), Some(&Value::Missing));
        assert_eq!(table.rows()[0].id.as_str(), "0");
    }

    #[test]
    fn nan_is_not_numeric() {
        let table = read("a\n1\nNaN\n", &LoadOptions::new()).unwrap();
        assert_eq!(table.schema().columns()[0].kind, ColumnKind::Text);
    }

    #[test]
    fn normalizes_headers() {
        let table = read("\u{feff} electoral   votes ,state\n3,AK\n", &LoadOptions::new()).unwrap();
        let names: Vec<&str> = table.schema().names().map(ColumnName::as_str).collect();
        assert_eq!(names, vec!["electoral votes", "state"]);
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = read("a,b\n1,2\n3\n", &LoadOptions::new()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::RaggedRow {
                line: 3,
                expected: 2,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn rejects_header_only_file() {
        let err = read("a,b\n", &LoadOptions::new()).unwrap_err();
        assert!(matches!(err, LoadError::EmptyTable { .. }));
        let err = read("", &LoadOptions::new()).unwrap_err();
        assert!(matches!(err, LoadError::EmptyTable { .. }));
    }

    #[test]
    fn rejects_blank_and_duplicate_headers() {
        let err = read("a,,c\n1,2,3\n", &LoadOptions::new()).unwrap_err();
        assert!(matches!(err, LoadError::EmptyColumnName { position: 1, .. }));
        let err = read("a,a\n1,2\n", &LoadOptions::new()).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateColumn { .. }));
    }

    #[test]
    fn id_column_must_be_unique_and_present() {
        let options = LoadOptions::new().with_id_column("iso");
        let err = read("iso,v\nFRA,1\nFRA,2\n", &options).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateId { line: 3, .. }));

        let err = read("iso,v\n,1\n", &options).unwrap_err();
        assert!(matches!(err, LoadError::MissingId { .. }));

        let err = read("code,v\nFRA,1\n", &options).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { .. }));
    }

    #[test]
    fn multi_column_ids_allow_repeated_keys() {
        let options = LoadOptions::new()
            .with_id_columns(["iso", "year"])
            .with_id_as_column("id");
        let table = read("iso,year,v\nFRA,2018,1\nFRA,2019,2\n", &options).unwrap();
        assert_eq!(table.position("FRA-2019"), Some(1));
        let names: Vec<&str> = table.schema().names().map(ColumnName::as_str).collect();
        assert_eq!(names, vec!["iso", "year", "v", "id"]);
        assert_eq!(
            table.row("FRA-2018").unwrap().get("id"),
            Some(&Value::text("FRA-2018"))
        );

        let err = read("iso,year,v\nFRA,2018,1\nFRA,2018,2\n", &options).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateId { line: 3, ref id, .. } if id == "FRA-2018"));

        let err = read("iso,year,v\nFRA,,1\n", &options).unwrap_err();
        assert!(matches!(err, LoadError::MissingId { ref column, .. } if column == "year"));
    }

    #[test]
    fn existing_id_column_is_kept() {
        let options = LoadOptions::new()
            .with_id_columns(["iso"])
            .with_id_as_column("id");
        let table = read("iso,id\nFRA,x\n", &options).unwrap();
        assert_eq!(table.schema().len(), 2);
        assert_eq!(table.row("FRA").unwrap().get("id"), Some(&Value::text("x")));
    }

    #[test]
    fn category_columns_parse_through_labels() {
        let labels = CategoryLabels::new("democrat", "republican", "unsure").unwrap();
        let options = LoadOptions::new()
            .with_id_column("state")
            .with_category("party", labels);
        let table = read("state,party\nAK,republican\nCA,democrat\n", &options).unwrap();
        assert_eq!(
            table.row("AK").unwrap().get("party"),
            Some(&Value::Category(dash_model::Category::B))
        );

        let err = read("state,party\nAK,green\n", &options).unwrap_err();
        assert!(matches!(err, LoadError::InvalidCategory { ref value, .. } if value == "green"));
    }
}
