//! File-level tests for the CSV data source.

use std::fs;
use std::path::Path;

use dash_ingest::{LoadError, LoadOptions, load};
use dash_model::Value;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write file");
    path
}

#[test]
fn loads_table_keyed_by_column() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(
        &dir,
        "internet.csv",
        "country,iso_alpha3,year,internet daily\nFrance,FRA,2019,80\nGermany,DEU,2019,84\n",
    );
    let table = load(&path, &LoadOptions::new().with_id_column("iso_alpha3")).expect("load");
    assert_eq!(table.len(), 2);
    assert_eq!(table.position("DEU"), Some(1));
    assert_eq!(
        table.row("FRA").and_then(|row| row.get("internet daily")),
        Some(&Value::Number(80.0))
    );
}

#[test]
fn missing_file_is_reported() {
    let err = load(Path::new("/definitely/not/here.csv"), &LoadOptions::new()).unwrap_err();
    assert!(matches!(err, LoadError::FileNotFound { .. }));
}

#[test]
fn empty_file_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "empty.csv", "");
    let err = load(&path, &LoadOptions::new()).unwrap_err();
    assert!(matches!(err, LoadError::EmptyTable { .. }));
}
