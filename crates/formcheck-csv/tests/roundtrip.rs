//! File round trips through the CSV reader and writer

use formcheck_core::{CellValue, Sheet};
use formcheck_csv::{CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter};
use pretty_assertions::assert_eq;

fn plan_sheet() -> Sheet {
    let headers = ["PLAN_GROUP", "INSPCHAR", "MSTR_CHAR", "FORMULA_FIELD_1"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    let mut sheet = Sheet::with_headers("plan", headers);
    sheet.push_row(vec!["5000".into(), 10.into(), "KM G/G".into(), CellValue::Empty]);
    sheet.push_row(vec!["5000".into(), 30.into(), "YKM G/G".into(), "C0010-C0020".into()]);
    sheet
}

#[test]
fn test_file_roundtrip_keeps_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plan.csv");

    CsvWriter::write_file(&plan_sheet(), &path, &CsvWriteOptions::default()).unwrap();
    let sheet = CsvReader::read_file(&path, &CsvReadOptions::default()).unwrap();

    assert_eq!(sheet.name(), "plan");
    assert_eq!(sheet.headers(), plan_sheet().headers());
    assert_eq!(sheet.row_count(), 2);
    assert_eq!(sheet.value(1, 1), &CellValue::string("30"));
    assert_eq!(sheet.value(1, 3), &CellValue::string("C0010-C0020"));
    assert_eq!(sheet.value(0, 3), &CellValue::Empty);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = CsvReader::read_file(dir.path().join("absent.csv"), &CsvReadOptions::default());
    assert!(matches!(result, Err(formcheck_csv::CsvError::Io(_))));
}
