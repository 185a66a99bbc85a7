//! Validating plans stored in files

use formcheck::prelude::*;
use formcheck::template_sheet;
use pretty_assertions::assert_eq;
use std::io::{Cursor, Write};
use tempfile::TempDir;

fn plan() -> Sheet {
    let mut sheet = template_sheet(&ColumnNames::default());
    let rows: [(u32, &str, &str, f64, f64); 3] = [
        (10, "KM G/G", "", 10.0, 12.0),
        (20, "YAG G/G", "", 3.0, 4.0),
        (30, "YKM G/G", "C0010-C0020", 6.5, 8.5),
    ];
    for (ordinal, name, formula, lower, upper) in rows {
        sheet.push_row(vec![
            "5000".into(),
            "0010".into(),
            "Mixing".into(),
            ordinal.into(),
            name.into(),
            formula.into(),
            lower.into(),
            upper.into(),
        ]);
    }
    sheet
}

fn texts(sheet: &Sheet) -> Vec<Vec<String>> {
    sheet
        .padded_rows()
        .map(|row| row.iter().map(CellValue::to_text).collect())
        .collect()
}

fn verdict_texts(sheet: &Sheet) -> Vec<Vec<String>> {
    let first = sheet.column_index("KURAL1_STATUS").unwrap();
    sheet
        .padded_rows()
        .map(|row| row[first..].iter().map(CellValue::to_text).collect())
        .collect()
}

#[test]
fn test_xlsx_validate_save_open() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("result.xlsx");
    let spec = FormulaSpec::builtin();
    let options = ValidationOptions::default();

    let result = plan().validate(&spec, &options).unwrap();
    result.save(&path).unwrap();

    let reopened = Sheet::open(&path).unwrap();
    assert_eq!(reopened.headers(), result.headers());
    assert_eq!(texts(&reopened), texts(&result));
    assert_eq!(reopened.value(2, 3), &CellValue::Number(30.0));

    // Validating the stored result again reproduces it
    let again = reopened.validate(&spec, &options).unwrap();
    assert_eq!(texts(&again), texts(&result));
}

fn biff_record(record_type: u16, body: &[u8]) -> Vec<u8> {
    let mut out = record_type.to_le_bytes().to_vec();
    out.extend_from_slice(&(body.len() as u16).to_le_bytes());
    out.extend_from_slice(body);
    out
}

fn biff_bof(dt: u16) -> Vec<u8> {
    let mut body = vec![0x00, 0x06];
    body.extend_from_slice(&dt.to_le_bytes());
    body.extend_from_slice(&[0; 12]);
    biff_record(0x0809, &body)
}

/// A BIFF8 workbook holding `sheet` as its only worksheet, with inline
/// LABEL strings and NUMBER cells
fn xls_bytes(sheet: &Sheet) -> Vec<u8> {
    let name = b"Plan";
    let mut globals = biff_bof(0x0005);
    let boundsheet_len = 4 + 8 + name.len();
    let sheet_offset = (globals.len() + boundsheet_len + 4) as u32;
    let mut boundsheet = sheet_offset.to_le_bytes().to_vec();
    boundsheet.extend_from_slice(&[0x00, 0x00, name.len() as u8, 0x00]);
    boundsheet.extend_from_slice(name);
    globals.extend(biff_record(0x0085, &boundsheet));
    globals.extend(biff_record(0x000A, &[]));

    let header: Vec<CellValue> = sheet.headers().iter().map(|h| h.as_str().into()).collect();
    let mut substream = biff_bof(0x0010);
    for (row, cells) in std::iter::once(header).chain(sheet.padded_rows()).enumerate() {
        for (col, value) in cells.iter().enumerate() {
            let mut body = (row as u16).to_le_bytes().to_vec();
            body.extend_from_slice(&(col as u16).to_le_bytes());
            body.extend_from_slice(&[0x0F, 0x00]);
            let record_type = match value {
                CellValue::Number(n) => {
                    body.extend_from_slice(&n.to_le_bytes());
                    0x0203
                }
                CellValue::String(text) if !text.is_empty() => {
                    body.extend_from_slice(&(text.len() as u16).to_le_bytes());
                    body.push(0x00);
                    body.extend_from_slice(text.as_bytes());
                    0x0204
                }
                _ => continue,
            };
            substream.extend(biff_record(record_type, &body));
        }
    }
    substream.extend(biff_record(0x000A, &[]));
    globals.extend(substream);

    let mut compound = cfb::CompoundFile::create(Cursor::new(Vec::new())).unwrap();
    {
        let mut stream = compound.create_stream("/Workbook").unwrap();
        stream.write_all(&globals).unwrap();
    }
    compound.flush().unwrap();
    compound.into_inner().into_inner()
}

#[test]
fn test_xls_open_and_validate() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plan.xls");
    std::fs::write(&path, xls_bytes(&plan())).unwrap();
    let spec = FormulaSpec::builtin();
    let options = ValidationOptions::default();

    let sheet = Sheet::open(&path).unwrap();
    assert_eq!(sheet.name(), "Plan");
    assert_eq!(sheet.headers(), plan().headers());
    assert_eq!(sheet.value(2, 5), &CellValue::string("C0010-C0020"));

    let result = sheet.validate(&spec, &options).unwrap();
    let expected = plan().validate(&spec, &options).unwrap();
    assert_eq!(verdict_texts(&result), verdict_texts(&expected));

    // Legacy xls is read-only
    let output = dir.path().join("result.xls");
    assert!(matches!(result.save(&output), Err(Error::UnsupportedFormat(_))));
}

#[test]
fn test_csv_validate_save_open() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("plan.csv");
    let output = dir.path().join("result.csv");
    let spec = FormulaSpec::builtin();
    let options = ValidationOptions::default();

    plan().save(&input).unwrap();
    let sheet = Sheet::open(&input).unwrap();
    assert_eq!(sheet.name(), "plan");

    let result = sheet.validate(&spec, &options).unwrap();
    result.save(&output).unwrap();
    let reopened = Sheet::open(&output).unwrap();

    assert_eq!(verdict_texts(&reopened), verdict_texts(&result));
    let case2 = reopened.column_index("KURAL5_CASE_2").unwrap();
    assert_eq!(reopened.value(2, case2).to_text(), "unfavorable");
}

#[test]
fn test_template_files() {
    let dir = TempDir::new().unwrap();
    for name in ["template.xlsx", "template.csv"] {
        let path = dir.path().join(name);
        template_sheet(&ColumnNames::default()).save(&path).unwrap();

        let sheet = Sheet::open(&path).unwrap();
        assert_eq!(sheet.headers(), &ColumnNames::default().all());
        assert_eq!(sheet.row_count(), 0);
    }
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plan.ods");

    assert!(matches!(plan().save(&path), Err(Error::UnsupportedFormat(_))));
    assert!(matches!(Sheet::open(&path), Err(Error::UnsupportedFormat(_))));
}

#[test]
fn test_csv_with_blank_line_between_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plan.csv");
    std::fs::write(
        &path,
        "PLAN_GROUP,OPER_NUM,OPER_DESC,INSPCHAR,MSTR_CHAR,FORMULA_FIELD_1\n\
         5000,0010,Mix,10,KM G/G,\n\
         ,,,,,\n\
         5000,0010,Mix,20,YAG G/G,\n",
    )
    .unwrap();

    let sheet = Sheet::open(&path).unwrap();
    let report = sheet
        .validation_report(&FormulaSpec::builtin(), &ValidationOptions::default())
        .unwrap();

    let rows: Vec<usize> = report.outcomes.iter().map(|o| o.row).collect();
    assert_eq!(rows, vec![0, 2]);
    assert!(report
        .outcomes
        .iter()
        .all(|o| o.verdict.step == StepVerdict::Correct));

    let result = formcheck::export_sheet(&sheet, &report, Locale::English);
    assert_eq!(result.row_count(), 2);
}
