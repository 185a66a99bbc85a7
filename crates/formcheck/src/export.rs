//! Writing verdicts back next to the input columns

use formcheck_core::{CellValue, Locale, Sheet, VERDICT_COLUMNS};

use crate::validation::ValidationReport;

/// Build the result sheet: every input column plus the nine verdict columns
///
/// Rows follow the order of `report.outcomes`. Verdict columns already
/// present in the input are overwritten in place, so validating a result
/// sheet again gives the same table. Rules that do not apply leave their
/// cell empty.
pub fn export_sheet(sheet: &Sheet, report: &ValidationReport, locale: Locale) -> Sheet {
    let mut headers = sheet.headers().to_vec();
    let verdict_positions: Vec<usize> = VERDICT_COLUMNS
        .iter()
        .map(|name| match sheet.column_index(name) {
            Some(col) => col,
            None => {
                headers.push(name.to_string());
                headers.len() - 1
            }
        })
        .collect();

    let width = headers.len();
    let source_rows: Vec<Vec<CellValue>> = sheet.padded_rows().collect();
    let mut output = Sheet::with_headers(sheet.name(), headers);

    for outcome in &report.outcomes {
        let mut row = source_rows.get(outcome.row).cloned().unwrap_or_default();
        row.resize(width, CellValue::Empty);

        for (col, text) in verdict_positions
            .iter()
            .zip(outcome.verdict.to_columns(locale))
        {
            row[*col] = if text.is_empty() {
                CellValue::Empty
            } else {
                CellValue::String(text)
            };
        }
        output.push_row(row);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::SheetValidationExt;
    use formcheck_core::{ColumnNames, FormulaSpec, OutputOrder, ValidationOptions};
    use pretty_assertions::assert_eq;

    fn input() -> Sheet {
        let headers = ColumnNames::default()
            .all()
            .iter()
            .map(|h| h.to_string())
            .collect();
        let mut sheet = Sheet::with_headers("plan", headers);
        sheet.push_row(vec![
            "5000".into(),
            "0010".into(),
            "Mix".into(),
            20.into(),
            "YAG G/G".into(),
            "".into(),
            3.0.into(),
            4.0.into(),
        ]);
        sheet.push_row(vec![
            "5000".into(),
            "0010".into(),
            "Mix".into(),
            10.into(),
            "KM G/G".into(),
        ]);
        sheet
    }

    #[test]
    fn test_appends_verdict_columns() {
        let sheet = input();
        let output = sheet
            .validate(&FormulaSpec::builtin(), &ValidationOptions::default())
            .unwrap();

        assert_eq!(output.name(), "plan");
        assert_eq!(output.column_count(), 8 + VERDICT_COLUMNS.len());
        assert_eq!(&output.headers()[8..], &VERDICT_COLUMNS);
        assert_eq!(output.row_count(), 2);

        let step = output.column_index("KURAL4_STATUS").unwrap();
        assert_eq!(output.value(0, step), &CellValue::from("correct"));
        assert_eq!(output.value(1, step), &CellValue::from("correct"));

        let structural = output.column_index("KURAL1_STATUS").unwrap();
        assert_eq!(output.value(0, structural), &CellValue::Empty);
    }

    #[test]
    fn test_ragged_input_rows_are_padded() {
        let output = input()
            .validate(&FormulaSpec::builtin(), &ValidationOptions::default())
            .unwrap();
        assert_eq!(output.rows()[1].len(), output.column_count());
        assert_eq!(output.value(1, 6), &CellValue::Empty);
    }

    #[test]
    fn test_grouped_order_reorders_rows() {
        let options = ValidationOptions {
            output_order: OutputOrder::Grouped,
            ..Default::default()
        };
        let output = input().validate(&FormulaSpec::builtin(), &options).unwrap();
        let name = output.column_index("MSTR_CHAR").unwrap();
        assert_eq!(output.value(0, name), &CellValue::from("KM G/G"));
        assert_eq!(output.value(1, name), &CellValue::from("YAG G/G"));
    }

    #[test]
    fn test_revalidating_output_overwrites_verdicts() {
        let spec = FormulaSpec::builtin();
        let options = ValidationOptions::default();
        let first = input().validate(&spec, &options).unwrap();
        let second = first.validate(&spec, &options).unwrap();
        assert_eq!(second, first);
    }

    #[test]
    fn test_turkish_labels() {
        let options = ValidationOptions {
            locale: Locale::Turkish,
            ..Default::default()
        };
        let output = input().validate(&FormulaSpec::builtin(), &options).unwrap();
        let step = output.column_index("KURAL4_STATUS").unwrap();
        assert_ne!(output.value(0, step), &CellValue::Empty);
    }
}
