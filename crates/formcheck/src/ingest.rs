//! Turning a sheet into inspection records

use tracing::debug;

use formcheck_core::{
    CellValue, ColumnNames, Error, InspectionRecord, Result, Sheet, ToleranceLimits,
};

/// Column positions resolved against a sheet's headers
struct ColumnMap {
    plan_group: usize,
    operation: usize,
    operation_description: usize,
    ordinal: usize,
    characteristic: usize,
    formula: usize,
    lower_limit: Option<usize>,
    upper_limit: Option<usize>,
}

impl ColumnMap {
    fn resolve(sheet: &Sheet, columns: &ColumnNames) -> Result<Self> {
        let missing: Vec<String> = columns
            .required()
            .iter()
            .filter(|name| sheet.column_index(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingColumns(missing));
        }

        let required = |name: &str| {
            sheet
                .column_index(name)
                .ok_or_else(|| Error::MissingColumns(vec![name.to_string()]))
        };

        Ok(Self {
            plan_group: required(&columns.plan_group)?,
            operation: required(&columns.operation)?,
            operation_description: required(&columns.operation_description)?,
            ordinal: required(&columns.ordinal)?,
            characteristic: required(&columns.characteristic)?,
            formula: required(&columns.formula)?,
            lower_limit: sheet.column_index(&columns.lower_limit),
            upper_limit: sheet.column_index(&columns.upper_limit),
        })
    }
}

/// Read every data row of a sheet as an [`InspectionRecord`]
///
/// Fails before reading any row when a required column is absent, and on the
/// first ordinal cell that is not a non-negative integer. Blank rows and rows
/// without a plan group or operation belong to no group and are skipped;
/// they get no verdict and do not appear in the result. Limit columns are
/// optional; empty or non-numeric limit cells are absent bounds.
pub fn records_from_sheet(sheet: &Sheet, columns: &ColumnNames) -> Result<Vec<InspectionRecord>> {
    let map = ColumnMap::resolve(sheet, columns)?;
    if map.lower_limit.is_none() || map.upper_limit.is_none() {
        debug!(
            lower = %columns.lower_limit,
            upper = %columns.upper_limit,
            "tolerance limit column absent, treating its bounds as undeclared"
        );
    }

    let text = |row: usize, col: usize| sheet.value(row, col).to_text();
    let limit =
        |row: usize, col: Option<usize>| col.and_then(|c| sheet.value(row, c).coerce_number());

    let mut records = Vec::with_capacity(sheet.row_count());
    for (row, cells) in sheet.rows().iter().enumerate() {
        if cells.iter().all(CellValue::is_empty) {
            debug!(row, "skipping blank row");
            continue;
        }

        let plan_group = text(row, map.plan_group);
        let operation = text(row, map.operation);
        if plan_group.is_empty() || operation.is_empty() {
            debug!(row, "skipping row without plan group or operation");
            continue;
        }

        let ordinal_cell = sheet.value(row, map.ordinal);
        let ordinal = ordinal_cell.coerce_integer().ok_or_else(|| Error::InvalidOrdinal {
            row,
            value: ordinal_text(ordinal_cell),
        })?;

        records.push(InspectionRecord {
            row,
            plan_group,
            operation,
            operation_description: text(row, map.operation_description),
            ordinal,
            characteristic: text(row, map.characteristic),
            formula: text(row, map.formula),
            limits: ToleranceLimits::new(limit(row, map.lower_limit), limit(row, map.upper_limit)),
        });
    }

    Ok(records)
}

fn ordinal_text(cell: &CellValue) -> String {
    match cell {
        CellValue::Empty => "<empty>".to_string(),
        other => other.to_string(),
    }
}

/// An empty input sheet holding only the header row
pub fn template_sheet(columns: &ColumnNames) -> Sheet {
    Sheet::with_headers(
        "template",
        columns.all().iter().map(|name| name.to_string()).collect(),
    )
}
