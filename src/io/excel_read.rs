use std::io::Cursor;

use calamine::{DataType, Range, Reader, open_workbook_auto_from_rs};

use crate::error::{ProcessError, Result};
use crate::model::ResultsTable;

/// Decodes a results workbook held in memory.
///
/// The first worksheet's first row is taken as the header row, the only
/// column identity the rest of the pipeline relies on, and every row below
/// it becomes a data row of stringified cells.
pub fn read_table(bytes: &[u8]) -> Result<ResultsTable> {
    let range = read_first_sheet(bytes)?;
    let mut rows = range.rows();

    let headers: Vec<String> = match rows.next() {
        Some(first_row) => first_row
            .iter()
            .map(|cell| cell_to_string(cell).trim().to_string())
            .collect(),
        None => {
            return Err(ProcessError::InvalidSheet(
                "results sheet has no header row".to_string(),
            ));
        }
    };

    let data = rows
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();
    Ok(ResultsTable::new(headers, data))
}

/// Decodes a roster workbook into a raw grid of stringified cells.
///
/// Rosters have no reliable header row, so nothing is interpreted here; an
/// empty sheet simply yields an empty grid for the scan to find nothing in.
pub fn read_grid(bytes: &[u8]) -> Result<Vec<Vec<String>>> {
    let range = read_first_sheet(bytes)?;
    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect())
}

/// Opens the first worksheet of an in-memory workbook. Binary `.xls` and
/// container `.xlsx` payloads are told apart by the reader itself, so the
/// transport layer never needs to know which format it was handed.
fn read_first_sheet(bytes: &[u8]) -> Result<Range<DataType>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ProcessError::InvalidSheet("workbook has no sheets".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .ok_or_else(|| ProcessError::InvalidSheet(format!("missing sheet '{sheet_name}'")))?
        .map_err(ProcessError::from)?;
    Ok(range)
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(value) => value.clone(),
        DataType::Float(value) => value.to_string(),
        DataType::Int(value) => value.to_string(),
        DataType::Bool(value) => value.to_string(),
        DataType::Empty => String::new(),
        other => other.to_string(),
    }
}
