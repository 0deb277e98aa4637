use std::collections::BTreeMap;

use crate::error::Result;
use crate::io::excel_write;
use crate::model::{CategoryTable, Grade, NOT_AVAILABLE_MARKER, ReportRow, SheetLayout};

/// Fixed leading columns of every report sheet.
const NAME_COLUMN: &str = "ФИО";
const GROUP_COLUMN: &str = "Группа";

/// Sheet-name length limit imposed by the xlsx format.
const SHEET_NAME_LIMIT: usize = 31;

/// A single cell of an output sheet. Converted grades are written as numbers
/// so the documents stay usable for downstream arithmetic.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

/// A table that will be materialised as one sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetData {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// Everything required to materialise one report document.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookData {
    pub sheets: Vec<SheetData>,
}

/// One generated report document, named after its category.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Serializes per-category tables into report documents.
///
/// One document per category with at least one row; a category whose row set
/// came out empty is skipped silently rather than producing an empty file.
pub fn build(tables: &[CategoryTable], layout: SheetLayout) -> Result<Vec<ReportFile>> {
    let mut files = Vec::new();

    for table in tables {
        if table.rows.is_empty() {
            continue;
        }
        let workbook = match layout {
            SheetLayout::PerGroup => per_group_workbook(table),
            SheetLayout::Flat => flat_workbook(table),
        };
        let bytes = excel_write::write_workbook(&workbook)?;
        files.push(ReportFile {
            filename: table.category.filename().to_string(),
            bytes,
        });
    }

    Ok(files)
}

/// One sheet per group, groups in sorted order. Row order within a group
/// follows the reconciliation order, so identical inputs produce identical
/// documents.
fn per_group_workbook(table: &CategoryTable) -> WorkbookData {
    let mut by_group: BTreeMap<&str, Vec<&ReportRow>> = BTreeMap::new();
    for row in &table.rows {
        by_group.entry(row.group.as_str()).or_default().push(row);
    }

    let columns = sheet_columns(table);
    let sheets = by_group
        .into_iter()
        .map(|(group, rows)| SheetData {
            name: sanitize_sheet_name(group),
            columns: columns.clone(),
            rows: rows.into_iter().map(sheet_row).collect(),
        })
        .collect();

    WorkbookData { sheets }
}

/// A single sheet named after the category, carrying every row.
fn flat_workbook(table: &CategoryTable) -> WorkbookData {
    let sheet = SheetData {
        name: sanitize_sheet_name(table.category.label()),
        columns: sheet_columns(table),
        rows: table.rows.iter().map(sheet_row).collect(),
    };
    WorkbookData {
        sheets: vec![sheet],
    }
}

/// Fixed column order: name, group, then the category's test display names.
fn sheet_columns(table: &CategoryTable) -> Vec<String> {
    let mut columns = Vec::with_capacity(table.columns.len() + 2);
    columns.push(NAME_COLUMN.to_string());
    columns.push(GROUP_COLUMN.to_string());
    columns.extend(table.columns.iter().map(|column| column.name.clone()));
    columns
}

fn sheet_row(row: &ReportRow) -> Vec<CellValue> {
    let mut cells = Vec::with_capacity(row.grades.len() + 2);
    cells.push(CellValue::Text(row.full_name.clone()));
    cells.push(CellValue::Text(row.group.clone()));
    for grade in &row.grades {
        cells.push(match grade {
            Grade::Converted(value) => CellValue::Number(f64::from(*value)),
            Grade::NotAvailable => CellValue::Text(NOT_AVAILABLE_MARKER.to_string()),
        });
    }
    cells
}

/// Replaces characters the xlsx format rejects and truncates to the sheet
/// name limit. Truncation counts chars rather than bytes, since group codes
/// are usually Cyrillic. Two groups that sanitize to the same name collide
/// in the writer; that edge is knowingly unhandled.
pub fn sanitize_sheet_name(raw: &str) -> String {
    let invalid = [':', '\\', '/', '?', '*', '[', ']', '\'', '"'];
    let sanitized: String = raw
        .chars()
        .map(|ch| {
            if invalid.contains(&ch) || ch.is_control() {
                '_'
            } else {
                ch
            }
        })
        .collect();

    let trimmed = sanitized.trim();
    if trimmed.is_empty() {
        return "Sheet".to_string();
    }

    trimmed.chars().take(SHEET_NAME_LIMIT).collect()
}
