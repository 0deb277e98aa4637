use rust_xlsxwriter::Workbook;

use crate::error::Result;
use crate::report::{CellValue, WorkbookData};

/// Encodes the workbook description into xlsx bytes.
///
/// Documents travel back to the caller in memory; the transport layer
/// decides whether they ever touch a filesystem.
pub fn write_workbook(workbook: &WorkbookData) -> Result<Vec<u8>> {
    let mut writer = Workbook::new();

    for sheet in &workbook.sheets {
        let worksheet = writer.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (col_idx, header) in sheet.columns.iter().enumerate() {
            worksheet.write_string(0, col_idx as u16, header)?;
        }

        for (row_idx, row) in sheet.rows.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                match cell {
                    CellValue::Text(value) => {
                        worksheet.write_string((row_idx + 1) as u32, col_idx as u16, value)?
                    }
                    CellValue::Number(value) => {
                        worksheet.write_number((row_idx + 1) as u32, col_idx as u16, *value)?
                    }
                };
            }
        }
    }

    Ok(writer.save_to_buffer()?)
}
