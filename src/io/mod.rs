//! IO adapters translating between workbook bytes and the in-memory model.

pub mod excel_read;
pub mod excel_write;
