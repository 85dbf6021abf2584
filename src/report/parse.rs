use std::io::Cursor;
use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook_from_rs};

use crate::report::error::{ReportError, ReportResult};

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Spreadsheet,
}

impl FileFormat {
    /// `.csv` parses as delimited text; anything else goes through the
    /// spreadsheet reader (and fails there if the bytes are not a workbook).
    pub fn from_filename(filename: &str) -> Self {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match ext.as_deref() {
            Some("csv") => Self::Csv,
            _ => Self::Spreadsheet,
        }
    }
}

/// A parsed but not yet validated table. Every column from the file is
/// kept so extra columns can still be shown in the data-table view.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Parse uploaded bytes, dispatching on the filename extension.
pub fn parse_bytes(filename: &str, data: &[u8]) -> ReportResult<RawTable> {
    match FileFormat::from_filename(filename) {
        FileFormat::Csv => parse_csv(data),
        FileFormat::Spreadsheet => parse_xlsx(data),
    }
}

/// Read a file from disk and parse it. The dashboard calls this for both
/// the startup argument and the in-UI load modal.
pub fn load_file(path: &Path) -> ReportResult<RawTable> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let data = std::fs::read(path)
        .map_err(|e| ReportError::Parse(format!("failed to read '{}': {}", path.display(), e)))?;
    parse_bytes(filename, &data)
}

fn parse_csv(data: &[u8]) -> ReportResult<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| ReportError::Parse(format!("failed to read CSV header: {}", e)))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result
            .map_err(|e| ReportError::Parse(format!("CSV error on line {}: {}", idx + 2, e)))?;
        rows.push(record.iter().map(|v| v.to_string()).collect());
    }

    Ok(RawTable { columns, rows })
}

fn parse_xlsx(data: &[u8]) -> ReportResult<RawTable> {
    let cursor = Cursor::new(data);
    let mut workbook: Xlsx<_> = open_workbook_from_rs(cursor)
        .map_err(|e| ReportError::Parse(format!("failed to open workbook: {}", e)))?;

    // First sheet only, first row = header.
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ReportError::Parse("workbook contains no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet)
        .ok_or_else(|| ReportError::Parse(format!("sheet '{}' has no data", sheet)))?
        .map_err(|e| ReportError::Parse(format!("failed to read sheet '{}': {}", sheet, e)))?;

    let mut rows_iter = range.rows();
    let columns: Vec<String> = rows_iter
        .next()
        .ok_or_else(|| ReportError::Parse(format!("sheet '{}' is empty", sheet)))?
        .iter()
        .map(cell_to_string)
        .collect();

    let width = columns.len();
    let mut rows = Vec::new();
    for row in rows_iter {
        let mut values: Vec<String> = row.iter().map(cell_to_string).collect();
        values.resize(width, String::new());
        rows.push(values);
    }

    Ok(RawTable { columns, rows })
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}
