//! Spreadsheet workbook loader and writer for datasets.
//!
//! The first worksheet is read; its first row holds the headers. Cells keep
//! the type the workbook stores them with, so a month column may mix numbers
//! and text.

use crate::error::{Error, Result};
use crate::types::{Column, Dataset, Value};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use rust_xlsxwriter::Workbook;
use std::io::{Cursor, Read, Write};

/// Read the first worksheet of an `.xlsx` / `.xls` workbook.
pub fn read_workbook<R: Read>(reader: &mut R) -> Result<Dataset> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::SpreadsheetError("workbook has no worksheets".to_string()))??;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Dataset::new());
    };

    let headers: Vec<String> = header_row.iter().map(|c| c.to_string()).collect();
    let mut cells: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];

    for row in rows {
        for (idx, column) in cells.iter_mut().enumerate() {
            column.push(row.get(idx).map(cell_value).unwrap_or(Value::Missing));
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::new(name, values))
        .collect();

    Dataset::from_columns(columns)
}

/// Write the dataset as a single-sheet `.xlsx` workbook, header row first.
///
/// Missing cells and NaN numbers are left blank.
pub fn write_workbook<W: Write>(dataset: &Dataset, writer: &mut W) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col_idx, column) in dataset.columns().iter().enumerate() {
        let col = u16::try_from(col_idx)
            .map_err(|_| Error::SpreadsheetError(format!("too many columns: {}", col_idx + 1)))?;
        worksheet.write_string(0, col, &column.name)?;

        for (row_idx, value) in column.values.iter().enumerate() {
            let row = u32::try_from(row_idx + 1)
                .map_err(|_| Error::SpreadsheetError(format!("too many rows: {}", row_idx + 1)))?;
            if value.is_missing() {
                continue;
            }
            match value {
                Value::Number(n) if n.is_finite() => {
                    worksheet.write_number(row, col, *n)?;
                }
                Value::Text(s) if !s.is_empty() => {
                    worksheet.write_string(row, col, s)?;
                }
                _ => {}
            }
        }
    }

    let buffer = workbook.save_to_buffer()?;
    writer.write_all(&buffer)?;
    writer.flush()?;
    Ok(())
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Int(i) => Value::Number(*i as f64),
        Data::Float(f) => Value::Number(*f),
        Data::String(s) if s.is_empty() => Value::Missing,
        Data::String(s) => Value::Text(s.clone()),
        Data::Bool(b) => Value::Text(if *b { "True" } else { "False" }.to_string()),
        Data::Empty => Value::Missing,
        other => Value::Text(other.to_string()),
    }
}
