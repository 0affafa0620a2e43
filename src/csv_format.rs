//! Delimited (CSV / TSV) loader and writer for datasets.
//!
//! Cells are typed per column: a column whose non-empty cells all parse as
//! finite numbers is loaded as numbers, any other column keeps its text.
//! Workbooks are handed to [`crate::xlsx_format`].

use crate::error::Result;
use crate::types::{Column, Dataset, Value};
use crate::xlsx_format;
use crate::Format;
use csv::{ReaderBuilder, WriterBuilder};
use std::io::{Read, Write};

impl Dataset {
    /// Parse a dataset with a header row from any source implementing `Read`.
    ///
    /// # Arguments
    ///
    /// * `reader` - A mutable reference to a type implementing `Read`
    /// * `format` - Format of the input
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::fs::File;
    /// use dq_checker::{Dataset, Format};
    ///
    /// let mut file = File::open("submission.csv")?;
    /// let dataset = Dataset::from_read(&mut file, Format::Csv)?;
    /// println!("{} rows", dataset.height());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_read<R: Read>(reader: &mut R, format: Format) -> Result<Self> {
        match format.delimiter() {
            Some(delimiter) => read_delimited(reader, delimiter),
            None => xlsx_format::read_workbook(reader),
        }
    }

    /// Write the dataset, header row first, to any destination implementing `Write`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::fs::File;
    /// use dq_checker::{Dataset, Format};
    ///
    /// let dataset = Dataset::new();
    /// let mut file = File::create("output.csv")?;
    /// dataset.write_to(&mut file, Format::Csv)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn write_to<W: Write>(&self, writer: &mut W, format: Format) -> Result<()> {
        match format.delimiter() {
            Some(delimiter) => write_delimited(self, writer, delimiter),
            None => xlsx_format::write_workbook(self, writer),
        }
    }
}

fn read_delimited<R: Read>(reader: &mut R, delimiter: u8) -> Result<Dataset> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];

    for result in csv_reader.records() {
        let record = result?;
        for (idx, cells) in raw.iter_mut().enumerate() {
            cells.push(record.get(idx).unwrap_or_default().to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw)
        .map(|(name, cells)| Column::new(name, type_cells(cells)))
        .collect();

    Dataset::from_columns(columns)
}

fn write_delimited<W: Write>(dataset: &Dataset, writer: &mut W, delimiter: u8) -> Result<()> {
    let mut csv_writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    csv_writer.write_record(dataset.column_names())?;
    for row in dataset.rows() {
        csv_writer.write_record(&row)?;
    }

    csv_writer.flush()?;
    Ok(())
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn type_cells(cells: Vec<String>) -> Vec<Value> {
    let numeric = cells
        .iter()
        .filter(|c| !c.is_empty())
        .all(|c| parse_number(c).is_some());

    cells
        .into_iter()
        .map(|cell| {
            if cell.is_empty() {
                return Value::Missing;
            }
            match parse_number(&cell) {
                Some(n) if numeric => Value::Number(n),
                _ => Value::Text(cell),
            }
        })
        .collect()
}
