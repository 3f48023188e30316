//! CSV decoding
//!
//! Content must be UTF-8. The first record is the header; every later record is
//! a data row numbered from 2 (the header is row 1). The reader runs in flexible
//! mode so rows with too few or too many cells are still yielded and their
//! physical field count can be compared with the header.

use std::str::Utf8Error;

use tabula_core::constants::FIRST_DATA_ROW_NUMBER;
use tabula_core::models::RowData;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("content is not valid UTF-8: {0}")]
    Encoding(#[from] Utf8Error),

    #[error("{0}")]
    Csv(#[from] csv::Error),
}

/// One data row as read from the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    pub row_number: i32,
    /// Header columns present in the row, in header order. Missing trailing cells are absent.
    pub data: RowData,
    /// Cells beyond the header width.
    pub overflow: Vec<String>,
    /// Number of cells physically present in the record.
    pub field_count: usize,
}

impl ParsedRow {
    /// Value of a header column, treating a missing cell as empty.
    pub fn value(&self, column: &str) -> &str {
        self.data.get(column).unwrap_or("")
    }
}

#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<ParsedRow>,
}

/// Streaming reader over the data rows of a CSV document.
pub struct RowReader<'a> {
    headers: Vec<String>,
    records: csv::StringRecordsIntoIter<&'a [u8]>,
    next_row_number: i32,
}

impl<'a> RowReader<'a> {
    pub fn new(content: &'a [u8]) -> Result<Self, ParseError> {
        let text = std::str::from_utf8(content)?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader
            .headers()?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        Ok(Self {
            headers,
            records: reader.into_records(),
            next_row_number: FIRST_DATA_ROW_NUMBER,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    fn build_row(&self, record: &csv::StringRecord, row_number: i32) -> ParsedRow {
        let data = self
            .headers
            .iter()
            .zip(record.iter())
            .map(|(column, value)| (column.clone(), value.to_string()))
            .collect::<RowData>();

        let overflow = record
            .iter()
            .skip(self.headers.len())
            .map(str::to_string)
            .collect();

        ParsedRow {
            row_number,
            data,
            overflow,
            field_count: record.len(),
        }
    }
}

impl Iterator for RowReader<'_> {
    type Item = Result<ParsedRow, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(e.into())),
        };
        let row_number = self.next_row_number;
        self.next_row_number += 1;
        Some(Ok(self.build_row(&record, row_number)))
    }
}

/// Decode a whole document into its header and data rows.
pub fn parse_table(content: &[u8]) -> Result<CsvTable, ParseError> {
    let reader = RowReader::new(content)?;
    let headers = reader.headers().to_vec();
    let rows = reader.collect::<Result<Vec<_>, _>>()?;
    Ok(CsvTable { headers, rows })
}
