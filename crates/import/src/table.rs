use std::io::{Cursor, Read};

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("table has no header row")]
    Empty,
}

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    fn from_workbook(value: &Data) -> Self {
        match value {
            Data::Empty | Data::Error(_) => Cell::Empty,
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::String(s) => Cell::text(s.as_str()),
            other => Cell::text(other.to_string()),
        }
    }

    /// Lenient conversion from whatever a converter emitted.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Cell::Empty,
            Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or_default(),
            Value::String(s) => Cell::text(s),
            Value::Bool(b) => Cell::Text(b.to_string()),
            other => Cell::Text(other.to_string()),
        }
    }

    pub fn text(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(raw)
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(n) => !n.is_finite(),
        }
    }

    /// Trimmed text form; `None` for blank cells.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Number(n) if n.is_finite() => Some(n.to_string()),
            Cell::Number(_) => None,
            Cell::Text(s) => {
                let t = s.trim();
                (!t.is_empty()).then(|| t.to_string())
            }
        }
    }
}

/// Tabular price list. Row 0 holds the headers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Read CSV without treating the first record specially; ragged rows are
    /// accepted.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in csv.records() {
            let record = record?;
            rows.push(record.iter().map(Cell::text).collect());
        }
        if rows.is_empty() {
            return Err(TableError::Empty);
        }
        Ok(Self { rows })
    }

    /// Read the first sheet of an `.xlsx`/`.xls`/`.ods` workbook. Row 0 of the
    /// sheet's used range is the header row.
    pub fn from_workbook(bytes: &[u8]) -> Result<Self, TableError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
        let range = workbook.worksheet_range_at(0).ok_or(TableError::Empty)??;

        let rows: Vec<Vec<Cell>> = range
            .rows()
            .map(|r| r.iter().map(Cell::from_workbook).collect())
            .collect();
        if rows.is_empty() {
            return Err(TableError::Empty);
        }
        Ok(Self { rows })
    }

    pub fn from_json_rows(rows: Vec<Vec<Value>>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .map(|r| r.into_iter().map(Cell::from_json).collect())
                .collect(),
        }
    }

    /// Header texts of row 0, trimmed. Blank header cells become "".
    pub fn headers(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|r| r.iter().map(|c| c.as_text().unwrap_or_default()).collect())
            .unwrap_or_default()
    }

    /// Data rows paired with their 1-based spreadsheet row number.
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[Cell])> {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, r)| (i + 1, r.as_slice()))
    }
}
