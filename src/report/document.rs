//! Typed report document: ordered sheets of formatted cells
//!
//! The document is the report buffer's wire form. It carries layout
//! (column widths, frozen panes) and per-cell value, number format, and
//! style; rendering to a spreadsheet file is the consumer's side of the
//! boundary.

use crate::error::UnderwritingError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number formats applied per cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumberFormat {
    General,
    /// Whole-dollar currency
    Currency,
    /// Rate shown as a percentage
    Percentage,
    /// Multiple with an "x" suffix
    Ratio,
    /// Whole years with a "years" suffix
    YearCount,
}

/// Traffic-light coloring for signed values and sensitivity bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellColor {
    Green,
    Amber,
    Red,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStyle {
    pub bold: bool,
    pub color: Option<CellColor>,
}

impl CellStyle {
    pub fn bold() -> Self {
        Self {
            bold: true,
            color: None,
        }
    }

    pub fn colored(color: CellColor) -> Self {
        Self {
            bold: false,
            color: Some(color),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Blank,
    Text(String),
    Number(f64),
}

/// One positioned, formatted cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
    pub value: CellValue,
    pub format: NumberFormat,
    pub style: CellStyle,
}

/// Header rows/columns kept in view while scrolling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrozenPanes {
    pub rows: u32,
    pub cols: u32,
}

/// One named sheet of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub column_widths: Vec<f64>,
    pub frozen: Option<FrozenPanes>,
    pub cells: Vec<Cell>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_widths: Vec::new(),
            frozen: None,
            cells: Vec::new(),
        }
    }

    /// Place a cell
    pub fn set(&mut self, row: u32, col: u32, value: CellValue, format: NumberFormat, style: CellStyle) {
        self.cells.push(Cell {
            row,
            col,
            value,
            format,
            style,
        });
    }

    /// Place a plain text cell
    pub fn set_text(&mut self, row: u32, col: u32, text: impl Into<String>) {
        self.set(
            row,
            col,
            CellValue::Text(text.into()),
            NumberFormat::General,
            CellStyle::default(),
        );
    }

    /// Place a formatted number cell
    pub fn set_number(&mut self, row: u32, col: u32, value: f64, format: NumberFormat, style: CellStyle) {
        self.set(row, col, CellValue::Number(value), format, style);
    }

    pub fn freeze(&mut self, rows: u32, cols: u32) {
        self.frozen = Some(FrozenPanes { rows, cols });
    }

    /// Look up a cell by position (last write wins)
    pub fn cell_at(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.iter().rev().find(|c| c.row == row && c.col == col)
    }
}

/// The complete report, built fresh per call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub sheets: Vec<Sheet>,
}

impl ReportDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            generated_at: Utc::now(),
            sheets: Vec::new(),
        }
    }

    pub fn add_sheet(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    /// Look up a sheet by name
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Encode the document into the report buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>, UnderwritingError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode a report buffer back into a document
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, UnderwritingError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
