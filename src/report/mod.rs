//! Multi-sheet report document model and assembly

mod builder;
mod document;

pub use builder::{irr_band, ReportBuilder, ReportOptions, ReportTemplate};
pub use document::{
    Cell, CellColor, CellStyle, CellValue, FrozenPanes, NumberFormat, ReportDocument, Sheet,
};
