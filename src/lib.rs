//! Underwriting System - Acquisition underwriting engine for multifamily real estate
//!
//! This library provides:
//! - Multi-year cash flow projections with amortizing or interest-only debt
//! - Exit valuation by direct capitalization with selling costs and payoff
//! - Levered return metrics (equity multiple, IRR)
//! - IRR sensitivity grids over exit cap rate and vacancy
//! - Multi-sheet report assembly serialized to a portable buffer

pub mod analysis;
pub mod error;
pub mod model;
pub mod projection;
pub mod report;

// Re-export commonly used types
pub use analysis::{generate_report, DealAnalysis};
pub use error::UnderwritingError;
pub use model::{RentRoll, UnderwritingModel};
pub use projection::{Projection, ReturnsSummary, YearProjection};
pub use report::{ReportDocument, ReportOptions};
