//! Underwriting model structures and rent roll loading

mod data;
pub mod loader;

pub use data::{
    SummaryMetrics, UnderwritingModel, WaterfallSpec, WaterfallTier, DEFAULT_AMORTIZATION_YEARS,
    DEFAULT_EXIT_CAP_RATE, DEFAULT_EXPENSE_GROWTH, DEFAULT_HOLD_PERIOD_YEARS,
    DEFAULT_LOAN_TERM_YEARS, DEFAULT_RENT_GROWTH, DEFAULT_VACANCY_RATE,
};
pub use loader::{load_rent_roll, load_rent_roll_from_reader, RentRoll, RentRollUnit};
