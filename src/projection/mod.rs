//! Projection pipeline: amortization, annual cash flows, exit, returns

mod amortization;
mod cashflows;
mod engine;
mod exit;
mod irr;
mod returns;
mod sensitivity;

pub use amortization::{derived_monthly_payment, AmortizationScheduler, AnnualDebtService};
pub use cashflows::{Projection, ProjectionSummary, YearProjection};
pub use engine::project_cash_flows;
pub use exit::{value_exit, ExitSummary, SELLING_COST_RATE};
pub use irr::calculate_irr;
pub use returns::{calculate_returns, ReturnsSummary};
pub use sensitivity::{
    estimate_sensitivity, SensitivityMatrix, SensitivityMethod, EXIT_CAP_OFFSETS, EXIT_CAP_WEIGHT,
    VACANCY_OFFSETS, VACANCY_WEIGHT,
};
