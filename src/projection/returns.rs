//! Levered returns on invested equity

use super::cashflows::Projection;
use super::exit::ExitSummary;
use super::irr::calculate_irr;
use crate::error::UnderwritingError;
use crate::model::UnderwritingModel;
use serde::{Deserialize, Serialize};

/// Headline return metrics for the deal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnsSummary {
    /// Equity outlay at close
    pub equity_invested: f64,

    /// Operating cash flow over the hold plus net sale proceeds
    pub total_cash_distributed: f64,

    /// (total distributed + equity) / equity
    pub equity_multiple: f64,

    /// Levered IRR; `None` when the solver reports undetermined
    pub irr: Option<f64>,
}

/// Assemble the investor cash-flow vector and compute equity multiple
/// and IRR. Non-positive equity is rejected up front.
pub fn calculate_returns(
    model: &UnderwritingModel,
    projection: &Projection,
    exit: &ExitSummary,
) -> Result<ReturnsSummary, UnderwritingError> {
    let equity_invested = model.equity();
    if equity_invested <= 0.0 {
        return Err(UnderwritingError::domain(
            "equity",
            format!(
                "purchase price {} less loan {} must leave positive equity",
                model.purchase_price, model.loan_amount
            ),
        ));
    }

    let operating_cash_flow: f64 = projection
        .operating_years()
        .iter()
        .map(|y| y.before_tax_cash_flow)
        .sum();
    let total_cash_distributed = operating_cash_flow + exit.net_sale_proceeds;
    let equity_multiple = (total_cash_distributed + equity_invested) / equity_invested;

    let cashflows = investor_cash_flows(projection, equity_invested, exit.net_sale_proceeds);
    let irr = calculate_irr(&cashflows);

    Ok(ReturnsSummary {
        equity_invested,
        total_cash_distributed,
        equity_multiple,
        irr,
    })
}

/// [-equity, year 1.., final year + net sale proceeds]. With a zero
/// hold period the proceeds fold into the single outlay element.
fn investor_cash_flows(
    projection: &Projection,
    equity_invested: f64,
    net_sale_proceeds: f64,
) -> Vec<f64> {
    let mut flows = Vec::with_capacity(projection.years.len());
    flows.push(-equity_invested);
    for year in projection.operating_years() {
        flows.push(year.before_tax_cash_flow);
    }
    if let Some(last) = flows.last_mut() {
        *last += net_sale_proceeds;
    }
    flows
}
