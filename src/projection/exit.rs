//! Exit valuation at the end of the hold period

use super::cashflows::Projection;
use crate::error::UnderwritingError;
use crate::model::UnderwritingModel;
use serde::{Deserialize, Serialize};

/// Fixed selling-cost convention applied to the gross sale price
pub const SELLING_COST_RATE: f64 = 0.02;

/// Economics of the modeled sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitSummary {
    /// Final projected year's NOI
    pub exit_noi: f64,

    /// Capitalization rate applied to the exit NOI
    pub exit_cap_rate: f64,

    /// exit_noi / exit_cap_rate
    pub gross_sale_price: f64,

    /// 2% of the gross sale price
    pub selling_costs: f64,

    /// Loan balance retired at closing
    pub loan_payoff: f64,

    /// What the equity walks away with; negative when the payoff
    /// exceeds the net price, and reported that way
    pub net_sale_proceeds: f64,
}

/// Value the exit by capitalizing the final year's NOI.
///
/// A non-positive exit cap rate is rejected before any division.
pub fn value_exit(
    model: &UnderwritingModel,
    projection: &Projection,
) -> Result<ExitSummary, UnderwritingError> {
    if model.exit_cap_rate <= 0.0 {
        return Err(UnderwritingError::domain(
            "exit_cap_rate",
            format!("must be positive, got {}", model.exit_cap_rate),
        ));
    }

    let exit_noi = projection.final_noi();
    let gross_sale_price = exit_noi / model.exit_cap_rate;
    let selling_costs = gross_sale_price * SELLING_COST_RATE;
    let loan_payoff = projection.final_loan_balance;
    let net_sale_proceeds = gross_sale_price - selling_costs - loan_payoff;

    Ok(ExitSummary {
        exit_noi,
        exit_cap_rate: model.exit_cap_rate,
        gross_sale_price,
        selling_costs,
        loan_payoff,
        net_sale_proceeds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::cashflows::YearProjection;

    fn projection_with_final_noi(noi: f64, final_balance: f64) -> Projection {
        let mut projection = Projection::new();
        projection.add_year(YearProjection::new(0));
        let mut year1 = YearProjection::new(1);
        year1.net_operating_income = noi;
        projection.add_year(year1);
        projection.final_loan_balance = final_balance;
        projection
    }

    #[test]
    fn test_gross_price_capitalizes_final_noi() {
        let mut model = UnderwritingModel::default();
        model.exit_cap_rate = 0.055;
        let projection = projection_with_final_noi(605_000.0, 6_000_000.0);

        let exit = value_exit(&model, &projection).unwrap();
        assert!((exit.gross_sale_price - 11_000_000.0).abs() < 1e-6);
        assert!((exit.selling_costs - 220_000.0).abs() < 1e-6);
        assert_eq!(exit.loan_payoff, 6_000_000.0);
    }

    #[test]
    fn test_net_proceeds_identity_is_exact() {
        let mut model = UnderwritingModel::default();
        model.exit_cap_rate = 0.06;
        let projection = projection_with_final_noi(487_316.0, 5_876_543.21);

        let exit = value_exit(&model, &projection).unwrap();
        assert_eq!(
            exit.net_sale_proceeds,
            exit.gross_sale_price - exit.selling_costs - exit.loan_payoff
        );
    }

    #[test]
    fn test_negative_proceeds_surfaced() {
        let mut model = UnderwritingModel::default();
        model.exit_cap_rate = 0.055;
        // Payoff dwarfs the sale price
        let projection = projection_with_final_noi(100_000.0, 9_000_000.0);

        let exit = value_exit(&model, &projection).unwrap();
        assert!(exit.net_sale_proceeds < 0.0);
    }

    #[test]
    fn test_zero_cap_rate_is_domain_error() {
        let mut model = UnderwritingModel::default();
        model.exit_cap_rate = 0.0;
        let projection = projection_with_final_noi(605_000.0, 0.0);

        let err = value_exit(&model, &projection).unwrap_err();
        assert!(matches!(err, UnderwritingError::Domain { field: "exit_cap_rate", .. }));
    }

    #[test]
    fn test_negative_cap_rate_is_domain_error() {
        let mut model = UnderwritingModel::default();
        model.exit_cap_rate = -0.05;
        let projection = projection_with_final_noi(605_000.0, 0.0);
        assert!(value_exit(&model, &projection).is_err());
    }

    #[test]
    fn test_zero_hold_period_sells_for_nothing() {
        let model = UnderwritingModel::default();
        let mut projection = Projection::new();
        projection.add_year(YearProjection::new(0));
        projection.final_loan_balance = 0.0;

        let exit = value_exit(&model, &projection).unwrap();
        assert_eq!(exit.exit_noi, 0.0);
        assert_eq!(exit.gross_sale_price, 0.0);
        assert_eq!(exit.net_sale_proceeds, 0.0);
    }
}
