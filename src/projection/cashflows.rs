//! Year-by-year output structures for projections

use serde::{Deserialize, Serialize};

/// A single row of projection output for one year.
///
/// Year 0 is the acquisition: every operating line is zero and the
/// cash flow is the negative equity outlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearProjection {
    // Timing
    pub year: u32,

    // Revenue
    pub gross_potential_rent: f64,
    pub vacancy_loss: f64,
    pub other_income: f64,
    pub effective_gross_income: f64,

    // Expenses
    pub taxes: f64,
    pub insurance: f64,
    pub management: f64,
    pub replacement_reserves: f64,
    pub total_expenses: f64,

    // Operations
    pub net_operating_income: f64,

    // Debt service
    pub interest: f64,
    pub principal: f64,
    pub total_debt_service: f64,

    // Summary
    pub before_tax_cash_flow: f64,
    pub ending_loan_balance: f64,
}

impl YearProjection {
    /// Create a year row with every line zeroed
    pub fn new(year: u32) -> Self {
        Self {
            year,
            gross_potential_rent: 0.0,
            vacancy_loss: 0.0,
            other_income: 0.0,
            effective_gross_income: 0.0,
            taxes: 0.0,
            insurance: 0.0,
            management: 0.0,
            replacement_reserves: 0.0,
            total_expenses: 0.0,
            net_operating_income: 0.0,
            interest: 0.0,
            principal: 0.0,
            total_debt_service: 0.0,
            before_tax_cash_flow: 0.0,
            ending_loan_balance: 0.0,
        }
    }

    /// Debt service coverage ratio for the year, `None` when there is
    /// no debt service to cover
    pub fn dscr(&self) -> Option<f64> {
        if self.total_debt_service == 0.0 {
            None
        } else {
            Some(self.net_operating_income / self.total_debt_service)
        }
    }
}

/// Complete multi-year projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// One row per year, year 0 first
    pub years: Vec<YearProjection>,

    /// Loan balance after the final projected year
    pub final_loan_balance: f64,
}

impl Projection {
    pub fn new() -> Self {
        Self {
            years: Vec::new(),
            final_loan_balance: 0.0,
        }
    }

    /// Add a year row
    pub fn add_year(&mut self, row: YearProjection) {
        self.years.push(row);
    }

    /// Operating years only (year 0 excluded)
    pub fn operating_years(&self) -> &[YearProjection] {
        if self.years.is_empty() {
            &self.years
        } else {
            &self.years[1..]
        }
    }

    /// NOI of the final projected year (0.0 when the hold period is 0)
    pub fn final_noi(&self) -> f64 {
        self.years
            .last()
            .map(|y| y.net_operating_income)
            .unwrap_or(0.0)
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let operating = self.operating_years();
        let total_noi: f64 = operating.iter().map(|y| y.net_operating_income).sum();
        let total_debt_service: f64 = operating.iter().map(|y| y.total_debt_service).sum();
        let total_cash_flow: f64 = operating.iter().map(|y| y.before_tax_cash_flow).sum();

        ProjectionSummary {
            total_years: self.years.len() as u32,
            total_noi,
            total_debt_service,
            total_cash_flow,
            final_noi: self.final_noi(),
            final_loan_balance: self.final_loan_balance,
        }
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary statistics for a projection (operating years only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_years: u32,
    pub total_noi: f64,
    pub total_debt_service: f64,
    pub total_cash_flow: f64,
    pub final_noi: f64,
    pub final_loan_balance: f64,
}
