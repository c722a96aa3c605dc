//! Amortization bookkeeping for a single senior loan

/// Interest and principal paid across one year of the schedule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnualDebtService {
    pub interest: f64,
    pub principal: f64,
    pub ending_balance: f64,
}

impl AnnualDebtService {
    pub fn total(&self) -> f64 {
        self.interest + self.principal
    }
}

/// Running amortization state for one loan.
///
/// The payment is fixed at construction, either supplied by the caller
/// or derived from the rate and amortization length. The balance is
/// never clamped at zero: a supplied payment that outruns the schedule
/// drives the balance negative, and that is surfaced as-is.
#[derive(Debug, Clone)]
pub struct AmortizationScheduler {
    balance: f64,
    annual_rate: f64,
    monthly_payment: f64,
}

impl AmortizationScheduler {
    /// Create a scheduler at the opening balance. When `monthly_payment`
    /// is `None` the payment is derived from the rate and amortization
    /// length.
    pub fn new(
        opening_balance: f64,
        annual_rate: f64,
        amortization_years: u32,
        monthly_payment: Option<f64>,
    ) -> Self {
        let monthly_payment = monthly_payment.unwrap_or_else(|| {
            derived_monthly_payment(opening_balance, annual_rate, amortization_years)
        });

        Self {
            balance: opening_balance,
            annual_rate,
            monthly_payment,
        }
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn monthly_payment(&self) -> f64 {
        self.monthly_payment
    }

    /// Run 12 monthly amortizing steps: interest accrues on the running
    /// balance, the remainder of the payment retires principal.
    pub fn amortize_year(&mut self) -> AnnualDebtService {
        let monthly_rate = self.annual_rate / 12.0;
        let mut interest_total = 0.0;
        let mut principal_total = 0.0;

        for _ in 0..12 {
            let interest = self.balance * monthly_rate;
            let principal = self.monthly_payment - interest;
            self.balance -= principal;
            interest_total += interest;
            principal_total += principal;
        }

        AnnualDebtService {
            interest: interest_total,
            principal: principal_total,
            ending_balance: self.balance,
        }
    }

    /// Run one interest-only year: interest accrues on the flat balance,
    /// no principal is retired.
    pub fn interest_only_year(&mut self) -> AnnualDebtService {
        AnnualDebtService {
            interest: self.balance * self.annual_rate,
            principal: 0.0,
            ending_balance: self.balance,
        }
    }
}

/// Standard annuity payment: P * r * (1+r)^n / ((1+r)^n - 1) over
/// n = amortization_years * 12 monthly periods. A zero rate degrades to
/// straight-line principal.
pub fn derived_monthly_payment(balance: f64, annual_rate: f64, amortization_years: u32) -> f64 {
    if balance <= 0.0 {
        return 0.0;
    }

    let months = f64::from(amortization_years * 12);
    if annual_rate == 0.0 {
        return balance / months;
    }

    let monthly_rate = annual_rate / 12.0;
    let growth = (1.0 + monthly_rate).powf(months);
    balance * monthly_rate * growth / (growth - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_payment_standard_loan() {
        // 750k at 6.5% over 30 years
        let payment = derived_monthly_payment(750_000.0, 0.065, 30);
        assert!((payment - 4_740.51).abs() < 0.5);
    }

    #[test]
    fn test_derived_payment_zero_rate_straight_line() {
        let payment = derived_monthly_payment(120_000.0, 0.0, 10);
        assert!((payment - 1_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_derived_payment_zero_balance() {
        assert_eq!(derived_monthly_payment(0.0, 0.065, 30), 0.0);
    }

    #[test]
    fn test_amortize_year_splits_payment() {
        let mut scheduler = AmortizationScheduler::new(6_500_000.0, 0.065, 30, None);
        let payment = scheduler.monthly_payment();
        let year = scheduler.amortize_year();

        // Each month's interest + principal is exactly one payment
        assert!((year.total() - payment * 12.0).abs() < 1e-6);
        assert!(year.interest > 0.0);
        assert!(year.principal > 0.0);
        assert!(year.ending_balance < 6_500_000.0);
        assert!((year.ending_balance - (6_500_000.0 - year.principal)).abs() < 1e-6);
    }

    #[test]
    fn test_balance_non_increasing_across_years() {
        let mut scheduler = AmortizationScheduler::new(6_500_000.0, 0.065, 30, None);
        let mut prior = scheduler.balance();
        for _ in 0..30 {
            let year = scheduler.amortize_year();
            assert!(year.ending_balance <= prior);
            prior = year.ending_balance;
        }
        // Fully amortized after the full schedule
        assert!(prior.abs() < 1.0);
    }

    #[test]
    fn test_interest_only_year_holds_balance_flat() {
        let mut scheduler = AmortizationScheduler::new(6_500_000.0, 0.065, 30, None);
        let year = scheduler.interest_only_year();
        assert_eq!(year.principal, 0.0);
        assert!((year.interest - 6_500_000.0 * 0.065).abs() < 1e-6);
        assert_eq!(year.ending_balance, 6_500_000.0);
        assert_eq!(scheduler.balance(), 6_500_000.0);
    }

    #[test]
    fn test_oversized_payment_is_not_clamped() {
        // A supplied payment far above the derived one outruns the
        // schedule; the balance goes negative and stays unclamped.
        let mut scheduler = AmortizationScheduler::new(100_000.0, 0.06, 30, Some(10_000.0));
        let year = scheduler.amortize_year();
        assert!(year.ending_balance < 0.0);
        assert!(year.principal > 100_000.0);
    }
}
