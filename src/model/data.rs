//! Underwriting model structures matching the deal-management input format

use serde::{Deserialize, Serialize};

/// Default annual rent growth rate (3%)
pub const DEFAULT_RENT_GROWTH: f64 = 0.03;

/// Default annual expense growth rate (2%)
pub const DEFAULT_EXPENSE_GROWTH: f64 = 0.02;

/// Default vacancy rate (5%)
pub const DEFAULT_VACANCY_RATE: f64 = 0.05;

/// Default exit capitalization rate (5.5%)
pub const DEFAULT_EXIT_CAP_RATE: f64 = 0.055;

/// Default hold period in years
pub const DEFAULT_HOLD_PERIOD_YEARS: u32 = 5;

/// Default amortization schedule length in years
pub const DEFAULT_AMORTIZATION_YEARS: u32 = 30;

/// Default loan term (balloon horizon) in years
pub const DEFAULT_LOAN_TERM_YEARS: u32 = 10;

fn default_rent_growth() -> f64 {
    DEFAULT_RENT_GROWTH
}

fn default_expense_growth() -> f64 {
    DEFAULT_EXPENSE_GROWTH
}

fn default_vacancy_rate() -> f64 {
    DEFAULT_VACANCY_RATE
}

fn default_exit_cap_rate() -> f64 {
    DEFAULT_EXIT_CAP_RATE
}

fn default_hold_period_years() -> u32 {
    DEFAULT_HOLD_PERIOD_YEARS
}

fn default_amortization_years() -> u32 {
    DEFAULT_AMORTIZATION_YEARS
}

fn default_loan_term_years() -> u32 {
    DEFAULT_LOAN_TERM_YEARS
}

/// A single tier of an LP/GP distribution waterfall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallTier {
    /// IRR hurdle that opens this tier
    pub hurdle_irr: f64,

    /// Limited partner share of distributions within the tier
    pub lp_split: f64,

    /// General partner share of distributions within the tier
    pub gp_split: f64,
}

/// Waterfall structure as supplied by the deal-management system.
///
/// Arrives either as an already-structured tier list or as a raw JSON
/// string that still needs a parse step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WaterfallSpec {
    /// Tiers already deserialized into structure
    Structured(Vec<WaterfallTier>),
    /// Raw JSON payload, parsed on demand
    Raw(String),
}

impl WaterfallSpec {
    /// Resolve the ordered tier list, parsing the raw form if necessary
    pub fn tiers(&self) -> Result<Vec<WaterfallTier>, serde_json::Error> {
        match self {
            WaterfallSpec::Structured(tiers) => Ok(tiers.clone()),
            WaterfallSpec::Raw(payload) => serde_json::from_str(payload),
        }
    }
}

/// Precomputed summary metrics supplied upstream.
///
/// Any field present here overrides the figure the report would
/// otherwise derive from the projection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    /// Year-1 NOI divided by purchase price
    #[serde(default)]
    pub going_in_cap_rate: Option<f64>,

    /// Purchase price divided by unit count
    #[serde(default)]
    pub price_per_unit: Option<f64>,

    /// Year-1 NOI divided by annual debt service
    #[serde(default)]
    pub dscr: Option<f64>,

    /// Year-1 before-tax cash flow divided by equity invested
    #[serde(default)]
    pub cash_on_cash: Option<f64>,
}

/// The full set of underwriting assumptions for one acquisition.
///
/// Assembled by the deal-management system and treated as an immutable
/// snapshot: every field absent from the incoming JSON takes its
/// documented default, and nothing in the engine ever mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderwritingModel {
    /// Display name of the property
    #[serde(default)]
    pub property_name: String,

    /// Number of units, used for per-unit metrics (0 = unknown)
    #[serde(default)]
    pub unit_count: u32,

    /// Acquisition price
    #[serde(default)]
    pub purchase_price: f64,

    /// Senior loan amount at close
    #[serde(default)]
    pub loan_amount: f64,

    /// Annual loan interest rate
    #[serde(default)]
    pub interest_rate: f64,

    /// Amortization schedule length in years
    #[serde(default = "default_amortization_years")]
    pub amortization_years: u32,

    /// Loan term in years (balloon horizon, display only)
    #[serde(default = "default_loan_term_years")]
    pub loan_term_years: u32,

    /// Interest-only window at the front of the loan, in years
    #[serde(default)]
    pub interest_only_years: u32,

    /// Number of years the asset is held before the modeled sale
    #[serde(default = "default_hold_period_years")]
    pub hold_period_years: u32,

    /// Annual rent growth rate
    #[serde(default = "default_rent_growth")]
    pub rent_growth: f64,

    /// Annual expense growth rate
    #[serde(default = "default_expense_growth")]
    pub expense_growth: f64,

    /// Vacancy and credit loss as a share of gross potential rent
    #[serde(default = "default_vacancy_rate")]
    pub vacancy_rate: f64,

    /// Year-1 gross potential rent
    #[serde(default)]
    pub gross_potential_rent: f64,

    /// Year-1 other income (parking, laundry, fees)
    #[serde(default)]
    pub other_income: f64,

    /// Aggregate year-1 operating expenses; overrides the granular
    /// lines below when non-zero
    #[serde(default)]
    pub operating_expense: f64,

    /// Year-1 real estate taxes
    #[serde(default)]
    pub taxes: f64,

    /// Year-1 insurance premium
    #[serde(default)]
    pub insurance: f64,

    /// Year-1 management fee
    #[serde(default)]
    pub management: f64,

    /// Year-1 replacement reserves
    #[serde(default)]
    pub replacement_reserves: f64,

    /// Capitalization rate applied to exit-year NOI
    #[serde(default = "default_exit_cap_rate")]
    pub exit_cap_rate: f64,

    /// Explicit annual debt service, overriding the derived schedule
    /// in reported totals
    #[serde(default)]
    pub annual_debt_service: Option<f64>,

    /// Optional LP/GP distribution waterfall
    #[serde(default)]
    pub waterfall: Option<WaterfallSpec>,

    /// Optional precomputed summary metrics
    #[serde(default)]
    pub summary_metrics: Option<SummaryMetrics>,
}

impl Default for UnderwritingModel {
    fn default() -> Self {
        Self {
            property_name: String::new(),
            unit_count: 0,
            purchase_price: 0.0,
            loan_amount: 0.0,
            interest_rate: 0.0,
            amortization_years: DEFAULT_AMORTIZATION_YEARS,
            loan_term_years: DEFAULT_LOAN_TERM_YEARS,
            interest_only_years: 0,
            hold_period_years: DEFAULT_HOLD_PERIOD_YEARS,
            rent_growth: DEFAULT_RENT_GROWTH,
            expense_growth: DEFAULT_EXPENSE_GROWTH,
            vacancy_rate: DEFAULT_VACANCY_RATE,
            gross_potential_rent: 0.0,
            other_income: 0.0,
            operating_expense: 0.0,
            taxes: 0.0,
            insurance: 0.0,
            management: 0.0,
            replacement_reserves: 0.0,
            exit_cap_rate: DEFAULT_EXIT_CAP_RATE,
            annual_debt_service: None,
            waterfall: None,
            summary_metrics: None,
        }
    }
}

impl UnderwritingModel {
    /// Create a model from the required deal terms, everything else at
    /// its documented default
    pub fn new(
        property_name: &str,
        purchase_price: f64,
        loan_amount: f64,
        interest_rate: f64,
        gross_potential_rent: f64,
    ) -> Self {
        Self {
            property_name: property_name.to_string(),
            purchase_price,
            loan_amount,
            interest_rate,
            gross_potential_rent,
            ..Self::default()
        }
    }

    /// Equity invested at close
    pub fn equity(&self) -> f64 {
        self.purchase_price - self.loan_amount
    }

    /// Year-1 operating expense base under the precedence policy: the
    /// single aggregate figure when present and non-zero, otherwise the
    /// sum of the granular lines. Never averaged, never double-counted.
    pub fn base_operating_expenses(&self) -> f64 {
        if self.has_aggregate_expenses() {
            self.operating_expense
        } else {
            self.taxes + self.insurance + self.management + self.replacement_reserves
        }
    }

    /// Whether the aggregate operating-expense figure is in effect
    pub fn has_aggregate_expenses(&self) -> bool {
        self.operating_expense != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_takes_documented_defaults() {
        let model: UnderwritingModel = serde_json::from_str("{}").unwrap();
        assert_eq!(model.rent_growth, 0.03);
        assert_eq!(model.expense_growth, 0.02);
        assert_eq!(model.vacancy_rate, 0.05);
        assert_eq!(model.exit_cap_rate, 0.055);
        assert_eq!(model.hold_period_years, 5);
        assert_eq!(model.amortization_years, 30);
        assert_eq!(model.loan_term_years, 10);
        assert_eq!(model.interest_only_years, 0);
        assert_eq!(model.purchase_price, 0.0);
        assert!(model.annual_debt_service.is_none());
        assert!(model.waterfall.is_none());
    }

    #[test]
    fn test_partial_json_keeps_supplied_values() {
        let model: UnderwritingModel = serde_json::from_str(
            r#"{"purchase_price": 10000000.0, "loan_amount": 6500000.0, "vacancy_rate": 0.07}"#,
        )
        .unwrap();
        assert_eq!(model.purchase_price, 10_000_000.0);
        assert_eq!(model.loan_amount, 6_500_000.0);
        assert_eq!(model.vacancy_rate, 0.07);
        assert_eq!(model.rent_growth, 0.03);
        assert_eq!(model.equity(), 3_500_000.0);
    }

    #[test]
    fn test_expense_precedence_aggregate_wins() {
        let mut model = UnderwritingModel::new("Test", 1_000_000.0, 650_000.0, 0.065, 120_000.0);
        model.operating_expense = 50_000.0;
        model.taxes = 10_000.0;
        model.insurance = 5_000.0;
        assert_eq!(model.base_operating_expenses(), 50_000.0);
        assert!(model.has_aggregate_expenses());
    }

    #[test]
    fn test_expense_precedence_granular_sum_fallback() {
        let mut model = UnderwritingModel::new("Test", 1_000_000.0, 650_000.0, 0.065, 120_000.0);
        model.taxes = 10_000.0;
        model.insurance = 5_000.0;
        model.management = 6_000.0;
        model.replacement_reserves = 3_000.0;
        assert_eq!(model.base_operating_expenses(), 24_000.0);
        assert!(!model.has_aggregate_expenses());
    }

    #[test]
    fn test_waterfall_structured_tiers() {
        let spec = WaterfallSpec::Structured(vec![
            WaterfallTier { hurdle_irr: 0.08, lp_split: 0.9, gp_split: 0.1 },
            WaterfallTier { hurdle_irr: 0.12, lp_split: 0.8, gp_split: 0.2 },
        ]);
        let tiers = spec.tiers().unwrap();
        assert_eq!(tiers.len(), 2);
        assert_eq!(tiers[1].hurdle_irr, 0.12);
    }

    #[test]
    fn test_waterfall_raw_payload_parses() {
        let spec = WaterfallSpec::Raw(
            r#"[{"hurdle_irr": 0.08, "lp_split": 0.9, "gp_split": 0.1}]"#.to_string(),
        );
        let tiers = spec.tiers().unwrap();
        assert_eq!(tiers.len(), 1);
        assert_eq!(tiers[0].lp_split, 0.9);
    }

    #[test]
    fn test_waterfall_malformed_payload_errors() {
        let spec = WaterfallSpec::Raw("not json at all".to_string());
        assert!(spec.tiers().is_err());
    }

    #[test]
    fn test_waterfall_field_accepts_both_forms() {
        let structured: UnderwritingModel = serde_json::from_str(
            r#"{"waterfall": [{"hurdle_irr": 0.08, "lp_split": 0.9, "gp_split": 0.1}]}"#,
        )
        .unwrap();
        assert!(matches!(structured.waterfall, Some(WaterfallSpec::Structured(_))));

        let raw: UnderwritingModel = serde_json::from_str(
            r#"{"waterfall": "[{\"hurdle_irr\": 0.08, \"lp_split\": 0.9, \"gp_split\": 0.1}]"}"#,
        )
        .unwrap();
        assert!(matches!(raw.waterfall, Some(WaterfallSpec::Raw(_))));
    }
}
