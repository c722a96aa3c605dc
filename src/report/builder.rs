//! Report assembly from computed results and raw assumptions
//!
//! Every repeated section is driven by one generic renderer over a
//! declarative field table, in two orientations: two-column label/value
//! blocks and year-matrix blocks with years across the columns. Sheets
//! are built independently, so a failure inside one section can only
//! ever cost that sheet.

use super::document::{CellColor, CellStyle, CellValue, NumberFormat, ReportDocument, Sheet};
use crate::analysis::DealAnalysis;
use crate::model::{SummaryMetrics, UnderwritingModel};
use crate::projection::{
    estimate_sensitivity, ExitSummary, ReturnsSummary, SensitivityMethod, YearProjection,
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Overall report layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportTemplate {
    /// Total operating expenses as a single line
    #[default]
    Standard,
    /// Granular expense lines broken out on the Cash Flows sheet
    Detailed,
}

/// Controls which sheets are produced and how
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Reserved; accepted but does not alter output
    #[serde(default)]
    pub include_formulas: bool,

    #[serde(default = "default_true")]
    pub include_sensitivity: bool,

    #[serde(default = "default_true")]
    pub include_waterfall: bool,

    #[serde(default)]
    pub template: ReportTemplate,

    #[serde(default)]
    pub sensitivity_method: SensitivityMethod,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            include_formulas: false,
            include_sensitivity: true,
            include_waterfall: true,
            template: ReportTemplate::Standard,
            sensitivity_method: SensitivityMethod::LinearDelta,
        }
    }
}

/// One row of a section table: label, accessor, format, display flags.
/// `negative_display` flips the shown sign only; stored values are
/// never touched. `signed` colors the shown value green/red by sign.
struct FieldSpec<T> {
    label: &'static str,
    format: NumberFormat,
    is_total: bool,
    negative_display: bool,
    signed: bool,
    get: fn(&T) -> Option<f64>,
}

impl<T> FieldSpec<T> {
    fn new(label: &'static str, format: NumberFormat, get: fn(&T) -> Option<f64>) -> Self {
        Self {
            label,
            format,
            is_total: false,
            negative_display: false,
            signed: false,
            get,
        }
    }

    fn total(mut self) -> Self {
        self.is_total = true;
        self
    }

    fn negated(mut self) -> Self {
        self.negative_display = true;
        self
    }

    fn signed(mut self) -> Self {
        self.signed = true;
        self
    }
}

/// Color band for an IRR cell on the sensitivity sheet
pub fn irr_band(irr: f64) -> CellColor {
    if irr >= 0.15 {
        CellColor::Green
    } else if irr >= 0.10 {
        CellColor::Amber
    } else {
        CellColor::Red
    }
}

fn sign_color(value: f64) -> Option<CellColor> {
    if value > 0.0 {
        Some(CellColor::Green)
    } else if value < 0.0 {
        Some(CellColor::Red)
    } else {
        None
    }
}

fn field_style<T>(field: &FieldSpec<T>, shown: f64) -> CellStyle {
    CellStyle {
        bold: field.is_total,
        color: if field.signed { sign_color(shown) } else { None },
    }
}

/// Render a two-column (label, value) section; returns the next free row
fn write_field_section<T>(
    sheet: &mut Sheet,
    start_row: u32,
    title: &str,
    source: &T,
    fields: &[FieldSpec<T>],
) -> u32 {
    sheet.set(
        start_row,
        0,
        CellValue::Text(title.to_string()),
        NumberFormat::General,
        CellStyle::bold(),
    );

    let mut row = start_row + 1;
    for field in fields {
        sheet.set_text(row, 0, field.label);
        match (field.get)(source) {
            Some(raw) => {
                let shown = if field.negative_display { -raw } else { raw };
                sheet.set_number(row, 1, shown, field.format, field_style(field, shown));
            }
            None => sheet.set(row, 1, CellValue::Blank, field.format, CellStyle::default()),
        }
        row += 1;
    }

    row + 1
}

/// Render a year-matrix section, one field per row and one year per
/// column; returns the next free row
fn write_year_section(
    sheet: &mut Sheet,
    start_row: u32,
    title: &str,
    years: &[YearProjection],
    fields: &[FieldSpec<YearProjection>],
) -> u32 {
    sheet.set(
        start_row,
        0,
        CellValue::Text(title.to_string()),
        NumberFormat::General,
        CellStyle::bold(),
    );

    let mut row = start_row + 1;
    for field in fields {
        sheet.set_text(row, 0, field.label);
        for (i, year) in years.iter().enumerate() {
            let col = i as u32 + 1;
            match (field.get)(year) {
                Some(raw) => {
                    let shown = if field.negative_display { -raw } else { raw };
                    sheet.set_number(row, col, shown, field.format, field_style(field, shown));
                }
                None => sheet.set(row, col, CellValue::Blank, field.format, CellStyle::default()),
            }
        }
        row += 1;
    }

    row + 1
}

/// Summary-sheet figures, derived from the projection with any
/// precomputed metrics taking precedence
struct DealFigures {
    purchase_price: f64,
    equity_invested: f64,
    hold_period_years: f64,
    price_per_unit: Option<f64>,
    going_in_cap_rate: Option<f64>,
    year_one_dscr: Option<f64>,
    cash_on_cash: Option<f64>,
}

fn resolve_figures(model: &UnderwritingModel, analysis: &DealAnalysis) -> DealFigures {
    let year_one = analysis.projection.years.get(1);
    let equity = model.equity();

    let derived_cap = year_one.and_then(|y| {
        if model.purchase_price > 0.0 {
            Some(y.net_operating_income / model.purchase_price)
        } else {
            None
        }
    });
    let derived_ppu = if model.unit_count > 0 {
        Some(model.purchase_price / f64::from(model.unit_count))
    } else {
        None
    };
    let derived_dscr = year_one.and_then(|y| y.dscr());
    let derived_coc = year_one.and_then(|y| {
        if equity > 0.0 {
            Some(y.before_tax_cash_flow / equity)
        } else {
            None
        }
    });

    let supplied = model.summary_metrics.clone().unwrap_or_else(SummaryMetrics::default);

    DealFigures {
        purchase_price: model.purchase_price,
        equity_invested: equity,
        hold_period_years: f64::from(model.hold_period_years),
        price_per_unit: supplied.price_per_unit.or(derived_ppu),
        going_in_cap_rate: supplied.going_in_cap_rate.or(derived_cap),
        year_one_dscr: supplied.dscr.or(derived_dscr),
        cash_on_cash: supplied.cash_on_cash.or(derived_coc),
    }
}

/// Assembles the report document from one deal's computed analysis
pub struct ReportBuilder {
    options: ReportOptions,
}

impl ReportBuilder {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Build the full document: Summary, Assumptions, Cash Flows, then
    /// the conditional Waterfall and Sensitivity sheets
    pub fn build(&self, model: &UnderwritingModel, analysis: &DealAnalysis) -> ReportDocument {
        if self.options.include_formulas {
            debug!("include_formulas accepted but not applied to output");
        }

        let title = if model.property_name.is_empty() {
            "Underwriting Report".to_string()
        } else {
            format!("Underwriting Report: {}", model.property_name)
        };

        let mut document = ReportDocument::new(title);
        document.add_sheet(self.summary_sheet(model, analysis));
        document.add_sheet(self.assumptions_sheet(model));
        document.add_sheet(self.cash_flows_sheet(analysis));

        if self.options.include_waterfall {
            if let Some(sheet) = self.waterfall_sheet(model) {
                document.add_sheet(sheet);
            }
        }
        if self.options.include_sensitivity {
            document.add_sheet(self.sensitivity_sheet(model, analysis));
        }

        document
    }

    fn summary_sheet(&self, model: &UnderwritingModel, analysis: &DealAnalysis) -> Sheet {
        let mut sheet = Sheet::new("Summary");
        sheet.column_widths = vec![30.0, 18.0];

        let figures = resolve_figures(model, analysis);
        let deal_fields = [
            FieldSpec::new("Purchase Price", NumberFormat::Currency, |f: &DealFigures| {
                Some(f.purchase_price)
            }),
            FieldSpec::new("Equity Invested", NumberFormat::Currency, |f: &DealFigures| {
                Some(f.equity_invested)
            }),
            FieldSpec::new("Hold Period", NumberFormat::YearCount, |f: &DealFigures| {
                Some(f.hold_period_years)
            }),
            FieldSpec::new("Price per Unit", NumberFormat::Currency, |f: &DealFigures| {
                f.price_per_unit
            }),
            FieldSpec::new("Going-In Cap Rate", NumberFormat::Percentage, |f: &DealFigures| {
                f.going_in_cap_rate
            }),
            FieldSpec::new("Year 1 DSCR", NumberFormat::Ratio, |f: &DealFigures| {
                f.year_one_dscr
            }),
            FieldSpec::new("Year 1 Cash-on-Cash", NumberFormat::Percentage, |f: &DealFigures| {
                f.cash_on_cash
            }),
        ];

        let exit_fields = [
            FieldSpec::new("Exit NOI", NumberFormat::Currency, |e: &ExitSummary| Some(e.exit_noi)),
            FieldSpec::new("Exit Cap Rate", NumberFormat::Percentage, |e: &ExitSummary| {
                Some(e.exit_cap_rate)
            }),
            FieldSpec::new("Gross Sale Price", NumberFormat::Currency, |e: &ExitSummary| {
                Some(e.gross_sale_price)
            }),
            FieldSpec::new("Selling Costs", NumberFormat::Currency, |e: &ExitSummary| {
                Some(e.selling_costs)
            })
            .negated(),
            FieldSpec::new("Loan Payoff", NumberFormat::Currency, |e: &ExitSummary| {
                Some(e.loan_payoff)
            })
            .negated(),
            FieldSpec::new("Net Sale Proceeds", NumberFormat::Currency, |e: &ExitSummary| {
                Some(e.net_sale_proceeds)
            })
            .total()
            .signed(),
        ];

        let returns_fields = [
            FieldSpec::new("Equity Invested", NumberFormat::Currency, |r: &ReturnsSummary| {
                Some(r.equity_invested)
            }),
            FieldSpec::new("Total Cash Distributed", NumberFormat::Currency, |r: &ReturnsSummary| {
                Some(r.total_cash_distributed)
            }),
            FieldSpec::new("Equity Multiple", NumberFormat::Ratio, |r: &ReturnsSummary| {
                Some(r.equity_multiple)
            })
            .total(),
            FieldSpec::new("Levered IRR", NumberFormat::Percentage, |r: &ReturnsSummary| r.irr)
                .total(),
        ];

        let mut row = write_field_section(&mut sheet, 0, "Deal Metrics", &figures, &deal_fields);
        row = write_field_section(&mut sheet, row, "Exit Analysis", &analysis.exit, &exit_fields);
        write_field_section(&mut sheet, row, "Returns Summary", &analysis.returns, &returns_fields);

        sheet
    }

    fn assumptions_sheet(&self, model: &UnderwritingModel) -> Sheet {
        let mut sheet = Sheet::new("Assumptions");
        sheet.column_widths = vec![30.0, 18.0];

        sheet.set(
            0,
            0,
            CellValue::Text("Property".to_string()),
            NumberFormat::General,
            CellStyle::bold(),
        );
        sheet.set_text(0, 1, model.property_name.clone());

        let financing_fields = [
            FieldSpec::new("Purchase Price", NumberFormat::Currency, |m: &UnderwritingModel| {
                Some(m.purchase_price)
            }),
            FieldSpec::new("Units", NumberFormat::General, |m: &UnderwritingModel| {
                if m.unit_count > 0 {
                    Some(f64::from(m.unit_count))
                } else {
                    None
                }
            }),
            FieldSpec::new("Loan Amount", NumberFormat::Currency, |m: &UnderwritingModel| {
                Some(m.loan_amount)
            }),
            FieldSpec::new("Interest Rate", NumberFormat::Percentage, |m: &UnderwritingModel| {
                Some(m.interest_rate)
            }),
            FieldSpec::new("Amortization", NumberFormat::YearCount, |m: &UnderwritingModel| {
                Some(f64::from(m.amortization_years))
            }),
            FieldSpec::new("Loan Term", NumberFormat::YearCount, |m: &UnderwritingModel| {
                Some(f64::from(m.loan_term_years))
            }),
            FieldSpec::new("Interest-Only Period", NumberFormat::YearCount, |m: &UnderwritingModel| {
                Some(f64::from(m.interest_only_years))
            }),
            FieldSpec::new("Hold Period", NumberFormat::YearCount, |m: &UnderwritingModel| {
                Some(f64::from(m.hold_period_years))
            }),
        ];

        let income_fields = [
            FieldSpec::new("Gross Potential Rent", NumberFormat::Currency, |m: &UnderwritingModel| {
                Some(m.gross_potential_rent)
            }),
            FieldSpec::new("Other Income", NumberFormat::Currency, |m: &UnderwritingModel| {
                Some(m.other_income)
            }),
            FieldSpec::new("Vacancy Rate", NumberFormat::Percentage, |m: &UnderwritingModel| {
                Some(m.vacancy_rate)
            }),
        ];

        let expense_fields = [
            FieldSpec::new("Operating Expenses (aggregate)", NumberFormat::Currency, |m: &UnderwritingModel| {
                if m.has_aggregate_expenses() {
                    Some(m.operating_expense)
                } else {
                    None
                }
            }),
            FieldSpec::new("Taxes", NumberFormat::Currency, |m: &UnderwritingModel| {
                Some(m.taxes)
            }),
            FieldSpec::new("Insurance", NumberFormat::Currency, |m: &UnderwritingModel| {
                Some(m.insurance)
            }),
            FieldSpec::new("Management", NumberFormat::Currency, |m: &UnderwritingModel| {
                Some(m.management)
            }),
            FieldSpec::new("Replacement Reserves", NumberFormat::Currency, |m: &UnderwritingModel| {
                Some(m.replacement_reserves)
            }),
            FieldSpec::new("Year 1 Expense Base", NumberFormat::Currency, |m: &UnderwritingModel| {
                Some(m.base_operating_expenses())
            })
            .total(),
        ];

        let growth_fields = [
            FieldSpec::new("Rent Growth", NumberFormat::Percentage, |m: &UnderwritingModel| {
                Some(m.rent_growth)
            }),
            FieldSpec::new("Expense Growth", NumberFormat::Percentage, |m: &UnderwritingModel| {
                Some(m.expense_growth)
            }),
            FieldSpec::new("Exit Cap Rate", NumberFormat::Percentage, |m: &UnderwritingModel| {
                Some(m.exit_cap_rate)
            }),
        ];

        let mut row = write_field_section(&mut sheet, 2, "Property & Financing", model, &financing_fields);
        row = write_field_section(&mut sheet, row, "Income", model, &income_fields);
        row = write_field_section(&mut sheet, row, "Operating Expenses", model, &expense_fields);
        write_field_section(&mut sheet, row, "Growth & Exit", model, &growth_fields);

        sheet
    }

    fn cash_flows_sheet(&self, analysis: &DealAnalysis) -> Sheet {
        let years = &analysis.projection.years;

        let mut sheet = Sheet::new("Cash Flows");
        let mut widths = vec![30.0];
        widths.extend(std::iter::repeat(14.0).take(years.len()));
        sheet.column_widths = widths;
        sheet.freeze(2, 1);

        sheet.set(
            0,
            0,
            CellValue::Text("Cash Flow Projection".to_string()),
            NumberFormat::General,
            CellStyle::bold(),
        );
        for (i, year) in years.iter().enumerate() {
            sheet.set(
                1,
                i as u32 + 1,
                CellValue::Text(format!("Year {}", year.year)),
                NumberFormat::General,
                CellStyle::bold(),
            );
        }

        let revenue_fields = [
            FieldSpec::new("Gross Potential Rent", NumberFormat::Currency, |y: &YearProjection| {
                Some(y.gross_potential_rent)
            }),
            FieldSpec::new("Vacancy Loss", NumberFormat::Currency, |y: &YearProjection| {
                Some(y.vacancy_loss)
            })
            .negated(),
            FieldSpec::new("Other Income", NumberFormat::Currency, |y: &YearProjection| {
                Some(y.other_income)
            }),
            FieldSpec::new("Effective Gross Income", NumberFormat::Currency, |y: &YearProjection| {
                Some(y.effective_gross_income)
            })
            .total(),
        ];

        let granular_expense_fields = [
            FieldSpec::new("Taxes", NumberFormat::Currency, |y: &YearProjection| Some(y.taxes))
                .negated(),
            FieldSpec::new("Insurance", NumberFormat::Currency, |y: &YearProjection| {
                Some(y.insurance)
            })
            .negated(),
            FieldSpec::new("Management", NumberFormat::Currency, |y: &YearProjection| {
                Some(y.management)
            })
            .negated(),
            FieldSpec::new("Replacement Reserves", NumberFormat::Currency, |y: &YearProjection| {
                Some(y.replacement_reserves)
            })
            .negated(),
            FieldSpec::new("Total Operating Expenses", NumberFormat::Currency, |y: &YearProjection| {
                Some(y.total_expenses)
            })
            .negated()
            .total(),
        ];
        let total_expense_fields = [
            FieldSpec::new("Total Operating Expenses", NumberFormat::Currency, |y: &YearProjection| {
                Some(y.total_expenses)
            })
            .negated()
            .total(),
        ];

        let operations_fields = [
            FieldSpec::new("Net Operating Income", NumberFormat::Currency, |y: &YearProjection| {
                Some(y.net_operating_income)
            })
            .total(),
        ];

        let debt_fields = [
            FieldSpec::new("Interest", NumberFormat::Currency, |y: &YearProjection| {
                Some(y.interest)
            })
            .negated(),
            FieldSpec::new("Principal", NumberFormat::Currency, |y: &YearProjection| {
                Some(y.principal)
            })
            .negated(),
            FieldSpec::new("Total Debt Service", NumberFormat::Currency, |y: &YearProjection| {
                Some(y.total_debt_service)
            })
            .negated()
            .total(),
            FieldSpec::new("DSCR", NumberFormat::Ratio, |y: &YearProjection| y.dscr()),
        ];

        let summary_fields = [
            FieldSpec::new("Before-Tax Cash Flow", NumberFormat::Currency, |y: &YearProjection| {
                Some(y.before_tax_cash_flow)
            })
            .total()
            .signed(),
            FieldSpec::new("Ending Loan Balance", NumberFormat::Currency, |y: &YearProjection| {
                Some(y.ending_loan_balance)
            }),
        ];

        let expense_fields: &[FieldSpec<YearProjection>] = match self.options.template {
            ReportTemplate::Detailed => &granular_expense_fields,
            ReportTemplate::Standard => &total_expense_fields,
        };

        let mut row = write_year_section(&mut sheet, 3, "Revenue", years, &revenue_fields);
        row = write_year_section(&mut sheet, row, "Expenses", years, expense_fields);
        row = write_year_section(&mut sheet, row, "Operations", years, &operations_fields);
        row = write_year_section(&mut sheet, row, "Debt Service", years, &debt_fields);
        write_year_section(&mut sheet, row, "Cash Flow", years, &summary_fields);

        sheet
    }

    /// Waterfall tier table; `None` when no structure was supplied or
    /// the supplied data does not parse, leaving the rest of the report
    /// untouched
    fn waterfall_sheet(&self, model: &UnderwritingModel) -> Option<Sheet> {
        let spec = model.waterfall.as_ref()?;
        let tiers = match spec.tiers() {
            Ok(tiers) => tiers,
            Err(err) => {
                warn!("Skipping waterfall sheet, tier data failed to parse: {}", err);
                return None;
            }
        };

        let mut sheet = Sheet::new("Waterfall");
        sheet.column_widths = vec![12.0, 14.0, 12.0, 12.0];

        sheet.set(
            0,
            0,
            CellValue::Text("Distribution Waterfall".to_string()),
            NumberFormat::General,
            CellStyle::bold(),
        );
        for (col, header) in ["Tier", "Hurdle IRR", "LP Split", "GP Split"].iter().enumerate() {
            sheet.set(
                1,
                col as u32,
                CellValue::Text((*header).to_string()),
                NumberFormat::General,
                CellStyle::bold(),
            );
        }

        for (i, tier) in tiers.iter().enumerate() {
            let row = i as u32 + 2;
            sheet.set_text(row, 0, format!("Tier {}", i + 1));
            sheet.set_number(row, 1, tier.hurdle_irr, NumberFormat::Percentage, CellStyle::default());
            sheet.set_number(row, 2, tier.lp_split, NumberFormat::Percentage, CellStyle::default());
            sheet.set_number(row, 3, tier.gp_split, NumberFormat::Percentage, CellStyle::default());
        }

        Some(sheet)
    }

    fn sensitivity_sheet(&self, model: &UnderwritingModel, analysis: &DealAnalysis) -> Sheet {
        let matrix = estimate_sensitivity(model, analysis.returns.irr, self.options.sensitivity_method);

        let mut sheet = Sheet::new("Sensitivity");
        sheet.column_widths = vec![16.0; matrix.vacancy_values.len() + 1];
        sheet.freeze(2, 1);

        sheet.set(
            0,
            0,
            CellValue::Text("IRR Sensitivity".to_string()),
            NumberFormat::General,
            CellStyle::bold(),
        );
        sheet.set(
            1,
            0,
            CellValue::Text("Exit Cap / Vacancy".to_string()),
            NumberFormat::General,
            CellStyle::bold(),
        );
        for (j, vacancy) in matrix.vacancy_values.iter().enumerate() {
            sheet.set_number(1, j as u32 + 1, *vacancy, NumberFormat::Percentage, CellStyle::bold());
        }

        for (i, cap) in matrix.exit_cap_values.iter().enumerate() {
            let row = i as u32 + 2;
            sheet.set_number(row, 0, *cap, NumberFormat::Percentage, CellStyle::bold());
            for (j, cell) in matrix.cells[i].iter().enumerate() {
                let col = j as u32 + 1;
                match cell {
                    Some(irr) => sheet.set_number(
                        row,
                        col,
                        *irr,
                        NumberFormat::Percentage,
                        CellStyle::colored(irr_band(*irr)),
                    ),
                    None => sheet.set(row, col, CellValue::Blank, NumberFormat::Percentage, CellStyle::default()),
                }
            }
        }

        sheet
    }
}
