//! Underwriting System CLI
//!
//! Command-line demo that underwrites a sample acquisition

use std::fs::File;
use std::io::Write;
use underwriting_system::{
    analysis::{generate_report, DealAnalysis},
    model::UnderwritingModel,
    report::ReportOptions,
};

fn main() {
    env_logger::init();

    println!("Underwriting System v0.1.0");
    println!("==========================\n");

    // Sample deal - 96-unit garden community at 65% LTV
    let mut model = UnderwritingModel::new(
        "Maple Court Apartments",
        10_000_000.0, // purchase price
        6_500_000.0,  // loan amount
        0.065,        // interest rate
        900_000.0,    // gross potential rent
    );
    model.unit_count = 96;
    model.other_income = 45_000.0;
    model.taxes = 120_000.0;
    model.insurance = 35_000.0;
    model.management = 60_000.0;
    model.replacement_reserves = 35_000.0;
    model.interest_only_years = 1;

    println!("Property: {}", model.property_name);
    println!("  Units: {}", model.unit_count);
    println!("  Purchase Price: ${:.0}", model.purchase_price);
    println!("  Loan Amount: ${:.0}", model.loan_amount);
    println!("  Equity: ${:.0}", model.equity());
    println!();

    let analysis = match DealAnalysis::run(&model) {
        Ok(analysis) => analysis,
        Err(err) => {
            eprintln!("Analysis failed: {}", err);
            std::process::exit(1);
        }
    };

    // Print the annual projection
    println!("Cash Flow Projection ({} operating years):", model.hold_period_years);
    println!(
        "{:>4} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14}",
        "Year", "EGI", "Expenses", "NOI", "Debt Svc", "BTCF", "Balance"
    );
    println!("{}", "-".repeat(94));
    for row in &analysis.projection.years {
        println!(
            "{:>4} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>14.2}",
            row.year,
            row.effective_gross_income,
            row.total_expenses,
            row.net_operating_income,
            row.total_debt_service,
            row.before_tax_cash_flow,
            row.ending_loan_balance,
        );
    }

    let summary = analysis.projection.summary();
    println!("\nProjection Summary:");
    println!("  Total NOI: ${:.2}", summary.total_noi);
    println!("  Total Debt Service: ${:.2}", summary.total_debt_service);
    println!("  Total BTCF: ${:.2}", summary.total_cash_flow);

    println!("\nExit (year {}):", model.hold_period_years);
    println!("  Exit NOI: ${:.2}", analysis.exit.exit_noi);
    println!("  Gross Sale Price: ${:.2}", analysis.exit.gross_sale_price);
    println!("  Selling Costs: ${:.2}", analysis.exit.selling_costs);
    println!("  Loan Payoff: ${:.2}", analysis.exit.loan_payoff);
    println!("  Net Sale Proceeds: ${:.2}", analysis.exit.net_sale_proceeds);

    println!("\nReturns:");
    println!("  Equity Invested: ${:.2}", analysis.returns.equity_invested);
    println!("  Total Cash Distributed: ${:.2}", analysis.returns.total_cash_distributed);
    println!("  Equity Multiple: {:.2}x", analysis.returns.equity_multiple);
    match analysis.returns.irr {
        Some(irr) => println!("  Levered IRR: {:.2}%", irr * 100.0),
        None => println!("  Levered IRR: n/a"),
    }

    // Write the annual rows to CSV for spreadsheet comparison
    let csv_path = "projection_output.csv";
    let mut file = File::create(csv_path).expect("Unable to create CSV file");
    writeln!(
        file,
        "Year,GPR,VacancyLoss,OtherIncome,EGI,Expenses,NOI,Interest,Principal,DebtService,BTCF,EndingBalance"
    )
    .unwrap();
    for row in &analysis.projection.years {
        writeln!(
            file,
            "{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
            row.year,
            row.gross_potential_rent,
            row.vacancy_loss,
            row.other_income,
            row.effective_gross_income,
            row.total_expenses,
            row.net_operating_income,
            row.interest,
            row.principal,
            row.total_debt_service,
            row.before_tax_cash_flow,
            row.ending_loan_balance,
        )
        .unwrap();
    }
    println!("\nProjection rows written to: {}", csv_path);

    // Write the assembled report buffer
    let report_path = "underwriting_report.json";
    let buffer =
        generate_report(&model, &ReportOptions::default()).expect("report generation failed");
    std::fs::write(report_path, &buffer).expect("Unable to write report");
    println!("Report written to: {} ({} bytes)", report_path, buffer.len());
}
