//! Export a full underwriting report for one deal
//!
//! Reads the model from a JSON file, optionally merges a rent roll CSV,
//! writes the report buffer to disk, and prints a JSON summary of the
//! headline metrics to stdout.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use underwriting_system::{
    analysis::DealAnalysis,
    model::{load_rent_roll, UnderwritingModel},
    projection::SensitivityMethod,
    report::{ReportBuilder, ReportOptions, ReportTemplate},
};

#[derive(Parser)]
#[command(name = "export_report", about = "Generate an underwriting report for one deal")]
struct Cli {
    /// Path to the underwriting model JSON
    #[arg(long)]
    model: PathBuf,

    /// Rent roll CSV; overrides gross potential rent and unit count
    #[arg(long)]
    rent_roll: Option<PathBuf>,

    /// Output path for the report buffer
    #[arg(long, default_value = "underwriting_report.json")]
    output: PathBuf,

    /// Leave out the sensitivity sheet
    #[arg(long)]
    skip_sensitivity: bool,

    /// Leave out the waterfall sheet
    #[arg(long)]
    skip_waterfall: bool,

    /// Sheet layout
    #[arg(long, value_enum, default_value_t = TemplateArg::Standard)]
    template: TemplateArg,

    /// Re-run the full pipeline per sensitivity cell instead of the
    /// linear estimate
    #[arg(long)]
    exact_sensitivity: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TemplateArg {
    Standard,
    Detailed,
}

impl From<TemplateArg> for ReportTemplate {
    fn from(arg: TemplateArg) -> Self {
        match arg {
            TemplateArg::Standard => ReportTemplate::Standard,
            TemplateArg::Detailed => ReportTemplate::Detailed,
        }
    }
}

#[derive(Serialize)]
struct ExportSummary {
    property_name: String,
    equity_invested: f64,
    equity_multiple: f64,
    irr: Option<f64>,
    net_sale_proceeds: f64,
    sheets: usize,
    output: String,
    bytes_written: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let raw = fs::read_to_string(&cli.model)
        .with_context(|| format!("reading model file {}", cli.model.display()))?;
    let mut model: UnderwritingModel =
        serde_json::from_str(&raw).context("parsing underwriting model JSON")?;
    info!(
        "Underwriting {} over a {}-year hold",
        model.property_name, model.hold_period_years
    );

    if let Some(ref path) = cli.rent_roll {
        let roll = load_rent_roll(path)
            .map_err(|e| anyhow::anyhow!("loading rent roll {}: {}", path.display(), e))?;
        info!(
            "Rent roll {}: {} units, {:.2} annual gross rent",
            path.display(),
            roll.unit_count(),
            roll.annual_gross_rent()
        );
        roll.apply_to(&mut model);
    }

    let options = ReportOptions {
        include_formulas: false,
        include_sensitivity: !cli.skip_sensitivity,
        include_waterfall: !cli.skip_waterfall,
        template: cli.template.into(),
        sensitivity_method: if cli.exact_sensitivity {
            SensitivityMethod::FullRecompute
        } else {
            SensitivityMethod::LinearDelta
        },
    };

    let analysis = DealAnalysis::run(&model)?;
    let document = ReportBuilder::new(options).build(&model, &analysis);
    let buffer = document.to_bytes()?;
    fs::write(&cli.output, &buffer)
        .with_context(|| format!("writing report to {}", cli.output.display()))?;
    info!(
        "Report written to {} ({} bytes)",
        cli.output.display(),
        buffer.len()
    );

    let summary = ExportSummary {
        property_name: model.property_name.clone(),
        equity_invested: analysis.returns.equity_invested,
        equity_multiple: analysis.returns.equity_multiple,
        irr: analysis.returns.irr,
        net_sale_proceeds: analysis.exit.net_sale_proceeds,
        sheets: document.sheets.len(),
        output: cli.output.display().to_string(),
        bytes_written: buffer.len(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
