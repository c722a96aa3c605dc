//! End-to-end deal analysis and report generation

use crate::error::UnderwritingError;
use crate::model::UnderwritingModel;
use crate::projection::{
    calculate_returns, project_cash_flows, value_exit, ExitSummary, Projection, ReturnsSummary,
};
use crate::report::{ReportBuilder, ReportOptions};

/// Computed results for one deal, in pipeline order
#[derive(Debug, Clone)]
pub struct DealAnalysis {
    pub projection: Projection,
    pub exit: ExitSummary,
    pub returns: ReturnsSummary,
}

impl DealAnalysis {
    /// Project cash flows, value the exit, and compute returns for one
    /// model snapshot
    pub fn run(model: &UnderwritingModel) -> Result<Self, UnderwritingError> {
        let projection = project_cash_flows(model);
        let exit = value_exit(model, &projection)?;
        let returns = calculate_returns(model, &projection, &exit)?;
        Ok(Self { projection, exit, returns })
    }
}

/// Analyze a model and serialize the assembled report into a buffer
pub fn generate_report(
    model: &UnderwritingModel,
    options: &ReportOptions,
) -> Result<Vec<u8>, UnderwritingError> {
    let analysis = DealAnalysis::run(model)?;
    let document = ReportBuilder::new(*options).build(model, &analysis);
    document.to_bytes()
}
