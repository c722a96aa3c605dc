//! AWS Lambda handler for underwriting deals over HTTP
//!
//! Accepts one model or a batch via JSON and returns headline return
//! metrics plus the assembled report document for each deal.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use underwriting_system::{
    analysis::DealAnalysis,
    model::UnderwritingModel,
    report::{ReportBuilder, ReportDocument, ReportOptions},
};

/// Input for one invocation
#[derive(Debug, Deserialize)]
pub struct UnderwritingRequest {
    /// Single deal to underwrite
    #[serde(default)]
    pub model: Option<UnderwritingModel>,

    /// Batch of deals, underwritten in parallel
    #[serde(default)]
    pub models: Option<Vec<UnderwritingModel>>,

    /// Report options applied to every deal
    #[serde(default)]
    pub options: Option<ReportOptions>,
}

/// Output for one invocation
#[derive(Debug, Serialize)]
pub struct UnderwritingResponse {
    pub deals: Vec<DealResult>,
    pub deal_count: usize,
    pub execution_time_ms: u64,
}

/// Headline metrics and report for one deal
#[derive(Debug, Serialize)]
pub struct DealResult {
    pub property_name: String,
    pub equity_invested: f64,
    pub total_cash_distributed: f64,
    pub equity_multiple: f64,
    pub irr: Option<f64>,
    pub net_sale_proceeds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn underwrite(model: &UnderwritingModel, options: &ReportOptions) -> DealResult {
    match DealAnalysis::run(model) {
        Ok(analysis) => {
            let document = ReportBuilder::new(*options).build(model, &analysis);
            DealResult {
                property_name: model.property_name.clone(),
                equity_invested: analysis.returns.equity_invested,
                total_cash_distributed: analysis.returns.total_cash_distributed,
                equity_multiple: analysis.returns.equity_multiple,
                irr: analysis.returns.irr,
                net_sale_proceeds: analysis.exit.net_sale_proceeds,
                report: Some(document),
                error: None,
            }
        }
        Err(e) => DealResult {
            property_name: model.property_name.clone(),
            equity_invested: 0.0,
            total_cash_distributed: 0.0,
            equity_multiple: 0.0,
            irr: None,
            net_sale_proceeds: 0.0,
            report: None,
            error: Some(e.to_string()),
        },
    }
}

fn error_response(status: u16, message: &str) -> Response<Body> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::Text(format!(r#"{{"error":"{}"}}"#, message)))
        .unwrap()
}

fn json_response(body: &UnderwritingResponse) -> Response<Body> {
    Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Body::Text(serde_json::to_string(body).unwrap()))
        .unwrap()
}

/// Lambda handler function
async fn handler(event: Request) -> Result<Response<Body>, Error> {
    let start = std::time::Instant::now();

    // Handle CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return Ok(Response::builder()
            .status(200)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "POST, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(Body::Empty)
            .unwrap());
    }

    // Parse request body
    let body = event.body();
    let body_str = match body {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    };

    let request: UnderwritingRequest = match serde_json::from_str(&body_str) {
        Ok(r) => r,
        Err(e) => {
            return Ok(error_response(400, &format!("Invalid JSON: {}", e)));
        }
    };

    let models = match (request.models, request.model) {
        (Some(batch), _) => batch,
        (None, Some(single)) => vec![single],
        (None, None) => {
            return Ok(error_response(400, "Provide either \"model\" or \"models\""));
        }
    };

    let options = request.options.unwrap_or_default();

    // Underwrite deals in parallel
    let deals: Vec<DealResult> = models
        .par_iter()
        .map(|model| underwrite(model, &options))
        .collect();

    let response = UnderwritingResponse {
        deal_count: deals.len(),
        deals,
        execution_time_ms: start.elapsed().as_millis() as u64,
    };

    Ok(json_response(&response))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
