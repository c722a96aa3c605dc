//! IRR sensitivity over exit cap rate and vacancy

use super::engine::project_cash_flows;
use super::exit::value_exit;
use super::returns::calculate_returns;
use crate::model::UnderwritingModel;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Change in IRR per unit change in exit cap rate
pub const EXIT_CAP_WEIGHT: f64 = -8.0;

/// Change in IRR per unit change in vacancy rate
pub const VACANCY_WEIGHT: f64 = -3.0;

/// Axis offsets around the baseline exit cap rate (50bp steps)
pub const EXIT_CAP_OFFSETS: [f64; 5] = [-0.010, -0.005, 0.0, 0.005, 0.010];

/// Axis offsets around the baseline vacancy rate (1pt steps)
pub const VACANCY_OFFSETS: [f64; 5] = [-0.02, -0.01, 0.0, 0.01, 0.02];

/// How the matrix cells are produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensitivityMethod {
    /// First-order moves around the baseline IRR using fixed per-axis
    /// weights, with a single solve for the whole grid
    #[default]
    LinearDelta,
    /// Full pipeline re-run per cell on a cloned model snapshot
    FullRecompute,
}

/// Estimated IRR grid over the two axes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityMatrix {
    /// Exit cap rate per row
    pub exit_cap_values: Vec<f64>,

    /// Vacancy rate per column
    pub vacancy_values: Vec<f64>,

    /// cells[row][col]; `None` where no estimate exists
    pub cells: Vec<Vec<Option<f64>>>,

    pub method: SensitivityMethod,
}

/// Build the sensitivity matrix around the model's baseline
/// assumptions. The center cell sits at the baseline axes, so under
/// the linear method it reproduces the baseline IRR exactly.
pub fn estimate_sensitivity(
    model: &UnderwritingModel,
    baseline_irr: Option<f64>,
    method: SensitivityMethod,
) -> SensitivityMatrix {
    let exit_cap_values: Vec<f64> = EXIT_CAP_OFFSETS
        .iter()
        .map(|o| model.exit_cap_rate + o)
        .collect();
    let vacancy_values: Vec<f64> = VACANCY_OFFSETS
        .iter()
        .map(|o| model.vacancy_rate + o)
        .collect();

    let cells = match method {
        SensitivityMethod::LinearDelta => linear_cells(model, baseline_irr, &exit_cap_values, &vacancy_values),
        SensitivityMethod::FullRecompute => recomputed_cells(model, &exit_cap_values, &vacancy_values),
    };

    SensitivityMatrix {
        exit_cap_values,
        vacancy_values,
        cells,
        method,
    }
}

fn linear_cells(
    model: &UnderwritingModel,
    baseline_irr: Option<f64>,
    exit_cap_values: &[f64],
    vacancy_values: &[f64],
) -> Vec<Vec<Option<f64>>> {
    exit_cap_values
        .iter()
        .map(|&cap| {
            vacancy_values
                .iter()
                .map(|&vacancy| {
                    baseline_irr.map(|irr| {
                        irr + (cap - model.exit_cap_rate) * EXIT_CAP_WEIGHT
                            + (vacancy - model.vacancy_rate) * VACANCY_WEIGHT
                    })
                })
                .collect()
        })
        .collect()
}

fn recomputed_cells(
    model: &UnderwritingModel,
    exit_cap_values: &[f64],
    vacancy_values: &[f64],
) -> Vec<Vec<Option<f64>>> {
    // Each cell owns its snapshot, so rows fan out freely
    exit_cap_values
        .par_iter()
        .map(|&cap| {
            vacancy_values
                .iter()
                .map(|&vacancy| recompute_cell(model, cap, vacancy))
                .collect()
        })
        .collect()
}

fn recompute_cell(model: &UnderwritingModel, exit_cap_rate: f64, vacancy_rate: f64) -> Option<f64> {
    let mut variant = model.clone();
    variant.exit_cap_rate = exit_cap_rate;
    variant.vacancy_rate = vacancy_rate;

    let projection = project_cash_flows(&variant);
    let exit = value_exit(&variant, &projection).ok()?;
    let returns = calculate_returns(&variant, &projection, &exit).ok()?;
    returns.irr
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_model() -> UnderwritingModel {
        let mut model =
            UnderwritingModel::new("Maple Court", 10_000_000.0, 6_500_000.0, 0.065, 900_000.0);
        model.operating_expense = 250_000.0;
        model
    }

    #[test]
    fn test_center_cell_equals_baseline_exactly() {
        let matrix = estimate_sensitivity(&test_model(), Some(0.145), SensitivityMethod::LinearDelta);
        assert_eq!(matrix.cells[2][2], Some(0.145));
    }

    #[test]
    fn test_matrix_dimensions_and_axes() {
        let model = test_model();
        let matrix = estimate_sensitivity(&model, Some(0.12), SensitivityMethod::LinearDelta);
        assert_eq!(matrix.cells.len(), 5);
        assert!(matrix.cells.iter().all(|row| row.len() == 5));
        assert!((matrix.exit_cap_values[2] - model.exit_cap_rate).abs() < 1e-12);
        assert!((matrix.vacancy_values[2] - model.vacancy_rate).abs() < 1e-12);
        assert!((matrix.exit_cap_values[0] - (model.exit_cap_rate - 0.010)).abs() < 1e-12);
        assert!((matrix.vacancy_values[4] - (model.vacancy_rate + 0.02)).abs() < 1e-12);
    }

    #[test]
    fn test_linear_weights_applied() {
        let matrix = estimate_sensitivity(&test_model(), Some(0.145), SensitivityMethod::LinearDelta);

        // +50bp exit cap: 0.145 + 0.005 * -8
        let tighter_cap = matrix.cells[3][2].unwrap();
        assert!((tighter_cap - 0.105).abs() < 1e-9);

        // +1pt vacancy: 0.145 + 0.01 * -3
        let softer_occupancy = matrix.cells[2][3].unwrap();
        assert!((softer_occupancy - 0.115).abs() < 1e-9);

        // Both axes move together
        let corner = matrix.cells[0][0].unwrap();
        assert!((corner - (0.145 + 0.010 * 8.0 + 0.02 * 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_undetermined_baseline_yields_empty_estimates() {
        let matrix = estimate_sensitivity(&test_model(), None, SensitivityMethod::LinearDelta);
        assert!(matrix.cells.iter().flatten().all(|cell| cell.is_none()));
    }

    #[test]
    fn test_full_recompute_center_matches_pipeline() {
        let model = test_model();
        let projection = project_cash_flows(&model);
        let exit = value_exit(&model, &projection).unwrap();
        let baseline = calculate_returns(&model, &projection, &exit).unwrap();

        let matrix = estimate_sensitivity(&model, baseline.irr, SensitivityMethod::FullRecompute);
        assert_eq!(matrix.method, SensitivityMethod::FullRecompute);
        assert_eq!(matrix.cells[2][2], baseline.irr);
    }

    #[test]
    fn test_full_recompute_marks_impossible_cells() {
        let mut model = test_model();
        // Baseline cap so low the -100bp cell goes non-positive
        model.exit_cap_rate = 0.005;
        let matrix = estimate_sensitivity(&model, None, SensitivityMethod::FullRecompute);
        assert!(matrix.cells[0][2].is_none());
        // Cells with a valid cap still estimate
        assert!(matrix.cells[4][2].is_some());
    }
}
