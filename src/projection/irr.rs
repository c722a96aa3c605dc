//! Internal Rate of Return (IRR) calculation
//!
//! Solves for the levered return on the annual investor cash-flow vector

use log::debug;

/// Rate estimates outside this open range terminate the search
const RATE_LOWER_BOUND: f64 = -0.99;
const RATE_UPPER_BOUND: f64 = 10.0;

/// Convergence tolerance on the rate step between iterations
const RATE_TOLERANCE: f64 = 1e-4;

const MAX_ITERATIONS: u32 = 100;

/// Calculate the IRR of an annual cash-flow series using Newton-Raphson.
///
/// `cashflows[t]` is the flow at the end of year t; index 0 is the
/// initial outlay. Returns the annual rate, or `None` when the search
/// has no answer: no sign change, a flat derivative, an estimate
/// escaping (-0.99, 10), or no convergence within 100 iterations. The
/// undetermined outcome is deliberate and is never replaced with a
/// default rate.
pub fn calculate_irr(cashflows: &[f64]) -> Option<f64> {
    if cashflows.is_empty() {
        return None;
    }

    // A root requires at least one sign change
    let has_positive = cashflows.iter().any(|&cf| cf > 1e-10);
    let has_negative = cashflows.iter().any(|&cf| cf < -1e-10);
    if !has_positive || !has_negative {
        return None;
    }

    let mut rate = 0.10;

    for iteration in 0..MAX_ITERATIONS {
        let (npv, dnpv) = npv_and_derivative(cashflows, rate);

        if dnpv.abs() < 1e-20 {
            debug!("IRR search stalled on flat derivative at iteration {}", iteration);
            return None;
        }

        let new_rate = rate - npv / dnpv;

        if new_rate <= RATE_LOWER_BOUND || new_rate >= RATE_UPPER_BOUND {
            debug!(
                "IRR estimate {} left the bounded range at iteration {}",
                new_rate, iteration
            );
            return None;
        }

        if (new_rate - rate).abs() < RATE_TOLERANCE {
            return Some(new_rate);
        }

        rate = new_rate;
    }

    debug!("IRR search did not converge within {} iterations", MAX_ITERATIONS);
    None
}

/// Calculate NPV and its derivative with respect to rate
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        let discount = (1.0 + rate).powi(t as i32);
        npv += cf / discount;
        if t > 0 {
            dnpv -= (t as f64) * cf / (1.0 + rate).powi(t as i32 + 1);
        }
    }

    (npv, dnpv)
}
