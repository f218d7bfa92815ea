//! Composite quadrature over sampled, possibly unevenly spaced data.
//!
//! Simpson's rule is applied to consecutive interval pairs using the
//! three-point parabola through each pair, so the spacing need not be
//! uniform. When the sample count is even one interval is left over; how it
//! is handled is chosen by [`EvenPolicy`].

use serde::Serialize;

use crate::data::model::ShellPoint;
use crate::error::AnalysisError;

/// Quadrature rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    #[default]
    Simpson,
    Trapezoid,
}

/// Treatment of the leftover interval when Simpson's rule gets an even
/// number of points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EvenPolicy {
    /// Simpson on the first N−1 points, parabolic correction for the last interval.
    #[default]
    Simpson,
    /// Mean of `First` and `Last`.
    Avg,
    /// Simpson on the first N−1 points, trapezoid on the last interval.
    First,
    /// Trapezoid on the first interval, Simpson on the last N−1 points.
    Last,
    /// Refuse even point counts.
    Strict,
}

/// Integrate the shell integrand over r.
pub fn integrate(
    points: &[ShellPoint],
    method: Method,
    even: EvenPolicy,
) -> Result<f64, AnalysisError> {
    let x: Vec<f64> = points.iter().map(|p| p.r).collect();
    let y: Vec<f64> = points.iter().map(|p| p.integrand).collect();
    match method {
        Method::Simpson => simpson(&x, &y, even),
        Method::Trapezoid => trapezoid(&x, &y),
    }
}

/// Composite Simpson's rule for samples `y` at strictly increasing `x`.
pub fn simpson(x: &[f64], y: &[f64], even: EvenPolicy) -> Result<f64, AnalysisError> {
    validate(x, y)?;
    let n = x.len();

    if n % 2 == 1 {
        return Ok(basic_simpson(x, y));
    }
    if even == EvenPolicy::Strict {
        return Err(AnalysisError::OddPointCountRequired { found: n });
    }
    if n == 2 {
        return Ok(trapezoid_unchecked(x, y));
    }

    log::warn!("{n} points inside the window; closing the odd interval with the '{even:?}' rule");

    let head = |x: &[f64], y: &[f64]| {
        basic_simpson(&x[..n - 1], &y[..n - 1]) + trapezoid_unchecked(&x[n - 2..], &y[n - 2..])
    };
    let tail = |x: &[f64], y: &[f64]| {
        trapezoid_unchecked(&x[..2], &y[..2]) + basic_simpson(&x[1..], &y[1..])
    };

    Ok(match even {
        EvenPolicy::Simpson => basic_simpson(&x[..n - 1], &y[..n - 1]) + end_correction(x, y),
        EvenPolicy::First => head(x, y),
        EvenPolicy::Last => tail(x, y),
        EvenPolicy::Avg => 0.5 * (head(x, y) + tail(x, y)),
        EvenPolicy::Strict => return Err(AnalysisError::OddPointCountRequired { found: n }),
    })
}

/// Composite trapezoid rule.
pub fn trapezoid(x: &[f64], y: &[f64]) -> Result<f64, AnalysisError> {
    validate(x, y)?;
    Ok(trapezoid_unchecked(x, y))
}

fn validate(x: &[f64], y: &[f64]) -> Result<(), AnalysisError> {
    debug_assert_eq!(x.len(), y.len());
    if x.len() < 2 {
        return Err(AnalysisError::TooFewPoints {
            needed: 2,
            found: x.len(),
        });
    }
    if let Some(index) = x
        .iter()
        .zip(y)
        .position(|(a, b)| !a.is_finite() || !b.is_finite())
    {
        return Err(AnalysisError::NonFiniteValue { index });
    }
    if let Some(i) = x.windows(2).position(|w| w[1] <= w[0]) {
        return Err(AnalysisError::NonIncreasingRadius {
            index: i + 1,
            previous: x[i],
            current: x[i + 1],
        });
    }
    Ok(())
}

/// Simpson over an odd number of points.
fn basic_simpson(x: &[f64], y: &[f64]) -> f64 {
    debug_assert!(x.len() % 2 == 1);
    (0..x.len().saturating_sub(2))
        .step_by(2)
        .map(|i| {
            let h0 = x[i + 1] - x[i];
            let h1 = x[i + 2] - x[i + 1];
            let hsum = h0 + h1;
            hsum / 6.0
                * (y[i] * (2.0 - h1 / h0)
                    + y[i + 1] * hsum * hsum / (h0 * h1)
                    + y[i + 2] * (2.0 - h0 / h1))
        })
        .sum()
}

/// Integral over the last interval of the parabola through the last three
/// points.
fn end_correction(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    let h_prev = x[n - 2] - x[n - 3];
    let h_last = x[n - 1] - x[n - 2];

    let alpha = (2.0 * h_last * h_last + 3.0 * h_last * h_prev) / (6.0 * (h_prev + h_last));
    let beta = (h_last * h_last + 3.0 * h_last * h_prev) / (6.0 * h_prev);
    let eta = h_last.powi(3) / (6.0 * h_prev * (h_prev + h_last));

    alpha * y[n - 1] + beta * y[n - 2] - eta * y[n - 3]
}

fn trapezoid_unchecked(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xw, yw)| 0.5 * (yw[0] + yw[1]) * (xw[1] - xw[0]))
        .sum()
}
