use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::filter::{integrand_series, select_window};
use crate::data::loader::{LoadOptions, load_file};
use crate::data::model::{RadiusWindow, RdfTable, ShellPoint};
use crate::density::NumberDensity;
use crate::error::AnalysisError;
use crate::integrate::{EvenPolicy, Method, integrate};

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Everything that determines a coordination number apart from the data.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub window: RadiusWindow,
    pub density: NumberDensity,
    pub method: Method,
    pub even: EvenPolicy,
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Output of one run, consumed by the renderers in [`crate::report`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoordinationReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    pub window: RadiusWindow,
    pub method: Method,
    pub even_policy: EvenPolicy,
    pub density: NumberDensity,
    /// Filtered (r, g(r)·4πr²) samples that were integrated.
    pub points: Vec<ShellPoint>,
    /// ∫ g(r)·4πr² dr over the window (Å³).
    pub integral: f64,
    pub coordination_number: f64,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Load `path` and compute its coordination number.
pub fn run_file(path: PathBuf, load: &LoadOptions, analysis: &Analysis) -> Result<CoordinationReport> {
    let table = load_file(&path, load).with_context(|| format!("loading {}", path.display()))?;
    if table.is_empty() {
        log::warn!("{} has no data rows", path.display());
    } else {
        log::info!("Loaded {} samples from {}", table.len(), path.display());
    }

    let report = coordinate(&table, analysis)?;
    Ok(CoordinationReport {
        source: Some(path),
        sheet: load.sheet.clone(),
        ..report
    })
}

/// Transform, window, integrate and scale an in-memory table.
pub fn coordinate(table: &RdfTable, analysis: &Analysis) -> Result<CoordinationReport, AnalysisError> {
    let series = integrand_series(table);
    let points = select_window(&series, &analysis.window);
    log::info!(
        "{} of {} samples inside r ∈ {}",
        points.len(),
        series.len(),
        analysis.window
    );

    if points.is_empty() {
        return Err(AnalysisError::EmptyWindow {
            r_min: analysis.window.r_min,
            r_max: analysis.window.r_max,
        });
    }

    let integral = integrate(&points, analysis.method, analysis.even)?;
    let coordination_number = analysis.density.scale(integral);
    log::info!("Shell integral {integral:.6} Å³");
    log::debug!(
        "Number density {:.6e} Å⁻³ → coordination number {coordination_number:.6}",
        analysis.density.per_cubic_angstrom
    );

    Ok(CoordinationReport {
        source: None,
        sheet: None,
        window: analysis.window,
        method: analysis.method,
        even_policy: analysis.even,
        density: analysis.density,
        points,
        integral,
        coordination_number,
    })
}
