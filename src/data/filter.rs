use std::f64::consts::PI;

use super::model::{RadiusWindow, RdfTable, ShellPoint};

// ---------------------------------------------------------------------------
// Integrand transform
// ---------------------------------------------------------------------------

/// Weight g(r) by the area of the spherical shell at r: g(r)·4πr².
pub fn shell_integrand(r: f64, g: f64) -> f64 {
    g * 4.0 * PI * r * r
}

/// Integrand series over the whole table, same length and order.
pub fn integrand_series(table: &RdfTable) -> Vec<ShellPoint> {
    table
        .r
        .iter()
        .zip(&table.g)
        .map(|(&r, &g)| ShellPoint {
            r,
            integrand: shell_integrand(r, g),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Window filter
// ---------------------------------------------------------------------------

/// Keep the points with `r_min ≤ r ≤ r_max`, preserving order.
///
/// An inverted window yields an empty vector; deciding whether that is an
/// error is left to the integrator.
pub fn select_window(points: &[ShellPoint], window: &RadiusWindow) -> Vec<ShellPoint> {
    points
        .iter()
        .filter(|p| window.contains(p.r))
        .copied()
        .collect()
}
