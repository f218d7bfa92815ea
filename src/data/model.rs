use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// RdfTable – the loaded (r, g(r)) samples
// ---------------------------------------------------------------------------

/// Tabulated radial distribution function in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RdfTable {
    /// Distances (Å).
    pub r: Vec<f64>,
    /// g(r) – same length as `r`.
    pub g: Vec<f64>,
}

impl RdfTable {
    /// Build a table from two equally long columns.
    ///
    /// Returns `None` if the column lengths differ.
    pub fn new(r: Vec<f64>, g: Vec<f64>) -> Option<Self> {
        (r.len() == g.len()).then_some(RdfTable { r, g })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.r.len()
    }

    /// Whether the table has no samples.
    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }

    pub fn push(&mut self, r: f64, g: f64) {
        self.r.push(r);
        self.g.push(g);
    }
}

// ---------------------------------------------------------------------------
// ShellPoint – one row of the integrand series
// ---------------------------------------------------------------------------

/// A sample of the shell-weighted integrand g(r)·4πr².
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShellPoint {
    pub r: f64,
    pub integrand: f64,
}

// ---------------------------------------------------------------------------
// RadiusWindow – integration bounds
// ---------------------------------------------------------------------------

/// Closed interval `[r_min, r_max]`.
///
/// An inverted window (`r_min > r_max`) is allowed and contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadiusWindow {
    pub r_min: f64,
    pub r_max: f64,
}

impl RadiusWindow {
    pub fn new(r_min: f64, r_max: f64) -> Self {
        RadiusWindow { r_min, r_max }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, r: f64) -> bool {
        r >= self.r_min && r <= self.r_max
    }
}

impl fmt::Display for RadiusWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.r_min, self.r_max)
    }
}
