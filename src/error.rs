use thiserror::Error;

/// Failure modes of the coordination-number pipeline.
///
/// Loader functions wrap these in `anyhow::Error` (with I/O context attached);
/// the numeric stages return them directly.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("sheet '{sheet}' not found (available: {})", available.join(", "))]
    SheetNotFound { sheet: String, available: Vec<String> },

    #[error("workbook contains no sheets")]
    EmptySheet,

    #[error("row {row}: column {column} is missing")]
    MissingColumn { column: usize, row: usize },

    #[error("row {row}, column {column}: '{value}' is not a number")]
    NonNumericCell {
        row: usize,
        column: usize,
        value: String,
    },

    #[error("no samples inside the window [{r_min}, {r_max}]")]
    EmptyWindow { r_min: f64, r_max: f64 },

    #[error("need at least {needed} points to integrate, found {found}")]
    TooFewPoints { needed: usize, found: usize },

    #[error("r is not strictly increasing at index {index} ({previous} -> {current})")]
    NonIncreasingRadius {
        index: usize,
        previous: f64,
        current: f64,
    },

    #[error("non-finite value at index {index}")]
    NonFiniteValue { index: usize },

    #[error("strict Simpson rule needs an odd number of points, found {found}")]
    OddPointCountRequired { found: usize },

    #[error("density and molar mass must be positive and finite (got {density} g/cm³, {molar_mass} g/mol)")]
    InvalidDensity { density: f64, molar_mass: f64 },
}
