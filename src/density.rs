//! Bulk number density of the solvent and the final scaling step.

use serde::Serialize;

use crate::error::AnalysisError;

/// Avogadro's number (mol⁻¹).
pub const AVOGADRO: f64 = 6.022e23;

/// g/cm³ → g/Å³.
pub const CM3_TO_A3: f64 = 1e-24;

/// Solvents with tabulated bulk properties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Solvent {
    #[default]
    Methanol,
    Water,
    Ethanol,
    Acetonitrile,
}

impl Solvent {
    /// (mass density in g/cm³, molar mass in g/mol) at room temperature.
    pub fn properties(self) -> (f64, f64) {
        match self {
            Solvent::Methanol => (0.794, 32.0),
            Solvent::Water => (0.997, 18.015),
            Solvent::Ethanol => (0.789, 46.07),
            Solvent::Acetonitrile => (0.786, 41.05),
        }
    }
}

/// Bulk number density derived from mass density and molar mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumberDensity {
    /// g/cm³
    pub mass_density: f64,
    /// g/mol
    pub molar_mass: f64,
    /// molecules/Å³
    pub per_cubic_angstrom: f64,
}

impl NumberDensity {
    pub fn new(mass_density: f64, molar_mass: f64) -> Result<Self, AnalysisError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(mass_density) || !valid(molar_mass) {
            return Err(AnalysisError::InvalidDensity {
                density: mass_density,
                molar_mass,
            });
        }
        Ok(NumberDensity {
            mass_density,
            molar_mass,
            per_cubic_angstrom: mass_density * CM3_TO_A3 * AVOGADRO / molar_mass,
        })
    }

    pub fn of(solvent: Solvent) -> Self {
        let (rho, mm) = solvent.properties();
        // Tabulated values are positive.
        NumberDensity {
            mass_density: rho,
            molar_mass: mm,
            per_cubic_angstrom: rho * CM3_TO_A3 * AVOGADRO / mm,
        }
    }

    /// Coordination number from the shell integral ∫ g(r)·4πr² dr.
    pub fn scale(&self, integral: f64) -> f64 {
        integral * self.per_cubic_angstrom
    }
}
