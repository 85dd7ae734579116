//! Error taxonomy of the crate.
//!
//! Every failure is a distinct named condition. Conditions that are *not* failures
//! (unknown species thermo, under-determined balancing) are reported through
//! [`Advisory`] next to the result instead.
use std::fmt;
use thiserror::Error;

pub type RedoxResult<T> = Result<T, RedoxError>;

/// error types of parsing, balancing, thermodynamics and diagram calculations
#[derive(Debug, Error)]
pub enum RedoxError {
    #[error("Malformed reaction: no reaction arrow found in '{0}'")]
    MalformedReaction(String),
    #[error("Empty side: the {side} side of '{equation}' contains no species")]
    EmptySide { side: &'static str, equation: String },
    #[error("Duplicate species '{0}' in one side of the reaction")]
    DuplicateSpecies(String),
    #[error("Species present on both sides of the reaction: {0:?}")]
    SpeciesOnBothSides(Vec<String>),
    #[error("No balance solution: {0}")]
    NoBalanceSolution(String),
    #[error("Invalid temperature: {0} K (must be finite and > 0)")]
    InvalidTemperature(f64),
    #[error("Phase list is empty")]
    NoPhases,
    #[error("Invalid grid resolution {n_ph}x{n_e}: both axes need more than one point")]
    InvalidGridResolution { n_ph: usize, n_e: usize },
    #[error("Invalid grid bounds for {axis}: [{min}, {max}]")]
    InvalidGridBounds { axis: &'static str, min: f64, max: f64 },
    #[error("Invalid formula '{formula}': {reason}")]
    InvalidFormula { formula: String, reason: String },
    #[error("Invalid phase '{name}': {reason}")]
    InvalidPhase { name: String, reason: String },
    #[error("No electron transfer: {0}")]
    NoElectronTransfer(String),
    #[error("Invalid thermodynamic input: {quantity} = {value} (must be finite)")]
    InvalidThermoInput { quantity: &'static str, value: f64 },
    #[error("Missing thermodynamic data for {0:?}")]
    MissingThermoData(Vec<String>),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Load error: {0}")]
    Load(String),
}

/// Non-fatal conditions the caller should show as warnings
#[derive(Debug, Clone, PartialEq)]
pub enum Advisory {
    /// null space of the balance matrix has more than one dimension; the free parameters
    /// were fixed (all 1 when that gives a valid balance), so the coefficients are one
    /// solution among many
    Underdetermined { free_parameters: usize },
    /// no (H, S) record for the species, it was counted as (0, 0)
    MissingThermo { species: String },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::Underdetermined { free_parameters } => write!(
                f,
                "reaction is a combination of {} independent reactions; the coefficients are one solution among many",
                free_parameters
            ),
            Advisory::MissingThermo { species } => {
                write!(f, "no thermodynamic data for {}, counted as zero", species)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = RedoxError::SpeciesOnBothSides(vec!["H2O".to_string()]);
        assert!(err.to_string().contains("H2O"));
        let err = RedoxError::InvalidGridResolution { n_ph: 1, n_e: 10 };
        assert!(err.to_string().contains("1x10"));
    }

    #[test]
    fn advisory_display() {
        let adv = Advisory::MissingThermo {
            species: "Xx".to_string(),
        };
        assert!(adv.to_string().contains("Xx"));
    }
}
