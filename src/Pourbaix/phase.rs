//! Phases of a potential-pH diagram and the built-in iron-water catalog.
//!
//! Each phase is described by its formation half-reaction from the reference metal and water:
//! `m M + w H2O -> phase + k H+ + z e-`, with `Gf` the standard Gibbs energy of that
//! half-reaction in J/mol. `m` is the multiplicity used to put every phase on a per-metal-atom
//! basis.
use crate::Thermodynamics::constants::F;
use crate::errors::{RedoxError, RedoxResult};
use log::{info, warn};
use prettytable::{Table, row};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseKind {
    /// solids and oxides, activity 1
    Solid,
    /// dissolved ions
    Aqueous,
}

/// solubility product of the sparingly soluble hydroxide M(OH)n formed by an aqueous ion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solubility {
    /// name of the precipitate, e.g. "Fe(OH)3"
    pub precipitate: String,
    pub log_ksp: f64,
    /// n in M(OH)n
    pub hydroxide_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    /// J/mol
    pub gf: f64,
    /// electrons released by the formation half-reaction
    pub charge: i64,
    /// protons released by the formation half-reaction
    pub protons: i64,
    /// log10 of the fixed activity, only meaningful for aqueous phases
    #[serde(default)]
    pub log_activity: Option<f64>,
    /// metal atoms per formula unit
    #[serde(default = "default_multiplicity")]
    pub multiplicity: u32,
    pub kind: PhaseKind,
    #[serde(default)]
    pub solubility: Option<Solubility>,
}

fn default_multiplicity() -> u32 {
    1
}

impl Phase {
    pub fn solid(name: &str, gf: f64, charge: i64, protons: i64, multiplicity: u32) -> Self {
        Self {
            name: name.to_string(),
            gf,
            charge,
            protons,
            log_activity: None,
            multiplicity,
            kind: PhaseKind::Solid,
            solubility: None,
        }
    }

    pub fn aqueous(name: &str, gf: f64, charge: i64, protons: i64, log_activity: f64) -> Self {
        Self {
            name: name.to_string(),
            gf,
            charge,
            protons,
            log_activity: Some(log_activity),
            multiplicity: 1,
            kind: PhaseKind::Aqueous,
            solubility: None,
        }
    }

    pub fn with_solubility(mut self, precipitate: &str, log_ksp: f64, hydroxide_count: u32) -> Self {
        self.solubility = Some(Solubility {
            precipitate: precipitate.to_string(),
            log_ksp,
            hydroxide_count,
        });
        self
    }

    pub fn validate(&self) -> RedoxResult<()> {
        let invalid = |reason: &str| RedoxError::InvalidPhase {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        if self.name.trim().is_empty() {
            return Err(invalid("empty name"));
        }
        if !self.gf.is_finite() {
            return Err(invalid("free energy is not finite"));
        }
        if self.multiplicity == 0 {
            return Err(invalid("multiplicity must be positive"));
        }
        if let Some(log_a) = self.log_activity {
            if !log_a.is_finite() {
                return Err(invalid("log activity is not finite"));
            }
        }
        if let Some(solubility) = &self.solubility {
            if !solubility.log_ksp.is_finite() || solubility.hydroxide_count == 0 {
                return Err(invalid("solubility data needs a finite log Ksp and n > 0"));
            }
        }
        Ok(())
    }

    /// S*log10(a) for aqueous phases with a fixed activity, 0 otherwise
    pub fn activity_term(&self, slope: f64) -> f64 {
        match (self.kind, self.log_activity) {
            (PhaseKind::Aqueous, Some(log_a)) => slope * log_a,
            _ => 0.0,
        }
    }

    /// Ψ(pH, E) in V per metal atom; `slope` is the Nernst factor R*T*ln(10)/F
    pub fn psi(&self, ph: f64, e: f64, slope: f64) -> f64 {
        (self.gf / F + self.activity_term(slope)
            - self.charge as f64 * e
            - self.protons as f64 * slope * ph)
            / self.multiplicity as f64
    }

    /// d(Ψ)/d(pH) divided by the slope factor, and d(Ψ)/dE
    pub fn gradient_coefficients(&self) -> (f64, f64) {
        let m = self.multiplicity as f64;
        (-(self.protons as f64) / m, -(self.charge as f64) / m)
    }
}

/// A named list of phases for one metal-water system
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhaseCatalog {
    pub name: String,
    pub phases: Vec<Phase>,
}

impl PhaseCatalog {
    pub fn new(name: &str, phases: Vec<Phase>) -> Self {
        Self {
            name: name.to_string(),
            phases,
        }
    }

    /// Fe-H2O at 25 °C, dissolved iron at 1e-6
    pub fn iron() -> Self {
        let phases = vec![
            Phase::solid("Fe", 0.0, 0, 0, 1),
            Phase::aqueous("Fe2+", -78900.0, 2, 0, -6.0),
            Phase::aqueous("Fe3+", -4700.0, 3, 0, -6.0).with_solubility("Fe(OH)3", -38.8, 3),
            Phase::solid("Fe3O4", -66880.0, 8, 8, 3),
            Phase::solid("Fe2O3", -30810.0, 6, 6, 2),
            Phase::aqueous("HFeO2-", 96560.0, 2, 3, -6.0),
        ];
        Self::new("Fe-H2O", phases)
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.phases.iter().map(|p| p.name.clone()).collect()
    }

    pub fn validate(&self) -> RedoxResult<()> {
        if self.phases.is_empty() {
            return Err(RedoxError::NoPhases);
        }
        self.phases.iter().try_for_each(Phase::validate)
    }

    /// Reads `[{"name": .., "gf": .., "charge": .., "protons": .., "kind": ..}, ...]`.
    /// Invalid entries are skipped with a warning.
    pub fn from_serde(name: &str, value: &Value) -> RedoxResult<Self> {
        let entries = value
            .as_array()
            .ok_or_else(|| RedoxError::Load(format!("phase catalog '{}' is not an array", name)))?;
        let mut phases = Vec::with_capacity(entries.len());
        for entry in entries {
            let phase = match serde_json::from_value::<Phase>(entry.clone()) {
                Ok(phase) => phase,
                Err(e) => {
                    warn!("skipping phase entry {} in '{}': {}", entry, name, e);
                    continue;
                }
            };
            match phase.validate() {
                Ok(()) => phases.push(phase),
                Err(e) => warn!("skipping phase in '{}': {}", name, e),
            }
        }
        info!("phase catalog '{}': {} phases", name, phases.len());
        Ok(Self::new(name, phases))
    }

    pub fn pretty_print(&self) {
        let mut table = Table::new();
        table.add_row(row!["phase", "Gf, J/mol", "z", "k", "m", "log a", "Ksp"]);
        for phase in &self.phases {
            let log_a = phase
                .log_activity
                .map(|a| format!("{}", a))
                .unwrap_or_else(|| "-".to_string());
            let ksp = phase
                .solubility
                .as_ref()
                .map(|s| format!("{} ({})", s.log_ksp, s.precipitate))
                .unwrap_or_else(|| "-".to_string());
            table.add_row(row![
                phase.name,
                phase.gf,
                phase.charge,
                phase.protons,
                phase.multiplicity,
                log_a,
                ksp
            ]);
        }
        table.printstd();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Thermodynamics::constants::{T_STANDARD, nernst_slope};
    use approx::assert_relative_eq;
    use serde_json::json;

    #[test]
    fn test_psi_per_metal_atom() {
        let s = nernst_slope(T_STANDARD);
        let magnetite = Phase::solid("Fe3O4", -66880.0, 8, 8, 3);
        let expected = (-66880.0 / F - 8.0 * 0.5 - 8.0 * s * 7.0) / 3.0;
        assert_relative_eq!(magnetite.psi(7.0, 0.5, s), expected, epsilon = 1e-12);
        assert_eq!(magnetite.gradient_coefficients(), (-8.0 / 3.0, -8.0 / 3.0));
    }

    #[test]
    fn test_activity_term_only_for_aqueous() {
        let s = nernst_slope(T_STANDARD);
        let ion = Phase::aqueous("Fe2+", 0.0, 2, 0, -6.0);
        assert_relative_eq!(ion.activity_term(s), -6.0 * s);
        let mut solid = Phase::solid("Fe", 0.0, 0, 0, 1);
        solid.log_activity = Some(-6.0);
        assert_eq!(solid.activity_term(s), 0.0);
    }

    #[test]
    fn test_validation() {
        assert!(PhaseCatalog::iron().validate().is_ok());
        assert!(matches!(
            PhaseCatalog::new("empty", vec![]).validate(),
            Err(RedoxError::NoPhases)
        ));
        let bad = Phase::solid("X", f64::NAN, 0, 0, 1);
        assert!(matches!(bad.validate(), Err(RedoxError::InvalidPhase { .. })));
        let bad = Phase::solid("X", 0.0, 0, 0, 0);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_catalog_from_serde() {
        let value = json!([
            {"name": "Cu", "gf": 0.0, "charge": 0, "protons": 0, "kind": "Solid"},
            {"name": "Cu2+", "gf": 65490.0, "charge": 2, "protons": 0, "log_activity": -6.0, "kind": "Aqueous"},
            {"name": "broken", "gf": "x"},
            {"name": "zero", "gf": 0.0, "charge": 0, "protons": 0, "multiplicity": 0, "kind": "Solid"}
        ]);
        let catalog = PhaseCatalog::from_serde("Cu-H2O", &value).unwrap();
        assert_eq!(catalog.names(), vec!["Cu", "Cu2+"]);
        assert_eq!(catalog.phases[0].multiplicity, 1);
        assert!(PhaseCatalog::from_serde("bad", &json!({"a": 1})).is_err());
    }
}
