//! Species-property lookup contract and the built-in standard-state table.
//!
//! The aggregator only needs `species id -> (enthalpy of formation, standard entropy)`.
//! Anything implementing [`ThermoLookup`] can be injected: the built-in [`ThermoLibrary`],
//! a library loaded from a document, or a plain `HashMap` fixture in tests.
use crate::Reactions::formula_normalizer::normalize_species;
use crate::Reactions::species::Species;
use crate::errors::{RedoxError, RedoxResult};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// standard enthalpy of formation (kJ/mol) and standard molar entropy (J/mol/K)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermoRecord {
    pub dh: f64,
    pub s: f64,
}

/// read-only, shareable between threads
pub trait ThermoLookup: Sync {
    fn lookup(&self, species: &str) -> Option<ThermoRecord>;
}

impl ThermoLookup for HashMap<String, ThermoRecord> {
    fn lookup(&self, species: &str) -> Option<ThermoRecord> {
        self.get(species).copied()
    }
}

// (id, dH kJ/mol, S J/mol/K), aqueous ions at unit activity, 298.15 K.
// S of the electron is 1/2 S(H2) so that the hydrogen electrode has dG = 0.
const BUILTIN_TABLE: &[(&str, f64, f64)] = &[
    ("e-1", 0.0, 65.34),
    ("H+1", 0.0, 0.0),
    ("H2", 0.0, 130.68),
    ("O2", 0.0, 205.15),
    ("H2O", -285.83, 69.91),
    ("H2O2", -187.78, 109.6),
    ("OH-1", -230.0, -10.75),
    ("N2", 0.0, 191.61),
    ("NH3", -45.94, 192.77),
    ("NH4+1", -132.5, 113.4),
    ("NO3-1", -207.4, 146.4),
    ("C", 0.0, 5.74),
    ("CO", -110.53, 197.66),
    ("CO2", -393.51, 213.79),
    ("CH4", -74.87, 186.25),
    ("C3H8", -103.85, 270.3),
    ("Cl2", 0.0, 223.08),
    ("Cl-1", -167.16, 56.5),
    ("Na", 0.0, 51.3),
    ("Na+1", -240.12, 59.0),
    ("NaCl", -411.15, 72.13),
    ("Fe", 0.0, 27.28),
    ("Fe+2", -89.1, -137.7),
    ("Fe+3", -48.5, -315.9),
    ("Fe2O3", -824.2, 87.4),
    ("Fe3O4", -1118.4, 146.4),
    ("Fe(OH)3", -823.0, 106.7),
    ("Mn+2", -220.8, -73.6),
    ("MnO4-1", -541.4, 191.2),
    ("MnO2", -520.03, 53.05),
    ("Cu", 0.0, 33.15),
    ("Cu+2", 64.77, -99.6),
    ("Zn", 0.0, 41.63),
    ("Zn+2", -153.89, -112.1),
    ("Ag", 0.0, 42.55),
    ("Ag+1", 105.58, 72.68),
    ("SO4-2", -909.27, 20.1),
];

/// A named table of thermo records keyed by canonical species id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThermoLibrary {
    pub name: String,
    pub records: HashMap<String, ThermoRecord>,
}

/// canonical key: the species id when the token parses, the normalized token otherwise
fn canonical_key(species: &str) -> String {
    let normalized = normalize_species(species);
    match Species::parse(&normalized) {
        Ok(parsed) => parsed.id,
        Err(_) => normalized,
    }
}

impl ThermoLibrary {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            records: HashMap::new(),
        }
    }

    /// standard-state values for common aqueous redox chemistry
    pub fn builtin() -> Self {
        let mut library = Self::new("builtin");
        for (id, dh, s) in BUILTIN_TABLE {
            library
                .records
                .insert(id.to_string(), ThermoRecord { dh: *dh, s: *s });
        }
        library
    }

    pub fn insert(&mut self, species: &str, record: ThermoRecord) {
        self.records.insert(canonical_key(species), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// records of `other` override records of `self`
    pub fn merge(&mut self, other: &ThermoLibrary) {
        for (id, record) in &other.records {
            self.records.insert(id.clone(), *record);
        }
    }

    /// Reads `{"species": {"dh": .., "s": ..}, ...}`. Entries that are not objects with both
    /// numbers are skipped with a warning.
    pub fn from_serde(name: &str, value: &Value) -> RedoxResult<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| RedoxError::Load(format!("thermo library '{}' is not an object", name)))?;
        let mut library = Self::new(name);
        for (species, entry) in map {
            match serde_json::from_value::<ThermoRecord>(entry.clone()) {
                Ok(record) => library.insert(species, record),
                Err(e) => warn!("skipping thermo entry '{}' in '{}': {}", species, name, e),
            }
        }
        info!("thermo library '{}': {} records", name, library.len());
        Ok(library)
    }
}

impl ThermoLookup for ThermoLibrary {
    fn lookup(&self, species: &str) -> Option<ThermoRecord> {
        self.records
            .get(species)
            .copied()
            .or_else(|| self.records.get(&canonical_key(species)).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtin_lookup() {
        let library = ThermoLibrary::builtin();
        let water = library.lookup("H2O").unwrap();
        assert_eq!(water.dh, -285.83);
        // free-form spellings resolve to the canonical key
        assert!(library.lookup("Fe^{3+}").is_some());
        assert!(library.lookup("MnO4-").is_some());
        assert!(library.lookup("Unobtainium").is_none());
    }

    #[test]
    fn test_from_serde_and_merge() {
        let value = json!({
            "Fe^{2+}": {"dh": -90.0, "s": -138.0},
            "broken": {"dh": "x"}
        });
        let user = ThermoLibrary::from_serde("user", &value).unwrap();
        assert_eq!(user.len(), 1);
        let mut library = ThermoLibrary::builtin();
        library.merge(&user);
        assert_eq!(library.lookup("Fe+2").unwrap().dh, -90.0);
        assert!(ThermoLibrary::from_serde("bad", &json!([1, 2])).is_err());
    }

    #[test]
    fn test_hashmap_fixture_is_a_lookup() {
        let fixture = HashMap::from([("A".to_string(), ThermoRecord { dh: 1.0, s: 2.0 })]);
        assert_eq!(fixture.lookup("A"), Some(ThermoRecord { dh: 1.0, s: 2.0 }));
    }
}
