//! Reaction-level thermodynamics: dH, dS from species records, dG(T), K(T), E0 and the
//! spontaneity classification. Every summary is recomputed from scratch, nothing is cached
//! between temperatures.
use crate::Pourbaix::stability_grid::linspace;
use crate::Reactions::electrochem_features::extract_features;
use crate::Reactions::species::Species;
use crate::Reactions::stoichiometry_balancer::BalancedReaction;
use crate::Thermodynamics::constants::{F, R, T_ZERO_CELSIUS};
use crate::Thermodynamics::thermo_lookup::ThermoLookup;
use crate::errors::{Advisory, RedoxError, RedoxResult};
use log::{debug, warn};
use prettytable::{Table, row};
use serde::{Deserialize, Serialize};
use std::fmt;

/// default |dG| band (kJ/mol) classified as equilibrium
pub const SPONTANEITY_TOLERANCE_KJ: f64 = 0.01;

/// temperature as the caller entered it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Temperature {
    Celsius(f64),
    Kelvin(f64),
}

impl Temperature {
    /// T_K = T_C + 273.15; fails for non-finite or non-positive absolute temperatures
    pub fn to_kelvin(&self) -> RedoxResult<f64> {
        let t_k = match self {
            Temperature::Celsius(t) => t + T_ZERO_CELSIUS,
            Temperature::Kelvin(t) => *t,
        };
        if !t_k.is_finite() || t_k <= 0.0 {
            return Err(RedoxError::InvalidTemperature(t_k));
        }
        Ok(t_k)
    }
}

/// what to do with species that have no thermo record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThermoPolicy {
    /// count them as (0, 0) and report an advisory
    #[default]
    Lenient,
    /// fail with MissingThermoData
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Spontaneity {
    Spontaneous,
    NonSpontaneous,
    Equilibrium,
}

impl fmt::Display for Spontaneity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Spontaneity::Spontaneous => "spontaneous",
            Spontaneity::NonSpontaneous => "non-spontaneous",
            Spontaneity::Equilibrium => "equilibrium",
        };
        write!(f, "{}", text)
    }
}

/// three-way classification of dG (kJ/mol) with a tolerance band around zero
pub fn classify(dg_kj: f64, tolerance_kj: f64) -> Spontaneity {
    if dg_kj < -tolerance_kj {
        Spontaneity::Spontaneous
    } else if dg_kj > tolerance_kj {
        Spontaneity::NonSpontaneous
    } else {
        Spontaneity::Equilibrium
    }
}

/// K = exp(-dG/(R*T)); an exponent beyond the f64 range gives +inf instead of an error
pub fn equilibrium_constant(dg_j: f64, t_k: f64) -> f64 {
    let exponent = -dg_j / (R * t_k);
    if exponent > f64::MAX.ln() {
        f64::INFINITY
    } else {
        exponent.exp()
    }
}

/// Sum over products minus sum over reactants of coeff*dH and coeff*S.
/// Returns (dH kJ/mol, dS J/mol/K, species without a record).
pub fn aggregate_dh_ds(
    balanced: &BalancedReaction,
    lookup: &dyn ThermoLookup,
    policy: ThermoPolicy,
) -> RedoxResult<(f64, f64, Vec<String>)> {
    let mut dh = 0.0;
    let mut ds = 0.0;
    let mut missing: Vec<String> = Vec::new();
    let sides: [(&[(Species, i64)], f64); 2] = [
        (balanced.reactants.as_slice(), -1.0),
        (balanced.products.as_slice(), 1.0),
    ];
    for (side, sign) in sides {
        for (species, coeff) in side {
            match lookup.lookup(&species.id) {
                Some(record) => {
                    dh += sign * *coeff as f64 * record.dh;
                    ds += sign * *coeff as f64 * record.s;
                }
                None => missing.push(species.id.clone()),
            }
        }
    }
    if !missing.is_empty() {
        match policy {
            ThermoPolicy::Strict => return Err(RedoxError::MissingThermoData(missing)),
            ThermoPolicy::Lenient => {
                warn!("no thermo data for {:?}, counted as zero", missing);
            }
        }
    }
    Ok((dh, ds, missing))
}

/// thermodynamic summary of one reaction at one temperature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionThermo {
    /// kJ/mol
    pub dh: f64,
    /// J/mol/K
    pub ds: f64,
    /// K
    pub t_k: f64,
    /// kJ/mol
    pub dg: f64,
    /// f64::INFINITY when exp overflows
    pub k: f64,
    /// V, only for reactions with electron transfer
    pub e0: Option<f64>,
    pub n: i64,
    pub spontaneity: Spontaneity,
    pub missing_species: Vec<String>,
}

impl ReactionThermo {
    /// summary from reaction dH (kJ/mol) and dS (J/mol/K) entered directly
    pub fn from_dh_ds(
        dh: f64,
        ds: f64,
        temperature: Temperature,
        n: i64,
        tolerance_kj: f64,
    ) -> RedoxResult<Self> {
        for (quantity, value) in [("dH", dh), ("dS", ds)] {
            if !value.is_finite() {
                return Err(RedoxError::InvalidThermoInput { quantity, value });
            }
        }
        let t_k = temperature.to_kelvin()?;
        let dg_j = dh * 1000.0 - t_k * ds;
        let dg = dg_j / 1000.0;
        let n = n.abs();
        let e0 = if n > 0 {
            Some(-dg_j / (n as f64 * F))
        } else {
            None
        };
        let k = equilibrium_constant(dg_j, t_k);
        debug!(
            "dH = {} kJ/mol, dS = {} J/mol/K, T = {} K -> dG = {} kJ/mol, K = {:e}",
            dh, ds, t_k, dg, k
        );
        Ok(Self {
            dh,
            ds,
            t_k,
            dg,
            k,
            e0,
            n,
            spontaneity: classify(dg, tolerance_kj),
            missing_species: Vec::new(),
        })
    }

    /// summary of a balanced reaction from species records
    pub fn from_reaction(
        balanced: &BalancedReaction,
        temperature: Temperature,
        lookup: &dyn ThermoLookup,
        policy: ThermoPolicy,
        tolerance_kj: f64,
    ) -> RedoxResult<Self> {
        // validate T before touching the lookup
        temperature.to_kelvin()?;
        let (dh, ds, missing) = aggregate_dh_ds(balanced, lookup, policy)?;
        let features = extract_features(balanced);
        let mut summary = Self::from_dh_ds(dh, ds, temperature, features.n, tolerance_kj)?;
        summary.missing_species = missing;
        Ok(summary)
    }

    /// the same dH, dS at another temperature
    pub fn at_temperature(&self, temperature: Temperature, tolerance_kj: f64) -> RedoxResult<Self> {
        let mut summary = Self::from_dh_ds(self.dh, self.ds, temperature, self.n, tolerance_kj)?;
        summary.missing_species = self.missing_species.clone();
        Ok(summary)
    }

    pub fn k_is_infinite(&self) -> bool {
        self.k.is_infinite()
    }

    pub fn advisories(&self) -> Vec<Advisory> {
        self.missing_species
            .iter()
            .map(|species| Advisory::MissingThermo {
                species: species.clone(),
            })
            .collect()
    }

    pub fn pretty_print(&self) {
        let mut table = Table::new();
        table.add_row(row!["quantity", "value", "unit"]);
        table.add_row(row!["T", format!("{:.2}", self.t_k), "K"]);
        table.add_row(row!["dH", format!("{:.3}", self.dh), "kJ/mol"]);
        table.add_row(row!["dS", format!("{:.3}", self.ds), "J/mol/K"]);
        table.add_row(row!["dG", format!("{:.3}", self.dg), "kJ/mol"]);
        let k = if self.k_is_infinite() {
            "effectively infinite".to_string()
        } else {
            format!("{:.3e}", self.k)
        };
        table.add_row(row!["K", k, "-"]);
        if let Some(e0) = self.e0 {
            table.add_row(row!["E0", format!("{:.4}", e0), "V"]);
        }
        table.add_row(row!["spontaneity", self.spontaneity, ""]);
        table.printstd();
        for advisory in self.advisories() {
            println!("warning: {}", advisory);
        }
    }
}

/// dG (kJ/mol) sampled over a Celsius range, returns (T in °C, dG)
pub fn dg_temperature_sweep(
    dh: f64,
    ds: f64,
    t_min_c: f64,
    t_max_c: f64,
    points: usize,
) -> Vec<(f64, f64)> {
    linspace(t_min_c, t_max_c, points)
        .into_iter()
        .map(|t_c| (t_c, (dh * 1000.0 - (t_c + T_ZERO_CELSIUS) * ds) / 1000.0))
        .collect()
}
