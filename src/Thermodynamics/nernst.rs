//! Nernst lines: equilibrium potential of a half-reaction as a function of pH.
//!
//! E(pH) = E0 - (S*m/n)*pH - (S/n)*log10(Q'), S = R*T*ln(10)/F, where Q' is the flat
//! activity quotient of every species other than H+.
use crate::Pourbaix::stability_grid::linspace;
use crate::Reactions::electrochem_features::ElectrochemFeatures;
use crate::Thermodynamics::constants::{E0_O2_H2O, nernst_slope};
use crate::Thermodynamics::reaction_thermo::ReactionThermo;
use crate::errors::{RedoxError, RedoxResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NernstLine {
    pub label: String,
    /// V
    pub e0: f64,
    pub n: i64,
    pub m: i64,
    pub t_k: f64,
    /// log10 of the activity quotient without H+
    pub log_q: f64,
}

impl NernstLine {
    pub fn new(label: &str, e0: f64, n: i64, m: i64, t_k: f64) -> RedoxResult<Self> {
        if n == 0 {
            return Err(RedoxError::NoElectronTransfer(format!(
                "'{}' has no Nernst line",
                label
            )));
        }
        if !t_k.is_finite() || t_k <= 0.0 {
            return Err(RedoxError::InvalidTemperature(t_k));
        }
        Ok(Self {
            label: label.to_string(),
            e0,
            n: n.abs(),
            m,
            t_k,
            log_q: 0.0,
        })
    }

    /// line of a reaction whose thermo summary carries E0
    pub fn from_reaction(
        label: &str,
        thermo: &ReactionThermo,
        features: &ElectrochemFeatures,
    ) -> RedoxResult<Self> {
        let e0 = thermo.e0.ok_or_else(|| {
            RedoxError::NoElectronTransfer(format!("'{}' has no standard potential", label))
        })?;
        Self::new(label, e0, features.n, features.m, thermo.t_k)
    }

    pub fn with_log_activity_quotient(mut self, log_q: f64) -> Self {
        self.log_q = log_q;
        self
    }

    /// dE/dpH in V per pH unit (negative of the returned value)
    pub fn slope(&self) -> f64 {
        nernst_slope(self.t_k) * self.m as f64 / self.n as f64
    }

    pub fn potential_at(&self, ph: f64) -> f64 {
        self.e0 - self.slope() * ph - nernst_slope(self.t_k) / self.n as f64 * self.log_q
    }

    /// (pH, E) samples
    pub fn sample(&self, ph_min: f64, ph_max: f64, points: usize) -> Vec<(f64, f64)> {
        linspace(ph_min, ph_max, points)
            .into_iter()
            .map(|ph| (ph, self.potential_at(ph)))
            .collect()
    }
}

/// upper limit of water stability, O2 + 4H+ + 4e- -> 2H2O
pub fn oxygen_line(t_k: f64) -> RedoxResult<NernstLine> {
    NernstLine::new("O2/H2O", E0_O2_H2O, 4, 4, t_k)
}

/// lower limit of water stability, 2H+ + 2e- -> H2
pub fn hydrogen_line(t_k: f64) -> RedoxResult<NernstLine> {
    NernstLine::new("H+/H2", 0.0, 2, 2, t_k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Thermodynamics::constants::T_STANDARD;
    use crate::Thermodynamics::reaction_thermo::Temperature;
    use approx::assert_relative_eq;

    #[test]
    fn test_permanganate_line_at_ph7() {
        let line = NernstLine::new("MnO4-/Mn2+", 1.51, 5, 8, T_STANDARD).unwrap();
        assert_relative_eq!(line.potential_at(7.0), 0.846, epsilon = 0.01);
        assert_relative_eq!(line.potential_at(0.0), 1.51);
    }

    #[test]
    fn test_water_lines() {
        let oxygen = oxygen_line(T_STANDARD).unwrap();
        let hydrogen = hydrogen_line(T_STANDARD).unwrap();
        // parallel, 1.23 V apart at every pH
        for (ph, e) in oxygen.sample(0.0, 14.0, 15) {
            assert_relative_eq!(e - hydrogen.potential_at(ph), 1.23, epsilon = 1e-12);
        }
        assert_relative_eq!(hydrogen.potential_at(14.0), -0.828, epsilon = 1e-3);
    }

    #[test]
    fn test_activity_term() {
        let line = NernstLine::new("Fe3+/Fe2+", 0.77, 1, 0, T_STANDARD)
            .unwrap()
            .with_log_activity_quotient(1.0);
        assert_relative_eq!(line.potential_at(3.0), 0.77 - 0.05916, epsilon = 1e-4);
    }

    #[test]
    fn test_line_requires_electrons() {
        assert!(matches!(
            NernstLine::new("x", 0.0, 0, 1, T_STANDARD),
            Err(RedoxError::NoElectronTransfer(_))
        ));
        let thermo = ReactionThermo::from_dh_ds(-285.8, -163.2, Temperature::Celsius(25.0), 0, 0.01)
            .unwrap();
        let features = ElectrochemFeatures { n: 0, m: 0 };
        assert!(NernstLine::from_reaction("water", &thermo, &features).is_err());
    }
}
