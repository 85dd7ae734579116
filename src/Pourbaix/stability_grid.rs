//! Grid sampling of the phase potential functions and the dominance map (lower envelope).
use crate::Pourbaix::phase::Phase;
use crate::Thermodynamics::constants::nernst_slope;
use crate::errors::{RedoxError, RedoxResult};
use log::debug;
use nalgebra::DMatrix;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// `n` evenly spaced points from `start` to `end` inclusive
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// pH and potential axes of a diagram
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub ph_min: f64,
    pub ph_max: f64,
    pub n_ph: usize,
    /// V
    pub e_min: f64,
    /// V
    pub e_max: f64,
    pub n_e: usize,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            ph_min: 0.0,
            ph_max: 14.0,
            n_ph: 141,
            e_min: -2.5,
            e_max: 2.5,
            n_e: 201,
        }
    }
}

impl GridSpec {
    pub fn with_resolution(n_ph: usize, n_e: usize) -> Self {
        Self {
            n_ph,
            n_e,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> RedoxResult<()> {
        if self.n_ph <= 1 || self.n_e <= 1 {
            return Err(RedoxError::InvalidGridResolution {
                n_ph: self.n_ph,
                n_e: self.n_e,
            });
        }
        let axes = [
            ("pH", self.ph_min, self.ph_max),
            ("E", self.e_min, self.e_max),
        ];
        for (axis, min, max) in axes {
            if !min.is_finite() || !max.is_finite() || min >= max {
                return Err(RedoxError::InvalidGridBounds { axis, min, max });
            }
        }
        Ok(())
    }

    pub fn ph_axis(&self) -> Vec<f64> {
        linspace(self.ph_min, self.ph_max, self.n_ph)
    }

    pub fn e_axis(&self) -> Vec<f64> {
        linspace(self.e_min, self.e_max, self.n_e)
    }
}

/// Ψ of every phase sampled over the grid. Matrices are indexed `[(e_index, ph_index)]`.
#[derive(Debug, Clone)]
pub struct StabilityGrid {
    pub ph: Vec<f64>,
    pub e: Vec<f64>,
    pub t_k: f64,
    /// Nernst factor at t_k
    pub slope: f64,
    pub psi: Vec<DMatrix<f64>>,
}

impl StabilityGrid {
    /// Evaluates Ψ for every phase. Phases are evaluated in parallel; the result keeps
    /// catalog order.
    pub fn evaluate(phases: &[Phase], spec: &GridSpec, t_k: f64) -> RedoxResult<Self> {
        if phases.is_empty() {
            return Err(RedoxError::NoPhases);
        }
        spec.validate()?;
        if !t_k.is_finite() || t_k <= 0.0 {
            return Err(RedoxError::InvalidTemperature(t_k));
        }
        phases.iter().try_for_each(Phase::validate)?;

        let ph = spec.ph_axis();
        let e = spec.e_axis();
        let slope = nernst_slope(t_k);
        let psi: Vec<DMatrix<f64>> = phases
            .par_iter()
            .map(|phase| {
                DMatrix::from_fn(e.len(), ph.len(), |i, j| phase.psi(ph[j], e[i], slope))
            })
            .collect();
        debug!(
            "evaluated {} phases on a {}x{} grid at {} K",
            phases.len(),
            spec.n_ph,
            spec.n_e,
            t_k
        );
        Ok(Self {
            ph,
            e,
            t_k,
            slope,
            psi,
        })
    }

    pub fn n_ph(&self) -> usize {
        self.ph.len()
    }

    pub fn n_e(&self) -> usize {
        self.e.len()
    }

    /// index of the phase with the lowest Ψ at cell (i, j); ties go to the lower index
    pub fn argmin_at(&self, i: usize, j: usize) -> usize {
        let mut best = 0;
        let mut best_value = self.psi[0][(i, j)];
        for (index, values) in self.psi.iter().enumerate().skip(1) {
            let value = values[(i, j)];
            if value < best_value {
                best = index;
                best_value = value;
            }
        }
        best
    }

    /// phase index per cell, rows reduced in parallel and reassembled in row order
    pub fn dominance_map(&self) -> DMatrix<usize> {
        let n_ph = self.n_ph();
        let rows: Vec<Vec<usize>> = (0..self.n_e())
            .into_par_iter()
            .map(|i| (0..n_ph).map(|j| self.argmin_at(i, j)).collect())
            .collect();
        let data: Vec<usize> = rows.into_iter().flatten().collect();
        DMatrix::from_row_slice(self.n_e(), n_ph, &data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Thermodynamics::constants::T_STANDARD;
    use approx::assert_relative_eq;

    fn two_phases() -> Vec<Phase> {
        vec![
            Phase::solid("A", 0.0, 0, 0, 1),
            Phase::solid("B", -100000.0, 2, 0, 1),
        ]
    }

    #[test]
    fn test_linspace() {
        let xs = linspace(0.0, 14.0, 141);
        assert_eq!(xs.len(), 141);
        assert_relative_eq!(xs[70], 7.0, epsilon = 1e-12);
        assert_eq!(xs[140], 14.0);
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
        assert!(linspace(1.0, 2.0, 0).is_empty());
    }

    #[test]
    fn test_grid_validation() {
        assert!(GridSpec::default().validate().is_ok());
        assert!(matches!(
            GridSpec::with_resolution(1, 10).validate(),
            Err(RedoxError::InvalidGridResolution { n_ph: 1, n_e: 10 })
        ));
        let mut spec = GridSpec::default();
        spec.e_min = 3.0;
        assert!(matches!(
            spec.validate(),
            Err(RedoxError::InvalidGridBounds { axis: "E", .. })
        ));
        assert!(matches!(
            StabilityGrid::evaluate(&[], &GridSpec::default(), T_STANDARD),
            Err(RedoxError::NoPhases)
        ));
        assert!(matches!(
            StabilityGrid::evaluate(&two_phases(), &GridSpec::default(), -1.0),
            Err(RedoxError::InvalidTemperature(_))
        ));
    }

    #[test]
    fn test_two_phase_dominance_is_monotone_in_e() {
        let grid =
            StabilityGrid::evaluate(&two_phases(), &GridSpec::with_resolution(15, 101), T_STANDARD)
                .unwrap();
        let map = grid.dominance_map();
        // Ψ_A = Ψ_B at E* = -100000 / (2F)
        let e_star = -100000.0 / (2.0 * crate::Thermodynamics::constants::F);
        assert_relative_eq!(e_star, -0.518, epsilon = 1e-3);
        for j in 0..grid.n_ph() {
            for i in 0..grid.n_e() {
                let expected = if grid.e[i] < e_star { 0 } else { 1 };
                assert_eq!(map[(i, j)], expected);
            }
        }
    }

    #[test]
    fn test_ties_go_to_lower_index() {
        let phases = vec![
            Phase::solid("A", 0.0, 0, 0, 1),
            Phase::solid("A copy", 0.0, 0, 0, 1),
        ];
        let grid =
            StabilityGrid::evaluate(&phases, &GridSpec::with_resolution(5, 5), T_STANDARD).unwrap();
        assert!(grid.dominance_map().iter().all(|&p| p == 0));
    }
}
