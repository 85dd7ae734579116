//! Boundary curves between neighbouring dominance regions.
//!
//! For every pair of grid-adjacent cells dominated by different phases `a` and `b`, the zero of
//! Ψ_a - Ψ_b on the segment joining the two cell centres is located by linear interpolation.
//! Ψ is affine, so the interpolated point lies exactly on the zero-level line. Only pairs that
//! actually touch in the dominance map produce points, which clips every boundary to the
//! region where the two phases compete.
use crate::Pourbaix::phase::Phase;
use crate::Pourbaix::stability_grid::StabilityGrid;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const DUPLICATE_TOL: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryCurve {
    /// lower phase index of the pair
    pub phase_a: usize,
    pub phase_b: usize,
    /// (pH, E) samples ordered along the line
    pub points: Vec<(f64, f64)>,
}

impl BoundaryCurve {
    pub fn label(&self, names: &[String]) -> String {
        format!("{} / {}", names[self.phase_a], names[self.phase_b])
    }
}

/// position of the zero of d on [x0, x1], d0 <= 0 <= d1 or d0 >= 0 >= d1
fn zero_crossing(x0: f64, x1: f64, d0: f64, d1: f64) -> f64 {
    let denom = d0 - d1;
    let t = if denom.abs() < f64::EPSILON {
        0.5
    } else {
        (d0 / denom).clamp(0.0, 1.0)
    };
    x0 + t * (x1 - x0)
}

fn crossing_point(
    grid: &StabilityGrid,
    a: usize,
    b: usize,
    cell0: (usize, usize),
    cell1: (usize, usize),
) -> (f64, f64) {
    let diff = |(i, j): (usize, usize)| grid.psi[a][(i, j)] - grid.psi[b][(i, j)];
    let (d0, d1) = (diff(cell0), diff(cell1));
    let ph = zero_crossing(grid.ph[cell0.1], grid.ph[cell1.1], d0, d1);
    let e = zero_crossing(grid.e[cell0.0], grid.e[cell1.0], d0, d1);
    (ph, e)
}

/// Orders points along the zero line of Ψ_a - Ψ_b, whose direction is (dE, -dpH) of the
/// gradient, and drops coincident samples.
fn order_along_line(points: &mut Vec<(f64, f64)>, phase_a: &Phase, phase_b: &Phase, slope: f64) {
    let (ka, za) = phase_a.gradient_coefficients();
    let (kb, zb) = phase_b.gradient_coefficients();
    let grad_ph = (ka - kb) * slope;
    let grad_e = za - zb;
    if grad_ph == 0.0 && grad_e == 0.0 {
        points.sort_by(|p, q| p.0.total_cmp(&q.0).then(p.1.total_cmp(&q.1)));
    } else {
        let along = |p: &(f64, f64)| grad_e * p.0 - grad_ph * p.1;
        points.sort_by(|p, q| along(p).total_cmp(&along(q)));
    }
    points.dedup_by(|p, q| (p.0 - q.0).abs() < DUPLICATE_TOL && (p.1 - q.1).abs() < DUPLICATE_TOL);
}

/// One curve per pair of phases whose dominance regions touch, in (a, b) order.
pub fn extract_boundaries(
    grid: &StabilityGrid,
    dominance: &DMatrix<usize>,
    phases: &[Phase],
) -> Vec<BoundaryCurve> {
    let mut pairs: BTreeMap<(usize, usize), Vec<(f64, f64)>> = BTreeMap::new();
    let (n_e, n_ph) = dominance.shape();
    let mut visit = |cell0: (usize, usize), cell1: (usize, usize)| {
        let (p0, p1) = (dominance[cell0], dominance[cell1]);
        if p0 != p1 {
            let point = crossing_point(grid, p0, p1, cell0, cell1);
            pairs.entry((p0.min(p1), p0.max(p1))).or_default().push(point);
        }
    };
    for i in 0..n_e {
        for j in 0..n_ph {
            if j + 1 < n_ph {
                visit((i, j), (i, j + 1));
            }
            if i + 1 < n_e {
                visit((i, j), (i + 1, j));
            }
        }
    }
    pairs
        .into_iter()
        .map(|((a, b), mut points)| {
            order_along_line(&mut points, &phases[a], &phases[b], grid.slope);
            BoundaryCurve {
                phase_a: a,
                phase_b: b,
                points,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pourbaix::stability_grid::GridSpec;
    use crate::Thermodynamics::constants::{F, T_STANDARD};
    use approx::assert_relative_eq;

    #[test]
    fn test_horizontal_boundary_between_two_phases() {
        let phases = vec![
            Phase::solid("A", 0.0, 0, 0, 1),
            Phase::solid("B", -100000.0, 2, 0, 1),
        ];
        let grid =
            StabilityGrid::evaluate(&phases, &GridSpec::with_resolution(11, 51), T_STANDARD).unwrap();
        let map = grid.dominance_map();
        let curves = extract_boundaries(&grid, &map, &phases);
        assert_eq!(curves.len(), 1);
        let curve = &curves[0];
        assert_eq!((curve.phase_a, curve.phase_b), (0, 1));
        assert_eq!(curve.points.len(), 11);
        let e_star = -100000.0 / (2.0 * F);
        for (i, (ph, e)) in curve.points.iter().enumerate() {
            assert_relative_eq!(*e, e_star, epsilon = 1e-9);
            assert_relative_eq!(*ph, grid.ph[i], epsilon = 1e-9);
        }
    }

    #[test]
    fn test_sloped_boundary_lies_on_zero_line() {
        // Ψ_B - Ψ_A = -0.2 - E - S*pH
        let phases = vec![
            Phase::solid("A", 0.0, 0, 0, 1),
            Phase::solid("B", -0.2 * F, 1, 1, 1),
        ];
        let grid =
            StabilityGrid::evaluate(&phases, &GridSpec::with_resolution(29, 41), T_STANDARD).unwrap();
        let map = grid.dominance_map();
        let curves = extract_boundaries(&grid, &map, &phases);
        assert_eq!(curves.len(), 1);
        let points = &curves[0].points;
        assert!(points.len() > 10);
        for (ph, e) in points {
            assert_relative_eq!(-0.2 - e - grid.slope * ph, 0.0, epsilon = 1e-9);
        }
        // ordered along the line: pH increases while E decreases
        for pair in points.windows(2) {
            assert!(pair[1].0 >= pair[0].0);
            assert!(pair[1].1 <= pair[0].1);
        }
    }

    #[test]
    fn test_non_adjacent_pairs_have_no_curve() {
        // C dominates a band between A (low E) and B (high E); A and B never touch
        let phases = vec![
            Phase::solid("A", 0.0, 0, 0, 1),
            Phase::solid("B", 1.0 * F, 2, 0, 1),
            Phase::solid("C", -0.5 * F, 1, 0, 1),
        ];
        let grid =
            StabilityGrid::evaluate(&phases, &GridSpec::with_resolution(5, 201), T_STANDARD).unwrap();
        let map = grid.dominance_map();
        let curves = extract_boundaries(&grid, &map, &phases);
        let pairs: Vec<(usize, usize)> = curves.iter().map(|c| (c.phase_a, c.phase_b)).collect();
        assert!(!pairs.contains(&(0, 1)));
        assert_eq!(pairs, vec![(0, 2), (1, 2)]);
    }
}
