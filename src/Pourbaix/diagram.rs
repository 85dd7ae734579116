//! Diagram request orchestration and the result record handed to a renderer.
use crate::Pourbaix::boundaries::{BoundaryCurve, extract_boundaries};
use crate::Pourbaix::phase::Phase;
use crate::Pourbaix::precipitation::{PrecipitationOverlay, precipitation_overlays};
use crate::Pourbaix::stability_grid::{GridSpec, StabilityGrid};
use crate::Thermodynamics::nernst::{NernstLine, hydrogen_line, oxygen_line};
use crate::Thermodynamics::reaction_thermo::Temperature;
use crate::errors::{RedoxError, RedoxResult};
use log::info;
use nalgebra::DMatrix;
use prettytable::{Table, row};
use serde::Serialize;

/// a labelled (pH, E) polyline drawn over the diagram
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayLine {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone)]
pub struct PourbaixDiagram {
    pub t_k: f64,
    pub ph: Vec<f64>,
    pub e: Vec<f64>,
    pub phase_names: Vec<String>,
    /// phase index per cell, [(e_index, ph_index)]
    pub dominance: DMatrix<usize>,
    pub boundaries: Vec<BoundaryCurve>,
    pub precipitation: Vec<PrecipitationOverlay>,
    pub overlays: Vec<OverlayLine>,
}

#[derive(Serialize)]
struct DiagramExport<'a> {
    temperature_k: f64,
    ph: &'a [f64],
    e: &'a [f64],
    phases: &'a [String],
    /// one row per potential, one entry per pH
    dominance: Vec<Vec<usize>>,
    boundaries: Vec<BoundaryExport<'a>>,
    precipitation: &'a [PrecipitationOverlay],
    overlays: &'a [OverlayLine],
}

#[derive(Serialize)]
struct BoundaryExport<'a> {
    label: String,
    phases: (usize, usize),
    points: &'a [(f64, f64)],
}

/// Computes the dominance map, boundary curves and precipitation overlays of a phase list.
pub fn compute_diagram(
    phases: &[Phase],
    temperature: Temperature,
    spec: &GridSpec,
) -> RedoxResult<PourbaixDiagram> {
    if phases.is_empty() {
        return Err(RedoxError::NoPhases);
    }
    spec.validate()?;
    let t_k = temperature.to_kelvin()?;
    let grid = StabilityGrid::evaluate(phases, spec, t_k)?;
    let dominance = grid.dominance_map();
    let boundaries = extract_boundaries(&grid, &dominance, phases);
    let precipitation = precipitation_overlays(phases, &grid.ph, grid.n_e());
    info!(
        "diagram of {} phases at {} K: {} boundaries, {} precipitation overlays",
        phases.len(),
        t_k,
        boundaries.len(),
        precipitation.len()
    );
    Ok(PourbaixDiagram {
        t_k,
        phase_names: phases.iter().map(|p| p.name.clone()).collect(),
        ph: grid.ph,
        e: grid.e,
        dominance,
        boundaries,
        precipitation,
        overlays: Vec::new(),
    })
}

fn nearest_index(axis: &[f64], x: f64) -> Option<usize> {
    let (first, last) = (*axis.first()?, *axis.last()?);
    if !x.is_finite() || x < first || x > last || axis.len() < 2 {
        return None;
    }
    let step = (last - first) / (axis.len() - 1) as f64;
    Some((((x - first) / step).round() as usize).min(axis.len() - 1))
}

impl PourbaixDiagram {
    /// dominant phase at the grid cell nearest to (pH, E); None outside the grid
    pub fn dominant_phase_at(&self, ph: f64, e: f64) -> Option<&str> {
        let j = nearest_index(&self.ph, ph)?;
        let i = nearest_index(&self.e, e)?;
        Some(self.phase_names[self.dominance[(i, j)]].as_str())
    }

    /// number of cells dominated by each phase, in catalog order
    pub fn cell_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.phase_names.len()];
        for &phase in self.dominance.iter() {
            counts[phase] += 1;
        }
        counts
    }

    pub fn boundary(&self, a: &str, b: &str) -> Option<&BoundaryCurve> {
        let ia = self.phase_names.iter().position(|n| n == a)?;
        let ib = self.phase_names.iter().position(|n| n == b)?;
        let key = (ia.min(ib), ia.max(ib));
        self.boundaries
            .iter()
            .find(|c| (c.phase_a, c.phase_b) == key)
    }

    pub fn add_line(&mut self, line: &NernstLine, points: usize) {
        let (ph_min, ph_max) = (self.ph[0], self.ph[self.ph.len() - 1]);
        self.overlays.push(OverlayLine {
            label: line.label.clone(),
            points: line.sample(ph_min, ph_max, points),
        });
    }

    /// O2/H2O and H+/H2 lines at the diagram temperature
    pub fn add_water_lines(&mut self, points: usize) -> RedoxResult<()> {
        let oxygen = oxygen_line(self.t_k)?;
        let hydrogen = hydrogen_line(self.t_k)?;
        self.add_line(&oxygen, points);
        self.add_line(&hydrogen, points);
        Ok(())
    }

    pub fn to_json(&self) -> RedoxResult<String> {
        let dominance: Vec<Vec<usize>> = self
            .dominance
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect();
        let boundaries: Vec<BoundaryExport> = self
            .boundaries
            .iter()
            .map(|curve| BoundaryExport {
                label: curve.label(&self.phase_names),
                phases: (curve.phase_a, curve.phase_b),
                points: &curve.points,
            })
            .collect();
        let export = DiagramExport {
            temperature_k: self.t_k,
            ph: &self.ph,
            e: &self.e,
            phases: &self.phase_names,
            dominance,
            boundaries,
            precipitation: &self.precipitation,
            overlays: &self.overlays,
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }

    pub fn pretty_print(&self) {
        let total = self.dominance.len() as f64;
        let mut table = Table::new();
        table.add_row(row!["phase", "cells", "share, %"]);
        for (name, count) in self.phase_names.iter().zip(self.cell_counts()) {
            table.add_row(row![name, count, format!("{:.1}", 100.0 * count as f64 / total)]);
        }
        table.printstd();

        let mut table = Table::new();
        table.add_row(row!["boundary", "points", "from (pH, E)", "to (pH, E)"]);
        for curve in &self.boundaries {
            let fmt_point = |p: Option<&(f64, f64)>| {
                p.map(|(ph, e)| format!("({:.2}, {:.3})", ph, e))
                    .unwrap_or_default()
            };
            table.add_row(row![
                curve.label(&self.phase_names),
                curve.points.len(),
                fmt_point(curve.points.first()),
                fmt_point(curve.points.last())
            ]);
        }
        table.printstd();
        for overlay in &self.precipitation {
            match overlay.onset_ph {
                Some(ph) => println!(
                    "{} precipitates as {} above pH {:.2} (log a = {})",
                    overlay.ion, overlay.precipitate, ph, overlay.log_activity
                ),
                None => println!("{} stays dissolved over the pH range", overlay.ion),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pourbaix::phase::PhaseCatalog;
    use crate::Thermodynamics::constants::F;
    use approx::assert_relative_eq;
    use serde_json::Value;

    #[test]
    fn test_two_phase_diagram() {
        let phases = vec![
            Phase::solid("A", 0.0, 0, 0, 1),
            Phase::solid("B", -100000.0, 2, 0, 1),
        ];
        let diagram = compute_diagram(
            &phases,
            Temperature::Kelvin(298.15),
            &GridSpec::with_resolution(8, 101),
        )
        .unwrap();
        assert_eq!(diagram.dominant_phase_at(3.0, -1.0), Some("A"));
        assert_eq!(diagram.dominant_phase_at(3.0, 0.0), Some("B"));
        let curve = diagram.boundary("B", "A").unwrap();
        assert_relative_eq!(curve.points[0].1, -100000.0 / (2.0 * F), epsilon = 1e-9);
        assert_eq!(diagram.dominant_phase_at(20.0, 0.0), None);
        assert_eq!(diagram.dominant_phase_at(f64::NAN, 0.0), None);
        assert_eq!(diagram.dominant_phase_at(3.0, f64::NAN), None);
    }

    #[test]
    fn test_failure_modes() {
        let spec = GridSpec::default();
        assert!(matches!(
            compute_diagram(&[], Temperature::Celsius(25.0), &spec),
            Err(RedoxError::NoPhases)
        ));
        let phases = PhaseCatalog::iron().phases;
        assert!(matches!(
            compute_diagram(&phases, Temperature::Celsius(25.0), &GridSpec::with_resolution(100, 1)),
            Err(RedoxError::InvalidGridResolution { .. })
        ));
        assert!(matches!(
            compute_diagram(&phases, Temperature::Kelvin(-5.0), &spec),
            Err(RedoxError::InvalidTemperature(_))
        ));
    }

    #[test]
    fn test_iron_diagram_regions() {
        let catalog = PhaseCatalog::iron();
        let diagram =
            compute_diagram(&catalog.phases, Temperature::Celsius(25.0), &GridSpec::default())
                .unwrap();
        assert_eq!(diagram.dominant_phase_at(0.0, 1.0), Some("Fe3+"));
        assert_eq!(diagram.dominant_phase_at(7.0, 0.5), Some("Fe2O3"));
        assert_eq!(diagram.dominant_phase_at(7.0, -1.5), Some("Fe"));
        assert_eq!(diagram.dominant_phase_at(2.0, 0.0), Some("Fe2+"));
        // Fe3+/Fe2+ boundary is horizontal near 0.77 V
        let couple = diagram.boundary("Fe2+", "Fe3+").unwrap();
        for (_, e) in &couple.points {
            assert_relative_eq!(*e, 0.7695, epsilon = 0.01);
        }
        assert!(diagram.cell_counts().iter().sum::<usize>() == 141 * 201);
        assert_eq!(diagram.precipitation.len(), 1);
    }

    #[test]
    fn test_dominance_is_deterministic() {
        let catalog = PhaseCatalog::iron();
        let spec = GridSpec::with_resolution(57, 83);
        let first = compute_diagram(&catalog.phases, Temperature::Celsius(25.0), &spec).unwrap();
        let second = compute_diagram(&catalog.phases, Temperature::Celsius(25.0), &spec).unwrap();
        assert_eq!(first.dominance, second.dominance);
        assert_eq!(first.boundaries, second.boundaries);
    }

    #[test]
    fn test_json_export_with_water_lines() {
        let catalog = PhaseCatalog::iron();
        let mut diagram = compute_diagram(
            &catalog.phases,
            Temperature::Celsius(25.0),
            &GridSpec::with_resolution(15, 21),
        )
        .unwrap();
        diagram.add_water_lines(50).unwrap();
        assert_eq!(diagram.overlays.len(), 2);
        let value: Value = serde_json::from_str(&diagram.to_json().unwrap()).unwrap();
        assert_eq!(value["phases"].as_array().unwrap().len(), 6);
        assert_eq!(value["dominance"].as_array().unwrap().len(), 21);
        assert_eq!(value["dominance"][0].as_array().unwrap().len(), 15);
        assert_eq!(value["overlays"][0]["label"], "O2/H2O");
        assert!(value["precipitation"][0].get("mask").is_none());
    }
}
