//! Hydroxide precipitation overlay.
//!
//! For M(OH)n(s) <-> M^n+ + n OH-, log[M]sat = log Ksp - n*log[OH-] with log[OH-] = pH - pKw.
//! A cell is flagged when the configured ion activity exceeds the saturation activity. The
//! overlay depends on pH only and is kept apart from the Ψ minimisation.
use crate::Pourbaix::phase::Phase;
use crate::Thermodynamics::constants::PKW;
use nalgebra::DMatrix;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecipitationOverlay {
    /// index of the aqueous phase in the catalog
    pub phase: usize,
    pub ion: String,
    pub precipitate: String,
    pub log_activity: f64,
    /// (pH, log10 saturation activity)
    pub saturation: Vec<(f64, f64)>,
    /// lowest grid pH at which the ion precipitates
    pub onset_ph: Option<f64>,
    /// [(e_index, ph_index)], true where the ion precipitates
    #[serde(skip)]
    pub mask: DMatrix<bool>,
}

impl PrecipitationOverlay {
    pub fn is_precipitated(&self, e_index: usize, ph_index: usize) -> bool {
        self.mask[(e_index, ph_index)]
    }

    pub fn precipitated_columns(&self) -> Vec<bool> {
        (0..self.mask.ncols()).map(|j| self.mask[(0, j)]).collect()
    }
}

/// log10 of the saturation activity of M^n+ at the given pH
pub fn saturation_log_activity(log_ksp: f64, hydroxide_count: u32, ph: f64) -> f64 {
    log_ksp - hydroxide_count as f64 * (ph - PKW)
}

/// one overlay per phase that carries solubility data
pub fn precipitation_overlays(
    phases: &[Phase],
    ph_axis: &[f64],
    n_e: usize,
) -> Vec<PrecipitationOverlay> {
    phases
        .iter()
        .enumerate()
        .filter_map(|(index, phase)| {
            let solubility = phase.solubility.as_ref()?;
            let log_activity = phase.log_activity.unwrap_or(0.0);
            let saturation: Vec<(f64, f64)> = ph_axis
                .iter()
                .map(|&ph| {
                    (
                        ph,
                        saturation_log_activity(solubility.log_ksp, solubility.hydroxide_count, ph),
                    )
                })
                .collect();
            let columns: Vec<bool> = saturation
                .iter()
                .map(|&(_, log_sat)| log_activity > log_sat)
                .collect();
            let onset_ph = saturation
                .iter()
                .zip(&columns)
                .find(|(_, flagged)| **flagged)
                .map(|((ph, _), _)| *ph);
            Some(PrecipitationOverlay {
                phase: index,
                ion: phase.name.clone(),
                precipitate: solubility.precipitate.clone(),
                log_activity,
                saturation,
                onset_ph,
                mask: DMatrix::from_fn(n_e, ph_axis.len(), |_, j| columns[j]),
            })
        })
        .collect()
}
