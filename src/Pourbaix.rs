//! # Pourbaix
//!
//! Potential-pH (Pourbaix) diagrams of a metal-water system.
//!
//! Every phase gets the normalized potential function
//! `Ψ(pH, E) = (Gf/F + S*log10(a) - z*E - k*S*pH) / m`, `S = R*T*ln(10)/F`,
//! sampled on a pH x E grid. The dominant phase of a cell is the one with the lowest Ψ.
//! Boundaries are the zero lines of Ψ_i - Ψ_j between regions that touch, and hydroxide
//! precipitation (Ksp) is reported as a separate overlay.
//!
//! # Examples
//! ```
//! use RedoxThe::Pourbaix::diagram::compute_diagram;
//! use RedoxThe::Pourbaix::phase::PhaseCatalog;
//! use RedoxThe::Pourbaix::stability_grid::GridSpec;
//! use RedoxThe::Thermodynamics::reaction_thermo::Temperature;
//! let catalog = PhaseCatalog::iron();
//! let diagram = compute_diagram(
//!     &catalog.phases,
//!     Temperature::Celsius(25.0),
//!     &GridSpec::with_resolution(71, 101),
//! )
//! .unwrap();
//! assert_eq!(diagram.dominant_phase_at(7.0, -1.5), Some("Fe"));
//! ```
/// zero lines of Ψ_i - Ψ_j clipped to touching dominance regions
pub mod boundaries;
pub mod diagram;
/// phases and built-in catalogs
pub mod phase;
/// Ksp saturation overlay
pub mod precipitation;
/// axes, Ψ evaluation and the dominance map
pub mod stability_grid;
