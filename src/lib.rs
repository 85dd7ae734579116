//! # RedoxThe
//!
//! Balancing, thermodynamics and potential-pH (Pourbaix) diagrams of redox reactions in
//! aqueous solution.
//!
//! - [`Reactions`]: normalization and parsing of reaction text, exact integer balancing,
//!   electrons and protons transferred
//! - [`Thermodynamics`]: dH, dS, dG(T), K(T), E0 and Nernst lines
//! - [`Pourbaix`]: dominance maps, phase boundaries and precipitation overlays
//! - [`Utils`]: task documents with THERMO, PHASES and REACTIONS sections
//! - [`settings`]: persistent configuration
//!
//! # Examples
//! ```
//! use RedoxThe::Reactions::User_reactions::RedoxTask;
//! use RedoxThe::Thermodynamics::reaction_thermo::{Temperature, ThermoPolicy};
//! use RedoxThe::Thermodynamics::thermo_lookup::ThermoLibrary;
//! let mut task = RedoxTask::with_options(
//!     "Fe^{3+} + e^- -> Fe^{2+}",
//!     Temperature::Celsius(25.0),
//!     ThermoPolicy::Lenient,
//!     0.01,
//! );
//! task.solve(&ThermoLibrary::builtin()).unwrap();
//! assert_eq!(task.balanced_equation().unwrap(), "Fe+3 + e-1 -> Fe+2");
//! let line = task.nernst_line().unwrap();
//! assert!((line.potential_at(7.0) - line.e0).abs() < 1e-12);
//! ```
#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod Pourbaix;
#[allow(non_snake_case)]
pub mod Reactions;
#[allow(non_snake_case)]
pub mod Thermodynamics;
#[allow(non_snake_case)]
pub mod Utils;
pub mod cli;
pub mod errors;
pub mod settings;
