//! # Thermodynamics
//!
//! Reaction-level thermodynamics of balanced reactions:
//! - `thermo_lookup`: the species-property lookup contract ([`thermo_lookup::ThermoLookup`]),
//!   the built-in standard-state table and user libraries
//! - `reaction_thermo`: dH, dS, dG(T), K(T), E0 and the spontaneity classification
//! - `nernst`: potential vs pH lines of half-reactions and the water stability lines
//!
//! # Examples
//! ```
//! use RedoxThe::Reactions::stoichiometry_balancer::balance_equation;
//! use RedoxThe::Thermodynamics::reaction_thermo::{ReactionThermo, Temperature, ThermoPolicy};
//! use RedoxThe::Thermodynamics::thermo_lookup::ThermoLibrary;
//! let balanced = balance_equation("Fe+3 + e- -> Fe+2").unwrap();
//! let summary = ReactionThermo::from_reaction(
//!     &balanced,
//!     Temperature::Celsius(25.0),
//!     &ThermoLibrary::builtin(),
//!     ThermoPolicy::Lenient,
//!     0.01,
//! )
//! .unwrap();
//! assert!((summary.e0.unwrap() - 0.77).abs() < 0.02);
//! ```
/// physical constants and the Nernst slope factor
pub mod constants;
/// potential vs pH lines
pub mod nernst;
/// dH, dS, dG, K, E0 of a balanced reaction
pub mod reaction_thermo;
pub mod thermo_lookup;
