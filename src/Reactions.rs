//! # Reactions
//!
//! From free-form reaction text to a balanced reaction:
//! - `formula_normalizer`: charge, arrow and electron spellings to canonical form
//! - `reaction_parser`: splitting a reaction into species tokens
//! - `species`: elemental composition, charge and molar mass of a species
//! - `stoichiometry_balancer`: exact integer null space of the conservation matrix
//! - `electrochem_features`: electrons transferred (n) and protons consumed (m)
//! - `User_reactions`: a reaction task combining all of the above with thermodynamics
//!
//! # Examples
//! ```
//! use RedoxThe::Reactions::stoichiometry_balancer::balance_equation;
//! use RedoxThe::Reactions::electrochem_features::extract_features;
//! let balanced = balance_equation("MnO4^- + H^+ + e^- = Mn^{2+} + H2O").unwrap();
//! assert_eq!(balanced.equation(), "MnO4-1 + 8H+1 + 5e-1 -> Mn+2 + 4H2O");
//! let features = extract_features(&balanced);
//! assert_eq!((features.n, features.m), (5, 8));
//! ```
#[allow(non_snake_case)]
pub mod User_reactions;
mod balancer_tests;
pub mod electrochem_features;
pub mod formula_normalizer;
pub mod reaction_parser;
pub mod species;
pub mod stoichiometry_balancer;
