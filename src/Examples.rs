/// worked examples: balancing, reaction thermodynamics, Nernst lines, Pourbaix diagrams
pub mod redox_examples;
