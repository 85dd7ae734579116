use crate::Reactions::formula_normalizer::{ELECTRON, PROTON};
use crate::Reactions::stoichiometry_balancer::BalancedReaction;
use serde::{Deserialize, Serialize};

/// Electrochemical invariants of a balanced reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectrochemFeatures {
    /// net number of electrons transferred, |e(reactants) - e(products)|
    pub n: i64,
    /// signed net number of protons consumed, H+(reactants) - H+(products)
    pub m: i64,
}

impl ElectrochemFeatures {
    pub fn is_redox(&self) -> bool {
        self.n > 0
    }
}

/// Extracts (n, m) from the balanced coefficients. Species absent from a side count as 0.
pub fn extract_features(balanced: &BalancedReaction) -> ElectrochemFeatures {
    let n = (balanced.reactant_coefficient(ELECTRON) - balanced.product_coefficient(ELECTRON)).abs();
    let m = balanced.reactant_coefficient(PROTON) - balanced.product_coefficient(PROTON);
    ElectrochemFeatures { n, m }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Reactions::stoichiometry_balancer::balance_equation;

    #[test]
    fn test_permanganate_features() {
        let balanced = balance_equation("MnO4- + 8H+1 + 5e-1 -> Mn+2 + 4H2O").unwrap();
        assert_eq!(extract_features(&balanced), ElectrochemFeatures { n: 5, m: 8 });
    }

    #[test]
    fn test_iron_couple_features() {
        let balanced = balance_equation("Fe+3 + e-1 -> Fe+2").unwrap();
        let features = extract_features(&balanced);
        assert_eq!(features, ElectrochemFeatures { n: 1, m: 0 });
        assert!(features.is_redox());
    }

    #[test]
    fn test_oxidation_written_with_products_electrons() {
        // protons released: m is negative, n stays positive
        let balanced = balance_equation("H2O -> O2 + H+ + e-").unwrap();
        let features = extract_features(&balanced);
        assert_eq!(features.n, 4);
        assert_eq!(features.m, -4);
    }

    #[test]
    fn test_no_electrons() {
        let balanced = balance_equation("H2 + O2 -> H2O").unwrap();
        let features = extract_features(&balanced);
        assert_eq!(features, ElectrochemFeatures { n: 0, m: 0 });
        assert!(!features.is_redox());
    }
}
