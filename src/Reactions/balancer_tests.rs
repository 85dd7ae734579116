//////////////////////////////////////////////////////////////////////////////////////////////
// TESTS
//////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use crate::Reactions::species::Species;
    use crate::Reactions::stoichiometry_balancer::{
        balance, balance_equation, create_balance_matrix, integer_rref, null_space_vector,
        positive_null_space_point,
    };
    use crate::errors::RedoxError;

    fn species(tokens: &[&str]) -> Vec<Species> {
        tokens.iter().map(|t| Species::from_text(t).unwrap()).collect()
    }

    #[test]
    fn test_permanganate_half_reaction() {
        let balanced = balance_equation("MnO4- + 8H+1 + 5e-1 -> Mn+2 + 4H2O").unwrap();
        assert_eq!(balanced.reactant_coefficient("MnO4-1"), 1);
        assert_eq!(balanced.reactant_coefficient("H+1"), 8);
        assert_eq!(balanced.reactant_coefficient("e-1"), 5);
        assert_eq!(balanced.product_coefficient("Mn+2"), 1);
        assert_eq!(balanced.product_coefficient("H2O"), 4);
        assert!(!balanced.underdetermined);
        assert!(balanced.is_conserved());
        assert_eq!(
            balanced.equation(),
            "MnO4-1 + 8H+1 + 5e-1 -> Mn+2 + 4H2O"
        );
    }

    #[test]
    fn test_iron_couple() {
        let balanced = balance_equation("Fe+3 + e-1 -> Fe+2").unwrap();
        assert_eq!(balanced.reactant_coefficient("Fe+3"), 1);
        assert_eq!(balanced.reactant_coefficient("e-1"), 1);
        assert_eq!(balanced.product_coefficient("Fe+2"), 1);
        assert!(balanced.advisories().is_empty());
    }

    #[test]
    fn test_coefficients_in_input_are_ignored() {
        let balanced = balance_equation("7H2 + 3O2 -> 5H2O").unwrap();
        assert_eq!(balanced.equation(), "2H2 + O2 -> 2H2O");
    }

    #[test]
    fn test_combustion() {
        let balanced = balance_equation("C3H8 + O2 -> CO2 + H2O").unwrap();
        assert_eq!(balanced.equation(), "C3H8 + 5O2 -> 3CO2 + 4H2O");
        assert!(balanced.is_conserved());
    }

    #[test]
    fn test_dichromate() {
        let balanced =
            balance_equation("Cr2O7^{2-} + H+ + Fe^{2+} -> Cr^{3+} + Fe^{3+} + H2O").unwrap();
        assert_eq!(
            balanced.equation(),
            "Cr2O7-2 + 14H+1 + 6Fe+2 -> 2Cr+3 + 6Fe+3 + 7H2O"
        );
        assert!(balanced.is_conserved());
    }

    #[test]
    fn test_underdetermined_policy() {
        let balanced = balance_equation("H2 + O2 -> H2O + H2O2").unwrap();
        assert!(balanced.underdetermined);
        assert_eq!(balanced.free_parameters, 2);
        assert_eq!(balanced.equation(), "4H2 + 3O2 -> 2H2O + 2H2O2");
        assert!(balanced.is_conserved());
        assert_eq!(balanced.advisories().len(), 1);
    }

    #[test]
    fn test_underdetermined_with_negative_all_ones_point() {
        // NO2 = H2O = 1 would need a negative amount of NO
        let balanced = balance_equation("NH3 + O2 -> NO + NO2 + H2O").unwrap();
        assert!(balanced.underdetermined);
        assert_eq!(balanced.free_parameters, 2);
        assert_eq!(balanced.equation(), "2NH3 + 3O2 -> NO + NO2 + 3H2O");
        assert!(balanced.is_conserved());
        assert!(balanced.reactants.iter().chain(&balanced.products).all(|(_, c)| *c > 0));
        assert_eq!(balanced.advisories().len(), 1);
    }

    #[test]
    fn test_positive_point_search() {
        let (matrix, _) = create_balance_matrix(
            &species(&["NH3", "O2"]),
            &species(&["NO", "NO2", "H2O"]),
        );
        let (reduced, pivots) = integer_rref(&matrix).unwrap();
        let (ones, free) = null_space_vector(&reduced, &pivots).unwrap().unwrap();
        assert_eq!(free, 2);
        assert!(ones.iter().any(|v| *v < 0) && ones.iter().any(|v| *v > 0));
        let positive = positive_null_space_point(&reduced, &pivots, free)
            .unwrap()
            .unwrap();
        assert_eq!(positive, vec![2, 3, 1, 1, 3]);
        // the point stays in the null space
        for row in 0..matrix.nrows() {
            let sum: i128 = (0..matrix.ncols()).map(|j| matrix[(row, j)] * positive[j]).sum();
            assert_eq!(sum, 0);
        }
    }

    #[test]
    fn test_spectator_species_is_dropped() {
        // nitrogen appears only in N2, so its coefficient balances to zero
        let balanced = balance_equation("H2 + O2 + N2 -> H2O").unwrap();
        assert_eq!(balanced.equation(), "2H2 + O2 -> 2H2O");
        assert_eq!(balanced.reactant_coefficient("N2"), 0);
        assert_eq!(balanced.reactants.len(), 2);
        assert!(!balanced.underdetermined);
        assert!(balanced.is_conserved());
    }

    #[test]
    fn test_rebalancing_is_idempotent() {
        for equation in [
            "MnO4- + H+ + e- -> Mn+2 + H2O",
            "C3H8 + O2 -> CO2 + H2O",
            "Fe+3 + e -> Fe+2",
        ] {
            let first = balance_equation(equation).unwrap();
            let again = balance_equation(&first.equation()).unwrap();
            assert_eq!(first.reactants, again.reactants);
            for ((s1, c1), (s2, c2)) in first.products.iter().zip(again.products.iter()) {
                assert_eq!(s1, s2);
                assert_eq!(c1, c2);
            }
            for ((_, c1), (_, c2)) in first.reactants.iter().zip(again.reactants.iter()) {
                assert_eq!(c1, c2);
            }
        }
    }

    #[test]
    fn test_species_on_both_sides() {
        let result = balance(&species(&["H2O"]), &species(&["H2O", "O2"]));
        match result {
            Err(RedoxError::SpeciesOnBothSides(common)) => assert_eq!(common, vec!["H2O"]),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_species() {
        let result = balance(&species(&["H2", "H2"]), &species(&["H2O"]));
        assert!(matches!(result, Err(RedoxError::DuplicateSpecies(id)) if id == "H2"));
    }

    #[test]
    fn test_no_solution() {
        assert!(matches!(
            balance_equation("H2 -> O2"),
            Err(RedoxError::NoBalanceSolution(_))
        ));
        // charge cannot be conserved without electrons
        assert!(matches!(
            balance_equation("Fe+3 -> Fe+2"),
            Err(RedoxError::NoBalanceSolution(_))
        ));
        // oxygen would have to appear as a product
        assert!(matches!(
            balance_equation("H2O + O2 -> H2"),
            Err(RedoxError::NoBalanceSolution(_))
        ));
    }

    #[test]
    fn test_balance_matrix_and_rref() {
        let (matrix, rows) = create_balance_matrix(&species(&["H2", "O2"]), &species(&["H2O"]));
        assert_eq!(rows, vec!["H", "O", "charge"]);
        assert_eq!(matrix[(0, 0)], 2);
        assert_eq!(matrix[(0, 2)], -2);
        assert_eq!(matrix[(1, 2)], -1);
        let (_, pivots) = integer_rref(&matrix).unwrap();
        assert_eq!(pivots.len(), 2);
    }
}
