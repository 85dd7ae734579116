//! Integer balancing of (electro)chemical reactions.
//!
//! Every element and the total charge give one conservation equation over the coefficients;
//! reactant columns enter with "+", product columns with "-". The coefficients are a
//! non-negative integer vector of the null space of that matrix. The null space is computed
//! exactly: fraction-free row reduction over i128 with gcd-normalised rows, no floating point.
use crate::Reactions::formula_normalizer::ARROW;
use crate::Reactions::reaction_parser::parse_reaction;
use crate::Reactions::species::Species;
use crate::errors::{Advisory, RedoxError, RedoxResult};
use log::{debug, info, warn};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// A balanced reaction: every element and the total charge are conserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalancedReaction {
    pub reactants: Vec<(Species, i64)>,
    pub products: Vec<(Species, i64)>,
    /// the null space had more than one dimension; the coefficients are one solution among many
    pub underdetermined: bool,
    pub free_parameters: usize,
}

impl BalancedReaction {
    fn side_coefficient(side: &[(Species, i64)], id: &str) -> i64 {
        side.iter()
            .filter(|(species, _)| species.id.eq_ignore_ascii_case(id))
            .map(|(_, coeff)| *coeff)
            .sum()
    }

    /// coefficient of a species on the reactant side, 0 when absent
    pub fn reactant_coefficient(&self, id: &str) -> i64 {
        Self::side_coefficient(&self.reactants, id)
    }

    /// coefficient of a species on the product side, 0 when absent
    pub fn product_coefficient(&self, id: &str) -> i64 {
        Self::side_coefficient(&self.products, id)
    }

    /// canonical formatted equation, coefficient 1 omitted
    pub fn equation(&self) -> String {
        format!(
            "{}{}{}",
            format_side(&self.reactants),
            ARROW,
            format_side(&self.products)
        )
    }

    pub fn advisories(&self) -> Vec<Advisory> {
        if self.underdetermined {
            vec![Advisory::Underdetermined {
                free_parameters: self.free_parameters,
            }]
        } else {
            Vec::new()
        }
    }

    /// checks element and charge conservation
    pub fn is_conserved(&self) -> bool {
        let mut elements: BTreeSet<&String> = BTreeSet::new();
        for (species, _) in self.reactants.iter().chain(self.products.iter()) {
            elements.extend(species.composition.keys());
        }
        let side_sum = |side: &[(Species, i64)], f: &dyn Fn(&Species) -> i64| -> i64 {
            side.iter().map(|(s, c)| c * f(s)).sum()
        };
        let elements_ok = elements.iter().all(|element| {
            side_sum(&self.reactants, &|s| s.count_of(element))
                == side_sum(&self.products, &|s| s.count_of(element))
        });
        elements_ok
            && side_sum(&self.reactants, &|s| s.charge) == side_sum(&self.products, &|s| s.charge)
    }
}

pub fn format_side(side: &[(Species, i64)]) -> String {
    side.iter()
        .map(|(species, coeff)| {
            if *coeff == 1 {
                species.id.clone()
            } else {
                format!("{}{}", coeff, species.id)
            }
        })
        .collect::<Vec<_>>()
        .join(" + ")
}

fn gcd(a: i128, b: i128) -> i128 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn lcm(a: i128, b: i128) -> Option<i128> {
    if a == 0 || b == 0 {
        return Some(0);
    }
    (a / gcd(a, b)).checked_mul(b).map(|v| v.abs())
}

fn overflow() -> RedoxError {
    RedoxError::NoBalanceSolution("integer overflow while reducing the balance matrix".to_string())
}

/// Builds the conservation matrix: one row per element (sorted) plus a final charge row,
/// one column per species, reactants "+" and products "-".
pub fn create_balance_matrix(
    reactants: &[Species],
    products: &[Species],
) -> (DMatrix<i128>, Vec<String>) {
    let mut elements: BTreeSet<String> = BTreeSet::new();
    for species in reactants.iter().chain(products.iter()) {
        elements.extend(species.composition.keys().cloned());
    }
    let mut row_names: Vec<String> = elements.into_iter().collect();
    row_names.push("charge".to_string());
    let n_rows = row_names.len();
    let n_cols = reactants.len() + products.len();
    let mut matrix = DMatrix::<i128>::zeros(n_rows, n_cols);
    let columns = reactants
        .iter()
        .map(|s| (s, 1i128))
        .chain(products.iter().map(|s| (s, -1i128)));
    for (j, (species, sign)) in columns.enumerate() {
        for (i, element) in row_names[..n_rows - 1].iter().enumerate() {
            matrix[(i, j)] = sign * species.count_of(element) as i128;
        }
        matrix[(n_rows - 1, j)] = sign * species.charge as i128;
    }
    (matrix, row_names)
}

fn normalize_row(matrix: &mut DMatrix<i128>, row: usize) {
    let g = matrix.row(row).iter().fold(0, |acc, v| gcd(acc, *v));
    if g > 1 {
        for j in 0..matrix.ncols() {
            matrix[(row, j)] /= g;
        }
    }
}

/// Fraction-free reduced row echelon form. Returns (reduced matrix, pivots as (row, column)).
/// Every pivot column is zero outside its pivot row.
pub fn integer_rref(matrix: &DMatrix<i128>) -> RedoxResult<(DMatrix<i128>, Vec<(usize, usize)>)> {
    let mut a = matrix.clone();
    let (rows, cols) = a.shape();
    let mut pivots = Vec::new();
    let mut r = 0;
    for c in 0..cols {
        if r >= rows {
            break;
        }
        let Some(p) = (r..rows).find(|&p| a[(p, c)] != 0) else {
            continue;
        };
        a.swap_rows(r, p);
        normalize_row(&mut a, r);
        let pivot = a[(r, c)];
        for k in 0..rows {
            if k == r || a[(k, c)] == 0 {
                continue;
            }
            let factor = a[(k, c)];
            for j in 0..cols {
                let value = a[(k, j)]
                    .checked_mul(pivot)
                    .and_then(|v| v.checked_sub(a[(r, j)].checked_mul(factor)?))
                    .ok_or_else(overflow)?;
                a[(k, j)] = value;
            }
            normalize_row(&mut a, k);
        }
        pivots.push((r, c));
        r += 1;
    }
    Ok((a, pivots))
}

fn free_columns(reduced: &DMatrix<i128>, pivots: &[(usize, usize)]) -> Vec<usize> {
    let pivot_cols: HashSet<usize> = pivots.iter().map(|(_, c)| *c).collect();
    (0..reduced.ncols()).filter(|c| !pivot_cols.contains(c)).collect()
}

/// Integer null space vector for the given values of the free columns, scaled by the common
/// denominator of the pivots and reduced by the gcd of its entries.
pub fn null_space_point(
    reduced: &DMatrix<i128>,
    pivots: &[(usize, usize)],
    weights: &[i128],
) -> RedoxResult<Vec<i128>> {
    let free = free_columns(reduced, pivots);
    // x_pc = -(sum over free f of a[r, f] * w_f) / a[r, pc]
    let mut denominator: i128 = 1;
    for (r, pc) in pivots {
        denominator = lcm(denominator, reduced[(*r, *pc)]).ok_or_else(overflow)?;
    }
    let mut x = vec![0i128; reduced.ncols()];
    for (f, w) in free.iter().zip(weights) {
        x[*f] = denominator.checked_mul(*w).ok_or_else(overflow)?;
    }
    for (r, pc) in pivots {
        let mut numerator: i128 = 0;
        for (f, w) in free.iter().zip(weights) {
            numerator = reduced[(*r, *f)]
                .checked_mul(*w)
                .and_then(|v| numerator.checked_add(v))
                .ok_or_else(overflow)?;
        }
        x[*pc] = (-numerator)
            .checked_mul(denominator / reduced[(*r, *pc)])
            .ok_or_else(overflow)?;
    }
    let g = x.iter().fold(0, |acc, v| gcd(acc, *v));
    if g > 1 {
        x.iter_mut().for_each(|v| *v /= g);
    }
    Ok(x)
}

/// Null space vector with every free column set to 1, and the number of free columns.
/// None when there is no free column.
pub fn null_space_vector(
    reduced: &DMatrix<i128>,
    pivots: &[(usize, usize)],
) -> RedoxResult<Option<(Vec<i128>, usize)>> {
    let free = free_columns(reduced, pivots).len();
    if free == 0 {
        return Ok(None);
    }
    let x = null_space_point(reduced, pivots, &vec![1; free])?;
    Ok(Some((x, free)))
}

/// all entries of one sign, flipped to non-negative; None for a mixed-sign vector
fn oriented(mut x: Vec<i128>) -> Option<Vec<i128>> {
    if x.iter().all(|v| *v <= 0) {
        x.iter_mut().for_each(|v| *v = -*v);
    }
    x.iter().all(|v| *v >= 0).then_some(x)
}

/// Largest value tried for each free parameter, kept so that the whole search stays
/// below `MAX_WEIGHT_COMBINATIONS` points.
const MAX_FREE_WEIGHT: i128 = 6;
const MAX_WEIGHT_COMBINATIONS: f64 = 1e5;

/// Searches free-parameter values 1..=MAX_FREE_WEIGHT for a non-negative point of a multi-dimensional
/// null space. Strictly positive points win over points with zeros, then the smallest sum of
/// coefficients, then the first point in lexicographic order of the weights.
pub fn positive_null_space_point(
    reduced: &DMatrix<i128>,
    pivots: &[(usize, usize)],
    free: usize,
) -> RedoxResult<Option<Vec<i128>>> {
    let max_weight = (1..=MAX_FREE_WEIGHT)
        .rev()
        .find(|w| (*w as f64).powi(free as i32) <= MAX_WEIGHT_COMBINATIONS)
        .unwrap_or(1);
    let mut best: Option<((bool, i128), Vec<i128>)> = None;
    let mut weights = vec![1i128; free];
    loop {
        if let Some(x) = oriented(null_space_point(reduced, pivots, &weights)?) {
            let key = (x.contains(&0), x.iter().sum::<i128>());
            let better = best.as_ref().is_none_or(|(best_key, _)| key < *best_key);
            if better && key.1 > 0 {
                best = Some((key, x));
            }
        }
        // odometer over 1..=max_weight
        let Some(i) = weights.iter().rposition(|w| *w < max_weight) else {
            break;
        };
        weights[i] += 1;
        weights[i + 1..].iter_mut().for_each(|w| *w = 1);
    }
    Ok(best.map(|(_, x)| x))
}

fn check_sets(reactants: &[Species], products: &[Species]) -> RedoxResult<()> {
    for side in [reactants, products] {
        let mut seen = HashSet::new();
        for species in side {
            if !seen.insert(&species.id) {
                return Err(RedoxError::DuplicateSpecies(species.id.clone()));
            }
        }
    }
    let reactant_ids: HashSet<&String> = reactants.iter().map(|s| &s.id).collect();
    let mut common: Vec<String> = products
        .iter()
        .filter(|s| reactant_ids.contains(&s.id))
        .map(|s| s.id.clone())
        .collect();
    if !common.is_empty() {
        common.sort();
        return Err(RedoxError::SpeciesOnBothSides(common));
    }
    Ok(())
}

/// Balances a reaction given its species sets
/// # Examples
/// ```
/// use RedoxThe::Reactions::species::Species;
/// use RedoxThe::Reactions::stoichiometry_balancer::balance;
/// let reactants = vec![Species::parse("H2").unwrap(), Species::parse("O2").unwrap()];
/// let products = vec![Species::parse("H2O").unwrap()];
/// let balanced = balance(&reactants, &products).unwrap();
/// assert_eq!(balanced.equation(), "2H2 + O2 -> 2H2O");
/// ```
pub fn balance(reactants: &[Species], products: &[Species]) -> RedoxResult<BalancedReaction> {
    check_sets(reactants, products)?;
    let (matrix, row_names) = create_balance_matrix(reactants, products);
    debug!(
        "balance matrix {}x{} over rows {:?}: {}",
        matrix.nrows(),
        matrix.ncols(),
        row_names,
        matrix
    );
    let (reduced, pivots) = integer_rref(&matrix)?;
    let Some((mut x, free_parameters)) = null_space_vector(&reduced, &pivots)? else {
        return Err(RedoxError::NoBalanceSolution(
            "element or charge counts cannot be conserved".to_string(),
        ));
    };
    debug!("null space dimension {}, vector {:?}", free_parameters, x);
    if x.iter().all(|v| *v <= 0) {
        x.iter_mut().for_each(|v| *v = -*v);
    }
    if free_parameters > 1 && x.iter().any(|v| *v < 0) {
        if let Some(positive) = positive_null_space_point(&reduced, &pivots, free_parameters)? {
            debug!("all-ones point {:?} is not a balance, using {:?}", x, positive);
            x = positive;
        }
    }
    let all_species: Vec<&Species> = reactants.iter().chain(products.iter()).collect();
    if let Some(i) = x.iter().position(|v| *v < 0) {
        return Err(RedoxError::NoBalanceSolution(format!(
            "species {} would need a negative coefficient (it belongs on the other side)",
            all_species[i].id
        )));
    }
    let mut balanced_reactants = Vec::new();
    let mut balanced_products = Vec::new();
    for (j, species) in all_species.iter().enumerate() {
        if x[j] == 0 {
            debug!("species {} balances out and is dropped", species.id);
            continue;
        }
        let coeff = i64::try_from(x[j]).map_err(|_| overflow())?;
        if j < reactants.len() {
            balanced_reactants.push(((*species).clone(), coeff));
        } else {
            balanced_products.push(((*species).clone(), coeff));
        }
    }
    if balanced_reactants.is_empty() || balanced_products.is_empty() {
        return Err(RedoxError::NoBalanceSolution(
            "only the trivial solution conserves every element".to_string(),
        ));
    }
    let balanced = BalancedReaction {
        reactants: balanced_reactants,
        products: balanced_products,
        underdetermined: free_parameters > 1,
        free_parameters,
    };
    if balanced.underdetermined {
        warn!(
            "reaction {} is a combination of {} independent reactions; one of its balances is used",
            balanced.equation(),
            free_parameters
        );
    }
    info!("balanced: {}", balanced.equation());
    Ok(balanced)
}

/// Balances normalized species tokens
pub fn balance_tokens(reactants: &[String], products: &[String]) -> RedoxResult<BalancedReaction> {
    let reactants = reactants
        .iter()
        .map(|t| Species::parse(t))
        .collect::<RedoxResult<Vec<_>>>()?;
    let products = products
        .iter()
        .map(|t| Species::parse(t))
        .collect::<RedoxResult<Vec<_>>>()?;
    balance(&reactants, &products)
}

/// Parses and balances a free-form reaction string
pub fn balance_equation(equation: &str) -> RedoxResult<BalancedReaction> {
    let parsed = parse_reaction(equation)?;
    balance_tokens(&parsed.reactants, &parsed.products)
}
