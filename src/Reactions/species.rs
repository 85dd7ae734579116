//! Species identity, element composition and molar mass.
//!
//! A species is a canonical identifier (formula + explicit charge, "Fe+3", "MnO4-1", "H2O"),
//! its element composition and its charge. Two species are equal iff their identifiers are.
use crate::Reactions::formula_normalizer::{ELECTRON, PROTON, normalize_species};
use crate::errors::{RedoxError, RedoxResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

// Define a struct to hold element data
pub struct Element {
    pub name: &'static str,
    pub atomic_mass: f64,
}

// Define a list of elements and their atomic masses
pub const ELEMENTS: &[Element] = &[
    Element { name: "H", atomic_mass: 1.008 },
    Element { name: "He", atomic_mass: 4.0026 },
    Element { name: "Li", atomic_mass: 6.94 },
    Element { name: "Be", atomic_mass: 9.0122 },
    Element { name: "B", atomic_mass: 10.81 },
    Element { name: "C", atomic_mass: 12.011 },
    Element { name: "N", atomic_mass: 14.007 },
    Element { name: "O", atomic_mass: 15.999 },
    Element { name: "F", atomic_mass: 18.998 },
    Element { name: "Ne", atomic_mass: 20.18 },
    Element { name: "Na", atomic_mass: 22.99 },
    Element { name: "Mg", atomic_mass: 24.305 },
    Element { name: "Al", atomic_mass: 26.982 },
    Element { name: "Si", atomic_mass: 28.085 },
    Element { name: "P", atomic_mass: 30.974 },
    Element { name: "S", atomic_mass: 32.065 },
    Element { name: "Cl", atomic_mass: 35.45 },
    Element { name: "Ar", atomic_mass: 39.948 },
    Element { name: "K", atomic_mass: 39.098 },
    Element { name: "Ca", atomic_mass: 40.078 },
    Element { name: "Sc", atomic_mass: 44.956 },
    Element { name: "Ti", atomic_mass: 47.867 },
    Element { name: "V", atomic_mass: 50.942 },
    Element { name: "Cr", atomic_mass: 51.996 },
    Element { name: "Mn", atomic_mass: 54.938 },
    Element { name: "Fe", atomic_mass: 55.845 },
    Element { name: "Co", atomic_mass: 58.933 },
    Element { name: "Ni", atomic_mass: 58.693 },
    Element { name: "Cu", atomic_mass: 63.546 },
    Element { name: "Zn", atomic_mass: 65.38 },
    Element { name: "Ga", atomic_mass: 69.723 },
    Element { name: "Ge", atomic_mass: 72.63 },
    Element { name: "As", atomic_mass: 74.922 },
    Element { name: "Se", atomic_mass: 78.971 },
    Element { name: "Br", atomic_mass: 79.904 },
    Element { name: "Kr", atomic_mass: 83.798 },
    Element { name: "Rb", atomic_mass: 85.468 },
    Element { name: "Sr", atomic_mass: 87.62 },
    Element { name: "Y", atomic_mass: 88.906 },
    Element { name: "Zr", atomic_mass: 91.224 },
    Element { name: "Nb", atomic_mass: 92.906 },
    Element { name: "Mo", atomic_mass: 95.95 },
    Element { name: "Tc", atomic_mass: 98.0 },
    Element { name: "Ru", atomic_mass: 101.07 },
    Element { name: "Rh", atomic_mass: 102.91 },
    Element { name: "Pd", atomic_mass: 106.42 },
    Element { name: "Ag", atomic_mass: 107.87 },
    Element { name: "Cd", atomic_mass: 112.41 },
    Element { name: "In", atomic_mass: 114.82 },
    Element { name: "Sn", atomic_mass: 118.71 },
    Element { name: "Sb", atomic_mass: 121.76 },
    Element { name: "Te", atomic_mass: 127.6 },
    Element { name: "I", atomic_mass: 126.9 },
    Element { name: "Xe", atomic_mass: 131.29 },
    Element { name: "Cs", atomic_mass: 132.91 },
    Element { name: "Ba", atomic_mass: 137.33 },
    Element { name: "La", atomic_mass: 138.91 },
    Element { name: "Ce", atomic_mass: 140.12 },
    Element { name: "W", atomic_mass: 183.84 },
    Element { name: "Pt", atomic_mass: 195.08 },
    Element { name: "Au", atomic_mass: 196.97 },
    Element { name: "Hg", atomic_mass: 200.59 },
    Element { name: "Tl", atomic_mass: 204.38 },
    Element { name: "Pb", atomic_mass: 207.2 },
    Element { name: "Bi", atomic_mass: 208.98 },
    Element { name: "U", atomic_mass: 238.03 },
];

static CHARGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.*?)([+-])(\d+)$").unwrap());

pub fn find_element(symbol: &str) -> Option<&'static Element> {
    ELEMENTS.iter().find(|element| element.name == symbol)
}

fn invalid(formula: &str, reason: &str) -> RedoxError {
    RedoxError::InvalidFormula {
        formula: formula.to_string(),
        reason: reason.to_string(),
    }
}

fn read_count(formula: &str, chars: &[char], mut i: usize) -> RedoxResult<(i64, usize)> {
    let start = i;
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    if start == i {
        return Ok((1, i));
    }
    let digits: String = chars[start..i].iter().collect();
    let count = digits
        .parse()
        .map_err(|_| invalid(formula, &format!("count {} does not fit an integer", digits)))?;
    Ok((count, i))
}

fn add_count(formula: &str, total: &mut i64, count: i64) -> RedoxResult<()> {
    *total = total
        .checked_add(count)
        .ok_or_else(|| invalid(formula, "element count does not fit an integer"))?;
    Ok(())
}

/// Element counts of a neutral formula (no charge suffix). Parenthesis groups may be nested,
/// "Ca(NO3)2" gives {Ca: 1, N: 2, O: 6}.
pub fn parse_composition(formula: &str) -> RedoxResult<BTreeMap<String, i64>> {
    if formula.is_empty() {
        return Err(invalid(formula, "empty formula"));
    }
    let chars: Vec<char> = formula.chars().collect();
    let mut stack: Vec<BTreeMap<String, i64>> = vec![BTreeMap::new()];
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '(' {
            stack.push(BTreeMap::new());
            i += 1;
        } else if c == ')' {
            let group = stack.pop().ok_or_else(|| invalid(formula, "unbalanced ')'"))?;
            let (multiplicity, next) = read_count(formula, &chars, i + 1)?;
            i = next;
            let top = stack
                .last_mut()
                .ok_or_else(|| invalid(formula, "unbalanced ')'"))?;
            for (element, count) in group {
                let count = count
                    .checked_mul(multiplicity)
                    .ok_or_else(|| invalid(formula, "element count does not fit an integer"))?;
                add_count(formula, top.entry(element).or_insert(0), count)?;
            }
        } else if c.is_ascii_uppercase() {
            let mut end = i + 1;
            if end < chars.len() && chars[end].is_ascii_lowercase() {
                end += 1;
            }
            let symbol: String = chars[i..end].iter().collect();
            if find_element(&symbol).is_none() {
                return Err(invalid(formula, &format!("unknown element '{}'", symbol)));
            }
            let (count, next) = read_count(formula, &chars, end)?;
            i = next;
            let top = stack
                .last_mut()
                .ok_or_else(|| invalid(formula, "unbalanced ')'"))?;
            add_count(formula, top.entry(symbol).or_insert(0), count)?;
        } else {
            return Err(invalid(formula, &format!("unexpected character '{}'", c)));
        }
    }
    if stack.len() != 1 {
        return Err(invalid(formula, "unclosed '('"));
    }
    Ok(stack.pop().unwrap_or_default())
}

/// A parsed chemical species (or the electron)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Species {
    /// canonical identifier: formula followed by "<sign><digits>" when charged
    pub id: String,
    /// formula without the charge suffix
    pub formula: String,
    pub composition: BTreeMap<String, i64>,
    pub charge: i64,
}

impl Species {
    /// parses an already normalized token ("Fe+3", "H2O", "e-1")
    pub fn parse(token: &str) -> RedoxResult<Self> {
        if token == ELECTRON {
            return Ok(Self::electron());
        }
        let (formula, charge) = match CHARGE_RE.captures(token) {
            Some(caps) => {
                let magnitude: i64 = caps[3]
                    .parse()
                    .map_err(|_| invalid(token, "charge does not fit an integer"))?;
                let sign = if &caps[2] == "-" { -1 } else { 1 };
                (caps[1].to_string(), sign * magnitude)
            }
            None => (token.to_string(), 0),
        };
        let composition = parse_composition(&formula)?;
        Ok(Self {
            id: canonical_id(&formula, charge),
            formula,
            composition,
            charge,
        })
    }

    /// normalizes free-form notation first, then parses
    pub fn from_text(text: &str) -> RedoxResult<Self> {
        Self::parse(&normalize_species(text))
    }

    pub fn electron() -> Self {
        Self {
            id: ELECTRON.to_string(),
            formula: "e".to_string(),
            composition: BTreeMap::new(),
            charge: -1,
        }
    }

    pub fn is_electron(&self) -> bool {
        self.id.eq_ignore_ascii_case(ELECTRON)
    }

    pub fn is_proton(&self) -> bool {
        self.id == PROTON
    }

    pub fn count_of(&self, element: &str) -> i64 {
        self.composition.get(element).copied().unwrap_or(0)
    }

    /// molar mass in g/mol, the electron is massless here
    pub fn molar_mass(&self) -> f64 {
        self.composition
            .iter()
            .map(|(element, count)| {
                find_element(element)
                    .map(|e| e.atomic_mass * *count as f64)
                    .unwrap_or(0.0)
            })
            .sum()
    }
}

fn canonical_id(formula: &str, charge: i64) -> String {
    match charge {
        0 => formula.to_string(),
        c if c > 0 => format!("{}+{}", formula, c),
        c => format!("{}-{}", formula, -c),
    }
}

impl PartialEq for Species {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Species {}

impl Hash for Species {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
