//! Splits a reaction string into reactant and product species tokens.
//!
//! Caller-supplied coefficients are stripped, only the balancer assigns coefficients.
use crate::Reactions::formula_normalizer::{normalize_reaction, normalize_species};
use crate::errors::{RedoxError, RedoxResult};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static COEFFICIENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)?)?\s*\*?\s*(.*)$").unwrap());

/// reactant and product tokens of one reaction, in the order they were written
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReaction {
    pub reactants: Vec<String>,
    pub products: Vec<String>,
}

fn starts_species(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c == '(' || c == '['
}

/// "e", "e-", "e⁻", "electron" right after a plus
fn starts_electron(rest: &[char]) -> bool {
    if rest.first() != Some(&'e') {
        return false;
    }
    match rest.get(1) {
        None => true,
        Some(c) => c.is_whitespace() || *c == '-' || *c == '⁻' || *c == 'l',
    }
}

/// Splits one side on the "+" signs that separate species.
///
/// A plus separates species when it is surrounded by whitespace, when it follows whitespace
/// and precedes the start of a new species ("A +B"), or when it is written without spaces but
/// followed by an uppercase letter, an opening bracket or an electron ("H2+O2", "H++OH-").
/// A plus followed directly by a digit is an ionic charge ("Fe+3"), and so is a plus
/// followed only by whitespace ("Na+ Cl-" is one malformed token, not two species).
pub fn split_side(side: &str) -> Vec<String> {
    let chars: Vec<char> = side.chars().collect();
    let mut chunks = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if c != '+' {
            current.push(c);
            continue;
        }
        let prev_ws = i > 0 && chars[i - 1].is_whitespace();
        let next_ws = chars.get(i + 1).is_some_and(|n| n.is_whitespace());
        let rest: Vec<char> = chars[i + 1..]
            .iter()
            .skip_while(|n| n.is_whitespace())
            .copied()
            .collect();
        let next_starts = rest
            .first()
            .is_some_and(|n| starts_species(*n) || starts_electron(&rest));
        let at_start = current.trim().is_empty();
        let separator = !at_start
            && ((prev_ws && next_ws)
                || (prev_ws && next_starts)
                || (!prev_ws
                    && !next_ws
                    && rest.first().is_some_and(|n| !n.is_ascii_digit())
                    && next_starts));
        if separator {
            chunks.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    chunks.push(current);
    chunks
        .into_iter()
        .map(|chunk| chunk.trim().to_string())
        .filter(|chunk| !chunk.is_empty())
        .collect()
}

/// drops a leading numeric coefficient ("8H+" -> "H+", "2 * H2O" -> "H2O")
pub fn strip_coefficient(chunk: &str) -> String {
    match COEFFICIENT_RE.captures(chunk.trim()) {
        Some(caps) => caps[2].trim().to_string(),
        None => chunk.trim().to_string(),
    }
}

fn parse_side(side: &str, name: &'static str, equation: &str) -> RedoxResult<Vec<String>> {
    let species: Vec<String> = split_side(side)
        .iter()
        .map(|chunk| normalize_species(&strip_coefficient(chunk)))
        .filter(|token| !token.is_empty())
        .collect();
    if species.is_empty() {
        return Err(RedoxError::EmptySide {
            side: name,
            equation: equation.to_string(),
        });
    }
    Ok(species)
}

/// Parses a free-form reaction string into reactant/product token lists
/// # Examples
/// ```
/// use RedoxThe::Reactions::reaction_parser::parse_reaction;
/// let parsed = parse_reaction("MnO4- + 8H+ + 5e- -> Mn+2 + 4H2O").unwrap();
/// assert_eq!(parsed.reactants, vec!["MnO4-1", "H+1", "e-1"]);
/// assert_eq!(parsed.products, vec!["Mn+2", "H2O"]);
/// ```
pub fn parse_reaction(equation: &str) -> RedoxResult<ParsedReaction> {
    let canonical = normalize_reaction(equation);
    let parts: Vec<&str> = canonical.split("->").collect();
    if parts.len() != 2 {
        return Err(RedoxError::MalformedReaction(equation.to_string()));
    }
    let reactants = parse_side(parts[0], "reactant", equation)?;
    let products = parse_side(parts[1], "product", equation)?;
    debug!(
        "parsed '{}' into {:?} -> {:?}",
        equation, reactants, products
    );
    Ok(ParsedReaction {
        reactants,
        products,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_side_charges_and_separators() {
        assert_eq!(
            split_side("MnO4- + 8H+ + 5e-"),
            vec!["MnO4-", "8H+", "5e-"]
        );
        assert_eq!(split_side("Fe+3 + e-1"), vec!["Fe+3", "e-1"]);
        assert_eq!(split_side("Fe3+ + e"), vec!["Fe3+", "e"]);
        assert_eq!(split_side("H2+O2"), vec!["H2", "O2"]);
        assert_eq!(split_side("H++OH-"), vec!["H+", "OH-"]);
        assert_eq!(split_side("Fe+3 +e-"), vec!["Fe+3", "e-"]);
        assert_eq!(split_side("Na+ Cl-"), vec!["Na+ Cl-"]);
    }

    #[test]
    fn test_strip_coefficient() {
        assert_eq!(strip_coefficient("8H+"), "H+");
        assert_eq!(strip_coefficient("2 * H2O"), "H2O");
        assert_eq!(strip_coefficient("H2O"), "H2O");
        assert_eq!(strip_coefficient("5e-"), "e-");
    }

    #[test]
    fn test_parse_reaction() {
        let parsed = parse_reaction("Fe^{3+} + e⁻ → Fe^{2+}").unwrap();
        assert_eq!(parsed.reactants, vec!["Fe+3", "e-1"]);
        assert_eq!(parsed.products, vec!["Fe+2"]);

        let parsed = parse_reaction("2H2 + O2 = 2H2O").unwrap();
        assert_eq!(parsed.reactants, vec!["H2", "O2"]);
        assert_eq!(parsed.products, vec!["H2O"]);
    }

    #[test]
    fn test_malformed_and_empty() {
        assert!(matches!(
            parse_reaction("H2 + O2"),
            Err(RedoxError::MalformedReaction(_))
        ));
        assert!(matches!(
            parse_reaction(" -> H2O"),
            Err(RedoxError::EmptySide { side: "reactant", .. })
        ));
        assert!(matches!(
            parse_reaction("H2 + O2 -> "),
            Err(RedoxError::EmptySide { side: "product", .. })
        ));
        assert!(matches!(
            parse_reaction("A -> B -> C"),
            Err(RedoxError::MalformedReaction(_))
        ));
    }
}
