//! Rewrites free-form chemical notation into the canonical token form used by the parser:
//! charges as a trailing `<sign><digits>` suffix ("Fe+3", "Cl-1"), one reaction arrow " -> ",
//! one electron token "e-1". Normalization never fails, unknown tokens pass through.
use regex::Regex;
use std::sync::LazyLock;

pub const ARROW: &str = " -> ";
pub const ELECTRON: &str = "e-1";
pub const PROTON: &str = "H+1";

// longest spellings first so that "<=>" is not eaten by "=>" or "="
static ARROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*(?:<-->|<==>|<=>|<->|-->|==>|=>|->|⇌|⇄|⟷|↔|⟶|→|⇒|⟹|==|=)\s*").unwrap()
});
static PHASE_MARK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((?:s|l|g|aq|cr|c)\)").unwrap());
static ELECTRON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i:e|e-|e-1|e1-|electron|electrons)$").unwrap());
// Fe^3+, Fe^{3+}, Fe^{+3}, Fe^+
static CARET_CHARGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\^\{?(\d*)([+-])(\d*)\}?$").unwrap());
// Fe+++ , SO4--
static SIGN_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\++|-+)$").unwrap());

fn subscript_to_ascii(c: char) -> Option<char> {
    match c {
        '₀'..='₉' => char::from_digit(c as u32 - '₀' as u32, 10),
        _ => None,
    }
}

fn superscript_to_ascii(c: char) -> Option<char> {
    match c {
        '⁰' => Some('0'),
        '¹' => Some('1'),
        '²' => Some('2'),
        '³' => Some('3'),
        '⁴'..='⁹' => char::from_digit(c as u32 - '⁴' as u32 + 4, 10),
        '⁺' => Some('+'),
        '⁻' => Some('-'),
        _ => None,
    }
}

/// normalizes the whole reaction string: unicode subscripts, unicode minus and all arrow
/// spellings
pub fn normalize_reaction(text: &str) -> String {
    let text: String = text
        .chars()
        .map(|c| match c {
            '−' | '–' => '-',
            '＋' => '+',
            c => subscript_to_ascii(c).unwrap_or(c),
        })
        .collect();
    let text = ARROW_RE.replace_all(text.trim(), ARROW).to_string();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// turns a charge annotation written as digits and one sign (in any order) into "<sign><digits>"
fn charge_suffix(digits_before: &str, sign: &str, digits_after: &str) -> String {
    let magnitude = if !digits_after.is_empty() {
        digits_after
    } else if !digits_before.is_empty() {
        digits_before
    } else {
        "1"
    };
    format!("{}{}", sign, magnitude)
}

/// Square brackets and braces are grouping markup: a wrapper with a multiplicity after it
/// becomes a parenthesis group, a wrapper without one is removed.
fn strip_wrappers(formula: &str) -> String {
    let chars: Vec<char> = formula.chars().collect();
    let mut keep: Vec<Option<char>> = chars.iter().map(|c| Some(*c)).collect();
    let mut stack: Vec<usize> = Vec::new();
    for (i, c) in chars.iter().enumerate() {
        match c {
            '[' | '{' => stack.push(i),
            ']' | '}' => {
                if let Some(open) = stack.pop() {
                    let multiplied = chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
                    if multiplied {
                        keep[open] = Some('(');
                        keep[i] = Some(')');
                    } else {
                        keep[open] = None;
                        keep[i] = None;
                    }
                }
            }
            _ => {}
        }
    }
    keep.into_iter().flatten().collect()
}

/// Normalizes one species token.
///
/// Rules, in order: phase marks like "(aq)" are dropped, electron synonyms collapse to
/// [`ELECTRON`], superscript and caret charge markup becomes a trailing "<sign><digits>",
/// bracket/brace wrappers are removed, a bare trailing sign gets the magnitude 1 (a run of
/// signs, "Fe+++", counts the signs).
/// # Examples
/// ```
/// use RedoxThe::Reactions::formula_normalizer::normalize_species;
/// assert_eq!(normalize_species("Fe^{3+}"), "Fe+3");
/// assert_eq!(normalize_species("Cl-"), "Cl-1");
/// assert_eq!(normalize_species("electron"), "e-1");
/// ```
pub fn normalize_species(token: &str) -> String {
    let token: String = token
        .trim()
        .chars()
        .map(|c| match c {
            '−' | '–' => '-',
            c => subscript_to_ascii(c).unwrap_or(c),
        })
        .collect();
    let token = PHASE_MARK_RE.replace_all(&token, "").to_string();

    // trailing superscript run: "Fe³⁺", "SO₄²⁻"
    let superscript_start = token
        .char_indices()
        .rev()
        .take_while(|(_, c)| superscript_to_ascii(*c).is_some())
        .last()
        .map(|(i, _)| i);
    let token = match superscript_start {
        Some(start) => {
            let run: String = token[start..]
                .chars()
                .filter_map(superscript_to_ascii)
                .collect();
            let sign = if run.contains('-') { "-" } else { "+" };
            let digits: String = run.chars().filter(|c| c.is_ascii_digit()).collect();
            if run.contains('+') || run.contains('-') {
                format!("{}{}", &token[..start], charge_suffix("", sign, &digits))
            } else {
                // bare superscript digits are not a charge
                format!("{}{}", &token[..start], digits)
            }
        }
        None => token,
    };

    let token = match CARET_CHARGE_RE.captures(&token) {
        Some(caps) => {
            let whole = caps.get(0).map(|m| m.start()).unwrap_or(token.len());
            format!(
                "{}{}",
                &token[..whole],
                charge_suffix(&caps[1], &caps[2], &caps[3])
            )
        }
        None => token,
    };

    let token = strip_wrappers(&token);

    let token = match SIGN_RUN_RE.captures(&token) {
        Some(caps) => {
            let run = &caps[1];
            let start = token.len() - run.len();
            let sign = &run[..1];
            format!("{}{}{}", &token[..start], sign, run.len())
        }
        None => token,
    };
    if ELECTRON_RE.is_match(&token) {
        return ELECTRON.to_string();
    }
    token
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrows_collapse() {
        for text in [
            "A = B",
            "A -> B",
            "A=>B",
            "A → B",
            "A ⇌ B",
            "A <=> B",
            "A <-> B",
            "A --> B",
        ] {
            assert_eq!(normalize_reaction(text), "A -> B", "failed on {}", text);
        }
    }

    #[test]
    fn test_subscripts_and_whitespace() {
        assert_eq!(normalize_reaction("H₂  +   O₂ → H₂O"), "H2 + O2 -> H2O");
    }

    #[test]
    fn test_charge_markup() {
        assert_eq!(normalize_species("Fe^3+"), "Fe+3");
        assert_eq!(normalize_species("Fe^{+3}"), "Fe+3");
        assert_eq!(normalize_species("Fe³⁺"), "Fe+3");
        assert_eq!(normalize_species("SO₄²⁻"), "SO4-2");
        assert_eq!(normalize_species("Fe+3"), "Fe+3");
        assert_eq!(normalize_species("Fe+++"), "Fe+3");
        assert_eq!(normalize_species("MnO4-"), "MnO4-1");
        assert_eq!(normalize_species("H+"), "H+1");
        assert_eq!(normalize_species("Na^+"), "Na+1");
    }

    #[test]
    fn test_electron_synonyms() {
        for token in ["e", "e-", "e-1", "electron", "e⁻", "E-"] {
            assert_eq!(normalize_species(token), ELECTRON, "failed on {}", token);
        }
    }

    #[test]
    fn test_wrappers_and_groups() {
        assert_eq!(normalize_species("[Fe(CN)6]-4"), "Fe(CN)6-4");
        assert_eq!(normalize_species("[Fe(CN)6]^{4-}"), "Fe(CN)6-4");
        assert_eq!(normalize_species("Fe(OH)3"), "Fe(OH)3");
        assert_eq!(normalize_species("[NH4]2SO4"), "(NH4)2SO4");
        assert_eq!(normalize_species("H2O(l)"), "H2O");
        assert_eq!(normalize_species("Fe+2(aq)"), "Fe+2");
    }

    #[test]
    fn test_unknown_passes_through() {
        assert_eq!(normalize_species("xyz"), "xyz");
        assert_eq!(normalize_species(""), "");
    }
}
