use crate::Pourbaix::phase::PhaseCatalog;
use crate::Thermodynamics::thermo_lookup::ThermoLibrary;
use crate::errors::{RedoxError, RedoxResult};
use log::{error, info, warn};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Reads sections of a plain-text task document. A section starts after a header line
/// (`THERMO`, `PHASES`, `REACTIONS`) and ends at the next all-uppercase line.
pub struct LoadData {
    pub file_name: String,
}

impl LoadData {
    pub fn new(file_name: String) -> Self {
        LoadData { file_name }
    }
    pub fn load_thermo(&self) -> RedoxResult<ThermoLibrary> {
        load_thermo_from_file(&self.file_name)
    }
    pub fn load_phases(&self) -> RedoxResult<PhaseCatalog> {
        load_phases_from_file(&self.file_name)
    }
    pub fn load_reactions(&self) -> RedoxResult<Vec<String>> {
        load_reaction_list(&self.file_name)
    }
}

fn is_header(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_uppercase() || c == '_' || c == ' ')
}

/// lines of the file and the index of the first line after one of `headers`
fn find_section(file_name: &str, headers: &[&str]) -> RedoxResult<(Vec<String>, usize, usize)> {
    let path = Path::new(file_name);
    if !path.exists() {
        return Err(RedoxError::Load(format!("File '{}' does not exist", file_name)));
    }
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let lines: Vec<String> = reader.lines().collect::<Result<_, _>>()?;

    let start_index = lines
        .iter()
        .position(|line| headers.contains(&line.trim().to_uppercase().as_str()))
        .map(|i| i + 1)
        .ok_or_else(|| {
            RedoxError::Load(format!(
                "No '{}' header found in file '{}'",
                headers.join("' or '"),
                file_name
            ))
        })?;

    let end_index = lines[start_index..]
        .iter()
        .position(|line| is_header(line))
        .map(|offset| start_index + offset)
        .unwrap_or(lines.len());
    Ok((lines, start_index, end_index))
}

/// Parses a JSON section, logging the offending line with a pointer on failure.
fn parse_json_section(file_name: &str, headers: &[&str]) -> RedoxResult<Value> {
    let (lines, start_index, end_index) = find_section(file_name, headers)?;
    let section = lines[start_index..end_index].join("\n");
    match serde_json::from_str::<Value>(&section) {
        Ok(value) => {
            info!(
                "Successfully parsed '{}' section of file '{}'",
                headers[0], file_name
            );
            Ok(value)
        }
        Err(e) => {
            let error_line = e.line();
            let error_column = e.column();
            // serde counts lines from 1 within the section
            let actual_line = start_index + error_line.saturating_sub(1);
            error!(
                "Error parsing '{}' section at line {}, column {} (line {} in file): {}",
                headers[0],
                error_line,
                error_column,
                actual_line + 1,
                e
            );
            if let Some(problem_line) = lines.get(actual_line) {
                error!("Problematic line: {}", problem_line);
                if error_column >= 1 && error_column <= problem_line.len() {
                    error!("{}", " ".repeat(error_column - 1) + "^");
                }
            }
            Err(RedoxError::Json(e))
        }
    }
}

/// THERMO section: `{"species": {"dh": kJ/mol, "s": J/mol/K}, ...}`
pub fn load_thermo_from_file(file_name: &str) -> RedoxResult<ThermoLibrary> {
    let value = parse_json_section(file_name, &["THERMO", "THERMO DATA"])?;
    let library = ThermoLibrary::from_serde(file_name, &value)?;
    if library.is_empty() {
        warn!("Thermo section of '{}' has no usable records", file_name);
    }
    Ok(library)
}

/// PHASES section: a JSON array of phases
pub fn load_phases_from_file(file_name: &str) -> RedoxResult<PhaseCatalog> {
    let value = parse_json_section(file_name, &["PHASES", "PHASE CATALOG"])?;
    let catalog = PhaseCatalog::from_serde(file_name, &value)?;
    if catalog.is_empty() {
        return Err(RedoxError::NoPhases);
    }
    Ok(catalog)
}

/// REACTIONS section: one equation per line, blank lines and `#` comments skipped
pub fn load_reaction_list(file_name: &str) -> RedoxResult<Vec<String>> {
    let (lines, start_index, end_index) = find_section(file_name, &["REACTIONS"])?;
    let reactions: Vec<String> = lines[start_index..end_index]
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();
    if reactions.is_empty() {
        return Err(RedoxError::Load(format!(
            "No reactions found in file '{}'",
            file_name
        )));
    }
    Ok(reactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Thermodynamics::thermo_lookup::ThermoLookup;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DOCUMENT: &str = r#"REACTIONS
MnO4- + H+ + e- -> Mn+2 + H2O
# comment
Fe+3 + e- -> Fe+2

THERMO
{
    "Fe^{2+}": {"dh": -89.1, "s": -137.7},
    "Xx": {"dh": 1.0, "s": 2.0}
}
PHASES
[
    {"name": "Cu", "gf": 0.0, "charge": 0, "protons": 0, "kind": "Solid"},
    {"name": "Cu2+", "gf": 65490.0, "charge": 2, "protons": 0, "log_activity": -6.0, "kind": "Aqueous"},
    {"name": "Cu2O", "gf": 88940.0, "charge": 2, "protons": 2, "multiplicity": 2, "kind": "Solid"}
]
"#;

    fn document_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_all_sections() {
        let file = document_file(DOCUMENT);
        let loader = LoadData::new(file.path().to_str().unwrap().to_string());
        let reactions = loader.load_reactions().unwrap();
        assert_eq!(
            reactions,
            vec!["MnO4- + H+ + e- -> Mn+2 + H2O", "Fe+3 + e- -> Fe+2"]
        );
        let thermo = loader.load_thermo().unwrap();
        assert_eq!(thermo.len(), 2);
        assert_eq!(thermo.lookup("Fe+2").unwrap().s, -137.7);
        let phases = loader.load_phases().unwrap();
        assert_eq!(phases.names(), vec!["Cu", "Cu2+", "Cu2O"]);
        assert_eq!(phases.phases[2].multiplicity, 2);
    }

    #[test]
    fn test_missing_file_and_header() {
        assert!(matches!(
            load_thermo_from_file("no_such_file.txt"),
            Err(RedoxError::Load(_))
        ));
        let file = document_file("REACTIONS\nH2 + O2 -> H2O\n");
        let name = file.path().to_str().unwrap();
        assert!(matches!(load_phases_from_file(name), Err(RedoxError::Load(_))));
        assert_eq!(load_reaction_list(name).unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_json_section() {
        let file = document_file("THERMO\n{\n  \"H2O\": {\"dh\": -285.83, \"s\": }\n}\n");
        let result = load_thermo_from_file(file.path().to_str().unwrap());
        assert!(matches!(result, Err(RedoxError::Json(_))));
    }

    #[test]
    fn test_empty_sections() {
        let file = document_file("PHASES\n[]\nREACTIONS\n\n");
        let name = file.path().to_str().unwrap();
        assert!(matches!(load_phases_from_file(name), Err(RedoxError::NoPhases)));
        assert!(load_reaction_list(name).is_err());
    }
}
