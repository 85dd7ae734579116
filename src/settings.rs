//! # Settings Module
//!
//! Persistent user configuration stored in `redox_config.json`:
//! default temperature, spontaneity tolerance, thermo policy for species without data,
//! an optional external thermo library document, the default diagram grid and the log level.
//!
//! A missing or unreadable file yields the defaults. Global access goes through
//! [`with_settings`] and [`with_settings_mut`]; during tests nothing is written to disk.
//!
//! ```rust
//! use RedoxThe::settings::with_settings;
//! let t = with_settings(|manager| manager.config().default_temperature_c);
//! assert!(t > -273.15);
//! ```
use crate::Pourbaix::stability_grid::GridSpec;
use crate::Thermodynamics::constants::T_ZERO_CELSIUS;
use crate::Thermodynamics::reaction_thermo::{SPONTANEITY_TOLERANCE_KJ, Temperature, ThermoPolicy};
use crate::errors::{RedoxError, RedoxResult};
use log::{LevelFilter, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, OnceLock};

pub const CONFIG_FILE: &str = "redox_config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedoxConfig {
    /// °C
    pub default_temperature_c: f64,
    /// kJ/mol
    pub spontaneity_tolerance_kj: f64,
    pub thermo_policy: ThermoPolicy,
    /// sectioned document with a THERMO section, merged over the built-in table
    pub thermo_library: Option<String>,
    pub grid: GridSpec,
    /// samples per Nernst or dG line
    pub line_points: usize,
    pub log_level: String,
}

impl Default for RedoxConfig {
    fn default() -> Self {
        Self {
            default_temperature_c: 25.0,
            spontaneity_tolerance_kj: SPONTANEITY_TOLERANCE_KJ,
            thermo_policy: ThermoPolicy::Lenient,
            thermo_library: None,
            grid: GridSpec::default(),
            line_points: 100,
            log_level: "info".to_string(),
        }
    }
}

impl RedoxConfig {
    pub fn temperature(&self) -> Temperature {
        Temperature::Celsius(self.default_temperature_c)
    }

    /// unknown level names fall back to Info
    pub fn log_level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }
}

/// Loads, validates and saves the configuration
#[derive(Debug, Clone)]
pub struct SettingsManager {
    config: RedoxConfig,
    config_file: String,
}

impl Default for SettingsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsManager {
    pub fn new() -> Self {
        Self::with_config_file(CONFIG_FILE)
    }

    pub fn with_config_file(config_file: &str) -> Self {
        let config = match Self::load_config(config_file) {
            Ok(config) => config,
            Err(e) => {
                warn!("cannot read '{}', using defaults: {}", config_file, e);
                RedoxConfig::default()
            }
        };
        Self {
            config,
            config_file: config_file.to_string(),
        }
    }

    fn load_config(config_file: &str) -> RedoxResult<RedoxConfig> {
        if Path::new(config_file).exists() {
            let content = fs::read_to_string(config_file)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(RedoxConfig::default())
        }
    }

    pub fn save_config(&self) -> RedoxResult<()> {
        #[cfg(test)]
        {
            return Ok(());
        }

        #[cfg(not(test))]
        {
            let content = serde_json::to_string_pretty(&self.config)?;
            fs::write(&self.config_file, content)?;
            Ok(())
        }
    }

    pub fn config(&self) -> &RedoxConfig {
        &self.config
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    pub fn set_default_temperature(&mut self, t_c: f64) -> RedoxResult<()> {
        if !t_c.is_finite() || t_c + T_ZERO_CELSIUS <= 0.0 {
            return Err(RedoxError::InvalidTemperature(t_c + T_ZERO_CELSIUS));
        }
        self.config.default_temperature_c = t_c;
        self.save_config()
    }

    pub fn set_tolerance(&mut self, tolerance_kj: f64) -> RedoxResult<()> {
        if !tolerance_kj.is_finite() || tolerance_kj < 0.0 {
            return Err(RedoxError::Load(format!(
                "spontaneity tolerance must be a non-negative number, got {}",
                tolerance_kj
            )));
        }
        self.config.spontaneity_tolerance_kj = tolerance_kj;
        self.save_config()
    }

    pub fn set_thermo_policy(&mut self, policy: ThermoPolicy) -> RedoxResult<()> {
        self.config.thermo_policy = policy;
        self.save_config()
    }

    /// the document must exist
    pub fn set_thermo_library(&mut self, path: Option<&str>) -> RedoxResult<()> {
        if let Some(path) = path {
            if !Path::new(path).exists() {
                return Err(RedoxError::Load(format!("file '{}' does not exist", path)));
            }
        }
        self.config.thermo_library = path.map(str::to_string);
        self.save_config()
    }

    pub fn set_grid(&mut self, grid: GridSpec) -> RedoxResult<()> {
        grid.validate()?;
        self.config.grid = grid;
        self.save_config()
    }

    pub fn set_log_level(&mut self, level: &str) -> RedoxResult<()> {
        LevelFilter::from_str(level)
            .map_err(|_| RedoxError::Load(format!("unknown log level '{}'", level)))?;
        self.config.log_level = level.to_lowercase();
        self.save_config()
    }

    pub fn reset_to_defaults(&mut self) -> RedoxResult<()> {
        self.config = RedoxConfig::default();
        self.save_config()
    }
}

static GLOBAL_SETTINGS: OnceLock<Mutex<SettingsManager>> = OnceLock::new();

fn get_settings() -> MutexGuard<'static, SettingsManager> {
    GLOBAL_SETTINGS
        .get_or_init(|| Mutex::new(SettingsManager::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// read-only access to the global settings
pub fn with_settings<F, R>(f: F) -> R
where
    F: FnOnce(&SettingsManager) -> R,
{
    let manager = get_settings();
    f(&manager)
}

/// mutable access to the global settings
pub fn with_settings_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut SettingsManager) -> R,
{
    let mut manager = get_settings();
    f(&mut manager)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_when_file_is_missing() {
        let manager = SettingsManager::with_config_file("no_such_redox_config.json");
        assert_eq!(manager.config(), &RedoxConfig::default());
        assert_eq!(manager.config().grid.n_ph, 141);
        assert_eq!(manager.config().log_level_filter(), LevelFilter::Info);
    }

    #[test]
    fn test_partial_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"default_temperature_c": 80.0, "thermo_policy": "Strict"}"#)
            .unwrap();
        let manager = SettingsManager::with_config_file(file.path().to_str().unwrap());
        assert_eq!(manager.config().default_temperature_c, 80.0);
        assert_eq!(manager.config().thermo_policy, ThermoPolicy::Strict);
        assert_eq!(manager.config().spontaneity_tolerance_kj, 0.01);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        let manager = SettingsManager::with_config_file(file.path().to_str().unwrap());
        assert_eq!(manager.config(), &RedoxConfig::default());
    }

    #[test]
    fn test_setters_validate() {
        let mut manager = SettingsManager::with_config_file("no_such_redox_config.json");
        assert!(manager.set_default_temperature(-300.0).is_err());
        assert!(manager.set_default_temperature(60.0).is_ok());
        assert_eq!(manager.config().temperature(), Temperature::Celsius(60.0));
        assert!(manager.set_tolerance(-1.0).is_err());
        assert!(manager.set_grid(GridSpec::with_resolution(1, 5)).is_err());
        assert!(manager.set_log_level("loud").is_err());
        assert!(manager.set_log_level("DEBUG").is_ok());
        assert_eq!(manager.config().log_level_filter(), LevelFilter::Debug);
        assert!(manager.set_thermo_library(Some("no_such_thermo.json")).is_err());
        manager.reset_to_defaults().unwrap();
        assert_eq!(manager.config(), &RedoxConfig::default());
    }

    #[test]
    fn test_global_access() {
        let points = with_settings(|manager| manager.config().line_points);
        assert!(points > 1);
    }
}
