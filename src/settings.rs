//! # Settings Module
//!
//! ## Purpose
//! Persistent configuration of the molar mass calculator: chemical group
//! abbreviations, phase mark handling, optional input limits, display precision
//! and logging. The configuration lives in a JSON file (molmass_config.json by
//! default); a missing file means default settings.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "evaluator": {
//!     "groups": { "Me": { "C": 1, "H": 3 } },
//!     "strip_phase_marks": false,
//!     "max_formula_length": null,
//!     "max_nesting_depth": null
//!   },
//!   "decimal_places": 4,
//!   "log_level": "warn",
//!   "log_file": null
//! }
//! ```
//!
//! ## Usage Pattern
//! ```no_run
//! use MolMass::settings::ConfigManager;
//!
//! let mut manager = ConfigManager::with_config_file("molmass_config.json");
//! manager.add_group("Me", "CH3").unwrap();
//! manager.set_decimal_places(3).unwrap();
//! let calculator = manager.calculator().unwrap();
//! ```

use crate::Formulae::formula_parser::parse_formula;
use crate::Formulae::molmass::{
    EvaluatorSettings, MolarMassCalculator, validate_group, validate_groups,
};
use crate::Formulae::molmass_errors::{FormulaError, GroupError};
use log::{LevelFilter, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// default name of the configuration file
pub const DEFAULT_CONFIG_FILE: &str = "molmass_config.json";
/// more digits than f64 carries make no sense
pub const MAX_DECIMAL_PLACES: usize = 15;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    InvalidGroup(#[from] GroupError),
    #[error("invalid composition of group '{name}': {source}")]
    InvalidGroupComposition { name: String, source: FormulaError },
    #[error("invalid group definition '{0}', expected NAME=FORMULA")]
    InvalidGroupDefinition(String),
    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),
    #[error("decimal places must be at most 15, got {0}")]
    TooManyDecimalPlaces(usize),
    #[error("limit must be positive")]
    ZeroLimit,
}

/// Configuration of the calculator and of the command line tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MolMassConfig {
    pub evaluator: EvaluatorSettings,
    /// digits after the decimal point in tables
    pub decimal_places: usize,
    /// off, error, warn, info, debug or trace
    pub log_level: String,
    /// log is duplicated into this file if set
    pub log_file: Option<String>,
}

impl Default for MolMassConfig {
    fn default() -> Self {
        Self {
            evaluator: EvaluatorSettings::default(),
            decimal_places: 4,
            log_level: "warn".to_string(),
            log_file: None,
        }
    }
}

impl MolMassConfig {
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| ConfigError::UnknownLogLevel(self.log_level.clone()))
    }
}

/// Loads, updates and saves the configuration file.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: MolMassConfig,
    config_file: String,
}

impl ConfigManager {
    /// configuration from molmass_config.json in the current directory, or defaults
    pub fn new() -> Self {
        Self::with_config_file(DEFAULT_CONFIG_FILE)
    }

    /// configuration from the given file; defaults if the file is missing or broken
    pub fn with_config_file(config_file: &str) -> Self {
        let config = match Self::load_config(config_file) {
            Ok(config) => config,
            Err(e) => {
                warn!("cannot read config {}: {}, using defaults", config_file, e);
                MolMassConfig::default()
            }
        };
        Self {
            config,
            config_file: config_file.to_string(),
        }
    }

    /// Reads and checks the configuration file. A missing file is not an error and gives defaults.
    pub fn load_config(config_file: &str) -> Result<MolMassConfig, ConfigError> {
        if Path::new(config_file).exists() {
            let content = fs::read_to_string(config_file)?;
            let config: MolMassConfig = serde_json::from_str(&content)?;
            validate_groups(&config.evaluator.groups)?;
            let limits = [
                config.evaluator.max_formula_length,
                config.evaluator.max_nesting_depth,
            ];
            if limits.contains(&Some(0)) {
                return Err(ConfigError::ZeroLimit);
            }
            info!("configuration loaded from {}", config_file);
            Ok(config)
        } else {
            Ok(MolMassConfig::default())
        }
    }

    pub fn save_config(&self) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(&self.config)?;
        fs::write(&self.config_file, content)?;
        info!("configuration saved to {}", self.config_file);
        Ok(())
    }

    pub fn get_config(&self) -> &MolMassConfig {
        &self.config
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// calculator with the configured evaluator settings
    pub fn calculator(&self) -> Result<MolarMassCalculator, ConfigError> {
        Ok(MolarMassCalculator::with_settings(self.config.evaluator.clone())?)
    }

    /// Adds or replaces a chemical group, e.g. ("Me", "CH3"), and saves the configuration.
    pub fn add_group(&mut self, name: &str, formula: &str) -> Result<(), ConfigError> {
        let atoms = group_composition(name, formula)?;
        self.config.evaluator.groups.insert(name.to_string(), atoms);
        self.save_config()
    }

    /// removes a group, returns false if there was no such group
    pub fn remove_group(&mut self, name: &str) -> Result<bool, ConfigError> {
        let removed = self.config.evaluator.groups.remove(name).is_some();
        if removed {
            self.save_config()?;
        }
        Ok(removed)
    }

    pub fn set_strip_phase_marks(&mut self, strip: bool) -> Result<(), ConfigError> {
        self.config.evaluator.strip_phase_marks = strip;
        self.save_config()
    }

    /// `None` switches a limit off
    pub fn set_limits(
        &mut self,
        max_formula_length: Option<usize>,
        max_nesting_depth: Option<usize>,
    ) -> Result<(), ConfigError> {
        if max_formula_length == Some(0) || max_nesting_depth == Some(0) {
            return Err(ConfigError::ZeroLimit);
        }
        self.config.evaluator.max_formula_length = max_formula_length;
        self.config.evaluator.max_nesting_depth = max_nesting_depth;
        self.save_config()
    }

    pub fn set_decimal_places(&mut self, decimal_places: usize) -> Result<(), ConfigError> {
        if decimal_places > MAX_DECIMAL_PLACES {
            return Err(ConfigError::TooManyDecimalPlaces(decimal_places));
        }
        self.config.decimal_places = decimal_places;
        self.save_config()
    }

    pub fn set_log_level(&mut self, level: &str) -> Result<(), ConfigError> {
        LevelFilter::from_str(level).map_err(|_| ConfigError::UnknownLogLevel(level.to_string()))?;
        self.config.log_level = level.to_lowercase();
        self.save_config()
    }

    pub fn reset_to_defaults(&mut self) -> Result<(), ConfigError> {
        self.config = MolMassConfig::default();
        self.save_config()
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Atomic composition of a group from its formula. The name must look like an
/// element symbol so that the parser can read it; the formula may contain elements only.
pub fn group_composition(name: &str, formula: &str) -> Result<BTreeMap<String, usize>, ConfigError> {
    let parsed = parse_formula(formula).map_err(|source| ConfigError::InvalidGroupComposition {
        name: name.to_string(),
        source,
    })?;
    let atoms = parsed.iter().map(|(s, c)| (s.to_string(), c)).collect();
    validate_group(name, &atoms)?;
    Ok(atoms)
}

/// parses "NAME=FORMULA", e.g. "Me=CH3"
pub fn parse_group_definition(
    definition: &str,
) -> Result<(String, BTreeMap<String, usize>), ConfigError> {
    let (name, formula) = definition
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidGroupDefinition(definition.to_string()))?;
    let (name, formula) = (name.trim(), formula.trim());
    let atoms = group_composition(name, formula)?;
    Ok((name.to_string(), atoms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_gives_defaults() {
        let manager = ConfigManager::with_config_file("no_such_molmass_config.json");
        assert_eq!(manager.get_config(), &MolMassConfig::default());
        assert_eq!(manager.get_config().decimal_places, 4);
        assert!(manager.get_config().evaluator.groups.is_empty());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_config = NamedTempFile::new().unwrap();
        let json = r#"{
            "evaluator": { "groups": { "Ph": { "C": 6, "H": 5 } }, "strip_phase_marks": true },
            "decimal_places": 2
        }"#;
        temp_config.write_all(json.as_bytes()).unwrap();
        let manager = ConfigManager::with_config_file(temp_config.path().to_str().unwrap());
        let config = manager.get_config();
        assert_eq!(config.decimal_places, 2);
        assert!(config.evaluator.strip_phase_marks);
        assert_eq!(config.evaluator.groups["Ph"]["C"], 6);
        // fields absent in the file keep their defaults
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.evaluator.max_nesting_depth, None);

        let benzoic_acid = manager.calculator().unwrap().evaluate("PhCOOH(s)").unwrap();
        assert_eq!(benzoic_acid.count_of("C"), 7);
        assert_eq!(benzoic_acid.count_of("H"), 6);
        assert_eq!(benzoic_acid.count_of("O"), 2);
    }

    #[test]
    fn test_broken_file_gives_defaults() {
        let mut temp_config = NamedTempFile::new().unwrap();
        temp_config.write_all(b"{ not json").unwrap();
        let path = temp_config.path().to_str().unwrap();
        assert!(ConfigManager::load_config(path).is_err());
        let manager = ConfigManager::with_config_file(path);
        assert_eq!(manager.get_config(), &MolMassConfig::default());
    }

    #[test]
    fn test_invalid_groups_in_file_are_rejected() {
        for groups in [r#"{"Me":{"C":0}}"#, r#"{"Et":{}}"#, r#"{"me":{"C":1}}"#, r#"{"R":{"Qq":1}}"#] {
            let mut temp_config = NamedTempFile::new().unwrap();
            let json = format!(r#"{{ "evaluator": {{ "groups": {} }} }}"#, groups);
            temp_config.write_all(json.as_bytes()).unwrap();
            let path = temp_config.path().to_str().unwrap();
            assert!(
                matches!(ConfigManager::load_config(path), Err(ConfigError::InvalidGroup(_))),
                "{} accepted",
                groups
            );
            let manager = ConfigManager::with_config_file(path);
            assert!(manager.get_config().evaluator.groups.is_empty());
            let calculator = manager.calculator().unwrap();
            assert_eq!(
                calculator.evaluate("Me"),
                Err(FormulaError::UnknownElement("Me".to_string()))
            );
        }

        let mut temp_config = NamedTempFile::new().unwrap();
        temp_config
            .write_all(br#"{ "evaluator": { "max_nesting_depth": 0 } }"#)
            .unwrap();
        assert!(matches!(
            ConfigManager::load_config(temp_config.path().to_str().unwrap()),
            Err(ConfigError::ZeroLimit)
        ));
    }

    #[test]
    fn test_setters_save_config() {
        let temp_config = NamedTempFile::new().unwrap();
        let path = temp_config.path().to_str().unwrap().to_string();
        let mut manager = ConfigManager::with_config_file(&path);

        manager.add_group("Me", "CH3").unwrap();
        manager.set_decimal_places(3).unwrap();
        manager.set_log_level("DEBUG").unwrap();
        manager.set_limits(Some(100), Some(8)).unwrap();

        let reloaded = ConfigManager::with_config_file(&path);
        let config = reloaded.get_config();
        assert_eq!(config.decimal_places, 3);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.level_filter().unwrap(), LevelFilter::Debug);
        assert_eq!(config.evaluator.groups["Me"]["H"], 3);
        assert_eq!(config.evaluator.max_formula_length, Some(100));

        assert!(manager.remove_group("Me").unwrap());
        assert!(!manager.remove_group("Me").unwrap());
        manager.reset_to_defaults().unwrap();
        assert_eq!(
            ConfigManager::with_config_file(&path).get_config(),
            &MolMassConfig::default()
        );
    }

    #[test]
    fn test_invalid_settings() {
        let temp_config = NamedTempFile::new().unwrap();
        let mut manager = ConfigManager::with_config_file(temp_config.path().to_str().unwrap());
        assert!(matches!(
            manager.set_decimal_places(40),
            Err(ConfigError::TooManyDecimalPlaces(40))
        ));
        assert!(matches!(
            manager.set_log_level("loud"),
            Err(ConfigError::UnknownLogLevel(_))
        ));
        assert!(matches!(
            manager.set_limits(Some(0), None),
            Err(ConfigError::ZeroLimit)
        ));
    }

    #[test]
    fn test_group_definitions() {
        let (name, atoms) = parse_group_definition("Et = C2H5").unwrap();
        assert_eq!(name, "Et");
        assert_eq!(atoms["C"], 2);
        assert_eq!(atoms["H"], 5);
        assert!(matches!(
            parse_group_definition("EtC2H5"),
            Err(ConfigError::InvalidGroupDefinition(_))
        ));
        assert!(matches!(
            parse_group_definition("et=C2H5"),
            Err(ConfigError::InvalidGroup(GroupError::InvalidName(_)))
        ));
        assert!(matches!(
            parse_group_definition("Tos=CH3C6H4SO2"),
            Ok(_)
        ));
        assert!(matches!(
            parse_group_definition("R=Xx"),
            Err(ConfigError::InvalidGroup(GroupError::UnknownElement { .. }))
        ));
        assert!(matches!(
            parse_group_definition("R=C("),
            Err(ConfigError::InvalidGroupComposition { .. })
        ));
    }
}
