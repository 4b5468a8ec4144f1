use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use refinance_core::units::{DiagnosisInput, DisplayUnit};

use crate::OutputFormat;

const LOCAL_CONFIG: &str = "refi.toml";

/// Optional settings read from `refi.toml`.
///
/// ```toml
/// display_unit = "ten_thousand"
/// output = "table"
///
/// [defaults]
/// current_balance = 3000
/// current_rate_percent = 1.2
/// remaining_years = 20
/// new_rate_percent = 0.45
/// refinance_costs = 60
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub display_unit: Option<DisplayUnit>,
    pub output: Option<OutputFormat>,
    pub defaults: FormDefaults,
}

/// Form values used when the matching flag is absent, in `display_unit`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormDefaults {
    pub current_balance: Option<Decimal>,
    pub current_rate_percent: Option<Decimal>,
    pub remaining_years: Option<u32>,
    pub new_rate_percent: Option<Decimal>,
    pub refinance_costs: Option<Decimal>,
}

impl Config {
    /// Load from an explicit path, or fall back to `./refi.toml` and then
    /// `<config dir>/refi/config.toml`. Only an explicit path must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(format!("Config file not found: {}", path.display()).into());
            }
            return Self::from_file(path);
        }

        match Self::discover() {
            Some(path) => Self::from_file(&path),
            None => {
                tracing::debug!("no config file found; using built-in defaults");
                Ok(Config::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
        let config = Self::parse(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", path.display(), e))?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Config, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Form input with config defaults layered over the built-in form defaults.
    pub fn form_input(&self) -> DiagnosisInput {
        let builtin = DiagnosisInput::default();
        let d = &self.defaults;
        DiagnosisInput {
            current_balance: d.current_balance.unwrap_or(builtin.current_balance),
            current_rate_percent: d
                .current_rate_percent
                .unwrap_or(builtin.current_rate_percent),
            remaining_years: d.remaining_years.unwrap_or(builtin.remaining_years),
            new_rate_percent: d.new_rate_percent.unwrap_or(builtin.new_rate_percent),
            refinance_costs: d.refinance_costs.unwrap_or(builtin.refinance_costs),
            display_unit: self.display_unit.unwrap_or(builtin.display_unit),
        }
    }

    fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG);
        if local.is_file() {
            return Some(local);
        }
        dirs::config_dir()
            .map(|dir| dir.join("refi").join("config.toml"))
            .filter(|p| p.is_file())
    }
}
