//! Configuration loading from TOML files.
//!
//! Lookup order:
//! 1. `--config` on the command line
//! 2. `$MATHFLOW_CONFIG` environment variable
//! 3. `<config dir>/mathflow/config.toml`
//! 4. Built-in defaults (everything is optional)

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::debug;

use crate::calculator::{CalcMode, DEFAULT_DECIMALS, DEFAULT_ERROR_INDICATOR, Settings};
use crate::history::DEFAULT_CAPACITY;
use crate::session::{DEFAULT_AUTO_CLEAR, SessionOptions};

/// Largest accepted `decimals`. An f64 carries about 17 significant digits.
pub const MAX_DECIMALS: usize = 17;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub calculator: CalculatorConfig,
    pub history: HistoryConfig,
}

/// Input and display settings.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Mode selected at startup.
    pub mode: CalcMode,
    /// Fractional digits kept for non-integer results.
    pub decimals: usize,
    /// Text shown while a failed calculation is on the display.
    pub error_indicator: String,
    /// Milliseconds before the error indicator clears itself.
    pub auto_clear_ms: u64,
}

/// History log settings.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of entries kept.
    pub capacity: usize,
}

// --- Defaults ---

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            mode: CalcMode::Standard,
            decimals: DEFAULT_DECIMALS,
            error_indicator: DEFAULT_ERROR_INDICATOR.into(),
            auto_clear_ms: DEFAULT_AUTO_CLEAR.as_millis() as u64,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("parsing config")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the calculator cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.calculator.decimals > MAX_DECIMALS {
            bail!(
                "calculator.decimals must be at most {}, got {}",
                MAX_DECIMALS,
                self.calculator.decimals
            );
        }
        if self.calculator.error_indicator.trim().is_empty() {
            bail!("calculator.error_indicator must not be empty");
        }
        Ok(())
    }

    /// Build session options from this configuration.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            settings: Settings {
                decimals: self.calculator.decimals,
                error_indicator: self.calculator.error_indicator.clone(),
            },
            mode: self.calculator.mode,
            history_capacity: self.history.capacity,
            auto_clear: Duration::from_millis(self.calculator.auto_clear_ms),
        }
    }
}

/// Load config from disk. Returns defaults if no config file exists.
///
/// An explicit path must exist; the implicit locations are optional.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(p) = explicit {
        return read_config(p);
    }

    if let Some(p) = config_path()
        && p.exists()
    {
        return read_config(&p);
    }

    debug!("no config file, using defaults");
    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    debug!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Resolve the config file path.
fn config_path() -> Option<PathBuf> {
    // 1. Environment variable
    if let Ok(p) = std::env::var("MATHFLOW_CONFIG") {
        return Some(PathBuf::from(p));
    }

    // 2. Platform config directory
    dirs::config_dir().map(|dir| dir.join("mathflow").join("config.toml"))
}
