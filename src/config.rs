use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Inventory file (JSON or TOML). The built-in sample is used when unset.
    pub inventory: Option<PathBuf>,
    /// Start EC2/RDS resources after loading so their instance hours are billed
    #[serde(default = "default_true")]
    pub start_resources: bool,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Decimal places for USD amounts
    pub precision: usize,
    pub show_regions: bool,
    pub show_types: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            precision: 2,
            show_regions: true,
            show_types: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inventory: None,
            start_resources: true,
            report: ReportConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        use anyhow::Context;

        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            // Try .cloudcost.toml in current dir, then ~/.config/cloudcost/config.toml
            let local = PathBuf::from(".cloudcost.toml");
            if local.exists() {
                local
            } else {
                dirs::config_dir()
                    .map(|d| d.join("cloudcost").join("config.toml"))
                    .unwrap_or_else(|| PathBuf::from(".cloudcost.toml"))
            }
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
            let config = Self::from_toml_str(&content).with_context(|| {
                let mut err = format!("Failed to parse config: {}", config_path.display());
                err.push_str("\n  Common issues:");
                err.push_str("\n    - Invalid TOML syntax");
                err.push_str("\n    - Incorrect value types");
                err.push_str("\n  Tip: Run 'cloudcost init' to create a new config file");
                err
            })?;
            debug!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            // Use defaults but warn if user explicitly provided a path
            if path.is_some() {
                eprintln!("WARNING: Config file not found: {}", config_path.display());
                eprintln!("   Using default configuration. Run 'cloudcost init' to create a config file.");
            }
            Ok(Config::default())
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.report.precision > 6 {
            return Err(ConfigError::InvalidValue {
                field: "report.precision".to_string(),
                reason: format!("must be between 0 and 6, got {}", self.report.precision),
            }
            .into());
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        use anyhow::Context;

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

pub fn init_config(output: &Path) -> anyhow::Result<()> {
    let config = Config::default();
    config.save(output)?;
    println!("Created config file: {}", output.display());
    Ok(())
}
