//! Configuration management for the NutriSculpt CLI
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: NS__)

use anyhow::{bail, Result};
use nutrisculpt_shared::{validation::validate_hex_color, AspectRatio, CaptureOptions, ShareConfig};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub share: ShareConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub preferences: PreferencesConfig,
}

/// Image export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Where downloaded cards are written
    pub output_dir: PathBuf,
    pub scale: u32,
    pub background: String,
    pub aspect_ratio: AspectRatio,
}

impl Default for ExportConfig {
    fn default() -> Self {
        let capture = CaptureOptions::default();
        Self {
            output_dir: PathBuf::from("."),
            scale: capture.scale,
            background: capture.background,
            aspect_ratio: AspectRatio::Square,
        }
    }
}

impl ExportConfig {
    pub fn capture_options(&self) -> CaptureOptions {
        CaptureOptions {
            scale: self.scale,
            background: self.background.clone(),
            ..CaptureOptions::default()
        }
    }
}

/// Preference file location
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesConfig {
    /// Defaults to `<config dir>/nutrisculpt/preferences.json`
    pub path: Option<PathBuf>,
}

impl PreferencesConfig {
    pub fn resolved_path(&self) -> PathBuf {
        match &self.path {
            Some(path) => path.clone(),
            None => dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("nutrisculpt")
                .join("preferences.json"),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with NS__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        Self::load_from(Path::new(&format!("config/{}.toml", env)))
    }

    /// Same as [`AppConfig::load`] with an explicit config file
    pub fn load_from(config_file: &Path) -> Result<Self> {
        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::from(config_file).required(false))
            // e.g., NS__EXPORT__SCALE=3 sets export.scale
            .add_source(
                config::Environment::with_prefix("NS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the exporter would only fail on later
    pub fn validate(&self) -> Result<()> {
        if !(1..=4).contains(&self.export.scale) {
            bail!("export.scale must be between 1 and 4, got {}", self.export.scale);
        }
        if let Err(e) = validate_hex_color(&self.export.background) {
            bail!("export.background: {}", e);
        }
        if let Err(e) = url::Url::parse(&self.share.base_url) {
            bail!("share.base_url '{}' is not a valid URL: {}", self.share.base_url, e);
        }
        Ok(())
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}
