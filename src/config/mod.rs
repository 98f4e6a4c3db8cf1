//! Configuration for `inline-svgo.toml`.
//!
//! # Sections
//!
//! | Section   | Purpose                                        |
//! |-----------|------------------------------------------------|
//! | `[svgo]`  | Encoding override and optimizer options        |
//!
//! A missing config file is not an error; every field has a default.
//! Command-line flags override values read from the file.

mod error;
mod util;

pub use error::ConfigError;
use util::find_config_file;

use crate::{cli::Cli, debug, log, svg::OptimizerOptions, svg::SvgoOptions};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// File name searched for when `--config` is not given.
pub const CONFIG_FILE: &str = "inline-svgo.toml";

/// Precision accepted by the usvg writer.
const PRECISION_RANGE: std::ops::RangeInclusive<u8> = 1..=12;

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing inline-svgo.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path the config was loaded from (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Rewrite settings
    pub svgo: SvgoConfig,
}

/// `[svgo]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgoConfig {
    /// Force percent-encoding on or off instead of mirroring each input.
    pub encode: Option<bool>,
    pub dpi: f32,
    pub coordinates_precision: u8,
    pub transforms_precision: u8,
    pub id_prefix: Option<String>,
    /// Grow the viewBox to include strokes.
    pub expand_viewbox: bool,
}

impl Default for SvgoConfig {
    fn default() -> Self {
        let optimizer = OptimizerOptions::default();
        Self {
            encode: None,
            dpi: optimizer.dpi,
            coordinates_precision: optimizer.coordinates_precision,
            transforms_precision: optimizer.transforms_precision,
            id_prefix: optimizer.id_prefix,
            expand_viewbox: optimizer.expand_viewbox,
        }
    }
}

impl SvgoConfig {
    /// Options for the rewrite pipeline.
    pub fn options(&self) -> SvgoOptions {
        SvgoOptions {
            encode: self.encode,
            optimizer: OptimizerOptions {
                dpi: self.dpi,
                coordinates_precision: self.coordinates_precision,
                transforms_precision: self.transforms_precision,
                id_prefix: self.id_prefix.clone(),
                expand_viewbox: self.expand_viewbox,
            },
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(ConfigError::Validation(format!(
                "svgo.dpi must be positive, got {}",
                self.dpi
            )));
        }
        for (field, value) in [
            ("coordinates_precision", self.coordinates_precision),
            ("transforms_precision", self.transforms_precision),
        ] {
            if !PRECISION_RANGE.contains(&value) {
                return Err(ConfigError::Validation(format!(
                    "svgo.{field} must be within {}..={}, got {value}",
                    PRECISION_RANGE.start(),
                    PRECISION_RANGE.end()
                )));
            }
        }
        if let Some(prefix) = &self.id_prefix
            && prefix.chars().any(|c| c.is_whitespace() || c == '"')
        {
            return Err(ConfigError::Validation(format!(
                "svgo.id_prefix contains invalid characters: {prefix:?}"
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration for the given command line.
    ///
    /// Without `--config`, searches upward from cwd for `inline-svgo.toml`
    /// and falls back to defaults. An explicit `--config` must exist.
    pub fn load(cli: &Cli) -> Result<Self> {
        let path = match &cli.config {
            Some(path) => Some(path.clone()),
            None => find_config_file(Path::new(CONFIG_FILE)),
        };

        let mut config = match path {
            Some(path) => {
                debug!("config"; "loading {}", path.display());
                let mut config = Self::from_path(&path)?;
                config.config_path = Some(path);
                config
            }
            None => {
                debug!("config"; "no {} found, using defaults", CONFIG_FILE);
                Self::default()
            }
        };

        config.apply_cli(cli);
        config
            .validate()
            .with_context(|| match &config.config_path {
                Some(path) => format!("invalid config `{}`", path.display()),
                None => "invalid options".to_string(),
            })?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("failed to parse `{}`", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        log!("warning"; "unknown fields in {}, ignoring:", path.display());
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Command-line flags take precedence over the file.
    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(encode) = cli.encode {
            self.svgo.encode = Some(encode);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.svgo.validate()
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> Config {
    let (parsed, ignored) = Config::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
