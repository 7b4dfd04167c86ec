//! Configuration handling for the dnadotplot CLI
//!
//! Supports loading configuration from dnadotplot.toml files with CLI argument overrides.

use anyhow::{Context, Result};
use dnadotplot_core::AlphabetPolicy;
use dnadotplot_render::{Color, ExportConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "dnadotplot.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub sequence: SequenceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Background colour
    #[serde(default = "default_background")]
    pub background: String,

    /// Colour for forward matches
    #[serde(default = "default_forward_color")]
    pub forward_color: String,

    /// Colour for reverse-complement matches
    #[serde(default = "default_reverse_color")]
    pub reverse_color: String,

    /// Raster dot radius in pixels
    #[serde(default)]
    pub dot_radius: u32,

    /// SVG circle radius in canvas units
    #[serde(default = "default_svg_point_radius")]
    pub svg_point_radius: f64,

    /// Draw axes around SVG output
    #[serde(default)]
    pub axes: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SequenceConfig {
    /// Reject symbols outside ACGTN instead of masking them to N
    #[serde(default)]
    pub strict_alphabet: bool,
}

// Default value functions
fn default_background() -> String { "#ffffff".to_string() }
fn default_forward_color() -> String { "#000000".to_string() }
fn default_reverse_color() -> String { "#808080".to_string() }
fn default_svg_point_radius() -> f64 { 0.8 }

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: default_background(),
            forward_color: default_forward_color(),
            reverse_color: default_reverse_color(),
            dot_radius: 0,
            svg_point_radius: default_svg_point_radius(),
            axes: false,
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    log::info!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };
        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;
        Ok(config)
    }

    pub fn alphabet_policy(&self) -> AlphabetPolicy {
        if self.sequence.strict_alphabet {
            AlphabetPolicy::Strict
        } else {
            AlphabetPolicy::Mask
        }
    }

    /// Renderer settings with colours parsed and validated
    pub fn export_config(&self) -> Result<ExportConfig> {
        let render = &self.render;
        let config = ExportConfig {
            background: Color::parse(&render.background).context("render.background")?,
            forward_color: Color::parse(&render.forward_color).context("render.forward_color")?,
            reverse_color: Color::parse(&render.reverse_color).context("render.reverse_color")?,
            dot_radius: render.dot_radius,
            point_radius: render.svg_point_radius,
            axes: render.axes,
            ..ExportConfig::default()
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.render.background, "#ffffff");
        assert_eq!(config.render.reverse_color, "#808080");
        assert_eq!(config.render.svg_point_radius, 0.8);
        assert_eq!(config.alphabet_policy(), AlphabetPolicy::Mask);

        let export = config.export_config().unwrap();
        assert_eq!(export.forward_color, Color::BLACK);
        assert_eq!(export.reverse_color, Color::GREY);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[render]\nforward_color = \"#ff0000\"\ndot_radius = 2\n").unwrap();
        writeln!(file, "[sequence]\nstrict_alphabet = true").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.render.forward_color, "#ff0000");
        assert_eq!(config.render.dot_radius, 2);
        assert_eq!(config.render.background, "#ffffff");
        assert_eq!(config.alphabet_policy(), AlphabetPolicy::Strict);
    }

    #[test]
    fn test_empty_file_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_colour_is_rejected() {
        let mut config = Config::default();
        config.render.reverse_color = "grey".to_string();
        let err = config.export_config().unwrap_err();
        assert!(format!("{:#}", err).contains("render.reverse_color"));
    }

    #[test]
    fn test_malformed_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[render\naxes = ").unwrap();
        assert!(Config::load_from_file(file.path()).is_err());
    }
}
