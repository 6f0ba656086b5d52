//! Configuration for the folio terminal portfolio.
//!
//! The configuration lives in `config.toml` under the platform config
//! directory (for example `~/.config/folio/config.toml` on Linux). Every key
//! is optional:
//!
//! ```toml
//! fps = 30
//! theme = "purple"
//! content = "/path/to/portfolio.toml"
//!
//! [reveal]
//! enabled = true
//! visibility_threshold = 0.1
//! transition_ms = 1000
//!
//! [rain]
//! enabled = true
//! cell_size = 20
//! fade_alpha = 0.05
//! reset_threshold = 0.975
//! glyph_color = "#8A2BE2"
//! recompute_columns_on_resize = true
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use folio_core::{ColorTheme, Fill, RainConfig, RevealConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Largest accepted `rain.cell_size`, in logical pixels.
pub const MAX_CELL_SIZE: u32 = 1000;

/// Errors raised while loading the configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Target frames per second of the render loop.
    pub fps: u32,
    /// Color theme.
    pub theme: ColorTheme,
    /// Portfolio content file replacing the built-in content.
    pub content: Option<PathBuf>,
    pub reveal: RevealSettings,
    pub rain: RainSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: 30,
            theme: ColorTheme::default(),
            content: None,
            reveal: RevealSettings::default(),
            rain: RainSettings::default(),
        }
    }
}

/// `[reveal]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealSettings {
    /// Fade sections in as they scroll into view.
    pub enabled: bool,
    pub visibility_threshold: f32,
    pub transition_ms: u64,
}

impl Default for RevealSettings {
    fn default() -> Self {
        let defaults = RevealConfig::default();
        Self {
            enabled: true,
            visibility_threshold: defaults.visibility_threshold,
            transition_ms: defaults.transition_ms,
        }
    }
}

/// `[rain]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RainSettings {
    /// Draw the matrix rain background.
    pub enabled: bool,
    pub cell_size: u32,
    pub fade_alpha: f32,
    pub reset_threshold: f64,
    /// Glyph color as `#rrggbb`; the theme color when unset.
    pub glyph_color: Option<String>,
    pub recompute_columns_on_resize: bool,
}

impl Default for RainSettings {
    fn default() -> Self {
        let defaults = RainConfig::default();
        Self {
            enabled: true,
            cell_size: defaults.cell_size,
            fade_alpha: defaults.fade_alpha,
            reset_threshold: defaults.reset_threshold,
            glyph_color: None,
            recompute_columns_on_resize: defaults.recompute_columns_on_resize,
        }
    }
}

impl Config {
    /// Default location of the configuration file.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "folio").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load the configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used and a missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    debug!("no configuration file, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config: Self =
            toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.clone(), source })?;
        config.validate()?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 || self.fps > 240 {
            return Err(ConfigError::Invalid(format!(
                "fps must be between 1 and 240, got {}",
                self.fps
            )));
        }
        let threshold = self.reveal.visibility_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::Invalid(format!(
                "reveal.visibility_threshold must be between 0 and 1, got {threshold}"
            )));
        }
        if !(2..=MAX_CELL_SIZE).contains(&self.rain.cell_size) {
            return Err(ConfigError::Invalid(format!(
                "rain.cell_size must be between 2 and {MAX_CELL_SIZE}, got {}",
                self.rain.cell_size
            )));
        }
        let alpha = self.rain.fade_alpha;
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "rain.fade_alpha must be in (0, 1], got {alpha}"
            )));
        }
        let reset = self.rain.reset_threshold;
        if !(0.0..=1.0).contains(&reset) {
            return Err(ConfigError::Invalid(format!(
                "rain.reset_threshold must be between 0 and 1, got {reset}"
            )));
        }
        if let Some(color) = &self.rain.glyph_color
            && Fill::from_hex(color).is_none()
        {
            return Err(ConfigError::Invalid(format!(
                "rain.glyph_color must be a #rrggbb color, got {color:?}"
            )));
        }
        Ok(())
    }

    /// Settings for the reveal wrappers.
    pub fn reveal_config(&self) -> RevealConfig {
        RevealConfig {
            visibility_threshold: self.reveal.visibility_threshold,
            transition_ms: self.reveal.transition_ms,
        }
    }

    /// Settings for the matrix rain. The glyph color follows the theme unless
    /// overridden.
    pub fn rain_config(&self) -> RainConfig {
        let glyph = self
            .rain
            .glyph_color
            .as_deref()
            .and_then(Fill::from_hex)
            .unwrap_or_else(|| self.theme.glyph());
        RainConfig {
            cell_size: self.rain.cell_size,
            fade_alpha: self.rain.fade_alpha,
            reset_threshold: self.rain.reset_threshold,
            glyph,
            recompute_columns_on_resize: self.rain.recompute_columns_on_resize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.reveal_config(), RevealConfig::default());
        assert_eq!(config.rain_config(), RainConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = Config::from_toml_str(
            r##"
            theme = "green"

            [rain]
            cell_size = 10
            glyph_color = "#00ff00"
            recompute_columns_on_resize = false

            [reveal]
            visibility_threshold = 0.5
            "##,
        )
        .unwrap();
        assert_eq!(config.theme, ColorTheme::Green);
        assert_eq!(config.fps, 30);
        assert_eq!(config.reveal_config().visibility_threshold, 0.5);
        assert_eq!(config.reveal_config().transition_ms, 1000);

        let rain = config.rain_config();
        assert_eq!(rain.cell_size, 10);
        assert_eq!(rain.glyph, Fill::rgb(0, 255, 0));
        assert!(!rain.recompute_columns_on_resize);
    }

    #[test]
    fn test_theme_drives_glyph_color() {
        let config = Config::from_toml_str(r#"theme = "amber""#).unwrap();
        assert_eq!(config.rain_config().glyph, ColorTheme::Amber.glyph());
    }

    #[test]
    fn test_rejects_invalid_values() {
        for text in [
            "fps = 0",
            "[reveal]\nvisibility_threshold = 1.5",
            "[rain]\ncell_size = 0",
            "[rain]\ncell_size = 100000000",
            "[rain]\nfade_alpha = 0.0",
            "[rain]\nreset_threshold = -0.1",
            "[rain]\nglyph_color = \"purple\"",
        ] {
            assert!(
                matches!(Config::from_toml_str(text), Err(ConfigError::Invalid(_))),
                "{text} should be rejected"
            );
        }
    }

    #[test]
    fn test_cell_size_bounds() {
        let config = Config::from_toml_str(&format!("[rain]\ncell_size = {MAX_CELL_SIZE}")).unwrap();
        assert_eq!(config.rain_config().cell_size, MAX_CELL_SIZE);
        assert!(Config::from_toml_str(&format!("[rain]\ncell_size = {}", MAX_CELL_SIZE + 1)).is_err());
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(matches!(
            Config::from_toml_str("colour = \"red\""),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let path = Path::new("/nonexistent/folio/config.toml");
        assert!(matches!(
            Config::load(Some(path)),
            Err(ConfigError::Io { .. })
        ));
    }
}
