//! Command line interface.

use std::path::PathBuf;

use clap::Parser;
use folio_config::{Config, ConfigError};

#[derive(Parser, Debug)]
#[command(name = "folio", version, about = "A personal portfolio for the terminal")]
pub struct Cli {
    /// Configuration file (defaults to config.toml in the platform config directory).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Portfolio content file (TOML, or JSON with a .json extension).
    #[arg(long)]
    pub content: Option<PathBuf>,

    /// Disable the matrix rain background.
    #[arg(long)]
    pub no_rain: bool,

    /// Show every section immediately instead of fading it in on scroll.
    #[arg(long)]
    pub no_reveal: bool,

    /// Seed for the rain glyphs, for reproducible output.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Target frames per second.
    #[arg(long)]
    pub fps: Option<u32>,
}

impl Cli {
    /// Load the configuration file and apply command line overrides.
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        let mut config = Config::load(self.config.as_deref())?;
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, config: &mut Config) {
        if let Some(content) = &self.content {
            config.content = Some(content.clone());
        }
        if self.no_rain {
            config.rain.enabled = false;
        }
        if self.no_reveal {
            config.reveal.enabled = false;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
    }
}
