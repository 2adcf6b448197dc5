//! Runtime settings
//!
//! Every field has a default, so a config file only needs the keys it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fireworks window width in pixels
    pub width: usize,
    /// Fireworks window height in pixels
    pub height: usize,
    /// Target frames per second for both windows
    pub fps: usize,
    /// RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,
    /// Dots in the image flow
    pub flow_particles: usize,
    /// Replace the embedded gift image with this file
    pub image: Option<String>,
    /// Start the fireworks immediately instead of waiting for the gift
    pub skip_reveal: bool,
    /// Draw an FPS readout in the fireworks window
    pub show_fps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            fps: 60,
            seed: None,
            flow_particles: crate::flow::FLOW_PARTICLES,
            image: None,
            skip_reveal: false,
            show_fps: false,
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(|e| Error::Config(format!("Parse config: {e}")))
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {}: {e}", path.display())))?;
        let cfg = Self::from_json(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(cfg)
    }

    /// Config from the first CLI argument if one is given, defaults otherwise.
    pub fn from_args() -> Result<Self, Error> {
        match std::env::args().nth(1) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }
}
