use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::api::config::EngineConfig;
use crate::error::ConfigResult;

/// Runtime settings file. Every section and field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub video: VideoSettings,
    pub graphics: GraphicsSettings,
    pub controls: ControlSettings,
    pub simulation: Option<SimulationSettings>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    pub fullscreen: bool,
    pub width: u32,
    pub height: u32,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self { fullscreen: false, width: 1280, height: 720 }
    }
}

/// Quality knobs forwarded to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphicsSettings {
    pub max_tex_size: u32,
    pub msaa_samples: u32,
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self { max_tex_size: 4096, msaa_samples: 4 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    /// Camera drag velocity per pixel.
    pub sensitivity: f64,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self { sensitivity: EngineConfig::default().sensitivity }
    }
}

/// Overrides for simulation defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationSettings {
    pub warp_factors: Option<Vec<f64>>,
    pub switch_frames: Option<u32>,
    pub exposure: Option<f32>,
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }

    /// Copy the simulation-relevant values into `config`.
    /// The warp table is checked here so a bad file fails at load time.
    pub fn apply_to(&self, config: &mut EngineConfig) -> ConfigResult<()> {
        config.sensitivity = self.controls.sensitivity;
        if let Some(sim) = &self.simulation {
            if let Some(factors) = &sim.warp_factors {
                config.warp_factors = factors.clone();
                config.warp_table()?;
            }
            if let Some(frames) = sim.switch_frames {
                config.switch_frames = frames.max(1);
            }
            if let Some(exposure) = sim.exposure {
                config.exposure = exposure;
            }
        }
        Ok(())
    }
}
