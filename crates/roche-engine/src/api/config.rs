use crate::core::clock::{TimeWarpTable, DEFAULT_WARP_FACTORS};
use crate::error::ConfigResult;
use crate::renderer::camera::CameraSettings;

/// Vertical field of view handed to the renderer, degrees.
pub const CAMERA_FOVY_DEGREES: f32 = 40.0;

/// Configuration for the simulation, provided by the host.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f64,
    /// Drag velocity per pixel.
    pub sensitivity: f64,
    /// Cap on each camera rate axis.
    pub max_view_speed: f64,
    /// Camera velocity kept per frame.
    pub view_smoothness: f64,
    /// Focus switch duration in frames.
    pub switch_frames: u32,
    /// Margin between the camera elevation and the poles, radians.
    pub elevation_margin: f64,
    /// Vertical field of view, degrees.
    pub fov_y_degrees: f32,
    /// Ordered time-warp multipliers.
    pub warp_factors: Vec<f64>,
    /// Body focused at startup.
    pub initial_focus: usize,
    /// Tone-mapping exposure passed to the renderer.
    pub exposure: f32,
    /// Ambient light level passed to the renderer.
    pub ambient_color: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let camera = CameraSettings::default();
        Self {
            fixed_dt: 1.0 / 60.0,
            sensitivity: camera.sensitivity,
            max_view_speed: camera.max_view_speed,
            view_smoothness: camera.smoothness,
            switch_frames: camera.switch_frames,
            elevation_margin: camera.elevation_margin,
            fov_y_degrees: CAMERA_FOVY_DEGREES,
            warp_factors: DEFAULT_WARP_FACTORS.to_vec(),
            initial_focus: 0,
            exposure: 0.0,
            ambient_color: 0.0,
        }
    }
}

impl EngineConfig {
    /// Camera tuning derived from this config.
    pub fn camera_settings(&self) -> CameraSettings {
        CameraSettings {
            sensitivity: self.sensitivity,
            max_view_speed: self.max_view_speed,
            smoothness: self.view_smoothness,
            switch_frames: self.switch_frames,
            elevation_margin: self.elevation_margin,
        }
    }

    /// Validated warp table.
    pub fn warp_table(&self) -> ConfigResult<TimeWarpTable> {
        TimeWarpTable::new(self.warp_factors.clone())
    }

    /// Field of view in radians.
    pub fn fov_y(&self) -> f32 {
        self.fov_y_degrees.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_camera_settings() {
        let config = EngineConfig::default();
        assert_eq!(config.camera_settings(), CameraSettings::default());
        assert_eq!(config.fov_y_degrees, 40.0);
    }

    #[test]
    fn warp_table_is_validated() {
        let config = EngineConfig { warp_factors: vec![], ..EngineConfig::default() };
        assert!(config.warp_table().is_err());
        assert_eq!(EngineConfig::default().warp_table().unwrap().len(), DEFAULT_WARP_FACTORS.len());
    }
}
