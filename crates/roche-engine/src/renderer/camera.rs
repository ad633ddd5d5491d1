use std::f64::consts::FRAC_PI_2;

use bytemuck::{Pod, Zeroable};
use glam::{DVec3, Mat4, Vec3};

use crate::core::body::BodyParameters;
use crate::extensions::easing::{lerp, smootherstep};
use crate::input::state::DragInput;

/// World up axis; elevation is measured from the XY plane toward +Z.
pub const CAMERA_UP: Vec3 = Vec3::Z;

/// Tuning for the orbit camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    /// Velocity added per pixel of drag.
    pub sensitivity: f64,
    /// Per-axis cap on angular and zoom rates.
    pub max_view_speed: f64,
    /// Fraction of velocity kept each frame (exponential damping).
    pub smoothness: f64,
    /// Length of a focus switch, in frames.
    pub switch_frames: u32,
    /// Gap kept between the elevation and ±π/2 so the up vector never
    /// becomes parallel to the view direction.
    pub elevation_margin: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            sensitivity: 0.0003,
            max_view_speed: 0.2,
            smoothness: 0.85,
            switch_frames: 100,
            elevation_margin: 0.001,
        }
    }
}

/// What the rig is doing with its focus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraMode {
    /// Centered on the focus body.
    Idle,
    /// Animating from `from` to the current focus.
    Switching {
        /// Previously focused body.
        from: usize,
        /// Camera distance when the switch began.
        from_distance: f64,
        /// Frames elapsed since the switch began.
        frame: u32,
    },
}

/// Polar orbit camera with inertia and animated focus switching.
///
/// Positions are f64 end to end: the camera can sit 1e12 m from the origin.
#[derive(Debug, Clone)]
pub struct CameraRig {
    /// Azimuth around +Z, radians.
    pub azimuth: f64,
    /// Elevation above the XY plane, radians.
    pub elevation: f64,
    /// Distance from the look-at center, meters.
    pub distance: f64,
    /// (azimuth rate, elevation rate, zoom rate) per frame.
    velocity: DVec3,
    focus: usize,
    mode: CameraMode,
    center: DVec3,
    settings: CameraSettings,
}

/// GPU-side camera matrices. The eye sits at the origin of render space, so
/// f32 is enough for everything here.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

impl CameraUniform {
    /// View looking along `forward` from the render-space origin, with an
    /// infinite reverse-Z projection.
    pub fn eye_relative(forward: Vec3, up: Vec3, fov_y: f32, aspect: f32, near: f32) -> Self {
        Self {
            view: Mat4::look_to_rh(Vec3::ZERO, forward, up).to_cols_array_2d(),
            projection: Mat4::perspective_infinite_reverse_rh(fov_y, aspect, near).to_cols_array_2d(),
        }
    }
}

impl CameraRig {
    /// Camera focused on `focus`, at its default viewing distance.
    pub fn new(focus: usize, bodies: &[BodyParameters], settings: CameraSettings) -> Self {
        Self {
            azimuth: 0.0,
            elevation: 0.0,
            distance: bodies[focus].default_view_distance(),
            velocity: DVec3::ZERO,
            focus,
            mode: CameraMode::Idle,
            center: DVec3::ZERO,
            settings,
        }
    }

    /// Start a switch to the next body, or cancel the one in progress.
    ///
    /// Cancelling leaves the new focus in place and snaps the distance to
    /// its default viewing distance.
    pub fn toggle_switch(&mut self, bodies: &[BodyParameters]) {
        match self.mode {
            CameraMode::Switching { .. } => {
                self.mode = CameraMode::Idle;
                self.distance = bodies[self.focus].default_view_distance();
            }
            CameraMode::Idle => {
                let from = self.focus;
                self.focus = (self.focus + 1) % bodies.len();
                self.mode = CameraMode::Switching {
                    from,
                    from_distance: self.distance,
                    frame: 0,
                };
            }
        }
    }

    /// Per-frame update: resolve the look-at center (advancing any switch),
    /// apply drag input, integrate and damp velocity, then clamp.
    pub fn update(&mut self, positions: &[DVec3], bodies: &[BodyParameters], drag: DragInput) {
        let focus_pos = positions[self.focus];
        let target_distance = bodies[self.focus].default_view_distance();

        match self.mode {
            CameraMode::Switching { from, from_distance, frame } => {
                let t = frame as f64 / self.settings.switch_frames.max(1) as f64;
                let f = smootherstep(t);
                self.center = positions[from].lerp(focus_pos, f);
                self.distance = lerp(from_distance, target_distance, f);

                let frame = frame + 1;
                self.mode = if frame > self.settings.switch_frames {
                    self.distance = target_distance;
                    CameraMode::Idle
                } else {
                    CameraMode::Switching { from, from_distance, frame }
                };
            }
            CameraMode::Idle => self.center = focus_pos,
        }

        self.apply_drag(drag);

        self.azimuth += self.velocity.x;
        self.elevation += self.velocity.y;
        self.distance *= 1.0 + self.velocity.z;

        self.velocity *= self.settings.smoothness;

        let limit = FRAC_PI_2 - self.settings.elevation_margin;
        if self.elevation > limit {
            self.elevation = limit;
            self.velocity.y = 0.0;
        }
        if self.elevation < -limit {
            self.elevation = -limit;
            self.velocity.y = 0.0;
        }

        let radius = bodies[self.focus].radius;
        if self.distance < radius {
            self.distance = radius;
        }
    }

    fn apply_drag(&mut self, drag: DragInput) {
        let s = self.settings.sensitivity;
        let max = self.settings.max_view_speed;
        if drag.primary {
            self.velocity.x = (self.velocity.x + drag.delta.x * s).clamp(-max, max);
            self.velocity.y = (self.velocity.y + drag.delta.y * s).clamp(-max, max);
        } else if drag.secondary {
            self.velocity.z = (self.velocity.z + drag.delta.y * s).clamp(-max, max);
        }
    }

    /// Unit vector from the center toward the eye.
    pub fn direction(&self) -> DVec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_el, cos_el) = self.elevation.sin_cos();
        DVec3::new(cos_az * cos_el, sin_az * cos_el, sin_el)
    }

    /// Eye position in world space.
    pub fn eye_position(&self) -> DVec3 {
        self.direction() * self.distance + self.center
    }

    /// Look-at center (interpolated during a switch).
    pub fn center(&self) -> DVec3 {
        self.center
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn is_switching(&self) -> bool {
        matches!(self.mode, CameraMode::Switching { .. })
    }

    pub fn velocity(&self) -> DVec3 {
        self.velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::body::OrbitalElements;

    fn bodies() -> Vec<BodyParameters> {
        vec![
            BodyParameters::new("Sun", 7.0e8).with_gm(1.3e20),
            BodyParameters::new("Earth", 6.4e6)
                .with_parent("Sun", OrbitalElements::circular(1.5e11)),
        ]
    }

    fn positions() -> Vec<DVec3> {
        vec![DVec3::ZERO, DVec3::new(1.5e11, 0.0, 0.0)]
    }

    #[test]
    fn starts_at_four_radii() {
        let rig = CameraRig::new(0, &bodies(), CameraSettings::default());
        assert_eq!(rig.distance, 2.8e9);
        assert_eq!(rig.mode(), CameraMode::Idle);
    }

    #[test]
    fn eye_is_distance_along_azimuth() {
        let mut rig = CameraRig::new(1, &bodies(), CameraSettings::default());
        rig.update(&positions(), &bodies(), DragInput::NONE);
        let eye = rig.eye_position();
        let expected = DVec3::new(1.5e11 + 4.0 * 6.4e6, 0.0, 0.0);
        assert!((eye - expected).length() < 1e-3, "eye = {eye:?}");
    }

    #[test]
    fn elevation_clamps_and_zeroes_rate() {
        let bodies = bodies();
        let mut rig = CameraRig::new(0, &bodies, CameraSettings::default());
        let limit = FRAC_PI_2 - 0.001;
        let mut clamped_once = false;
        for _ in 0..500 {
            rig.update(&positions(), &bodies, DragInput::orbit(0.0, 1.0e6));
            assert!(rig.elevation <= limit && rig.elevation >= -limit);
            if rig.elevation == limit {
                clamped_once = true;
                assert_eq!(rig.velocity().y, 0.0);
            }
        }
        assert!(clamped_once);

        for _ in 0..500 {
            rig.update(&positions(), &bodies, DragInput::orbit(0.0, -1.0e6));
            assert!(rig.elevation >= -limit);
        }
        assert_eq!(rig.elevation, -limit);
        assert_eq!(rig.velocity().y, 0.0);
    }

    #[test]
    fn drag_rate_is_capped_per_axis() {
        let bodies = bodies();
        let mut rig = CameraRig::new(0, &bodies, CameraSettings::default());
        rig.update(&positions(), &bodies, DragInput::orbit(1.0e9, 0.0));
        // One capped step of 0.2 integrated, then damped
        assert!((rig.azimuth - 0.2).abs() < 1e-12);
        assert!((rig.velocity().x - 0.2 * 0.85).abs() < 1e-12);
    }

    #[test]
    fn velocity_decays_without_input() {
        let bodies = bodies();
        let mut rig = CameraRig::new(0, &bodies, CameraSettings::default());
        rig.update(&positions(), &bodies, DragInput::orbit(300.0, 0.0));
        assert!(rig.velocity().x > 0.0);
        for _ in 0..200 {
            rig.update(&positions(), &bodies, DragInput::NONE);
        }
        assert!(rig.velocity().x.abs() < 1e-12);
    }

    #[test]
    fn zoom_never_enters_the_body() {
        let bodies = bodies();
        let mut rig = CameraRig::new(1, &bodies, CameraSettings::default());
        for _ in 0..300 {
            rig.update(&positions(), &bodies, DragInput::zoom(-1.0e6));
        }
        assert_eq!(rig.distance, 6.4e6);
    }

    #[test]
    fn switch_interpolates_between_foci() {
        let bodies = bodies();
        let positions = positions();
        let settings = CameraSettings::default();
        let mut rig = CameraRig::new(0, &bodies, settings);
        rig.update(&positions, &bodies, DragInput::NONE);

        rig.toggle_switch(&bodies);
        assert_eq!(rig.focus(), 1);

        rig.update(&positions, &bodies, DragInput::NONE);
        assert_eq!(rig.center(), positions[0]);

        let mut previous = rig.center().x;
        for frame in 1..=settings.switch_frames {
            rig.update(&positions, &bodies, DragInput::NONE);
            assert!(rig.center().x >= previous, "center moved backwards at frame {frame}");
            previous = rig.center().x;
        }
        assert!((rig.center() - positions[1]).length() < 1e-3);
        assert_eq!(rig.mode(), CameraMode::Idle);
        assert_eq!(rig.distance, 4.0 * 6.4e6);
    }

    #[test]
    fn retrigger_cancels_switch() {
        let bodies = bodies();
        let positions = positions();
        let mut rig = CameraRig::new(0, &bodies, CameraSettings::default());

        rig.toggle_switch(&bodies);
        rig.update(&positions, &bodies, DragInput::NONE);
        assert!(rig.is_switching());

        rig.toggle_switch(&bodies);
        assert_eq!(rig.mode(), CameraMode::Idle);
        assert_eq!(rig.focus(), 1);
        assert_eq!(rig.distance, 4.0 * 6.4e6);

        rig.update(&positions, &bodies, DragInput::NONE);
        assert_eq!(rig.center(), positions[1]);
    }

    #[test]
    fn focus_wraps_around() {
        let bodies = bodies();
        let mut rig = CameraRig::new(1, &bodies, CameraSettings::default());
        rig.toggle_switch(&bodies);
        assert_eq!(rig.focus(), 0);
    }

    #[test]
    fn uniform_looks_down_forward() {
        let uniform = CameraUniform::eye_relative(Vec3::X, CAMERA_UP, 40f32.to_radians(), 16.0 / 9.0, 1.0);
        let bytes: &[u8] = bytemuck::bytes_of(&uniform);
        assert_eq!(bytes.len(), 2 * 16 * 4);

        // Forward lands on -Z in view space
        let view = Mat4::from_cols_array_2d(&uniform.view);
        let ahead = view.transform_point3(Vec3::new(10.0, 0.0, 0.0));
        assert!((ahead - Vec3::new(0.0, 0.0, -10.0)).length() < 1e-5, "{ahead:?}");
    }

    #[test]
    fn switch_follows_quintic_blend() {
        let bodies = bodies();
        let positions = positions();
        let mut rig = CameraRig::new(0, &bodies, CameraSettings::default());
        rig.toggle_switch(&bodies);

        // The n-th update after the toggle blends at frame n - 1
        for _ in 0..26 {
            rig.update(&positions, &bodies, DragInput::NONE);
        }
        let f = smootherstep(0.25);
        assert!((rig.center().x - 1.5e11 * f).abs() < 1.0, "center = {:?}", rig.center());
        let expected_distance = lerp(2.8e9, 4.0 * 6.4e6, f);
        assert!((rig.distance - expected_distance).abs() < 1.0);
    }
}
