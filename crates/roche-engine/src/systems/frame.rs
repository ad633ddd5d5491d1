use std::f64::consts::{PI, TAU};

use glam::DVec3;

use crate::api::config::EngineConfig;
use crate::api::types::{BodyState, FrameOutcome};
use crate::core::body::BodyParameters;
use crate::core::clock::SimulationClock;
use crate::core::hierarchy::BodyHierarchy;
use crate::core::orbit::compute_position;
use crate::error::{ConfigError, ConfigResult};
use crate::input::edge::InputEdgeTracker;
use crate::input::state::{InputSnapshot, Key, MouseTracker};
use crate::renderer::camera::{CameraRig, CAMERA_UP};
use crate::renderer::traits::{FrameData, Renderer};
use crate::systems::{capture, profiler};

/// Rotation about the body axis at `epoch`. A zero period leaves the body
/// at its reference orientation (π).
pub fn rotation_angle(epoch: f64, period: f64) -> f32 {
    if period == 0.0 {
        return PI as f32;
    }
    (TAU * epoch / period + PI) as f32
}

/// Cloud layer displacement in [0, 1). Clouds drift opposite to the epoch.
pub fn cloud_displacement(epoch: f64, period: f64) -> f32 {
    if period == 0.0 {
        return 0.0;
    }
    let disp = (-epoch / period).rem_euclid(1.0) as f32;
    // Narrowing can round 0.99999999 up to 1.0
    if disp >= 1.0 { 0.0 } else { disp }
}

/// The whole simulation: bodies, clock, camera and input handling.
pub struct Simulation {
    bodies: Vec<BodyParameters>,
    hierarchy: BodyHierarchy,
    clock: SimulationClock,
    camera: CameraRig,
    keys: InputEdgeTracker,
    mouse: MouseTracker,
    relative: Vec<DVec3>,
    absolute: Vec<DVec3>,
    states: Vec<BodyState>,
    config: EngineConfig,
}

impl Simulation {
    /// Validate the bodies and config and place everything at epoch 0.
    pub fn new(bodies: Vec<BodyParameters>, config: EngineConfig) -> ConfigResult<Self> {
        for body in &bodies {
            body.validate()?;
        }
        let hierarchy = BodyHierarchy::new(&bodies)?;
        if config.initial_focus >= bodies.len() {
            return Err(ConfigError::FocusOutOfRange {
                focus: config.initial_focus,
                count: bodies.len(),
            });
        }
        let clock = SimulationClock::new(config.warp_table()?);
        let camera = CameraRig::new(config.initial_focus, &bodies, config.camera_settings());

        let count = bodies.len();
        let mut sim = Self {
            bodies,
            hierarchy,
            clock,
            camera,
            keys: InputEdgeTracker::new(),
            mouse: MouseTracker::new(),
            relative: vec![DVec3::ZERO; count],
            absolute: vec![DVec3::ZERO; count],
            states: vec![BodyState::default(); count],
            config,
        };
        sim.update_states();
        log::info!(
            "Simulation ready: {} bodies, focus on {}",
            count,
            sim.bodies[sim.camera.focus()].name
        );
        Ok(sim)
    }

    /// Run one frame. `dt` is real elapsed time in seconds.
    pub fn update(&mut self, dt: f64, input: &InputSnapshot, renderer: &mut dyn Renderer) -> FrameOutcome {
        self.clock.advance_warped(dt);
        self.update_states();

        let mut outcome = FrameOutcome {
            keep_running: Self::is_running(input),
            screenshot_requested: false,
            profiler_dumped: false,
        };
        self.handle_commands(input, renderer, &mut outcome);

        let drag = self.mouse.drag(input);
        self.camera.update(&self.absolute, &self.bodies, drag);

        renderer.render(&self.frame_data());

        self.mouse.store(input);
        outcome
    }

    /// False once Quit is held or the window asked to close.
    pub fn is_running(input: &InputSnapshot) -> bool {
        !input.key_down(Key::Quit) && !input.close_requested
    }

    /// Recompute every body's state from the current epoch.
    fn update_states(&mut self) {
        let epoch = self.clock.epoch();
        for (i, body) in self.bodies.iter().enumerate() {
            self.relative[i] = match self.hierarchy.parent(i) {
                Some(parent) => compute_position(epoch, self.bodies[parent].gm, &body.orbit),
                None => DVec3::ZERO,
            };
        }
        self.absolute = self.hierarchy.absolute_positions(&self.relative);
        for (i, body) in self.bodies.iter().enumerate() {
            self.states[i] = BodyState {
                position: self.absolute[i],
                rotation_angle: rotation_angle(epoch, body.rotation_period),
                cloud_disp: cloud_displacement(epoch, body.cloud_period),
            };
        }
    }

    fn handle_commands(&mut self, input: &InputSnapshot, renderer: &mut dyn Renderer, outcome: &mut FrameOutcome) {
        if self.keys.pressed_in(input, Key::WarpDown) {
            self.clock.select_warp(-1);
        }
        if self.keys.pressed_in(input, Key::WarpUp) {
            self.clock.select_warp(1);
        }

        if self.keys.pressed_in(input, Key::SwitchFocus) {
            self.camera.toggle_switch(&self.bodies);
            let name = &self.bodies[self.camera.focus()].name;
            if self.camera.is_switching() {
                log::info!("Switching focus to {}", name);
            } else {
                log::info!("Focus switch cancelled, staying on {}", name);
            }
        }

        if self.keys.pressed_in(input, Key::Screenshot) {
            let path = capture::screenshot_name();
            outcome.screenshot_requested = renderer.take_screenshot(&path);
            if !outcome.screenshot_requested {
                log::warn!("Screenshot still in progress, {} dropped", path);
            }
        }

        if self.keys.pressed_in(input, Key::DumpProfiler) {
            for line in profiler::format_report(&renderer.profiler_times()) {
                log::info!("{}", line);
            }
            outcome.profiler_dumped = true;
        }
    }

    /// Render request for the current state.
    pub fn frame_data(&self) -> FrameData<'_> {
        FrameData {
            eye: self.camera.eye_position(),
            fov_y: self.config.fov_y(),
            center: self.camera.center(),
            up: CAMERA_UP,
            exposure: self.config.exposure,
            ambient_color: self.config.ambient_color,
            bodies: &self.states,
            focused: self.camera.focus(),
        }
    }

    pub fn bodies(&self) -> &[BodyParameters] {
        &self.bodies
    }

    pub fn states(&self) -> &[BodyState] {
        &self.states
    }

    pub fn hierarchy(&self) -> &BodyHierarchy {
        &self.hierarchy
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn epoch(&self) -> f64 {
        self.clock.epoch()
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
