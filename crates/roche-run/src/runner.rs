use std::time::Instant;

use roche_engine::{GraphicsSettings, InputSource, RenderError, Renderer, Simulation};

use crate::pacing::StepPacer;

/// Drives a [`Simulation`] from an input source into a renderer.
///
/// Host frames of arbitrary length are cut into fixed simulation steps, so
/// camera inertia and switch animations run at the same speed on any host.
pub struct Runner<R: Renderer, I: InputSource> {
    sim: Simulation,
    renderer: R,
    input: I,
    pacer: StepPacer,
    initialized: bool,
    steps: u64,
}

impl<R: Renderer, I: InputSource> Runner<R, I> {
    pub fn new(sim: Simulation, renderer: R, input: I) -> Self {
        let pacer = StepPacer::new(sim.config().fixed_dt);
        Self {
            sim,
            renderer,
            input,
            pacer,
            initialized: false,
            steps: 0,
        }
    }

    /// Create renderer resources. Call once before ticking.
    pub fn init(&mut self, graphics: &GraphicsSettings, width: u32, height: u32) -> Result<(), RenderError> {
        self.renderer.init(self.sim.bodies(), graphics, width, height)?;
        self.initialized = true;
        log::info!("Renderer '{}' initialized at {}x{}", self.renderer.backend(), width, height);
        Ok(())
    }

    /// Run one host frame of `frame_dt` seconds. Returns false once the
    /// simulation asked to stop.
    ///
    /// Input is only polled on frames that run at least one step, so a key
    /// press during a short host frame reaches the next step.
    pub fn tick(&mut self, frame_dt: f64) -> bool {
        if !self.initialized {
            return false;
        }

        let steps = self.pacer.advance(frame_dt);
        if steps == 0 {
            return true;
        }

        let input = self.input.poll();
        if !Simulation::is_running(&input) {
            return false;
        }

        for _ in 0..steps {
            let outcome = self.sim.update(self.pacer.step(), &input, &mut self.renderer);
            self.steps += 1;
            if !outcome.keep_running {
                return false;
            }
        }
        true
    }

    /// Headless loop: one fixed step per host frame, at most `max_frames`.
    /// Returns the number of frames run.
    pub fn run_fixed(&mut self, max_frames: u64) -> u64 {
        let dt = self.pacer.step();
        let mut frames = 0;
        while frames < max_frames {
            frames += 1;
            if !self.tick(dt) {
                break;
            }
        }
        frames
    }

    /// Real-time loop paced by the wall clock, at most `max_frames`.
    pub fn run_realtime(&mut self, max_frames: u64) -> u64 {
        let mut last = Instant::now();
        let mut frames = 0;
        while frames < max_frames {
            let now = Instant::now();
            let frame_dt = now.duration_since(last).as_secs_f64();
            last = now;
            frames += 1;
            if !self.tick(frame_dt) {
                break;
            }
            std::thread::sleep(self.pacer.until_next_step());
        }
        frames
    }

    /// Release renderer resources, waiting for pending screenshots.
    pub fn shutdown(&mut self) {
        if self.initialized {
            self.renderer.destroy();
            self.initialized = false;
            log::info!("Shut down after {} simulation steps", self.steps);
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessRenderer;
    use crate::script::ScriptedInput;
    use roche_engine::{BodyParameters, EngineConfig, Key, OrbitalElements};

    fn sim() -> Simulation {
        let bodies = vec![
            BodyParameters::new("Star", 1.0e6).with_gm(1.0e14).as_star(2.0),
            BodyParameters::new("Rock", 1.0e4).with_parent("Star", OrbitalElements::circular(1.0e7)),
        ];
        Simulation::new(bodies, EngineConfig::default()).unwrap()
    }

    #[test]
    fn tick_before_init_does_nothing() {
        let mut runner = Runner::new(sim(), HeadlessRenderer::new(), ScriptedInput::new());
        assert!(!runner.tick(1.0));
        assert_eq!(runner.steps(), 0);
    }

    #[test]
    fn fixed_loop_stops_on_quit() {
        let script = ScriptedInput::new().wait(5).press(Key::Quit);
        let mut runner = Runner::new(sim(), HeadlessRenderer::new(), script);
        runner.init(&GraphicsSettings::default(), 64, 48).unwrap();

        let frames = runner.run_fixed(100);
        assert_eq!(frames, 6);
        assert_eq!(runner.steps(), 5);
        assert_eq!(runner.renderer().frames_rendered(), 5);
        runner.shutdown();
    }

    #[test]
    fn long_host_frame_runs_several_steps() {
        let mut runner = Runner::new(sim(), HeadlessRenderer::new(), ScriptedInput::new());
        runner.init(&GraphicsSettings::default(), 16, 16).unwrap();
        let dt = runner.simulation().config().fixed_dt;

        assert!(runner.tick(dt * 3.5));
        assert_eq!(runner.steps(), 3);
        assert!((runner.simulation().epoch() - dt * 3.0).abs() < 1e-9);
        runner.shutdown();
    }

    #[test]
    fn key_press_survives_short_host_frames() {
        let script = ScriptedInput::new().press(Key::SwitchFocus);
        let mut runner = Runner::new(sim(), HeadlessRenderer::new(), script);
        runner.init(&GraphicsSettings::default(), 16, 16).unwrap();
        let dt = runner.simulation().config().fixed_dt;

        // First frame is too short for a step and must not consume the press
        assert!(runner.tick(dt * 0.6));
        assert_eq!(runner.steps(), 0);
        for _ in 0..5 {
            assert!(runner.tick(dt * 0.6));
        }
        assert!(runner.steps() >= 2);
        assert_eq!(runner.simulation().frame_data().focused, 1);
        runner.shutdown();
    }
}
