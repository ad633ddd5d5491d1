//! Software renderer for running without a GPU.
//!
//! Bodies are drawn as flat discs into an RGB8 framebuffer, which is enough
//! to check framing and focus in screenshots.

use std::time::Instant;

use glam::{Mat4, Vec3, Vec4};
use roche_engine::{
    BodyParameters, CameraUniform, CaptureError, CaptureRequest, CaptureWorker, FrameData,
    GraphicsSettings, InstanceBuffer, PngEncoder, ProfilerSample, RenderError, Renderer,
};

/// Near plane distance in meters.
const NEAR: f32 = 1.0;

#[derive(Default)]
pub struct HeadlessRenderer {
    bodies: Vec<BodyParameters>,
    instances: InstanceBuffer,
    camera: Option<CameraUniform>,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    capture: Option<CaptureWorker>,
    timings: Vec<ProfilerSample>,
    frames: u64,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Last frame's framebuffer, RGB8, top row first.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn instances(&self) -> &InstanceBuffer {
        &self.instances
    }

    pub fn camera(&self) -> Option<&CameraUniform> {
        self.camera.as_ref()
    }

    fn clear(&mut self, ambient: f32) {
        let level = (ambient.clamp(0.0, 1.0) * 255.0) as u8;
        self.pixels.fill(level);
    }

    fn draw_disc(&mut self, cx: f32, cy: f32, radius: f32, color: [u8; 3]) {
        let (w, h) = (self.width as i64, self.height as i64);
        let r = radius.max(0.5);
        let x0 = ((cx - r).floor() as i64).max(0);
        let x1 = ((cx + r).ceil() as i64).min(w - 1);
        let y0 = ((cy - r).floor() as i64).max(0);
        let y1 = ((cy + r).ceil() as i64).min(h - 1);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r * r {
                    let i = ((y * w + x) * 3) as usize;
                    self.pixels[i..i + 3].copy_from_slice(&color);
                }
            }
        }
    }

    fn rasterize(&mut self, frame: &FrameData) {
        let Some(camera) = self.camera else {
            return;
        };
        let view_proj = Mat4::from_cols_array_2d(&camera.projection) * Mat4::from_cols_array_2d(&camera.view);
        let focal = camera.projection[1][1];
        let half_w = self.width as f32 * 0.5;
        let half_h = self.height as f32 * 0.5;

        // Far to near so closer bodies cover farther ones
        let mut order: Vec<(f32, usize)> = self
            .instances
            .instances
            .iter()
            .enumerate()
            .filter_map(|(i, inst)| {
                let clip = view_proj * Vec4::new(inst.x, inst.y, inst.z, 1.0);
                (clip.w > NEAR).then_some((clip.w, i))
            })
            .collect();
        order.sort_by(|a, b| b.0.total_cmp(&a.0));

        for (depth, i) in order {
            let inst = self.instances.instances[i];
            let clip = view_proj * Vec4::new(inst.x, inst.y, inst.z, 1.0);
            let cx = (clip.x / clip.w + 1.0) * half_w;
            let cy = (1.0 - clip.y / clip.w) * half_h;
            let r = (inst.radius / depth * focal * half_h).min(self.width.max(self.height) as f32);
            let mut color = self.bodies[i].mean_color;
            if inst.focused > 0.0 && frame.exposure > 0.0 {
                color *= 1.0 + frame.exposure;
            }
            let rgb = (color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).to_array().map(|c| c as u8);
            self.draw_disc(cx, cy, r, rgb);
        }
    }
}

impl Renderer for HeadlessRenderer {
    fn backend(&self) -> &'static str {
        "headless"
    }

    fn init(
        &mut self,
        bodies: &[BodyParameters],
        graphics: &GraphicsSettings,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::SurfaceSize { width, height });
        }
        self.bodies = bodies.to_vec();
        self.width = width;
        self.height = height;
        self.pixels = vec![0; width as usize * height as usize * 3];
        let worker = CaptureWorker::spawn(PngEncoder).map_err(|e| RenderError::Init(e.to_string()))?;
        self.capture = Some(worker);
        log::debug!(
            "Headless target {}x{} (maxTexSize {}, msaa {} ignored)",
            width,
            height,
            graphics.max_tex_size,
            graphics.msaa_samples
        );
        Ok(())
    }

    fn render(&mut self, frame: &FrameData) {
        let start = Instant::now();

        self.instances.rebuild(frame.eye, &self.bodies, frame.bodies, frame.focused);
        let forward = (frame.center - frame.eye).as_vec3();
        let aspect = self.width as f32 / self.height as f32;
        self.camera = Some(CameraUniform::eye_relative(forward, frame.up, frame.fov_y, aspect, NEAR));
        let prepared = Instant::now();

        self.clear(frame.ambient_color);
        self.rasterize(frame);
        let done = Instant::now();

        self.timings = vec![
            ProfilerSample::new("frame", done.duration_since(start).as_nanos() as u64),
            ProfilerSample::new("instances", prepared.duration_since(start).as_nanos() as u64),
            ProfilerSample::new("raster", done.duration_since(prepared).as_nanos() as u64),
        ];
        self.frames += 1;
    }

    fn take_screenshot(&mut self, path: &str) -> bool {
        let Some(worker) = &self.capture else {
            log::warn!("Screenshot requested before init");
            return false;
        };
        let request = match CaptureRequest::new(path, self.width, self.height, self.pixels.clone()) {
            Ok(request) => request,
            Err(e) => {
                log::error!("{}", e);
                return false;
            }
        };
        match worker.submit(request) {
            Ok(()) => true,
            Err(CaptureError::Busy) => false,
            Err(e) => {
                log::error!("{}", e);
                false
            }
        }
    }

    fn profiler_times(&self) -> Vec<ProfilerSample> {
        self.timings.clone()
    }

    fn destroy(&mut self) {
        if let Some(mut worker) = self.capture.take() {
            worker.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use roche_engine::BodyState;

    fn frame<'a>(states: &'a [BodyState], eye: DVec3) -> FrameData<'a> {
        FrameData {
            eye,
            fov_y: 40f32.to_radians(),
            center: DVec3::ZERO,
            up: Vec3::Z,
            exposure: 0.0,
            ambient_color: 0.0,
            bodies: states,
            focused: 0,
        }
    }

    fn red_body() -> BodyParameters {
        let mut body = BodyParameters::new("Red", 1.0e3);
        body.mean_color = Vec3::new(1.0, 0.0, 0.0);
        body
    }

    #[test]
    fn zero_size_surface_is_rejected() {
        let mut renderer = HeadlessRenderer::new();
        let result = renderer.init(&[red_body()], &GraphicsSettings::default(), 0, 10);
        assert!(matches!(result, Err(RenderError::SurfaceSize { width: 0, height: 10 })));
    }

    #[test]
    fn focused_body_lands_in_the_middle() {
        let mut renderer = HeadlessRenderer::new();
        renderer.init(&[red_body()], &GraphicsSettings::default(), 32, 32).unwrap();

        let states = [BodyState::default()];
        renderer.render(&frame(&states, DVec3::new(4.0e3, 0.0, 0.0)));

        let center = ((16 * 32 + 16) * 3) as usize;
        assert_eq!(&renderer.pixels()[center..center + 3], &[255, 0, 0]);
        assert_eq!(&renderer.pixels()[..3], &[0, 0, 0], "corner stays background");
        assert_eq!(renderer.instances().len(), 1);
        renderer.destroy();
    }

    #[test]
    fn body_behind_eye_is_skipped() {
        let mut renderer = HeadlessRenderer::new();
        renderer.init(&[red_body(), red_body()], &GraphicsSettings::default(), 16, 16).unwrap();
        let states = [
            BodyState::default(),
            BodyState { position: DVec3::new(1.0e5, 0.0, 0.0), ..BodyState::default() },
        ];
        // Looking toward -X from +X at 4 km; the second body is behind
        renderer.render(&frame(&states, DVec3::new(4.0e3, 0.0, 0.0)));
        let red = renderer.pixels().chunks(3).filter(|p| p[0] == 255).count();
        assert!(red > 0 && red < 16 * 16);
        renderer.destroy();
    }

    #[test]
    fn profiler_lists_frame_first() {
        let mut renderer = HeadlessRenderer::new();
        renderer.init(&[red_body()], &GraphicsSettings::default(), 8, 8).unwrap();
        renderer.render(&frame(&[BodyState::default()], DVec3::new(4.0e3, 0.0, 0.0)));
        let times = renderer.profiler_times();
        assert_eq!(times[0].name, "frame");
        assert_eq!(times.len(), 3);
        renderer.destroy();
    }

    #[test]
    fn screenshot_refused_while_pending_or_uninitialised() {
        let mut renderer = HeadlessRenderer::new();
        assert!(!renderer.take_screenshot("never.png"));

        let dir = std::env::temp_dir().join(format!("roche-headless-{}", std::process::id()));
        renderer.init(&[red_body()], &GraphicsSettings::default(), 4, 4).unwrap();
        let path = dir.join("shot.png");
        assert!(renderer.take_screenshot(&path.to_string_lossy()));
        renderer.destroy();
        assert!(path.exists());
        let _ = std::fs::remove_dir_all(dir);
    }
}
