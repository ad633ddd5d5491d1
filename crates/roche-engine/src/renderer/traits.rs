//! Renderer contract between the simulation and a graphics backend.
//!
//! The simulation core never touches a graphics API. A backend (OpenGL,
//! wgpu, a headless test double) implements [`Renderer`] and receives one
//! [`FrameData`] per frame.

use glam::{DVec3, Vec3};

use crate::api::types::{BodyState, ProfilerSample};
use crate::assets::settings::GraphicsSettings;
use crate::core::body::BodyParameters;
use crate::error::RenderError;

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameData<'a> {
    /// Eye position in world space.
    pub eye: DVec3,
    /// Vertical field of view, radians.
    pub fov_y: f32,
    /// Look-at center in world space.
    pub center: DVec3,
    pub up: Vec3,
    pub exposure: f32,
    pub ambient_color: f32,
    /// Absolute state of every body, indexed like the body list.
    pub bodies: &'a [BodyState],
    /// Body the camera is focused on, for highlighting and labels.
    pub focused: usize,
}

/// Graphics backend.
///
/// # Example Implementation
///
/// ```ignore
/// struct GlRenderer { /* context, programs, textures */ }
///
/// impl Renderer for GlRenderer {
///     fn backend(&self) -> &'static str { "opengl" }
///     fn init(&mut self, bodies: &[BodyParameters], graphics: &GraphicsSettings,
///             width: u32, height: u32) -> Result<(), RenderError> {
///         // Upload meshes, load textures...
///         Ok(())
///     }
///     fn render(&mut self, frame: &FrameData) { /* draw */ }
///     fn take_screenshot(&mut self, path: &str) -> bool { /* read back pixels */ true }
///     fn profiler_times(&self) -> Vec<ProfilerSample> { Vec::new() }
///     fn destroy(&mut self) {}
/// }
/// ```
pub trait Renderer {
    /// Backend identifier (e.g., "opengl", "headless")
    fn backend(&self) -> &'static str;

    /// Create GPU resources for the given bodies.
    fn init(
        &mut self,
        bodies: &[BodyParameters],
        graphics: &GraphicsSettings,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError>;

    /// Draw one frame.
    fn render(&mut self, frame: &FrameData);

    /// Capture the last frame and save it to `path` in the background.
    /// Returns false if the request was refused (a capture is still pending).
    fn take_screenshot(&mut self, path: &str) -> bool;

    /// Named timings of the last frame, whole frame first.
    fn profiler_times(&self) -> Vec<ProfilerSample>;

    /// Release GPU resources and join background work.
    fn destroy(&mut self);
}
