use glam::DVec3;

/// Mutable per-body state, recomputed every frame from the epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BodyState {
    /// Absolute position in meters (the root star sits at the origin).
    pub position: DVec3,
    /// Rotation about the body's axis, radians. Not wrapped.
    pub rotation_angle: f32,
    /// Cloud layer displacement in [0, 1).
    pub cloud_disp: f32,
}

/// What the frame loop reports back to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameOutcome {
    /// False once Quit was pressed or the window asked to close.
    pub keep_running: bool,
    /// A screenshot was handed to the renderer this frame. False when the
    /// renderer refused it because one is still being written.
    pub screenshot_requested: bool,
    /// The profiler report was printed this frame.
    pub profiler_dumped: bool,
}

/// One named timing from the renderer's profiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilerSample {
    pub name: String,
    pub nanos: u64,
}

impl ProfilerSample {
    pub fn new(name: impl Into<String>, nanos: u64) -> Self {
        Self { name: name.into(), nanos }
    }
}
