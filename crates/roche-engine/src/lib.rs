pub mod api;
pub mod assets;
pub mod core;
pub mod error;
pub mod extensions;
pub mod input;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::config::EngineConfig;
pub use api::types::{BodyState, FrameOutcome, ProfilerSample};
pub use assets::manifest::SystemManifest;
pub use assets::settings::{GraphicsSettings, Settings};
pub use core::body::{BodyParameters, OrbitalElements};
pub use core::clock::{SimulationClock, TimeWarpTable};
pub use core::hierarchy::BodyHierarchy;
pub use core::orbit::{compute_position, solve_kepler};
pub use error::{CaptureError, ConfigError, ConfigResult, RenderError};
pub use input::edge::InputEdgeTracker;
pub use input::state::{DragInput, InputSnapshot, InputSource, Key, MouseButton, MouseTracker};
pub use renderer::camera::{CameraRig, CameraSettings, CameraUniform};
pub use renderer::instance::{BodyInstance, InstanceBuffer};
pub use renderer::traits::{FrameData, Renderer};
pub use systems::capture::{CaptureRequest, CaptureWorker, ImageEncoder, PngEncoder, ScreenshotMailbox};
pub use systems::frame::Simulation;

pub use extensions::{lerp, smootherstep};
