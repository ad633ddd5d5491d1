//! Error types for configuration loading, renderer setup and screenshot capture.

use thiserror::Error;

/// Result type for configuration and load-time validation.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Fatal load-time errors. The frame loop never produces these.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("system contains no bodies")]
    NoBodies,

    #[error("duplicate body name: {0}")]
    DuplicateName(String),

    #[error("body {body} references unknown parent {parent}")]
    UnresolvedParent { body: String, parent: String },

    #[error("parent chain of body {0} forms a cycle")]
    ParentCycle(String),

    #[error("invalid orbital elements for {body}: {reason}")]
    InvalidElements { body: String, reason: String },

    #[error("invalid body parameters for {body}: {reason}")]
    InvalidBody { body: String, reason: String },

    #[error("time warp table is empty")]
    EmptyWarpTable,

    #[error("invalid time warp factor: {0}")]
    InvalidWarpFactor(f64),

    #[error("initial focus {focus} is out of range for {count} bodies")]
    FocusOutOfRange { focus: usize, count: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by a renderer backend during setup.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("renderer initialisation failed: {0}")]
    Init(String),

    #[error("unsupported surface size {width}x{height}")]
    SurfaceSize { width: u32, height: u32 },
}

/// Errors from the screenshot mailbox.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CaptureError {
    #[error("a capture is already in flight")]
    Busy,

    #[error("capture worker has shut down")]
    Closed,

    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}
