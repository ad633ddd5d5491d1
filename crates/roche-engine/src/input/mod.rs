pub mod edge;
pub mod state;

pub use edge::InputEdgeTracker;
pub use state::{DragInput, InputSnapshot, InputSource, Key, MouseButton, MouseTracker};
