// extensions/mod.rs
//
// Optional helpers decoupled from the simulation types.

pub mod easing;

pub use easing::{lerp, smootherstep};
