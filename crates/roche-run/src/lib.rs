pub mod headless;
pub mod pacing;
pub mod runner;
pub mod script;

pub use headless::HeadlessRenderer;
pub use pacing::StepPacer;
pub use runner::Runner;
pub use script::ScriptedInput;
