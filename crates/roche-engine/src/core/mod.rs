pub mod body;
pub mod clock;
pub mod hierarchy;
pub mod orbit;
