pub mod capture;
pub mod frame;
pub mod profiler;
