use std::time::Duration;

/// Most steps one host frame may run; time beyond that is dropped.
const DEFAULT_MAX_BACKLOG: u32 = 10;

/// Splits host frame time into whole simulation steps of fixed length.
/// Leftover time is carried into the next host frame.
#[derive(Debug, Clone)]
pub struct StepPacer {
    step: f64,
    carry: f64,
    max_backlog: u32,
}

impl StepPacer {
    pub fn new(step: f64) -> Self {
        Self { step, carry: 0.0, max_backlog: DEFAULT_MAX_BACKLOG }
    }

    pub fn with_max_backlog(mut self, max_backlog: u32) -> Self {
        self.max_backlog = max_backlog.max(1);
        self
    }

    /// Seconds per simulation step.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Bank `frame_dt` seconds and return how many steps are due.
    /// Negative or NaN frame times count as zero.
    pub fn advance(&mut self, frame_dt: f64) -> u32 {
        let backlog = self.step * self.max_backlog as f64;
        self.carry = (self.carry + frame_dt.max(0.0)).min(backlog);
        let due = (self.carry / self.step) as u32;
        self.carry -= due as f64 * self.step;
        due
    }

    /// Wall time until the next step is due.
    pub fn until_next_step(&self) -> Duration {
        Duration::from_secs_f64((self.step - self.carry).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Power of two so step sums stay exact
    const STEP: f64 = 1.0 / 64.0;

    #[test]
    fn short_frames_carry_over() {
        let mut pacer = StepPacer::new(STEP);
        assert_eq!(pacer.advance(STEP * 0.75), 0);
        assert_eq!(pacer.advance(STEP * 0.75), 1);
        assert!((pacer.until_next_step().as_secs_f64() - STEP * 0.5).abs() < 1e-9);
    }

    #[test]
    fn stall_is_bounded_by_backlog() {
        assert_eq!(StepPacer::new(STEP).advance(5.0), DEFAULT_MAX_BACKLOG);
        let mut pacer = StepPacer::new(STEP).with_max_backlog(2);
        assert_eq!(pacer.advance(5.0), 2);
        // Dropped time does not come back on the next frame
        assert_eq!(pacer.advance(0.0), 0);
    }

    #[test]
    fn backwards_clock_adds_nothing() {
        let mut pacer = StepPacer::new(STEP);
        assert_eq!(pacer.advance(-1.0), 0);
        assert_eq!(pacer.advance(f64::NAN), 0);
        assert_eq!(pacer.until_next_step(), Duration::from_secs_f64(STEP));
    }
}
