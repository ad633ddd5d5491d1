use crate::error::{ConfigError, ConfigResult};

/// Default warp multipliers: real time up to 100 simulated days per second.
pub const DEFAULT_WARP_FACTORS: [f64; 8] =
    [1.0, 10.0, 60.0, 600.0, 3600.0, 86400.0, 864000.0, 8640000.0];

/// Ordered table of time-warp multipliers with a bounded cursor.
#[derive(Debug, Clone)]
pub struct TimeWarpTable {
    factors: Vec<f64>,
    index: usize,
}

impl TimeWarpTable {
    /// Build a table. Factors must be finite and non-negative so the epoch
    /// can only move forward.
    pub fn new(factors: Vec<f64>) -> ConfigResult<Self> {
        if factors.is_empty() {
            return Err(ConfigError::EmptyWarpTable);
        }
        if let Some(&bad) = factors.iter().find(|f| !f.is_finite() || **f < 0.0) {
            return Err(ConfigError::InvalidWarpFactor(bad));
        }
        Ok(Self { factors, index: 0 })
    }

    /// Step the cursor by the sign of `direction`, clamped to the table.
    /// Returns true if the index changed.
    pub fn step(&mut self, direction: i32) -> bool {
        let old = self.index;
        if direction < 0 {
            self.index = self.index.saturating_sub(1);
        } else if direction > 0 {
            self.index = (self.index + 1).min(self.factors.len() - 1);
        }
        self.index != old
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn factor(&self) -> f64 {
        self.factors[self.index]
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

impl Default for TimeWarpTable {
    fn default() -> Self {
        Self { factors: DEFAULT_WARP_FACTORS.to_vec(), index: 0 }
    }
}

/// Simulated-time accumulator (the epoch, in seconds).
#[derive(Debug, Clone)]
pub struct SimulationClock {
    epoch: f64,
    warp: TimeWarpTable,
}

impl SimulationClock {
    pub fn new(warp: TimeWarpTable) -> Self {
        Self { epoch: 0.0, warp }
    }

    /// Advance by `dt * warp_factor`. Negative products are ignored so the
    /// epoch never decreases. Returns the new epoch.
    pub fn advance(&mut self, dt: f64, warp_factor: f64) -> f64 {
        let step = dt * warp_factor;
        if step > 0.0 {
            self.epoch += step;
        }
        self.epoch
    }

    /// Advance using the currently selected warp factor.
    pub fn advance_warped(&mut self, dt: f64) -> f64 {
        let factor = self.warp.factor();
        self.advance(dt, factor)
    }

    /// Step the warp selection (-1 slower, +1 faster). Out-of-range requests
    /// are clamped, never an error.
    pub fn select_warp(&mut self, direction: i32) {
        if self.warp.step(direction) {
            log::info!("Time warp x{} (index {})", self.warp.factor(), self.warp.index());
        }
    }

    pub fn epoch(&self) -> f64 {
        self.epoch
    }

    pub fn warp_index(&self) -> usize {
        self.warp.index()
    }

    pub fn warp_factor(&self) -> f64 {
        self.warp.factor()
    }

    pub fn warp_table(&self) -> &TimeWarpTable {
        &self.warp
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(TimeWarpTable::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_scales_by_warp() {
        let mut clock = SimulationClock::default();
        assert_eq!(clock.advance(0.5, 60.0), 30.0);
        assert_eq!(clock.advance(0.5, 60.0), 60.0);
    }

    #[test]
    fn advance_never_decreases() {
        let mut clock = SimulationClock::default();
        clock.advance(1.0, 10.0);
        clock.advance(-1.0, 10.0);
        assert_eq!(clock.epoch(), 10.0);
    }

    #[test]
    fn warp_index_stays_in_bounds() {
        let mut clock = SimulationClock::default();
        for _ in 0..20 {
            clock.select_warp(-1);
        }
        assert_eq!(clock.warp_index(), 0);
        for _ in 0..50 {
            clock.select_warp(1);
        }
        assert_eq!(clock.warp_index(), DEFAULT_WARP_FACTORS.len() - 1);
        clock.select_warp(7);
        assert_eq!(clock.warp_index(), DEFAULT_WARP_FACTORS.len() - 1);
        clock.select_warp(-9);
        assert_eq!(clock.warp_index(), DEFAULT_WARP_FACTORS.len() - 2);
    }

    #[test]
    fn advance_warped_uses_selected_factor() {
        let mut clock = SimulationClock::new(TimeWarpTable::new(vec![1.0, 100.0]).unwrap());
        clock.select_warp(1);
        assert_eq!(clock.advance_warped(0.25), 25.0);
    }

    #[test]
    fn table_rejects_bad_factors() {
        assert!(matches!(TimeWarpTable::new(vec![]), Err(ConfigError::EmptyWarpTable)));
        assert!(matches!(
            TimeWarpTable::new(vec![1.0, -2.0]),
            Err(ConfigError::InvalidWarpFactor(f)) if f == -2.0
        ));
        assert!(TimeWarpTable::new(vec![1.0, f64::NAN]).is_err());
    }
}
