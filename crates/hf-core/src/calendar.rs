use serde::{Deserialize, Serialize};

/// Hour after which it counts as night.
const DUSK: f64 = 19.0;
/// Hour before which it counts as night.
const DAWN: f64 = 6.0;

/// Tracks simulation time: a monotonic tick counter, a fractional year and
/// a cyclic hour of the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calendar {
    tick: u64,
    year: f64,
    time_of_day: f64,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(0.0, 12.0)
    }
}

impl Calendar {
    /// Create a calendar at tick 0 with the given year and hour.
    pub fn new(year: f64, time_of_day: f64) -> Self {
        Self {
            tick: 0,
            year,
            time_of_day: time_of_day.rem_euclid(24.0),
        }
    }

    /// Advance by one tick. Returns the new tick number.
    pub fn advance(&mut self, years_per_tick: f64, hours_per_tick: f64) -> u64 {
        self.tick += 1;
        self.year += years_per_tick;
        self.time_of_day += hours_per_tick;
        if self.time_of_day >= 24.0 {
            self.time_of_day = self.time_of_day.rem_euclid(24.0);
        }
        self.tick
    }

    /// Return the current tick number.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Fractional years since the world began.
    pub fn year(&self) -> f64 {
        self.year
    }

    /// Hour of the day in `0.0..24.0`.
    pub fn time_of_day(&self) -> f64 {
        self.time_of_day
    }

    /// Night runs from after 19:00 until 06:00.
    pub fn is_night(&self) -> bool {
        self.time_of_day > DUSK || self.time_of_day < DAWN
    }
}
