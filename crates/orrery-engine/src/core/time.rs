use serde::Deserialize;

/// Fixed timestep accumulator.
/// Turns variable frame deltas into a whole number of animation ticks.
pub struct FixedTimestep {
    /// Seconds per tick.
    dt: f64,
    /// Leftover frame time not yet consumed by a tick.
    accumulator: f64,
    /// Upper bound on ticks per frame after a long stall.
    max_steps: u32,
}

impl FixedTimestep {
    pub fn new(dt: f64) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: 10,
        }
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Add frame time to the accumulator. Returns the number of ticks to run.
    pub fn accumulate(&mut self, frame_dt: f64) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        self.accumulator = self.accumulator.min(self.dt * self.max_steps as f64);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f64 * self.dt;
        steps
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }
}

/// Playback tuning loaded from configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Starting frame multiplier.
    pub initial_multiplier: f64,
    /// Smallest multiplier is `2^floor_exponent`.
    pub floor_exponent: i32,
    /// Largest multiplier is `2^ceiling_exponent`.
    pub ceiling_exponent: i32,
    /// Virtual time units that pass per real second at multiplier 1.
    pub units_per_second: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            initial_multiplier: 1.0,
            floor_exponent: -5,
            ceiling_exponent: 10,
            units_per_second: 1.0,
        }
    }
}

/// The virtual clock shared by the body hierarchy and the camera.
/// Single writer (the command layer), read every tick by the driver.
#[derive(Debug, Clone)]
pub struct Playback {
    elapsed: f64,
    multiplier: f64,
    paused: bool,
    reversed: bool,
    floor: f64,
    ceiling: f64,
    units_per_second: f64,
}

impl Playback {
    pub fn new(config: &PlaybackConfig) -> Self {
        let floor = 2f64.powi(config.floor_exponent);
        let ceiling = 2f64.powi(config.ceiling_exponent);
        let mut playback = Self {
            elapsed: 0.0,
            multiplier: 1.0,
            paused: false,
            reversed: false,
            floor,
            ceiling,
            units_per_second: config.units_per_second,
        };
        playback.set_frame_multiplier(config.initial_multiplier);
        playback
    }

    /// Advance the clock by `frame_dt` real seconds. `damping` scales the
    /// step further (the camera slows bodies while it travels).
    pub fn advance(&mut self, frame_dt: f64, damping: f64) {
        if self.paused {
            return;
        }
        self.elapsed += frame_dt * self.units_per_second * self.signed_multiplier() * damping;
    }

    /// Current virtual time.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Multiplier with the playback direction applied.
    pub fn signed_multiplier(&self) -> f64 {
        if self.reversed {
            -self.multiplier
        } else {
            self.multiplier
        }
    }

    /// Clamp into `[floor, ceiling]`. Zero, negative and NaN collapse to the floor.
    pub fn set_frame_multiplier(&mut self, multiplier: f64) {
        self.multiplier = if multiplier.is_nan() || multiplier <= 0.0 {
            self.floor
        } else {
            multiplier.clamp(self.floor, self.ceiling)
        };
    }

    pub fn speed_up(&mut self) {
        self.set_frame_multiplier(self.multiplier * 2.0);
    }

    pub fn slow_down(&mut self) {
        self.set_frame_multiplier(self.multiplier / 2.0);
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Returns the new paused state.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Returns the new reversed state.
    pub fn toggle_reverse(&mut self) -> bool {
        self.reversed = !self.reversed;
        self.reversed
    }

    /// Bit flags for the output header: 1 = paused, 2 = reversed.
    pub fn flags(&self) -> u32 {
        (self.paused as u32) | ((self.reversed as u32) << 1)
    }
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(&PlaybackConfig::default())
    }
}
