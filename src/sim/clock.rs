/// Fixed-timestep pacing for the simulation
///
/// The combat tick must run at a constant rate regardless of how often the
/// host loop turns. The clock accumulates real time and hands out whole
/// fixed steps, capped per frame to avoid the spiral of death. Pausing stops
/// accumulation entirely; between-round resets happen while paused.
use std::time::{Duration, Instant};

/// Target simulation rate (60 ticks per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667); // ~1/60 second

/// Maximum fixed steps handed out per frame
const MAX_STEPS_PER_FRAME: u32 = 5;

/// Accumulator clock driving the fixed tick
pub struct SimClock {
    /// Accumulated time not yet consumed by fixed steps
    accumulator: Duration,

    /// Time of the last `begin_frame` call
    last_frame_time: Instant,

    /// Time when the clock started
    start_time: Instant,

    /// Whether the simulation is paused
    paused: bool,

    /// Total fixed steps handed out
    step_count: u64,
}

impl SimClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            accumulator: Duration::ZERO,
            last_frame_time: now,
            start_time: now,
            paused: false,
            step_count: 0,
        }
    }

    /// Begin a new host frame, returning how many fixed steps to run
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;

        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;

        let mut steps = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && steps < MAX_STEPS_PER_FRAME {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            steps += 1;
        }

        self.step_count += steps as u64;
        steps
    }

    /// The fixed timestep in seconds, the `dt` to pass into the simulation
    pub fn fixed_timestep(&self) -> f32 {
        FIXED_TIMESTEP
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("simulation paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Drop accumulated time and restart frame timing so the paused
            // interval does not burst-run steps on the next frame
            self.accumulator = Duration::ZERO;
            self.last_frame_time = Instant::now();
            log::info!("simulation resumed");
        }
    }

    /// Total fixed steps handed out so far
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Wall-clock time since the clock started
    pub fn elapsed(&self) -> Duration {
        Instant::now().duration_since(self.start_time)
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}
