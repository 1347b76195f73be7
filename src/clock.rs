use std::time::{Duration, Instant};

/// Upper bound on simulation ticks run for a single rendered frame. Any
/// further backlog is dropped rather than replayed.
pub const MAX_TICKS_PER_FRAME: u32 = 5;

/// Fixed-timestep clock. Wall time accumulates into whole cycles which the
/// driver then consumes one tick at a time.
#[derive(Debug, Clone)]
pub struct Clock {
    cycle: Duration,
    excess: Duration,
    elapsed_cycles: u32,
    last_update: Instant,
    paused: bool,
}

impl Clock {
    pub fn new(ticks_per_second: u32) -> Self {
        Self {
            cycle: Duration::from_secs(1) / ticks_per_second.max(1),
            excess: Duration::ZERO,
            elapsed_cycles: 0,
            last_update: Instant::now(),
            paused: false,
        }
    }

    pub fn cycle(&self) -> Duration {
        self.cycle
    }

    /// Samples the wall clock and folds the time since the last call in.
    pub fn update(&mut self) {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last_update);
        self.last_update = now;
        self.advance(elapsed);
    }

    /// Adds `elapsed` wall time. Time that passes while paused is discarded.
    pub fn advance(&mut self, elapsed: Duration) {
        if self.paused {
            return;
        }
        let total = (self.excess + elapsed).as_nanos();
        let cycle = self.cycle.as_nanos().max(1);
        let whole = u32::try_from(total / cycle).unwrap_or(u32::MAX);
        self.elapsed_cycles = self.elapsed_cycles.saturating_add(whole);
        self.excess = Duration::from_nanos(u64::try_from(total % cycle).unwrap_or(0));
    }

    /// Consumes one elapsed cycle if there is one.
    pub fn has_elapsed_cycle(&mut self) -> bool {
        if self.elapsed_cycles > 0 {
            self.elapsed_cycles -= 1;
            true
        } else {
            false
        }
    }

    /// Returns how many ticks to run now, at most `max`, and forgets the rest.
    pub fn take_ticks(&mut self, max: u32) -> u32 {
        let mut ticks = 0;
        while ticks < max && self.has_elapsed_cycle() {
            ticks += 1;
        }
        self.discard_backlog();
        ticks
    }

    pub fn discard_backlog(&mut self) {
        self.elapsed_cycles = 0;
    }

    pub fn pending_cycles(&self) -> u32 {
        self.elapsed_cycles
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn reset(&mut self) {
        self.excess = Duration::ZERO;
        self.elapsed_cycles = 0;
        self.last_update = Instant::now();
        self.paused = false;
    }
}
