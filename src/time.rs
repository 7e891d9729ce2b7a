//! Fixed-cadence tick timer.
//!
//! The simulation has no clock of its own. [`TickTimer`] plays the part of
//! the external timer: started when a run starts, polled by the caller, it
//! reports how many ticks are due and is stopped when the run goes idle.
//!
//! # Example
//!
//! ```ignore
//! use pgen::time::TickTimer;
//!
//! let mut timer = TickTimer::new();
//! timer.start();
//!
//! loop {
//!     for _ in 0..timer.poll(Instant::now()) {
//!         session.step()?;
//!     }
//!     std::thread::sleep(timer.until_next(Instant::now()));
//! }
//! ```

use std::time::{Duration, Instant};

/// Nominal tick interval (~60 Hz).
pub const TICK_INTERVAL: Duration = Duration::from_millis(16);

/// Upper bound on ticks reported by one [`TickTimer::poll`].
pub const MAX_CATCH_UP: u32 = 4;

/// Fixed-interval tick source.
#[derive(Debug)]
pub struct TickTimer {
    interval: Duration,
    /// `None` while stopped.
    next_due: Option<Instant>,
    /// Ticks fired since the last start.
    ticks: u64,
    /// Measured ticks per second (updated periodically).
    rate: f32,
    rate_ticks: u64,
    rate_since: Instant,
    rate_window: Duration,
}

impl TickTimer {
    /// Create a stopped timer with the default 16 ms interval.
    pub fn new() -> Self {
        Self::with_interval(TICK_INTERVAL)
    }

    /// Create a stopped timer with a custom interval.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
            ticks: 0,
            rate: 0.0,
            rate_ticks: 0,
            rate_since: Instant::now(),
            rate_window: Duration::from_millis(500),
        }
    }

    /// Start firing. The first tick is due one interval from now.
    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
        self.ticks = 0;
        self.rate = 0.0;
        self.rate_ticks = 0;
        self.rate_since = now;
    }

    /// Stop firing.
    pub fn stop(&mut self) {
        self.next_due = None;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// Number of ticks due at `now`, capped at [`MAX_CATCH_UP`].
    ///
    /// When the caller falls further behind, the backlog is dropped rather
    /// than replayed.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(mut due) = self.next_due else {
            return 0;
        };

        let mut fired = 0;
        while due <= now && fired < MAX_CATCH_UP {
            fired += 1;
            due += self.interval;
        }
        if due <= now {
            due = now + self.interval;
        }
        self.next_due = Some(due);
        self.ticks += fired as u64;

        let window = now.saturating_duration_since(self.rate_since);
        if window >= self.rate_window {
            self.rate = (self.ticks - self.rate_ticks) as f32 / window.as_secs_f32();
            self.rate_ticks = self.ticks;
            self.rate_since = now;
        }

        fired
    }

    /// Time left until the next tick is due. Zero when stopped or overdue.
    pub fn until_next(&self, now: Instant) -> Duration {
        self.next_due
            .map(|due| due.saturating_duration_since(now))
            .unwrap_or(Duration::ZERO)
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Ticks fired since the last start.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Measured ticks per second.
    #[inline]
    pub fn rate(&self) -> f32 {
        self.rate
    }
}

impl Default for TickTimer {
    fn default() -> Self {
        Self::new()
    }
}
