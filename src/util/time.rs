//! Time utilities for the match clock and uptime reporting

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Get current Unix timestamp in milliseconds
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}

/// Server start time for uptime tracking
static SERVER_START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize server start time (call once at startup)
pub fn init_server_time() {
    SERVER_START.get_or_init(Instant::now);
}

/// Get server uptime in seconds
pub fn uptime_secs() -> u64 {
    SERVER_START
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or(0)
}

/// Tick rate configuration. Snapshots go out on every tick.
pub const SIMULATION_TPS: u32 = 60;
pub const TICK_DURATION_MICROS: u64 = 1_000_000 / SIMULATION_TPS as u64;

/// Calculate delta time for physics (in seconds)
pub fn tick_delta() -> f32 {
    1.0 / SIMULATION_TPS as f32
}

/// Monotonic match clock in seconds, advanced only by the tick loop.
///
/// Phase deadlines are stamped against this clock, so they follow the
/// simulation rather than wall time and behave identically under test.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MatchClock {
    now: f64,
}

impl MatchClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock reading in seconds
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Advance by one tick and return the new reading
    pub fn advance(&mut self, dt: f32) -> f64 {
        self.now += dt as f64;
        self.now
    }
}
