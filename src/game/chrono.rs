use std::time::Duration;
use tokio::time::Instant;

/// Pausable stopwatch accumulating active time only while started.
///
/// One instance exists per team, owned by the game machine. Snapshots of
/// the whole value are cheap to copy, so observers (display refresh, the
/// remote status surface) read a copy and compute elapsed time themselves
/// without touching the owner's state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chronometer {
    accumulated: Duration,
    started_at: Option<Instant>,
}

impl Chronometer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Start counting. No effect if already running.
    pub fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    /// Stop counting and fold the running span into the total. No effect
    /// if already stopped.
    pub fn stop(&mut self) {
        if let Some(started) = self.started_at.take() {
            self.accumulated += started.elapsed();
        }
    }

    /// Zero the total. A running chronometer keeps running and counts up
    /// from zero again.
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }

    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(started) => self.accumulated + started.elapsed(),
            None => self.accumulated,
        }
    }

    /// Whole elapsed seconds, rounded down.
    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed().as_secs() as u32
    }
}
