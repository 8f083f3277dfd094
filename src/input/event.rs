use std::time::Duration;

/// Which line(s) were held at the post-debounce sampling instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Red,
    Blue,
    Both,
}

/// Duration bucket of a press episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressLength {
    Short,
    Medium,
    Long,
}

/// One entry of the ordered event stream the game machine consumes:
/// a classified press episode, or the expiry of the boot setup timer.
/// Produced once per physical press-and-release cycle, consumed exactly
/// once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Button(ButtonKind, PressLength),
    SetupTimeout,
}

// Classifier timing settings
#[derive(Clone, Debug)]
pub struct InputSettings {
    /// Settle time after a raw edge before the line levels are trusted.
    pub debounce: Duration,
    /// Poll period while waiting for the release.
    pub poll_interval: Duration,
    /// Upper bound (exclusive) of the short bucket.
    pub short_max: Duration,
    /// Upper bound (exclusive) of the medium bucket.
    pub medium_max: Duration,
    /// Maximum sampling window; reaching it saturates into a long press.
    pub sample_cap: Duration,
    /// Bounded wait when handing the classified event to the dispatcher.
    pub enqueue_timeout: Duration,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(200),
            poll_interval: Duration::from_millis(10),
            short_max: Duration::from_millis(2000),
            medium_max: Duration::from_millis(4000),
            sample_cap: Duration::from_millis(10000),
            enqueue_timeout: Duration::from_millis(100),
        }
    }
}

impl InputSettings {
    /// Bucket a measured hold duration. Boundary values belong to the
    /// lower bucket.
    pub fn classify(&self, held: Duration) -> PressLength {
        if held < self.short_max {
            PressLength::Short
        } else if held < self.medium_max {
            PressLength::Medium
        } else {
            PressLength::Long
        }
    }
}
