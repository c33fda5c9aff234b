//! Wall-clock timing of a build run

use std::time::{Duration, Instant};

/// Started timer; consume it with [`BuildTimer::stop`]
#[derive(Debug, Clone, Copy)]
pub struct BuildTimer {
    started: Instant,
}

impl BuildTimer {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Time elapsed since [`BuildTimer::start`]
    pub fn stop(self) -> Duration {
        self.started.elapsed()
    }
}

/// Format a duration as `HH:MM:SS`, truncating sub-second parts
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
