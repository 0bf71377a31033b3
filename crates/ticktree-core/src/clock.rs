use std::time::Instant;

/// Time source sampled once per update by the tree driver.
///
/// Time-aware nodes read `now_ms` from the tick context instead of the OS
/// clock, so tests and replays can substitute their own timeline.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Monotonic wall-clock time, measured from clock construction.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}
