//! Progress throttling.
//!
//! A transport may report every chunk; subscribers only need a few updates
//! per second. The item snapshot is always current, only `Progress` events
//! are thinned out.

use std::time::Duration;

use tokio::time::Instant;

/// Rate-limiter for progress events.
#[derive(Debug)]
pub struct ProgressThrottle {
    last_emit: Option<Instant>,
    min_interval: Duration,
}

impl ProgressThrottle {
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            last_emit: None,
            min_interval,
        }
    }

    /// 100ms between events.
    pub const fn default_interval() -> Self {
        Self::new(Duration::from_millis(100))
    }

    /// Whether an update at `fraction` should be emitted now.
    ///
    /// The first update and the one reaching 1.0 always pass.
    pub fn admit(&mut self, fraction: f64) -> bool {
        let now = Instant::now();
        let due = self
            .last_emit
            .is_none_or(|last| now.duration_since(last) >= self.min_interval);
        if due || fraction >= 1.0 {
            self.last_emit = Some(now);
            return true;
        }
        false
    }

    /// Let the next update through. Used when a new attempt starts.
    pub const fn reset(&mut self) {
        self.last_emit = None;
    }
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::default_interval()
    }
}
