use log::{log_enabled, warn, Level};
use std::time::{Duration, Instant};

/// Traces how long a collision system ran, and optionally how much it produced.
pub struct SystemTimer {
    system: &'static str,
    start: Instant,
    produced: Option<usize>,
}

impl SystemTimer {
    pub fn new(system: &'static str) -> Self {
        Self {
            system,
            start: Instant::now(),
            produced: None,
        }
    }

    /// Attaches an output count (pairs, tags, records) to the trace line.
    pub fn produced(&mut self, count: usize) {
        self.produced = Some(count);
    }
}

impl Drop for SystemTimer {
    fn drop(&mut self) {
        if !log_enabled!(Level::Trace) {
            return;
        }
        let micros = self.start.elapsed().as_micros();
        match self.produced {
            Some(count) => log::trace!("{}: {count} in {micros} µs", self.system),
            None => log::trace!("{}: {micros} µs", self.system),
        }
    }
}

/// Warns when a tick of `strategy` took longer than the frame budget.
/// Returns whether it did.
pub fn warn_if_frame_budget_exceeded(strategy: &str, duration: Duration, budget_ms: f32) -> bool {
    let elapsed_ms = duration.as_secs_f32() * 1000.0;
    if elapsed_ms <= budget_ms {
        return false;
    }
    warn!("{strategy} tick took {elapsed_ms:.2} ms, budget is {budget_ms:.2} ms");
    true
}
