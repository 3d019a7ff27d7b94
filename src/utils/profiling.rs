use std::time::{Duration, Instant};

/// Per-phase timing of the most recent collision tick.
#[derive(Debug, Default, Clone, Copy)]
pub struct PhaseProfiler {
    pub update_time: Duration,
    pub detection_time: Duration,
    pub resolution_time: Duration,
    pub cleanup_time: Duration,

    pub body_count: usize,
    pub detected_pairs: usize,
    pub significant_pairs: usize,
}

impl PhaseProfiler {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn update_time(&self) -> Duration {
        self.update_time
    }

    pub fn detection_time(&self) -> Duration {
        self.detection_time
    }

    pub fn resolution_time(&self) -> Duration {
        self.resolution_time
    }

    pub fn cleanup_time(&self) -> Duration {
        self.cleanup_time
    }

    pub fn total_time(&self) -> Duration {
        self.update_time + self.detection_time + self.resolution_time + self.cleanup_time
    }

    pub fn report(&self) {
        let total_us = self.total_time().as_micros() as f32;
        if total_us < 1.0 {
            return;
        }

        log::info!(
            "bodies: {}, pairs: {}, significant: {}, total: {:.2} ms",
            self.body_count,
            self.detected_pairs,
            self.significant_pairs,
            self.total_time().as_secs_f32() * 1000.0
        );
        for (label, time) in [
            ("update", self.update_time),
            ("detection", self.detection_time),
            ("resolution", self.resolution_time),
            ("cleanup", self.cleanup_time),
        ] {
            log::info!(
                "  {:<10} {:.2} ms ({:.1}%)",
                label,
                time.as_secs_f32() * 1000.0,
                (time.as_micros() as f32 / total_us) * 100.0
            );
        }
    }
}

/// Adds the time until drop onto `output`.
pub struct ScopedTimer<'a> {
    start: Instant,
    output: &'a mut Duration,
}

impl<'a> ScopedTimer<'a> {
    pub fn new(output: &'a mut Duration) -> Self {
        Self {
            start: Instant::now(),
            output,
        }
    }
}

impl<'a> Drop for ScopedTimer<'a> {
    fn drop(&mut self) {
        *self.output += self.start.elapsed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_sums_phases() {
        let profiler = PhaseProfiler {
            update_time: Duration::from_micros(1),
            detection_time: Duration::from_micros(2),
            resolution_time: Duration::from_micros(3),
            cleanup_time: Duration::from_micros(4),
            ..Default::default()
        };
        assert_eq!(profiler.total_time(), Duration::from_micros(10));
    }

    #[test]
    fn scoped_timer_accumulates() {
        let mut slot = Duration::ZERO;
        {
            let _timer = ScopedTimer::new(&mut slot);
            std::thread::sleep(Duration::from_millis(1));
        }
        assert!(slot >= Duration::from_millis(1));
    }
}
