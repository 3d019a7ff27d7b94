//! Benchmark harness boundary: recording brackets and per-frame samples.
//!
//! Hardware counters are read through [`CounterSource`]; this crate never
//! talks to a counter backend itself.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::{config::FPS_WINDOW, CollisionEngine};

pub const L1_DCACHE_LOADS: &str = "L1-dcache-loads";
pub const L1_DCACHE_LOAD_MISSES: &str = "L1-dcache-load-misses";

/// Supplier of named counters such as cache loads and misses.
pub trait CounterSource {
    /// Opens the run-level counting window.
    fn start(&mut self) {}
    fn stop(&mut self) {}
    /// Opens the per-frame counting window.
    fn start_live(&mut self) {}
    fn stop_live(&mut self) {}
    /// Last value of `name` in the per-frame window, if the source knows it.
    fn read(&self, name: &str) -> Option<f64>;
}

/// Counter source that knows no counters.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCounters;

impl CounterSource for NoCounters {
    fn read(&self, _name: &str) -> Option<f64> {
        None
    }
}

/// One recorded frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSample {
    pub frame: usize,
    pub entity_count: usize,
    /// Average over the last [`FPS_WINDOW`] frames.
    pub fps: f32,
    pub frame_time: Duration,
    pub physics_time: Duration,
    pub l1_loads: Option<f64>,
    pub l1_misses: Option<f64>,
    pub miss_ratio: Option<f64>,
}

/// Collects frame samples between `start_recording` and `stop_recording`.
pub struct PerfRecorder<C: CounterSource = NoCounters> {
    counters: C,
    recording: bool,
    live_start: Option<Instant>,
    last_frame_time: Duration,
    window: VecDeque<Duration>,
    frames: Vec<FrameSample>,
}

impl Default for PerfRecorder<NoCounters> {
    fn default() -> Self {
        Self::new(NoCounters)
    }
}

impl<C: CounterSource> PerfRecorder<C> {
    pub fn new(counters: C) -> Self {
        Self {
            counters,
            recording: false,
            live_start: None,
            last_frame_time: Duration::ZERO,
            window: VecDeque::with_capacity(FPS_WINDOW),
            frames: Vec::new(),
        }
    }

    pub fn start_recording(&mut self) {
        self.frames.clear();
        self.window.clear();
        self.recording = true;
        self.counters.start();
    }

    pub fn stop_recording(&mut self) {
        self.counters.stop();
        self.recording = false;
        log::info!("recorded {} frames", self.frames.len());
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Brackets a single tick.
    pub fn start_live_recording(&mut self) {
        self.live_start = Some(Instant::now());
        self.counters.start_live();
    }

    pub fn stop_live_recording(&mut self) {
        self.counters.stop_live();
        if let Some(start) = self.live_start.take() {
            self.last_frame_time = start.elapsed();
        }

        if self.window.len() == FPS_WINDOW {
            self.window.pop_front();
        }
        self.window.push_back(self.last_frame_time);
    }

    /// Samples the engine after the last live bracket.
    pub fn save_frame(&mut self, engine: &CollisionEngine) -> &FrameSample {
        let l1_loads = self.counters.read(L1_DCACHE_LOADS);
        let l1_misses = self.counters.read(L1_DCACHE_LOAD_MISSES);
        let miss_ratio = match (l1_loads, l1_misses) {
            (Some(loads), Some(misses)) if loads > 0.0 => Some(misses / loads),
            _ => None,
        };

        let sample = FrameSample {
            frame: self.frames.len(),
            entity_count: engine.world().body_count(),
            fps: self.average_fps(),
            frame_time: self.last_frame_time,
            physics_time: engine.profiler().total_time(),
            l1_loads,
            l1_misses,
            miss_ratio,
        };
        self.frames.push(sample);
        &self.frames[self.frames.len() - 1]
    }

    pub fn frames(&self) -> &[FrameSample] {
        &self.frames
    }

    pub fn last_frame_time(&self) -> Duration {
        self.last_frame_time
    }

    /// Frames per second over the rolling window; zero before any frame.
    pub fn average_fps(&self) -> f32 {
        let total: Duration = self.window.iter().sum();
        if total.is_zero() {
            return 0.0;
        }
        self.window.len() as f32 / total.as_secs_f32()
    }

    pub fn counter(&self, name: &str) -> Option<f64> {
        self.counters.read(name)
    }

    pub fn counters(&self) -> &C {
        &self.counters
    }
}
