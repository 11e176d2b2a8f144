use skyline_common::FrameConfig;
use std::time::{Duration, Instant};

/// Measures wall-clock time between frames and hands the simulation a
/// clamped delta, so a stall (window drag, breakpoint) cannot produce a
/// single huge step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    max_dt: f32,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self::starting_at(Instant::now(), max_dt)
    }

    pub fn starting_at(start: Instant, max_dt: f32) -> Self {
        Self { last: start, max_dt }
    }

    /// Seconds since the previous tick, clamped to `[0, max_dt]`.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let raw = now.saturating_duration_since(self.last).as_secs_f32();
        self.last = now;
        if raw > self.max_dt {
            tracing::debug!(raw, max = self.max_dt, "clamping frame delta");
        }
        raw.min(self.max_dt)
    }
}

/// Frame-time average over a fixed window of frames. The readout only
/// changes when a window completes, which keeps the overlay legible.
#[derive(Debug, Clone)]
pub struct FrameStats {
    window: u32,
    accumulated: Duration,
    count: u32,
    average: Option<Duration>,
    last_dt: f32,
}

impl FrameStats {
    pub fn new(window: u32) -> Self {
        Self {
            window: window.max(1),
            accumulated: Duration::ZERO,
            count: 0,
            average: None,
            last_dt: 0.0,
        }
    }

    pub fn from_config(config: &FrameConfig) -> Self {
        Self::new(config.fps_window)
    }

    pub fn record(&mut self, dt: f32) {
        self.last_dt = dt;
        self.accumulated += Duration::from_secs_f32(dt.max(0.0));
        self.count += 1;
        if self.count == self.window {
            self.average = Some(self.accumulated / self.window);
            self.accumulated = Duration::ZERO;
            self.count = 0;
        }
    }

    /// Mean frame time of the last completed window.
    pub fn average_frame_time(&self) -> Option<Duration> {
        self.average
    }

    /// Frames per second over the last completed window; before the first
    /// window completes, the rate implied by the most recent frame.
    pub fn fps(&self) -> f32 {
        let secs = match self.average {
            Some(avg) => avg.as_secs_f32(),
            None => self.last_dt,
        };
        if secs > 0.0 { 1.0 / secs } else { 0.0 }
    }
}
