use glam::Vec2;
use std::f32::consts::PI;
use std::time::Duration;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Bounded animation time in [0, 1] derived from a wall-clock timestamp.
///
/// Oscillates instead of accumulating; the shader is tuned for this range.
pub fn pseudo_time(now_ms: f64) -> f32 {
    ((now_ms * 2.0).sin() * 0.5 + 0.5) as f32
}

/// Unit wind direction swinging within ±π/4 of +X
pub fn wind_direction(anim_time: f32) -> Vec2 {
    let angle = anim_time.sin() * PI * 0.25;
    Vec2::new(angle.cos(), angle.sin())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindState {
    pub time: f32,
    pub direction: Vec2,
}

impl WindState {
    pub fn at(now_ms: f64) -> Self {
        let time = pseudo_time(now_ms);
        Self {
            time,
            direction: wind_direction(time),
        }
    }
}

impl Default for WindState {
    fn default() -> Self {
        Self {
            time: 0.0,
            direction: Vec2::X,
        }
    }
}

/// Fixed-cadence timer driven by frame deltas.
///
/// Fires at most once per `tick` call and keeps the remainder, so a long
/// frame does not produce a burst of identical uniform writes.
#[derive(Debug, Clone)]
pub struct AnimationScheduler {
    interval: Duration,
    elapsed: Duration,
}

impl AnimationScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            elapsed: Duration::ZERO,
        }
    }

    pub fn tick(&mut self, delta: Duration) -> bool {
        self.elapsed += delta;
        if self.elapsed < self.interval {
            return false;
        }

        let interval_nanos = self.interval.as_nanos();
        let remainder = self.elapsed.as_nanos() % interval_nanos;
        self.elapsed = Duration::from_nanos(remainder as u64);
        true
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}
