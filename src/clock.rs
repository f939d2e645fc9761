use std::time::Instant;

pub const MIN_SPEED: f64 = 0.1;
pub const MAX_SPEED: f64 = 3.0;

/// Simulated time, measured from session start. Advances only while
/// running, scaled by the speed multiplier, and never goes backwards.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClock {
    running: bool,
    speed: f64,
    last_sample: Option<Instant>,
    elapsed: f64,
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationClock {
    pub fn new() -> Self {
        Self {
            running: false,
            speed: 1.0,
            last_sample: None,
            elapsed: 0.0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Simulated seconds banked so far, without sampling the wall clock.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Starts or resumes from `now`; time spent stopped is not counted.
    pub fn start(&mut self, now: Instant) {
        if !self.running {
            self.running = true;
            self.last_sample = Some(now);
        }
    }

    /// Banks time up to `now`, then stops advancing.
    pub fn halt(&mut self, now: Instant) {
        if self.running {
            self.sample(now);
            self.running = false;
            self.last_sample = None;
        }
    }

    /// Stops without banking the time since the last sample.
    pub fn freeze(&mut self) {
        self.running = false;
        self.last_sample = None;
    }

    /// Advances by the wall-clock gap since the previous sample and returns
    /// the simulated time.
    pub fn sample(&mut self, now: Instant) -> f64 {
        if self.running {
            if let Some(last) = self.last_sample {
                let dt = now.saturating_duration_since(last).as_secs_f64();
                self.elapsed += dt * self.speed;
            }
            // A stale `now` must not rewind the reference point
            if self.last_sample.map_or(true, |last| now > last) {
                self.last_sample = Some(now);
            }
        }
        self.elapsed
    }

    /// Clamps into `[MIN_SPEED, MAX_SPEED]`; non-finite input keeps the
    /// current speed. Time already elapsed keeps its old rate.
    pub fn set_speed(&mut self, multiplier: f64, now: Instant) -> f64 {
        if !multiplier.is_finite() {
            return self.speed;
        }
        self.sample(now);
        self.speed = multiplier.clamp(MIN_SPEED, MAX_SPEED);
        self.speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn test_stopped_clock_does_not_advance() {
        let t0 = Instant::now();
        let mut clock = AnimationClock::new();
        assert_eq!(clock.sample(t0 + secs(5.0)), 0.0);
    }

    #[test]
    fn test_advances_while_running() {
        let t0 = Instant::now();
        let mut clock = AnimationClock::new();
        clock.start(t0);
        assert!((clock.sample(t0 + secs(1.5)) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_halt_and_resume_skip_paused_time() {
        let t0 = Instant::now();
        let mut clock = AnimationClock::new();
        clock.start(t0);
        clock.halt(t0 + secs(2.0));
        clock.start(t0 + secs(10.0));
        assert!((clock.sample(t0 + secs(10.5)) - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_speed_scales_only_later_time() {
        let t0 = Instant::now();
        let mut clock = AnimationClock::new();
        clock.start(t0);
        clock.set_speed(2.0, t0 + secs(1.0));
        assert!((clock.sample(t0 + secs(2.0)) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_speed_is_clamped() {
        let t0 = Instant::now();
        let mut clock = AnimationClock::new();
        assert_eq!(clock.set_speed(10.0, t0), MAX_SPEED);
        assert_eq!(clock.set_speed(0.0, t0), MIN_SPEED);
        assert_eq!(clock.set_speed(f64::NAN, t0), MIN_SPEED);
    }

    #[test]
    fn test_out_of_order_samples_are_monotonic() {
        let t0 = Instant::now();
        let mut clock = AnimationClock::new();
        clock.start(t0);
        let a = clock.sample(t0 + secs(2.0));
        let b = clock.sample(t0 + secs(1.0));
        let c = clock.sample(t0 + secs(3.0));
        assert_eq!(a, b);
        assert!(c > b);
        assert!((c - 3.0).abs() < 1e-9);
    }
}
