//! Frame timing: elapsed seconds in, (elapsed, delta) out

/// Source of monotonic elapsed seconds since the animation started
pub trait Clock {
    fn elapsed_seconds(&self) -> f32;
}

/// Clock advanced by hand, for headless runs and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    elapsed: f32,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    pub fn set(&mut self, elapsed: f32) {
        self.elapsed = elapsed;
    }
}

impl Clock for ManualClock {
    fn elapsed_seconds(&self) -> f32 {
        self.elapsed
    }
}

/// Timing of a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    pub elapsed: f32,
    pub delta: f32,
}

/// Turns successive elapsed readings into frame deltas
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameTimer {
    previous: f32,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A reading earlier than the previous one yields a zero delta
    pub fn tick(&mut self, elapsed: f32) -> FrameTime {
        let delta = (elapsed - self.previous).max(0.0);
        self.previous = elapsed;
        FrameTime { elapsed, delta }
    }

    pub fn previous(&self) -> f32 {
        self.previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_from_elapsed() {
        let mut timer = FrameTimer::new();
        assert_eq!(timer.tick(0.5).delta, 0.5);
        let frame = timer.tick(0.75);
        assert_eq!(frame, FrameTime { elapsed: 0.75, delta: 0.25 });
        assert_eq!(timer.previous(), 0.75);
    }

    #[test]
    fn test_clock_going_backwards() {
        let mut timer = FrameTimer::new();
        timer.tick(2.0);
        assert_eq!(timer.tick(1.0).delta, 0.0);
        assert_eq!(timer.tick(1.5).delta, 0.5);
    }

    #[test]
    fn test_manual_clock() {
        let mut clock = ManualClock::new();
        clock.advance(0.1);
        clock.advance(0.2);
        assert!((clock.elapsed_seconds() - 0.3).abs() < 1e-6);
        clock.set(5.0);
        assert_eq!(clock.elapsed_seconds(), 5.0);
    }
}
