/// One-shot timer polled once per tick.
///
/// Replaces callback scheduling: the owner calls [`Timer::update`] every tick and
/// acts when it returns `true`. A fired timer stops itself and must be started
/// again to fire another time.
#[derive(Debug, Clone, PartialEq)]
pub struct Timer {
    delay_ms: f64,
    elapsed_ms: f64,
    running: bool,
}

impl Timer {
    /// A stopped timer that fires `delay_ms` milliseconds after being started.
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms: f64::from(delay_ms),
            elapsed_ms: 0.0,
            running: false,
        }
    }

    /// Same as [`Timer::new`] but already running.
    pub fn started(delay_ms: u32) -> Self {
        let mut timer = Self::new(delay_ms);
        timer.start();
        timer
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Resume counting. Time accumulated before a `stop` is kept.
    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stop and clear accumulated time.
    pub fn reset(&mut self) {
        self.elapsed_ms = 0.0;
        self.running = false;
    }

    /// Advance by `dt` seconds. Returns `true` on the tick the delay is reached.
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed_ms += f64::from(dt) * 1000.0;
        if self.elapsed_ms >= self.delay_ms {
            self.reset();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_timer_never_fires() {
        let mut t = Timer::new(100);
        for _ in 0..10 {
            assert!(!t.update(1.0));
        }
    }

    #[test]
    fn fires_once_after_delay() {
        let mut t = Timer::started(100);
        assert!(!t.update(0.05));
        assert!(t.update(0.05));
        assert!(!t.is_running());
        assert!(!t.update(1.0), "fired timer stays stopped until restarted");
    }

    #[test]
    fn restart_after_fire_counts_from_zero() {
        let mut t = Timer::started(100);
        assert!(t.update(0.2));
        t.start();
        assert!(!t.update(0.05));
        assert!(t.update(0.05));
    }

    #[test]
    fn stop_keeps_progress_reset_clears_it() {
        let mut t = Timer::started(100);
        t.update(0.06);
        t.stop();
        t.start();
        assert!(t.update(0.05));

        let mut t = Timer::started(100);
        t.update(0.06);
        t.reset();
        t.start();
        assert!(!t.update(0.05));
    }
}
