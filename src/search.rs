//! Debounced search input

use std::time::{Duration, Instant};

/// Fires once after input has been quiet for `delay`.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Register an input event; restarts the quiet period.
    pub fn input(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// True exactly once per quiet period, when it has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Time left until the pending event fires
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// Drop the pending event (e.g. the query was applied directly)
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn burst_of_keystrokes_fires_once() {
        let start = Instant::now();
        let mut d = Debouncer::new(DELAY);
        let mut fired = 0;

        // Ten keystrokes 50ms apart, all inside the window
        for i in 0..10 {
            let t = start + Duration::from_millis(i * 50);
            d.input(t);
            if d.poll(t) {
                fired += 1;
            }
        }
        let last = start + Duration::from_millis(450);

        // Not yet: window counts from the last keystroke
        assert!(!d.poll(last + Duration::from_millis(299)));
        assert!(d.poll(last + DELAY));
        fired += 1;

        // Nothing further without new input
        assert!(!d.poll(last + Duration::from_secs(5)));
        assert_eq!(fired, 1);
    }

    #[test]
    fn separate_bursts_fire_separately() {
        let start = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.input(start);
        assert!(d.poll(start + DELAY));
        d.input(start + Duration::from_secs(1));
        assert!(!d.poll(start + Duration::from_millis(1100)));
        assert!(d.poll(start + Duration::from_millis(1300)));
    }

    #[test]
    fn remaining_and_cancel() {
        let start = Instant::now();
        let mut d = Debouncer::new(DELAY);
        assert_eq!(d.remaining(start), None);
        d.input(start);
        assert_eq!(d.remaining(start + Duration::from_millis(100)), Some(Duration::from_millis(200)));
        d.cancel();
        assert_eq!(d.remaining(start), None);
        assert!(!d.poll(start + DELAY));
    }
}
