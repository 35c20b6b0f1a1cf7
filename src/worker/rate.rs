//! Rate gating for cross-worker scroll traffic.
//!
//! The time source is injected so the logic tests natively; the wasm
//! side feeds `performance.now()`.

/// Leading-edge throttle: the first call passes, subsequent calls pass
/// only after the interval has elapsed.
pub struct Throttle {
    interval_ms: f64,
    last: Option<f64>,
}

impl Throttle {
    pub fn new(interval_ms: f64) -> Self {
        Throttle {
            interval_ms,
            last: None,
        }
    }

    pub fn set_interval(&mut self, interval_ms: f64) {
        self.interval_ms = interval_ms;
    }

    pub fn allow(&mut self, now_ms: f64) -> bool {
        match self.last {
            Some(last) if now_ms - last < self.interval_ms => false,
            _ => {
                self.last = Some(now_ms);
                true
            }
        }
    }
}

/// Alternates scroll messages across workers. Load spreading only, not a
/// correctness requirement.
#[derive(Default)]
pub struct RoundRobin {
    next: usize,
}

impl RoundRobin {
    pub fn new() -> Self {
        RoundRobin::default()
    }

    pub fn next(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let index = self.next % len;
        self.next = (self.next + 1) % len;
        index
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn throttle_passes_leading_edge() {
        let mut throttle = Throttle::new(16.0);
        assert!(throttle.allow(0.0));
        assert!(!throttle.allow(10.0));
        assert!(!throttle.allow(15.9));
        assert!(throttle.allow(16.0));
        assert!(!throttle.allow(20.0));
    }

    #[test]
    fn round_robin_alternates() {
        let mut robin = RoundRobin::new();
        assert_eq!(robin.next(2), 0);
        assert_eq!(robin.next(2), 1);
        assert_eq!(robin.next(2), 0);
        assert_eq!(robin.next(0), 0);
        assert_eq!(robin.next(1), 0);
    }
}
