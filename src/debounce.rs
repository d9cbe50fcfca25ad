//! Timer-based coalescing of rapidly changing input values.
//!
//! Sits between raw keystrokes and the applied filter criterion, independent
//! of any UI framework's update cycle. Callers pass the current `Instant`
//! explicitly, which keeps the quantum logic deterministic under test.

use std::time::{Duration, Instant};

/// Coalesces a stream of submitted values: only the latest value survives,
/// and it is released once the quantum has elapsed since the last submit.
#[derive(Debug)]
pub struct Debouncer {
    quantum: Duration,
    pending: Option<(String, Instant)>,
}

impl Debouncer {
    pub fn new(quantum: Duration) -> Self {
        Debouncer {
            quantum,
            pending: None,
        }
    }

    /// Queue a value for delayed release. Each submit restarts the quantum.
    ///
    /// An empty value is released immediately and drops anything pending, so
    /// clearing an input never waits on the timer.
    pub fn submit(&mut self, value: &str, now: Instant) -> Option<String> {
        if value.is_empty() {
            self.pending = None;
            return Some(String::new());
        }

        self.pending = Some((value.to_string(), now + self.quantum));
        None
    }

    /// Release the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, deadline)) if *deadline <= now => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    /// Drop any pending value without releasing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUANTUM: Duration = Duration::from_millis(300);

    #[test]
    fn test_value_released_after_quantum() {
        let mut debouncer = Debouncer::new(QUANTUM);
        let t0 = Instant::now();

        assert_eq!(debouncer.submit("jazz", t0), None);
        assert_eq!(debouncer.poll(t0 + Duration::from_millis(100)), None);
        assert_eq!(
            debouncer.poll(t0 + QUANTUM),
            Some("jazz".to_string()),
            "Should release once the quantum elapsed"
        );
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_resubmit_restarts_quantum_and_keeps_latest() {
        let mut debouncer = Debouncer::new(QUANTUM);
        let t0 = Instant::now();

        debouncer.submit("ja", t0);
        debouncer.submit("jazz", t0 + Duration::from_millis(200));

        // Original deadline passed, but the resubmit moved it
        assert_eq!(debouncer.poll(t0 + QUANTUM), None);
        assert_eq!(
            debouncer.poll(t0 + Duration::from_millis(200) + QUANTUM),
            Some("jazz".to_string())
        );
    }

    #[test]
    fn test_empty_value_flushes_immediately() {
        let mut debouncer = Debouncer::new(QUANTUM);
        let t0 = Instant::now();

        debouncer.submit("jazz", t0);
        assert_eq!(
            debouncer.submit("", t0 + Duration::from_millis(50)),
            Some(String::new()),
            "Clearing should not wait on the timer"
        );
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(t0 + QUANTUM * 2), None);
    }

    #[test]
    fn test_cancel_drops_pending_value() {
        let mut debouncer = Debouncer::new(QUANTUM);
        let t0 = Instant::now();

        debouncer.submit("jazz", t0);
        debouncer.cancel();
        assert_eq!(debouncer.poll(t0 + QUANTUM), None);
    }
}
