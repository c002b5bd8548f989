//! Input Debouncing
//!
//! Delays evaluation of rapid repeated input until it settles. Each
//! submission supersedes the pending one and pushes the deadline back
//! by the full window; only the value present when input settled is
//! ever delivered. The clock is passed in, so the timing contract is
//! testable without sleeping; the TUI drives `poll` from its tick loop.

use std::time::{Duration, Instant};

/// Default window for live search input
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

struct Pending {
    value: String,
    deadline: Instant,
}

/// A single-slot debouncer for text input
pub struct Debouncer {
    window: Duration,
    pending: Option<Pending>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Replace any pending value and reset the deadline to
    /// `now + window`.
    pub fn submit(&mut self, value: String, now: Instant) {
        self.pending = Some(Pending {
            value,
            deadline: now + self.window,
        });
    }

    /// Deliver the pending value if its deadline has been reached.
    /// Returns at most one value per submission burst.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some(pending) if now >= pending.deadline => {
                self.pending.take().map(|p| p.value)
            }
            _ => None,
        }
    }

    /// Is an evaluation still waiting for input to settle?
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any pending evaluation without delivering it
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn keystroke_burst_fires_once_with_the_last_value() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(ms(300));

        debouncer.submit("m".to_string(), t0);
        debouncer.submit("mo".to_string(), t0 + ms(100));
        debouncer.submit("mou".to_string(), t0 + ms(150));

        // Earlier deadlines were superseded; nothing fires before
        // settle + window.
        assert_eq!(debouncer.poll(t0 + ms(300)), None);
        assert_eq!(debouncer.poll(t0 + ms(449)), None);

        assert_eq!(debouncer.poll(t0 + ms(450)), Some("mou".to_string()));

        // Exactly one evaluation per burst.
        assert_eq!(debouncer.poll(t0 + ms(1000)), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn new_burst_after_delivery_fires_again() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(ms(300));

        debouncer.submit("a".to_string(), t0);
        assert_eq!(debouncer.poll(t0 + ms(300)), Some("a".to_string()));

        debouncer.submit("b".to_string(), t0 + ms(400));
        assert_eq!(debouncer.poll(t0 + ms(500)), None);
        assert_eq!(debouncer.poll(t0 + ms(700)), Some("b".to_string()));
    }

    #[test]
    fn cancel_drops_the_pending_value() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(ms(300));

        debouncer.submit("a".to_string(), t0);
        assert!(debouncer.is_pending());
        debouncer.cancel();
        assert_eq!(debouncer.poll(t0 + ms(300)), None);
    }
}
