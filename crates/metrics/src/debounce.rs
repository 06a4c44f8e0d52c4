//! Debounced search input.
//!
//! Text queries are recomputed only after the input has been quiet for a
//! fixed delay. The clock is supplied by the caller, so this never sleeps or
//! spawns timers.

use std::time::{Duration, Instant};

/// Default quiet period before a typed query is applied.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct SearchDebounce {
    delay: Duration,
    pending: Option<(String, Instant)>,
    committed: String,
}

impl Default for SearchDebounce {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE)
    }
}

impl SearchDebounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            committed: String::new(),
        }
    }

    /// Record a keystroke. Restarts the quiet period.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.pending = Some((text.into(), now + self.delay));
    }

    /// Returns the new query once the quiet period has elapsed.
    ///
    /// Fires at most once per burst of input, and not at all if the settled
    /// text equals the query already in effect.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let due = matches!(&self.pending, Some((_, deadline)) if now >= *deadline);
        if !due {
            return None;
        }
        let (text, _) = self.pending.take()?;
        if text == self.committed {
            return None;
        }
        self.committed = text.clone();
        Some(text)
    }

    /// Query currently in effect.
    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn fires_once_after_quiet_period() {
        let t0 = Instant::now();
        let mut d = SearchDebounce::new(ms(300));
        d.input("tote", t0);
        assert_eq!(d.poll(t0 + ms(299)), None);
        assert_eq!(d.poll(t0 + ms(300)).as_deref(), Some("tote"));
        assert_eq!(d.poll(t0 + ms(900)), None);
        assert_eq!(d.committed(), "tote");
    }

    #[test]
    fn typing_restarts_the_timer() {
        let t0 = Instant::now();
        let mut d = SearchDebounce::new(ms(300));
        d.input("t", t0);
        d.input("to", t0 + ms(200));
        d.input("tot", t0 + ms(400));
        assert_eq!(d.poll(t0 + ms(650)), None);
        assert!(d.is_pending());
        assert_eq!(d.poll(t0 + ms(700)).as_deref(), Some("tot"));
    }

    #[test]
    fn unchanged_text_does_not_refire() {
        let t0 = Instant::now();
        let mut d = SearchDebounce::new(ms(10));
        d.input("bag", t0);
        assert!(d.poll(t0 + ms(10)).is_some());
        d.input("bag", t0 + ms(20));
        assert_eq!(d.poll(t0 + ms(40)), None);
        assert!(!d.is_pending());
    }
}
