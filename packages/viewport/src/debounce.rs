//! Cancelable debounce timer and the clocks that drive it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Monotonic time source, measured from an arbitrary origin.
pub trait Clock: Send + Sync {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// A clock whose origin is now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Virtual clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicU64,
}

impl ManualClock {
    /// A clock at time zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            millis: AtomicU64::new(0),
        }
    }

    /// Moves the clock forward by `by`, at millisecond resolution.
    pub fn advance(&self, by: Duration) {
        self.millis
            .fetch_add(u64::try_from(by.as_millis()).unwrap_or(u64::MAX), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

/// Trailing-edge debounce: every [`schedule`](Self::schedule) pushes the
/// deadline to `now + delay`, and [`fire`](Self::fire) reports once when
/// the deadline has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTimer {
    delay: Duration,
    deadline: Option<Duration>,
}

impl DebounceTimer {
    /// A disarmed timer with the given delay.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Cancels any pending deadline and arms a new one at `now + delay`.
    pub fn schedule(&mut self, now: Duration) {
        self.deadline = Some(now + self.delay);
    }

    /// Disarms the timer.
    pub const fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Pending deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Returns `true` exactly once per armed deadline, the first time it is
    /// called with `now` at or past it. The timer is disarmed afterwards.
    pub fn fire(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(200);

    #[test]
    fn fires_once_after_delay() {
        let clock = ManualClock::new();
        let mut timer = DebounceTimer::new(DELAY);
        timer.schedule(clock.now());

        clock.advance(Duration::from_millis(199));
        assert!(!timer.fire(clock.now()));

        clock.advance(Duration::from_millis(1));
        assert!(timer.fire(clock.now()));
        assert!(!timer.fire(clock.now()));
        assert_eq!(timer.deadline(), None);
    }

    #[test]
    fn rescheduling_pushes_the_deadline() {
        let clock = ManualClock::new();
        let mut timer = DebounceTimer::new(DELAY);

        for _ in 0..5 {
            timer.schedule(clock.now());
            clock.advance(Duration::from_millis(150));
            assert!(!timer.fire(clock.now()), "fired during a burst");
        }

        assert_eq!(timer.deadline(), Some(Duration::from_millis(800)));
        clock.advance(Duration::from_millis(50));
        assert!(timer.fire(clock.now()));
    }

    #[test]
    fn cancel_disarms() {
        let mut timer = DebounceTimer::new(DELAY);
        timer.schedule(Duration::ZERO);
        timer.cancel();
        assert!(!timer.fire(Duration::from_secs(10)));
        assert_eq!(timer.deadline(), None);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
