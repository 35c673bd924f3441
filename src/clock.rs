//! Clock collaborator.
//!
//! Block construction performs exactly one side effect: reading the wall
//! clock. Making that a collaborator parameter rather than a free function
//! call keeps the builder testable with a virtual clock.

use std::time::{SystemTime, UNIX_EPOCH};

/// Supplies the current time as a Unix-epoch timestamp.
pub trait Clock {
    fn now(&self) -> u64;
}

/// Reads the real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// A clock that always returns a fixed timestamp, for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_is_stable() {
        let clock = FixedClock(42);
        assert_eq!(clock.now(), 42);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn system_clock_advances_or_holds_but_never_regresses_within_call() {
        let clock = SystemClock;
        let t1 = clock.now();
        let t2 = clock.now();
        assert!(t2 >= t1);
    }
}
