use rand::Rng;
use std::thread;
use std::time::Duration;

/// Blocks the current thread, swappable so tests don't actually wait
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Random pause between cities to spread load on the places API
///
/// Each pause is a whole number of seconds drawn uniformly from
/// `0..=max_delay_secs`. A maximum of zero disables pausing.
#[derive(Debug, Clone)]
pub struct Throttle<S = ThreadSleeper> {
    max_delay_secs: u64,
    sleeper: S,
}

impl Throttle<ThreadSleeper> {
    pub fn new(max_delay_secs: u64) -> Self {
        Self::with_sleeper(max_delay_secs, ThreadSleeper)
    }
}

impl<S: Sleeper> Throttle<S> {
    pub fn with_sleeper(max_delay_secs: u64, sleeper: S) -> Self {
        Self {
            max_delay_secs,
            sleeper,
        }
    }

    pub fn max_delay_secs(&self) -> u64 {
        self.max_delay_secs
    }

    /// Sleep for a random delay and return how long that was
    pub fn pause(&self) -> Duration {
        if self.max_delay_secs == 0 {
            return Duration::ZERO;
        }

        let secs = rand::thread_rng().gen_range(0..=self.max_delay_secs);
        let delay = Duration::from_secs(secs);
        if !delay.is_zero() {
            log::debug!("Throttling for {}s", secs);
            self.sleeper.sleep(delay);
        }
        delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingSleeper {
        slept: RefCell<Vec<Duration>>,
    }

    impl Sleeper for &RecordingSleeper {
        fn sleep(&self, duration: Duration) {
            self.slept.borrow_mut().push(duration);
        }
    }

    #[test]
    fn test_pause_within_bounds() {
        let sleeper = RecordingSleeper::default();
        let throttle = Throttle::with_sleeper(3, &sleeper);

        for _ in 0..200 {
            let delay = throttle.pause();
            assert!(delay <= Duration::from_secs(3));
            assert_eq!(delay.subsec_nanos(), 0);
        }

        // Zero-length draws are never passed to the sleeper
        assert!(sleeper.slept.borrow().iter().all(|d| !d.is_zero()));
    }

    #[test]
    fn test_zero_max_never_sleeps() {
        let sleeper = RecordingSleeper::default();
        let throttle = Throttle::with_sleeper(0, &sleeper);

        for _ in 0..10 {
            assert_eq!(throttle.pause(), Duration::ZERO);
        }
        assert!(sleeper.slept.borrow().is_empty());
    }
}
