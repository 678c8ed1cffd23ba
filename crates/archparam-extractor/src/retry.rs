//! Bounded exponential backoff around a fallible call
//!
//! The loop is an explicit state machine:
//!
//! ```text
//! Attempting ──ok──────────────────────────▶ Succeeded
//!     │ transient, budget left                ▲
//!     ▼                                       │
//!  Backoff ──sleep──▶ Attempting ─────────────┘
//!     transient, budget spent ──▶ Exhausted
//!     any other failure       ──▶ Failed
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

/// Retry budget and backoff schedule
///
/// The delay before retry `n` (1-based) is `base_delay_secs * multiplier^(n-1)`.
/// With the defaults that is 5s, 10s, 20s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt
    pub max_retries: u32,

    /// Delay before the first retry, in seconds
    pub base_delay_secs: u64,

    /// Growth factor between consecutive delays
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_secs: 5,
            multiplier: 2,
        }
    }
}

/// How a retried call ended
#[derive(Debug)]
pub enum RetryOutcome<T, E> {
    /// The call eventually succeeded
    Succeeded {
        /// Returned value
        value: T,
        /// Retries performed before success
        retries: u32,
    },

    /// Every attempt hit a transient failure
    Exhausted {
        /// Total attempts, including the first
        attempts: u32,
        /// The last failure
        error: E,
    },

    /// A non-transient failure ended the loop immediately
    Failed {
        /// Total attempts, including the failing one
        attempts: u32,
        /// The failure
        error: E,
    },
}

enum RetryState<T, E> {
    Attempting { attempt: u32 },
    Backoff { attempt: u32, delay: Duration, error: E },
    Done(RetryOutcome<T, E>),
}

impl RetryPolicy {
    /// Check the policy is usable
    pub fn validate(&self) -> Result<(), String> {
        if self.multiplier == 0 {
            return Err("multiplier must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Delay before retry number `retry` (1-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = u64::from(self.multiplier).saturating_pow(retry.saturating_sub(1));
        Duration::from_secs(self.base_delay_secs.saturating_mul(factor))
    }

    /// Sum of every backoff delay when the budget is fully spent
    pub fn total_backoff(&self) -> Duration {
        (1..=self.max_retries).map(|retry| self.delay_for(retry)).sum()
    }

    /// Run `operation` until it succeeds, fails for good, or the budget runs out
    ///
    /// `operation` receives the 1-based attempt number. Only failures for which
    /// `is_transient` returns true are retried.
    pub fn run<T, E, F, P>(&self, sleeper: &dyn Sleeper, is_transient: P, mut operation: F) -> RetryOutcome<T, E>
    where
        F: FnMut(u32) -> Result<T, E>,
        P: Fn(&E) -> bool,
        E: Display,
    {
        let mut state = RetryState::Attempting { attempt: 1 };

        loop {
            state = match state {
                RetryState::Attempting { attempt } => match operation(attempt) {
                    Ok(value) => RetryState::Done(RetryOutcome::Succeeded {
                        value,
                        retries: attempt - 1,
                    }),
                    Err(error) if is_transient(&error) && attempt <= self.max_retries => {
                        RetryState::Backoff {
                            attempt,
                            delay: self.delay_for(attempt),
                            error,
                        }
                    }
                    Err(error) if is_transient(&error) => {
                        RetryState::Done(RetryOutcome::Exhausted { attempts: attempt, error })
                    }
                    Err(error) => RetryState::Done(RetryOutcome::Failed { attempts: attempt, error }),
                },
                RetryState::Backoff { attempt, delay, error } => {
                    warn!(
                        attempt,
                        delay_secs = delay.as_secs(),
                        error = %error,
                        "Rate limit hit. Retrying in {} seconds...",
                        delay.as_secs()
                    );
                    sleeper.sleep(delay);
                    debug!(attempt = attempt + 1, "Backoff finished");
                    RetryState::Attempting { attempt: attempt + 1 }
                }
                RetryState::Done(outcome) => return outcome,
            };
        }
    }
}

/// Blocking wait between attempts
pub trait Sleeper {
    /// Block for `duration`
    fn sleep(&self, duration: Duration);
}

/// Sleeps the current thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Records requested delays without waiting
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    /// Delays requested so far, in order
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }

    /// Sum of all requested delays
    pub fn total(&self) -> Duration {
        self.delays().into_iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum TestError {
        Busy,
        Fatal,
    }

    impl Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self)
        }
    }

    fn is_busy(error: &TestError) -> bool {
        *error == TestError::Busy
    }

    #[test]
    fn test_default_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(5));
        assert_eq!(policy.delay_for(2), Duration::from_secs(10));
        assert_eq!(policy.delay_for(3), Duration::from_secs(20));
        assert_eq!(policy.total_backoff(), Duration::from_secs(35));
    }

    #[test]
    fn test_delay_saturates() {
        let policy = RetryPolicy {
            max_retries: 100,
            base_delay_secs: u64::MAX / 2,
            multiplier: 10,
        };
        assert_eq!(policy.delay_for(90), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_success_first_try() {
        let sleeper = RecordingSleeper::default();
        let outcome = RetryPolicy::default().run(&sleeper, is_busy, |_| Ok::<_, TestError>(7));

        assert!(matches!(outcome, RetryOutcome::Succeeded { value: 7, retries: 0 }));
        assert!(sleeper.delays().is_empty());
    }

    #[test]
    fn test_success_after_two_transient_failures() {
        let sleeper = RecordingSleeper::default();
        let outcome = RetryPolicy::default().run(&sleeper, is_busy, |attempt| {
            if attempt < 3 {
                Err(TestError::Busy)
            } else {
                Ok(attempt)
            }
        });

        assert!(matches!(outcome, RetryOutcome::Succeeded { value: 3, retries: 2 }));
        assert_eq!(sleeper.total(), Duration::from_secs(15));
    }

    #[test]
    fn test_exhausted_after_budget() {
        let sleeper = RecordingSleeper::default();
        let mut calls = 0;
        let outcome: RetryOutcome<(), _> = RetryPolicy::default().run(&sleeper, is_busy, |_| {
            calls += 1;
            Err(TestError::Busy)
        });

        assert!(matches!(
            outcome,
            RetryOutcome::Exhausted { attempts: 4, error: TestError::Busy }
        ));
        assert_eq!(calls, 4);
        assert_eq!(
            sleeper.delays(),
            vec![
                Duration::from_secs(5),
                Duration::from_secs(10),
                Duration::from_secs(20)
            ]
        );
    }

    #[test]
    fn test_fatal_error_not_retried() {
        let sleeper = RecordingSleeper::default();
        let mut calls = 0;
        let outcome: RetryOutcome<(), _> = RetryPolicy::default().run(&sleeper, is_busy, |_| {
            calls += 1;
            Err(TestError::Fatal)
        });

        assert!(matches!(
            outcome,
            RetryOutcome::Failed { attempts: 1, error: TestError::Fatal }
        ));
        assert_eq!(calls, 1);
        assert!(sleeper.delays().is_empty());
    }

    #[test]
    fn test_fatal_error_after_transient() {
        let sleeper = RecordingSleeper::default();
        let outcome: RetryOutcome<(), _> =
            RetryPolicy::default().run(&sleeper, is_busy, |attempt| {
                if attempt == 1 {
                    Err(TestError::Busy)
                } else {
                    Err(TestError::Fatal)
                }
            });

        assert!(matches!(outcome, RetryOutcome::Failed { attempts: 2, .. }));
        assert_eq!(sleeper.delays(), vec![Duration::from_secs(5)]);
    }

    #[test]
    fn test_zero_retries() {
        let policy = RetryPolicy {
            max_retries: 0,
            ..RetryPolicy::default()
        };
        let sleeper = RecordingSleeper::default();
        let outcome: RetryOutcome<(), _> = policy.run(&sleeper, is_busy, |_| Err(TestError::Busy));

        assert!(matches!(outcome, RetryOutcome::Exhausted { attempts: 1, .. }));
        assert!(sleeper.delays().is_empty());
    }

    #[test]
    fn test_zero_multiplier_invalid() {
        let policy = RetryPolicy {
            multiplier: 0,
            ..RetryPolicy::default()
        };
        assert!(policy.validate().is_err());
    }
}
