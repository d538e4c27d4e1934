//! Bounded wait for data and a drawing surface to both become available.
//!
//! Hosts may start before their page or terminal is ready. They poll the
//! gate on a timer; the gate says when to render, when to keep waiting and
//! when to stop trying.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            interval: Duration::from_millis(250),
        }
    }
}

/// Outcome of one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    Waiting { attempt: u32, retry_in: Duration },
    GaveUp { attempts: u32 },
}

#[derive(Debug, Clone)]
pub struct LoadGate {
    policy: RetryPolicy,
    attempts: u32,
    finished: bool,
}

impl LoadGate {
    pub const fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            attempts: 0,
            finished: false,
        }
    }

    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Records one poll. Once `Ready` or `GaveUp` has been returned the gate
    /// stays there.
    pub fn poll(&mut self, data_ready: bool, surface_ready: bool) -> Readiness {
        if self.finished {
            return if data_ready && surface_ready {
                Readiness::Ready
            } else {
                Readiness::GaveUp {
                    attempts: self.attempts,
                }
            };
        }

        self.attempts += 1;

        if data_ready && surface_ready {
            self.finished = true;
            tracing::debug!(attempts = self.attempts, "radar inputs ready");
            return Readiness::Ready;
        }

        if self.attempts >= self.policy.max_attempts {
            self.finished = true;
            tracing::warn!(
                attempts = self.attempts,
                data_ready,
                surface_ready,
                "gave up waiting for radar inputs"
            );
            return Readiness::GaveUp {
                attempts: self.attempts,
            };
        }

        tracing::trace!(attempt = self.attempts, data_ready, surface_ready, "waiting for radar inputs");
        Readiness::Waiting {
            attempt: self.attempts,
            retry_in: self.policy.interval,
        }
    }

    /// Starts over, e.g. after new data is requested.
    pub fn reset(&mut self) {
        self.attempts = 0;
        self.finished = false;
    }
}

impl Default for LoadGate {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            interval: Duration::from_millis(10),
        }
    }

    #[test]
    fn ready_as_soon_as_both_inputs_are_there() {
        let mut gate = LoadGate::new(policy(5));
        assert_eq!(
            gate.poll(true, false),
            Readiness::Waiting {
                attempt: 1,
                retry_in: Duration::from_millis(10)
            }
        );
        assert_eq!(gate.poll(true, true), Readiness::Ready);
        assert_eq!(gate.attempts(), 2);
    }

    #[test]
    fn gives_up_after_the_last_attempt() {
        let mut gate = LoadGate::new(policy(3));
        assert!(matches!(gate.poll(false, true), Readiness::Waiting { .. }));
        assert!(matches!(gate.poll(false, true), Readiness::Waiting { .. }));
        assert_eq!(gate.poll(false, true), Readiness::GaveUp { attempts: 3 });

        // A torn-down host keeps polling; the count does not grow.
        assert_eq!(gate.poll(false, false), Readiness::GaveUp { attempts: 3 });
        assert_eq!(gate.attempts(), 3);
    }

    #[test]
    fn reset_allows_another_round() {
        let mut gate = LoadGate::new(policy(1));
        assert_eq!(gate.poll(false, false), Readiness::GaveUp { attempts: 1 });

        gate.reset();
        assert_eq!(gate.poll(true, true), Readiness::Ready);
    }
}
