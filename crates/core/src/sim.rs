//! Simulated-processing knobs: latency and injected failure.
//!
//! The receiver does no real work; it models it. Both dimensions of the
//! model are behind small capability traits so production wires in true
//! randomness while tests supply deterministic implementations instead of
//! sampling real distributions.

use std::time::Duration;

use rand::Rng;

/// Decides whether a processing attempt is deemed a failure.
///
/// Injected failures exist to exercise the reject/redelivery path; they are
/// deliberately indistinguishable downstream from a genuine failure.
pub trait FailureOracle: Send + Sync {
    fn should_fail(&self) -> bool;
}

/// Fails with probability `1 / chance`.
///
/// Boundary behavior:
/// - `chance == 0` is a misconfiguration; guarded as "never fails" rather
///   than dividing by zero.
/// - `chance == 1` fails every attempt.
#[derive(Debug, Clone)]
pub struct RandomFailureOracle {
    chance: u32,
}

impl RandomFailureOracle {
    pub fn new(chance: u32) -> Self {
        Self { chance }
    }
}

impl FailureOracle for RandomFailureOracle {
    fn should_fail(&self) -> bool {
        match self.chance {
            0 => false,
            1 => true,
            n => rand::thread_rng().gen_range(0..n) == 0,
        }
    }
}

/// Oracle that never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverFail;

impl FailureOracle for NeverFail {
    fn should_fail(&self) -> bool {
        false
    }
}

/// Oracle that always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysFail;

impl FailureOracle for AlwaysFail {
    fn should_fail(&self) -> bool {
        true
    }
}

/// Draws a simulated processing duration for one delivery.
pub trait DelaySampler: Send + Sync {
    fn sample(&self) -> Duration;
}

/// Uniform draw in `[0, max_ms)` milliseconds.
///
/// `max_ms == 0` yields a zero delay instead of an empty range.
#[derive(Debug, Clone)]
pub struct UniformDelay {
    max_ms: u64,
}

impl UniformDelay {
    pub fn new(max_ms: u64) -> Self {
        Self { max_ms }
    }
}

impl DelaySampler for UniformDelay {
    fn sample(&self) -> Duration {
        if self.max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..self.max_ms))
    }
}
