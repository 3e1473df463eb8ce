//! Seams for injecting external behaviour into the ride engine.

use std::ops::Range;

use rand::Rng;

/// Lower bound of the route duration jitter factor (inclusive).
pub const JITTER_MIN: f64 = 0.75;

/// Upper bound of the route duration jitter factor (exclusive).
pub const JITTER_MAX: f64 = 1.25;

/// Source of the random draws used by the path analyzer.
///
/// Every `rand::Rng` is a sampler, so a seeded `ChaCha8Rng` gives
/// reproducible analyses. Tests can supply fixed values instead.
pub trait RouteSampler {
    /// Duration jitter factor in `[JITTER_MIN, JITTER_MAX)`.
    fn jitter(&mut self) -> f64;

    /// Safety score drawn uniformly from `range`.
    fn safety_score(&mut self, range: Range<u32>) -> u32;
}

impl<R: Rng> RouteSampler for R {
    fn jitter(&mut self) -> f64 {
        self.gen_range(JITTER_MIN..JITTER_MAX)
    }

    fn safety_score(&mut self, range: Range<u32>) -> u32 {
        self.gen_range(range)
    }
}
