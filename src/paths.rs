//! Simulated route alternatives between two zones.
//!
//! There is no routing engine behind this: durations are the straight-line
//! distance scaled by a random jitter, and cost follows duration only.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::billing::BillingModel;
use crate::error::RideError;
use crate::geo::distance_km;
use crate::traits::RouteSampler;
use crate::zones::{Zone, ZoneRegistry};

/// Minutes of riding per straight-line kilometer, before jitter.
const MINUTES_PER_KM: f64 = 50.0;
const MIN_BASE_DURATION_MINUTES: u64 = 5;
const SAFEST_DURATION_FACTOR: f64 = 1.3;
const FASTEST_DURATION_FACTOR: f64 = 0.8;

const SAFEST_SCORE_RANGE: std::ops::Range<u32> = 90..95;
const FASTEST_SCORE_RANGE: std::ops::Range<u32> = 80..88;

const SAFEST_DETAILS: &str =
    "Avoids main roads and high-traffic areas; follows pedestrian-only paths for maximum safety.";
const FASTEST_DETAILS: &str =
    "Direct route using main campus roads; optimal for quick travel but crosses more intersections.";
const CHEAPEST_DETAILS: &str =
    "Same as the Fastest route, as cost is solely determined by ride duration.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProfileKind {
    Safest,
    Fastest,
    Cheapest,
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProfileKind::Safest => "Safest",
            ProfileKind::Fastest => "Fastest",
            ProfileKind::Cheapest => "Cheapest",
        };
        f.write_str(label)
    }
}

/// One route alternative. Recomputed on every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathProfile {
    pub profile: ProfileKind,
    pub duration_minutes: u64,
    pub safety_score_percent: u32,
    pub cost_points: u64,
    pub cost_currency: f64,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PathAnalyzer {
    billing: BillingModel,
}

impl PathAnalyzer {
    pub fn new(billing: BillingModel) -> Self {
        Self { billing }
    }

    /// Profiles from `start` to `end` in the order Safest, Fastest,
    /// Cheapest. Empty when both are the same zone.
    ///
    /// Draws from `sampler` in a fixed order: jitter, Safest score,
    /// Fastest score.
    pub fn analyze<S>(&self, start: &Zone, end: &Zone, sampler: &mut S) -> Vec<PathProfile>
    where
        S: RouteSampler + ?Sized,
    {
        if start.name == end.name {
            return Vec::new();
        }

        let dist_km = distance_km(start.location, end.location);
        let scaled = (dist_km * MINUTES_PER_KM * sampler.jitter()).floor() as u64;
        let base = scaled.max(MIN_BASE_DURATION_MINUTES);

        let safest_duration = (base as f64 * SAFEST_DURATION_FACTOR).floor() as u64;
        let fastest_duration = (base as f64 * FASTEST_DURATION_FACTOR).floor() as u64;

        let safest = self.profile(
            ProfileKind::Safest,
            safest_duration,
            sampler.safety_score(SAFEST_SCORE_RANGE),
            SAFEST_DETAILS,
        );
        let fastest = self.profile(
            ProfileKind::Fastest,
            fastest_duration,
            sampler.safety_score(FASTEST_SCORE_RANGE),
            FASTEST_DETAILS,
        );
        // Cost depends on duration alone, so the cheapest route is the fastest one.
        let cheapest = PathProfile {
            profile: ProfileKind::Cheapest,
            description: CHEAPEST_DETAILS,
            ..fastest.clone()
        };

        debug!(
            from = %start.name,
            to = %end.name,
            dist_km,
            base_minutes = base,
            "path analysis"
        );
        vec![safest, fastest, cheapest]
    }

    /// Resolve both zone names and analyze, reporting unknown names and
    /// self-routes as errors.
    pub fn analyze_by_name<S>(
        &self,
        registry: &ZoneRegistry,
        start_name: &str,
        end_name: &str,
        sampler: &mut S,
    ) -> Result<Vec<PathProfile>, RideError>
    where
        S: RouteSampler + ?Sized,
    {
        let start = registry.resolve(start_name)?;
        let end = registry.resolve(end_name)?;
        if start.name == end.name {
            return Err(RideError::DegenerateRoute(start.name.clone()));
        }
        Ok(self.analyze(start, end, sampler))
    }

    fn profile(
        &self,
        profile: ProfileKind,
        duration_minutes: u64,
        safety_score_percent: u32,
        description: &'static str,
    ) -> PathProfile {
        let cost_points = self.billing.cost_points(duration_minutes);
        PathProfile {
            profile,
            duration_minutes,
            safety_score_percent,
            cost_points,
            cost_currency: self.billing.points_to_currency(cost_points),
            description,
        }
    }
}
