//! Ride-session state machine.
//!
//! One session object is reused across rides: `Idle -> Active ->
//! DropOffAttempted -> Idle`. The host drives `tick` once per second and
//! owns the wallet; every transition borrows it only for the call.

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::billing::{BillingConfig, BillingModel, RideQuote, Wallet};
use crate::error::RideError;
use crate::geo::Coordinate;
use crate::geofence::{GeofenceResolver, NearestZone, ParkingVerdict, GEOFENCE_RADIUS_METERS};
use crate::zones::{Zone, ZoneRegistry, CAMPUS_CENTER};

const SETTLEMENT: &str = "ride settlement";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RideConfig {
    pub billing: BillingConfig,
    /// Inclusive drop-off radius around a zone.
    pub geofence_radius_meters: f64,
    /// Simulated location before the first unlock.
    pub campus_center: Coordinate,
}

impl Default for RideConfig {
    fn default() -> Self {
        Self {
            billing: BillingConfig::default(),
            geofence_radius_meters: GEOFENCE_RADIUS_METERS,
            campus_center: CAMPUS_CENTER,
        }
    }
}

/// Externally visible session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RideStatus {
    Idle,
    Active,
    /// A drop-off was attempted away from any zone; still charging.
    DropOffAttempted,
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RideStatus::Idle => "idle",
            RideStatus::Active => "active",
            RideStatus::DropOffAttempted => "awaiting proper drop-off",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone)]
struct ActiveRide {
    start_zone: Zone,
    started_at: SystemTime,
    elapsed_seconds: u64,
    simulated_parking: bool,
}

#[derive(Debug, Clone)]
enum RideState {
    Idle,
    Active(ActiveRide),
    DropOffAttempted { ride: ActiveRide, nearest: NearestZone },
}

/// Result of a successful unlock.
#[derive(Debug, Clone, PartialEq)]
pub struct Unlocked {
    pub zone: Zone,
    pub started_at: SystemTime,
}

impl fmt::Display for Unlocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E-Bike UNLOCKED at {}. Ride started.", self.zone.name)
    }
}

/// Receipt for a paid ride.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settlement {
    pub start_zone: Zone,
    pub drop_off: NearestZone,
    pub verdict: ParkingVerdict,
    pub elapsed_seconds: u64,
    pub minutes: u64,
    pub ride_cost_points: u64,
    pub penalty_points: u64,
    pub debit_points: u64,
    pub debit_currency: f64,
    pub balance_after: u64,
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ride ended successfully! Deducted {} pts (Cost: {} pts",
            self.debit_points, self.ride_cost_points
        )?;
        if self.penalty_points > 0 {
            write!(f, " + Penalty: {} pts", self.penalty_points)?;
        }
        f.write_str(").")
    }
}

/// What happened on a drop-off attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOffOutcome {
    /// At a designated zone; the ride was settled.
    Completed(Settlement),
    /// Not at a zone; charging continues. Carries the zone to move to.
    Rejected(NearestZone),
}

impl fmt::Display for DropOffOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropOffOutcome::Completed(settlement) => fmt::Display::fmt(settlement, f),
            DropOffOutcome::Rejected(nearest) => write!(
                f,
                "Drop-off attempt failed. You are {:.0}m from {}. Charging continues until bike is properly parked.",
                nearest.distance_meters, nearest.zone.name
            ),
        }
    }
}

/// A ride that ended without payment because the wallet could not cover
/// the settlement. Kept for reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnsettledRide {
    pub start_zone: Zone,
    pub elapsed_seconds: u64,
    pub required_points: u64,
    pub available_points: u64,
}

#[derive(Debug, Clone)]
pub struct RideSession {
    registry: ZoneRegistry,
    billing: BillingModel,
    geofence: GeofenceResolver,
    state: RideState,
    current_location: Coordinate,
    unsettled: Vec<UnsettledRide>,
}

impl Default for RideSession {
    fn default() -> Self {
        Self::new(ZoneRegistry::campus(), RideConfig::default())
    }
}

impl RideSession {
    pub fn new(registry: ZoneRegistry, config: RideConfig) -> Self {
        Self {
            registry,
            billing: BillingModel::new(config.billing),
            geofence: GeofenceResolver::new(config.geofence_radius_meters),
            state: RideState::Idle,
            current_location: config.campus_center,
            unsettled: Vec::new(),
        }
    }

    pub fn registry(&self) -> &ZoneRegistry {
        &self.registry
    }

    pub fn billing(&self) -> &BillingModel {
        &self.billing
    }

    pub fn status(&self) -> RideStatus {
        match self.state {
            RideState::Idle => RideStatus::Idle,
            RideState::Active(_) => RideStatus::Active,
            RideState::DropOffAttempted { .. } => RideStatus::DropOffAttempted,
        }
    }

    fn ride(&self) -> Option<&ActiveRide> {
        match &self.state {
            RideState::Idle => None,
            RideState::Active(ride) | RideState::DropOffAttempted { ride, .. } => Some(ride),
        }
    }

    pub fn start_zone(&self) -> Option<&Zone> {
        self.ride().map(|ride| &ride.start_zone)
    }

    pub fn started_at(&self) -> Option<SystemTime> {
        self.ride().map(|ride| ride.started_at)
    }

    /// Seconds charged so far; zero while idle.
    pub fn elapsed_seconds(&self) -> u64 {
        self.ride().map_or(0, |ride| ride.elapsed_seconds)
    }

    pub fn is_simulated_parked(&self) -> bool {
        self.ride().is_some_and(|ride| ride.simulated_parking)
    }

    /// Nearest zone found by the last failed drop-off attempt.
    pub fn last_rejection(&self) -> Option<&NearestZone> {
        match &self.state {
            RideState::DropOffAttempted { nearest, .. } => Some(nearest),
            _ => None,
        }
    }

    pub fn current_location(&self) -> Coordinate {
        self.current_location
    }

    /// Simulated movement. Any coordinate is accepted.
    pub fn set_location(&mut self, location: Coordinate) {
        self.current_location = location;
    }

    pub fn nearest_zone(&self) -> Result<NearestZone, RideError> {
        self.geofence.nearest(&self.registry, self.current_location)
    }

    /// Live cost of the current ride against `wallet`.
    pub fn running_cost(&self, wallet: &Wallet) -> RideQuote {
        self.billing.quote(self.elapsed_seconds(), wallet.balance())
    }

    /// Rides terminated without payment, oldest first.
    pub fn unsettled_rides(&self) -> &[UnsettledRide] {
        &self.unsettled
    }

    fn invalid(&self, operation: &'static str) -> RideError {
        RideError::InvalidTransition {
            operation,
            state: self.status(),
        }
    }

    /// Start a ride at `zone_name`. Unlocking is free; cost accrues per tick.
    pub fn unlock(&mut self, zone_name: &str, wallet: &Wallet) -> Result<Unlocked, RideError> {
        if !matches!(self.state, RideState::Idle) {
            return Err(self.invalid("unlock"));
        }

        let balance = wallet.balance();
        if !self.billing.can_unlock(balance) {
            return Err(RideError::InsufficientFunds {
                operation: "unlock",
                required: self.billing.config.min_unlock_points,
                available: balance,
            });
        }

        let zone = self.registry.resolve(zone_name)?.clone();
        let started_at = SystemTime::now();

        self.current_location = zone.location;
        self.state = RideState::Active(ActiveRide {
            start_zone: zone.clone(),
            started_at,
            elapsed_seconds: 0,
            simulated_parking: false,
        });

        info!(zone = %zone.name, balance, "e-bike unlocked");
        Ok(Unlocked { zone, started_at })
    }

    /// Advance the ride clock by one second. No-op while idle.
    pub fn tick(&mut self) {
        if let RideState::Active(ride) | RideState::DropOffAttempted { ride, .. } = &mut self.state {
            ride.elapsed_seconds += 1;
            if ride.elapsed_seconds % 60 == 0 {
                debug!(minutes = ride.elapsed_seconds / 60, "ride minute completed");
            }
        }
    }

    /// Check the current location against the geofence and settle if it
    /// passes. A rejected attempt leaves the wallet and clock untouched.
    pub fn attempt_drop_off(&mut self, wallet: &mut Wallet) -> Result<DropOffOutcome, RideError> {
        let simulated = match self.ride() {
            Some(ride) => ride.simulated_parking,
            None => return Err(self.invalid("attempt drop-off")),
        };

        let nearest = self.nearest_zone()?;
        if self.geofence.is_at_designated_zone(nearest.distance_meters, simulated) {
            info!(zone = %nearest.zone.name, "drop-off location confirmed");
            return self.finalize(wallet).map(DropOffOutcome::Completed);
        }

        warn!(
            zone = %nearest.zone.name,
            distance_m = nearest.distance_meters,
            "drop-off rejected, ride still charging"
        );
        self.state = match std::mem::replace(&mut self.state, RideState::Idle) {
            RideState::Active(ride) | RideState::DropOffAttempted { ride, .. } => RideState::DropOffAttempted {
                ride,
                nearest: nearest.clone(),
            },
            RideState::Idle => RideState::Idle,
        };
        Ok(DropOffOutcome::Rejected(nearest))
    }

    /// Move the bike onto the zone named by the last failed attempt and
    /// mark it as correctly parked.
    pub fn simulate_correct_parking(&mut self) -> Result<Zone, RideError> {
        let status = self.status();
        let target = match &mut self.state {
            RideState::DropOffAttempted { ride, nearest } => {
                ride.simulated_parking = true;
                nearest.zone.clone()
            }
            _ => {
                return Err(RideError::InvalidTransition {
                    operation: "simulate correct parking",
                    state: status,
                });
            }
        };

        self.current_location = target.location;
        info!(zone = %target.name, "simulated move to designated zone");
        Ok(target)
    }

    /// Charge the ride plus any drop-off penalty and return to idle.
    ///
    /// When the wallet cannot cover the debit the ride is still ended,
    /// nothing is charged, and the ride is recorded as unsettled.
    pub fn finalize(&mut self, wallet: &mut Wallet) -> Result<Settlement, RideError> {
        let (start_zone, elapsed_seconds, simulated) = match self.ride() {
            Some(ride) => (ride.start_zone.clone(), ride.elapsed_seconds, ride.simulated_parking),
            None => return Err(self.invalid("finalize")),
        };

        let drop_off = self.nearest_zone()?;
        let verdict = self.geofence.verdict(drop_off.distance_meters, simulated);
        let minutes = self.billing.minutes_elapsed(elapsed_seconds);
        let ride_cost_points = self.billing.cost_points(minutes);
        let penalty_points = if verdict.is_designated() {
            0
        } else {
            self.billing.config.penalty_points
        };
        let debit_points = ride_cost_points.saturating_add(penalty_points);

        let available = wallet.balance();
        if available < debit_points {
            warn!(
                required = debit_points,
                available,
                elapsed_seconds,
                "payment failed, ride terminated unpaid"
            );
            self.unsettled.push(UnsettledRide {
                start_zone,
                elapsed_seconds,
                required_points: debit_points,
                available_points: available,
            });
            self.end_ride();
            return Err(RideError::InsufficientFunds {
                operation: SETTLEMENT,
                required: debit_points,
                available,
            });
        }

        if penalty_points > 0 {
            warn!(
                penalty_points,
                distance_m = drop_off.distance_meters,
                "non-designated drop-off penalty applied"
            );
        }

        let balance_after = wallet.debit(debit_points, SETTLEMENT)?;
        self.end_ride();

        info!(
            minutes,
            ride_cost_points,
            penalty_points,
            debit_points,
            balance_after,
            ?verdict,
            "ride settled"
        );
        Ok(Settlement {
            start_zone,
            drop_off,
            verdict,
            elapsed_seconds,
            minutes,
            ride_cost_points,
            penalty_points,
            debit_points,
            debit_currency: self.billing.points_to_currency(debit_points),
            balance_after,
        })
    }

    fn end_ride(&mut self) {
        self.state = RideState::Idle;
    }
}
