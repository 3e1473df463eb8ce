//! Error type shared by the ride engine.

use thiserror::Error;

use crate::session::RideStatus;

/// Recoverable failures returned by ride, wallet and path operations.
///
/// None of these are fatal; each maps to a single user action that the
/// caller can report and let the rider retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RideError {
    /// Balance below the unlock threshold or the settlement debit.
    #[error(
        "insufficient funds for {operation}: {required} pts required, {available} pts available ({} pts short)",
        shortfall(.required, .available)
    )]
    InsufficientFunds {
        operation: &'static str,
        required: u64,
        available: u64,
    },

    /// Zone name not present in the registry.
    #[error("zone not found: {0:?}")]
    ZoneNotFound(String),

    /// Operation not allowed in the current session state.
    #[error("cannot {operation} while ride is {state}")]
    InvalidTransition {
        operation: &'static str,
        state: RideStatus,
    },

    /// Path analysis requested from a zone to itself.
    #[error("no route from {0:?} to itself")]
    DegenerateRoute(String),

    /// A zone registry was configured without any zones.
    #[error("zone registry is empty; at least one designated zone is required")]
    EmptyRegistry,
}

impl RideError {
    /// Points missing to cover the request, zero for other variants.
    pub fn shortfall_points(&self) -> u64 {
        match self {
            RideError::InsufficientFunds { required, available, .. } => shortfall(required, available),
            _ => 0,
        }
    }
}

fn shortfall(required: &u64, available: &u64) -> u64 {
    required.saturating_sub(*available)
}
