//! ebike-ride core
//!
//! Ride-session engine for a simulated campus e-bike rental: geofenced
//! drop-off, points billing and randomized route profiles.

pub mod error;
pub mod traits;
pub mod geo;
pub mod zones;
pub mod geofence;
pub mod billing;
pub mod session;
pub mod paths;
pub mod rewards;

pub use error::RideError;
