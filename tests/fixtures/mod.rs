//! Test fixtures for ebike-ride.
//!
//! Provides named campus coordinates and a wallet/session builder.

pub mod campus_locations;

pub use campus_locations::*;
