//! Campus coordinates around the designated zones.

use ebike_ride::billing::Wallet;
use ebike_ride::geo::Coordinate;
use ebike_ride::session::RideSession;

pub const ZONE_A: &str = "Hentian Mawar (Dc)";
pub const ZONE_B: &str = "Hentian Pusat Kesihatan";
pub const ZONE_G: &str = "Hentian Fkpm (Mascom)";

/// South-west of campus, well over 500 m from every zone.
pub const SOUTH_GATE: Coordinate = Coordinate::new(3.0640, 101.4950);

/// Campus center, ~324 m from the nearest zone.
pub const CAMPUS_CENTER: Coordinate = Coordinate::new(3.0740, 101.4980);

/// Fresh session on the campus registry with `balance` points.
pub fn session_with(balance: u64) -> (RideSession, Wallet) {
    (RideSession::default(), Wallet::new(balance))
}

pub fn ride_for(session: &mut RideSession, seconds: u64) {
    for _ in 0..seconds {
        session.tick();
    }
}
