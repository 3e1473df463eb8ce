//! Points billing: per-minute ride cost, drop-off penalty and the wallet.
//!
//! The ledger is kept in integer points. The secondary currency (RM) is
//! derived only for display and rounded to two decimals there.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::RideError;

pub const COST_PER_MINUTE_POINTS: u64 = 1000;
pub const POINTS_PER_CURRENCY_UNIT: u64 = 2000;
/// Charged on top of the ride cost for a non-designated drop-off.
pub const PENALTY_POINTS: u64 = 200;
pub const MIN_UNLOCK_POINTS: u64 = 1000;

/// Balance a fresh wallet starts with in the campus app.
pub const DEFAULT_OPENING_BALANCE: u64 = 12_500;

/// Top-up amounts offered to the rider.
pub const TOP_UP_OPTIONS: [u64; 3] = [10_000, 20_000, 50_000];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    pub cost_per_minute_points: u64,
    pub points_per_currency_unit: u64,
    pub penalty_points: u64,
    pub min_unlock_points: u64,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            cost_per_minute_points: COST_PER_MINUTE_POINTS,
            points_per_currency_unit: POINTS_PER_CURRENCY_UNIT,
            penalty_points: PENALTY_POINTS,
            min_unlock_points: MIN_UNLOCK_POINTS,
        }
    }
}

/// Converts ride time into points and points into currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BillingModel {
    pub config: BillingConfig,
}

impl BillingModel {
    pub fn new(config: BillingConfig) -> Self {
        Self { config }
    }

    /// Whole minutes only; a partial minute is free until it completes.
    pub fn minutes_elapsed(&self, seconds: u64) -> u64 {
        seconds / 60
    }

    pub fn cost_points(&self, minutes: u64) -> u64 {
        minutes.saturating_mul(self.config.cost_per_minute_points)
    }

    /// Points expressed in currency, rounded to two decimals.
    pub fn points_to_currency(&self, points: u64) -> f64 {
        let raw = points as f64 / self.config.points_per_currency_unit as f64;
        (raw * 100.0).round() / 100.0
    }

    pub fn format_currency(&self, points: u64) -> String {
        format!("RM{:.2}", points as f64 / self.config.points_per_currency_unit as f64)
    }

    pub fn can_unlock(&self, balance: u64) -> bool {
        balance >= self.config.min_unlock_points
    }

    /// Running cost of a ride that has lasted `seconds` so far.
    pub fn quote(&self, seconds: u64, balance: u64) -> RideQuote {
        let minutes = self.minutes_elapsed(seconds);
        let cost_points = self.cost_points(minutes);
        RideQuote {
            minutes,
            cost_points,
            cost_currency: self.points_to_currency(cost_points),
            balance_after_charge: clamp_i64(balance).saturating_sub(clamp_i64(cost_points)),
        }
    }
}

fn clamp_i64(points: u64) -> i64 {
    i64::try_from(points).unwrap_or(i64::MAX)
}

/// Live cost of an ongoing ride, as shown while riding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RideQuote {
    pub minutes: u64,
    pub cost_points: u64,
    pub cost_currency: f64,
    /// May go negative when the ride has outrun the balance.
    pub balance_after_charge: i64,
}

/// The rider's points balance.
///
/// Owned by the host application; ride operations borrow it for the
/// duration of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    balance_points: u64,
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new(DEFAULT_OPENING_BALANCE)
    }
}

impl Wallet {
    pub fn new(balance_points: u64) -> Self {
        Self { balance_points }
    }

    pub fn balance(&self) -> u64 {
        self.balance_points
    }

    /// Add points. Returns the new balance.
    pub fn credit(&mut self, points: u64) -> u64 {
        self.balance_points = self.balance_points.saturating_add(points);
        info!(points, balance = self.balance_points, "wallet credited");
        self.balance_points
    }

    /// Remove points, refusing without mutation when the balance is short.
    pub fn debit(&mut self, points: u64, operation: &'static str) -> Result<u64, RideError> {
        if self.balance_points < points {
            return Err(RideError::InsufficientFunds {
                operation,
                required: points,
                available: self.balance_points,
            });
        }
        self.balance_points -= points;
        debug!(points, balance = self.balance_points, operation, "wallet debited");
        Ok(self.balance_points)
    }

    pub fn balance_currency(&self, billing: &BillingModel) -> f64 {
        billing.points_to_currency(self.balance_points)
    }

    /// Credit one of the offered top-up amounts and describe it.
    pub fn top_up(&mut self, points: u64, billing: &BillingModel) -> String {
        self.credit(points);
        format!(
            "{} pts ({}) added successfully!",
            points,
            billing.format_currency(points)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minutes_floor() {
        let billing = BillingModel::default();
        assert_eq!(billing.minutes_elapsed(0), 0);
        assert_eq!(billing.minutes_elapsed(59), 0);
        assert_eq!(billing.minutes_elapsed(60), 1);
        assert_eq!(billing.minutes_elapsed(185), 3);
    }

    #[test]
    fn test_cost_monotonic_in_seconds() {
        let billing = BillingModel::default();
        let mut last = 0;
        for s in 0..1000 {
            let cost = billing.cost_points(billing.minutes_elapsed(s));
            assert!(cost >= last);
            assert_eq!(cost, (s / 60) * COST_PER_MINUTE_POINTS);
            last = cost;
        }
    }

    #[test]
    fn test_points_to_currency() {
        let billing = BillingModel::default();
        assert_eq!(billing.points_to_currency(1000), 0.5);
        assert_eq!(billing.points_to_currency(12_500), 6.25);
        assert_eq!(billing.points_to_currency(1), 0.0);
        assert_eq!(billing.format_currency(3000), "RM1.50");
    }

    #[test]
    fn test_can_unlock_threshold() {
        let billing = BillingModel::default();
        assert!(!billing.can_unlock(999));
        assert!(billing.can_unlock(1000));
    }

    #[test]
    fn test_quote_can_go_negative() {
        let billing = BillingModel::default();
        let quote = billing.quote(150, 1500);
        assert_eq!(quote.minutes, 2);
        assert_eq!(quote.cost_points, 2000);
        assert_eq!(quote.cost_currency, 1.0);
        assert_eq!(quote.balance_after_charge, -500);
    }

    #[test]
    fn test_wallet_debit_refuses_without_mutation() {
        let mut wallet = Wallet::new(300);
        let err = wallet.debit(500, "ride settlement").unwrap_err();
        assert_eq!(err.shortfall_points(), 200);
        assert_eq!(wallet.balance(), 300);
        assert_eq!(wallet.debit(300, "ride settlement"), Ok(0));
    }

    #[test]
    fn test_balance_currency() {
        let billing = BillingModel::default();
        assert_eq!(Wallet::default().balance_currency(&billing), 6.25);
        assert_eq!(Wallet::new(0).balance_currency(&billing), 0.0);
    }

    #[test]
    fn test_extreme_rate_saturates() {
        let billing = BillingModel::new(BillingConfig {
            cost_per_minute_points: u64::MAX / 2 + 1,
            ..BillingConfig::default()
        });
        assert_eq!(billing.cost_points(2), u64::MAX);

        let quote = billing.quote(120, u64::MAX);
        assert_eq!(quote.cost_points, u64::MAX);
        assert_eq!(quote.balance_after_charge, 0);

        let quote = billing.quote(120, 0);
        assert_eq!(quote.balance_after_charge, -i64::MAX);
    }

    #[test]
    fn test_wallet_top_up() {
        let billing = BillingModel::default();
        let mut wallet = Wallet::default();
        let msg = wallet.top_up(TOP_UP_OPTIONS[0], &billing);
        assert_eq!(wallet.balance(), 22_500);
        assert_eq!(msg, "10000 pts (RM5.00) added successfully!");
        assert_eq!(wallet.credit(0), 22_500);
    }
}
