//! Catalog of point-earning actions and penalties shown to riders.
//!
//! Only the non-designated drop-off penalty is charged by the session;
//! the rest is informational.

use serde::Serialize;

use crate::billing::{BillingModel, PENALTY_POINTS};

/// Penalty for riding out of the campus geofence.
pub const GEOFENCE_EXIT_PENALTY_POINTS: u64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RewardKind {
    Earn,
    Penalty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RewardRule {
    pub action: &'static str,
    pub kind: RewardKind,
    /// Magnitude in points; the sign comes from `kind`.
    pub points: u64,
}

impl RewardRule {
    const fn earn(action: &'static str, points: u64) -> Self {
        Self {
            action,
            kind: RewardKind::Earn,
            points,
        }
    }

    const fn penalty(action: &'static str, points: u64) -> Self {
        Self {
            action,
            kind: RewardKind::Penalty,
            points,
        }
    }

    pub fn signed_points(&self) -> i64 {
        match self.kind {
            RewardKind::Earn => self.points as i64,
            RewardKind::Penalty => -(self.points as i64),
        }
    }

    /// "+500 pts (≈ RM0.25)" style label.
    pub fn label(&self, billing: &BillingModel) -> String {
        format!(
            "{:+} pts (≈ {})",
            self.signed_points(),
            billing.format_currency(self.points)
        )
    }
}

pub const EARNING_RULES: &[RewardRule] = &[
    RewardRule::earn("Recharge e-bike at a station", 500),
    RewardRule::earn("Park in a perfect parking spot", 250),
    RewardRule::earn("Ride completion bonus", 100),
];

pub const PENALTY_RULES: &[RewardRule] = &[
    RewardRule::penalty("Non-designated parking/drop-off", PENALTY_POINTS),
    RewardRule::penalty("Leaving UiTM Geo-fence (Severe)", GEOFENCE_EXIT_PENALTY_POINTS),
];

/// Earnings first, then penalties.
pub fn catalog() -> impl Iterator<Item = &'static RewardRule> {
    EARNING_RULES.iter().chain(PENALTY_RULES.iter())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        let billing = BillingModel::default();
        assert_eq!(EARNING_RULES[0].label(&billing), "+500 pts (≈ RM0.25)");
        assert_eq!(PENALTY_RULES[1].label(&billing), "-5000 pts (≈ RM2.50)");
    }

    #[test]
    fn test_drop_off_penalty_matches_billing() {
        let billing = BillingModel::default();
        let rule = catalog()
            .find(|rule| rule.action.starts_with("Non-designated"))
            .expect("drop-off penalty listed");
        assert_eq!(rule.points, billing.config.penalty_points);
        assert_eq!(rule.signed_points(), -200);
    }

    #[test]
    fn test_catalog_order() {
        let kinds: Vec<RewardKind> = catalog().map(|rule| rule.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RewardKind::Earn,
                RewardKind::Earn,
                RewardKind::Earn,
                RewardKind::Penalty,
                RewardKind::Penalty
            ]
        );
    }
}
