//! Path analysis tests
//!
//! Profile order, cost model consistency and reproducibility with a
//! seeded or fixed random source.

mod fixtures;

use std::ops::Range;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use ebike_ride::error::RideError;
use ebike_ride::paths::{PathAnalyzer, ProfileKind};
use ebike_ride::traits::RouteSampler;
use ebike_ride::zones::ZoneRegistry;

use fixtures::{ZONE_A, ZONE_B, ZONE_G};

/// Returns a fixed jitter and the given scores in draw order.
struct FixedSampler {
    jitter: f64,
    scores: Vec<u32>,
}

impl RouteSampler for FixedSampler {
    fn jitter(&mut self) -> f64 {
        self.jitter
    }

    fn safety_score(&mut self, range: Range<u32>) -> u32 {
        let score = self.scores.remove(0);
        assert!(range.contains(&score), "{} not in {:?}", score, range);
        score
    }
}

#[test]
fn test_profiles_in_fixed_order() {
    let registry = ZoneRegistry::campus();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let profiles = PathAnalyzer::default()
        .analyze_by_name(&registry, ZONE_A, ZONE_G, &mut rng)
        .unwrap();

    let kinds: Vec<ProfileKind> = profiles.iter().map(|p| p.profile).collect();
    assert_eq!(
        kinds,
        vec![ProfileKind::Safest, ProfileKind::Fastest, ProfileKind::Cheapest]
    );
}

#[test]
fn test_exact_durations_with_fixed_sampler() {
    let registry = ZoneRegistry::campus();
    let mut sampler = FixedSampler {
        jitter: 0.75,
        scores: vec![92, 85],
    };
    let profiles = PathAnalyzer::default()
        .analyze_by_name(&registry, ZONE_A, ZONE_G, &mut sampler)
        .unwrap();

    // ~1.024 km * 50 * 0.75 = 38 base minutes
    assert_eq!(profiles[0].duration_minutes, 49);
    assert_eq!(profiles[0].safety_score_percent, 92);
    assert_eq!(profiles[0].cost_points, 49_000);
    assert_eq!(profiles[0].cost_currency, 24.5);

    assert_eq!(profiles[1].duration_minutes, 30);
    assert_eq!(profiles[1].safety_score_percent, 85);
    assert_eq!(profiles[1].cost_points, 30_000);
    assert_eq!(profiles[1].cost_currency, 15.0);
}

#[test]
fn test_cheapest_mirrors_fastest() {
    let registry = ZoneRegistry::campus();
    let analyzer = PathAnalyzer::default();
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    for _ in 0..50 {
        let profiles = analyzer
            .analyze_by_name(&registry, ZONE_B, ZONE_G, &mut rng)
            .unwrap();
        let (fastest, cheapest) = (&profiles[1], &profiles[2]);
        assert_eq!(cheapest.duration_minutes, fastest.duration_minutes);
        assert_eq!(cheapest.safety_score_percent, fastest.safety_score_percent);
        assert_eq!(cheapest.cost_points, fastest.cost_points);
        assert_eq!(cheapest.cost_currency, fastest.cost_currency);
        assert_ne!(cheapest.description, fastest.description);
    }
}

#[test]
fn test_scores_and_costs_within_model() {
    let registry = ZoneRegistry::campus();
    let analyzer = PathAnalyzer::default();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    for start in registry.all() {
        for end in registry.all() {
            let profiles = analyzer.analyze(start, end, &mut rng);
            if start == end {
                assert!(profiles.is_empty());
                continue;
            }
            assert_eq!(profiles.len(), 3);
            assert!((90..95).contains(&profiles[0].safety_score_percent));
            assert!((80..88).contains(&profiles[1].safety_score_percent));
            for profile in &profiles {
                assert!(profile.duration_minutes > 0);
                assert_eq!(profile.cost_points, profile.duration_minutes * 1000);
            }
            assert!(profiles[0].duration_minutes >= profiles[1].duration_minutes);
        }
    }
}

#[test]
fn test_same_seed_same_analysis() {
    let registry = ZoneRegistry::campus();
    let analyzer = PathAnalyzer::default();
    let mut first = ChaCha8Rng::seed_from_u64(7);
    let mut second = ChaCha8Rng::seed_from_u64(7);

    let a = analyzer.analyze_by_name(&registry, ZONE_A, ZONE_B, &mut first).unwrap();
    let b = analyzer.analyze_by_name(&registry, ZONE_A, ZONE_B, &mut second).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_by_name_errors() {
    let registry = ZoneRegistry::campus();
    let analyzer = PathAnalyzer::default();
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    assert_eq!(
        analyzer.analyze_by_name(&registry, ZONE_A, ZONE_A, &mut rng),
        Err(RideError::DegenerateRoute(ZONE_A.to_string()))
    );
    assert_eq!(
        analyzer.analyze_by_name(&registry, ZONE_A, "Library", &mut rng),
        Err(RideError::ZoneNotFound("Library".to_string()))
    );
}
