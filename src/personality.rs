//! Personality traits and role fit
//!
//! Trait vectors come from an injectable [`TraitSimulator`]. Per-video
//! vectors are averaged into one candidate vector, which is then projected
//! through each role's linear weight set.

use crate::config::RoleWeight;
use crate::types::{round_to, RoleScoreSet, Trait, TraitVector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use uuid::Uuid;

/// Source of a trait vector for one recording
pub trait TraitSimulator: Send + Sync {
    fn simulate(&self, video_id: &str) -> TraitVector;
}

/// Sampling range per trait for the seeded simulator
const TRAIT_RANGES: [(Trait, RangeInclusive<f64>); 5] = [
    (Trait::Openness, 0.5..=1.0),
    (Trait::Conscientiousness, 0.5..=1.0),
    (Trait::Extraversion, 0.3..=0.9),
    (Trait::Agreeableness, 0.4..=1.0),
    (Trait::Neuroticism, 0.1..=0.5),
];

/// Pseudo-random simulator seeded from the video identity.
///
/// The seed is a name-based UUID of the video id, so the same video always
/// yields the same vector.
#[derive(Debug, Clone, Default)]
pub struct SeededTraitSimulator;

impl SeededTraitSimulator {
    fn seed_for(video_id: &str) -> u64 {
        Uuid::new_v5(&Uuid::NAMESPACE_URL, video_id.as_bytes()).as_u128() as u64
    }
}

impl TraitSimulator for SeededTraitSimulator {
    fn simulate(&self, video_id: &str) -> TraitVector {
        let mut rng = StdRng::seed_from_u64(Self::seed_for(video_id));
        let mut traits = TraitVector::new(0.0, 0.0, 0.0, 0.0, 0.0);
        for (t, range) in TRAIT_RANGES.iter() {
            traits.set(*t, round_to(rng.gen_range(range.clone()), 2));
        }
        traits
    }
}

/// Simulator that returns the same literal vector for every video
#[derive(Debug, Clone)]
pub struct FixedTraitSimulator {
    traits: TraitVector,
}

impl FixedTraitSimulator {
    pub fn new(traits: TraitVector) -> Self {
        Self {
            traits: traits.clamped(),
        }
    }
}

impl TraitSimulator for FixedTraitSimulator {
    fn simulate(&self, _video_id: &str) -> TraitVector {
        self.traits
    }
}

/// Per-trait arithmetic mean, rounded to two decimals; `None` for no input
pub fn average_traits(vectors: &[TraitVector]) -> Option<TraitVector> {
    if vectors.is_empty() {
        return None;
    }
    let n = vectors.len() as f64;
    let mut avg = TraitVector::new(0.0, 0.0, 0.0, 0.0, 0.0);
    for t in Trait::ALL {
        let sum: f64 = vectors.iter().map(|v| v.get(t)).sum();
        avg.set(t, round_to(sum / n, 2));
    }
    Some(avg.clamped())
}

/// Projects a trait vector onto role-fit percentages
#[derive(Debug, Clone)]
pub struct RoleScorer {
    roles: BTreeMap<String, Vec<RoleWeight>>,
}

impl RoleScorer {
    pub fn new(roles: BTreeMap<String, Vec<RoleWeight>>) -> Self {
        Self { roles }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains_key(role)
    }

    /// Weighted sum for one role in [0, 1]
    fn fit(weights: &[RoleWeight], traits: &TraitVector) -> f64 {
        weights
            .iter()
            .map(|w| {
                let v = traits.get(w.trait_name);
                w.weight * if w.inverted { 1.0 - v } else { v }
            })
            .sum()
    }

    /// Integer fit percentage per configured role
    pub fn score(&self, traits: &TraitVector) -> RoleScoreSet {
        self.roles
            .iter()
            .map(|(role, weights)| {
                let pct = (Self::fit(weights, traits) * 100.0)
                    .round_ties_even()
                    .clamp(0.0, 100.0);
                (role.clone(), pct as u32)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_roles;

    fn ideal() -> TraitVector {
        TraitVector::new(0.9, 0.95, 0.5, 0.95, 0.1)
    }

    #[test]
    fn test_seeded_simulator_is_deterministic() {
        let sim = SeededTraitSimulator;
        assert_eq!(sim.simulate("video-a.mp4"), sim.simulate("video-a.mp4"));
        assert_ne!(sim.simulate("video-a.mp4"), sim.simulate("video-b.mp4"));
    }

    #[test]
    fn test_seeded_simulator_respects_ranges() {
        let sim = SeededTraitSimulator;
        for i in 0..50 {
            let traits = sim.simulate(&format!("video-{i}"));
            for (t, range) in TRAIT_RANGES.iter() {
                let v = traits.get(*t);
                assert!(range.contains(&v), "{} = {v} out of range", t.as_str());
            }
        }
    }

    #[test]
    fn test_average_traits() {
        let a = TraitVector::new(0.6, 0.7, 0.4, 0.5, 0.2);
        let b = TraitVector::new(0.8, 0.9, 0.6, 0.7, 0.3);
        let avg = average_traits(&[a, b]).unwrap();
        assert_eq!(avg.openness, 0.7);
        assert_eq!(avg.conscientiousness, 0.8);
        assert_eq!(avg.neuroticism, 0.25);
        assert!(average_traits(&[]).is_none());
    }

    #[test]
    fn test_role_scores_for_ideal_profile() {
        let scorer = RoleScorer::new(default_roles());
        let scores = scorer.score(&ideal());
        // 0.4*0.95 + 0.3*0.9 + 0.3*0.9 = 0.92
        assert_eq!(scores["software_engineer"], 92);
        // 0.3*0.95 + 0.2*0.95 + 0.2*0.9 + 0.3*0.9 = 0.925
        assert_eq!(scores["associate_software_engineer"], 92);
        // 0.4*0.9 + 0.2*0.5 + 0.1*0.95 + 0.3*0.9 = 0.825
        assert_eq!(scores["it_intern"], 82);
    }

    #[test]
    fn test_role_scores_stay_in_range() {
        let scorer = RoleScorer::new(default_roles());
        for traits in [
            TraitVector::new(0.0, 0.0, 0.0, 0.0, 1.0),
            TraitVector::new(1.0, 1.0, 1.0, 1.0, 0.0),
        ] {
            for score in scorer.score(&traits).values() {
                assert!(*score <= 100);
            }
        }
        let best = scorer.score(&TraitVector::new(1.0, 1.0, 1.0, 1.0, 0.0));
        assert!(best.values().all(|s| *s == 100));
    }

    #[test]
    fn test_fixed_simulator() {
        let sim = FixedTraitSimulator::new(ideal());
        assert_eq!(sim.simulate("anything"), ideal());
    }
}
