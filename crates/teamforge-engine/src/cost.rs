//! Team compatibility cost model.
//!
//! ## Formula
//!
//! For a team of n ≥ 2 people, with every term on a 0-1 scale:
//!
//! ```text
//! cost = wC·Var*(C) + wA·Var*(A) + wE·Var*(E) + wO·Var*(O)
//!      + wN·Mean*(N) + λ·max(0, τ − Mean*(A))
//! ```
//!
//! | Term | Meaning |
//! |------|---------|
//! | Var*(C), Var*(A) | Misaligned work ethic and values, weighted hardest |
//! | Var*(E), Var*(O) | Working-style spread, tolerated more |
//! | Mean*(N) | Average stress level of the team |
//! | λ·max(0, τ − Mean*(A)) | Uniformly low-empathy ("toxic") team |
//!
//! `Var*` is the population variance divided by the largest variance the
//! trait scale allows; `Mean*` is the mean mapped onto [0, 1].

use teamforge_core::{Person, PersonalityTrait, Result, TraitScale, TraitVector};

use crate::config::CostWeights;

/// Arithmetic mean, 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance, 0 for fewer than two values
pub fn population_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mu = mean(values);
    values.iter().map(|x| (x - mu).powi(2)).sum::<f64>() / values.len() as f64
}

/// Normalized dispersion of one trait across a team, in [0, 1]
pub fn dispersion(team: &[TraitVector], trait_type: PersonalityTrait, scale: &TraitScale) -> f64 {
    let values = raw_values(team, trait_type);
    (population_variance(&values) / scale.max_variance()).clamp(0.0, 1.0)
}

/// Team mean of one trait mapped onto [0, 1]
pub fn normalized_mean(team: &[TraitVector], trait_type: PersonalityTrait, scale: &TraitScale) -> f64 {
    scale.normalize(mean(&raw_values(team, trait_type)))
}

fn raw_values(team: &[TraitVector], trait_type: PersonalityTrait) -> Vec<f64> {
    team.iter().map(|v| f64::from(v.get(trait_type))).collect()
}

/// Per-term breakdown of a team cost
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct CostBreakdown {
    pub conscientiousness_dispersion: f64,
    pub agreeableness_dispersion: f64,
    pub extraversion_dispersion: f64,
    pub openness_dispersion: f64,
    pub stress: f64,
    pub toxic_penalty: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.conscientiousness_dispersion
            + self.agreeableness_dispersion
            + self.extraversion_dispersion
            + self.openness_dispersion
            + self.stress
            + self.toxic_penalty
    }
}

/// Pure team → cost function
#[derive(Debug, Clone, Default)]
pub struct CompatibilityCostModel {
    weights: CostWeights,
    scale: TraitScale,
}

impl CompatibilityCostModel {
    pub fn new(weights: CostWeights, scale: TraitScale) -> Result<Self> {
        weights.validate()?;
        scale.validate()?;
        Ok(Self { weights, scale })
    }

    /// Weighted terms of the cost. All zero for teams smaller than two.
    pub fn breakdown(&self, team: &[TraitVector]) -> CostBreakdown {
        if team.len() < 2 {
            return CostBreakdown::default();
        }

        let w = &self.weights;
        let s = &self.scale;
        let mean_agreeableness = normalized_mean(team, PersonalityTrait::Agreeableness, s);

        CostBreakdown {
            conscientiousness_dispersion: w.conscientiousness
                * dispersion(team, PersonalityTrait::Conscientiousness, s),
            agreeableness_dispersion: w.agreeableness
                * dispersion(team, PersonalityTrait::Agreeableness, s),
            extraversion_dispersion: w.extraversion
                * dispersion(team, PersonalityTrait::Extraversion, s),
            openness_dispersion: w.openness * dispersion(team, PersonalityTrait::Openness, s),
            stress: w.neuroticism * normalized_mean(team, PersonalityTrait::Neuroticism, s),
            toxic_penalty: w.toxic_penalty * (w.toxic_threshold - mean_agreeableness).max(0.0),
        }
    }

    /// Cost of a team of complete trait vectors
    pub fn cost(&self, team: &[TraitVector]) -> f64 {
        self.breakdown(team).total()
    }

    /// Cost of a team of people.
    ///
    /// Any member without trait data makes the whole evaluation fail with
    /// `IncompleteData`, any score outside the model's scale with
    /// `InvalidTrait`; callers treat either as an infinite cost.
    pub fn team_cost(&self, team: &[&Person]) -> Result<f64> {
        let vectors = team
            .iter()
            .map(|p| p.checked_traits(&self.scale))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.cost(&vectors))
    }

    /// Like [`team_cost`](Self::team_cost) but maps unusable data to `f64::INFINITY`
    pub fn team_cost_or_infinite(&self, team: &[&Person]) -> f64 {
        self.team_cost(team).unwrap_or(f64::INFINITY)
    }

    pub fn weights(&self) -> &CostWeights {
        &self.weights
    }

    pub fn scale(&self) -> &TraitScale {
        &self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use teamforge_core::Error;

    fn tv(o: u8, c: u8, e: u8, a: u8, n: u8) -> TraitVector {
        TraitVector::new(o, c, e, a, n).unwrap()
    }

    #[test]
    fn test_harmonious_pair() {
        let model = CompatibilityCostModel::default();
        let cost = model.cost(&[tv(30, 50, 30, 50, 10), tv(30, 50, 30, 50, 10)]);
        assert!(cost < 0.2, "cost was {cost}");
        assert_eq!(cost, 0.0);
    }

    #[test]
    fn test_toxic_pair() {
        let model = CompatibilityCostModel::default();
        let team = [tv(30, 10, 30, 10, 50), tv(30, 10, 30, 10, 50)];
        let breakdown = model.breakdown(&team);

        assert_eq!(breakdown.stress, 1.0);
        assert!((breakdown.toxic_penalty - 1.25).abs() < 1e-12);
        assert!(model.cost(&team) > 1.0);
    }

    #[test]
    fn test_identical_agreeable_team_costs_only_stress() {
        let model = CompatibilityCostModel::default();
        let team = [tv(22, 40, 35, 45, 26); 4];
        let breakdown = model.breakdown(&team);

        assert_eq!(breakdown.conscientiousness_dispersion, 0.0);
        assert_eq!(breakdown.agreeableness_dispersion, 0.0);
        assert_eq!(breakdown.extraversion_dispersion, 0.0);
        assert_eq!(breakdown.openness_dispersion, 0.0);
        assert_eq!(breakdown.toxic_penalty, 0.0);
        assert!((model.cost(&team) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_extreme_spread_saturates_dispersion() {
        let model = CompatibilityCostModel::default();
        let team = [tv(10, 10, 10, 10, 10), tv(50, 50, 50, 50, 50)];
        let breakdown = model.breakdown(&team);

        assert_eq!(breakdown.conscientiousness_dispersion, 1.5);
        assert_eq!(breakdown.openness_dispersion, 1.0);
        assert!((breakdown.stress - 0.5).abs() < 1e-12);
        assert!((breakdown.toxic_penalty - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_small_teams_cost_nothing() {
        let model = CompatibilityCostModel::default();
        assert_eq!(model.cost(&[]), 0.0);
        assert_eq!(model.cost(&[tv(10, 10, 50, 10, 50)]), 0.0);
    }

    #[test]
    fn test_incomplete_data_signalled() {
        let model = CompatibilityCostModel::default();
        let assessed = Person::new(tv(30, 30, 30, 30, 30));
        let missing = Person::unassessed();

        let err = model.team_cost(&[&assessed, &missing]).unwrap_err();
        assert_eq!(err, Error::IncompleteData { person: missing.id });
        assert!(model.team_cost_or_infinite(&[&assessed, &missing]).is_infinite());
    }

    #[test]
    fn test_out_of_range_traits_rejected() {
        let model = CompatibilityCostModel::default();
        let neutral = Person::new(TraitVector::default());
        let mut zeroed = Person::new(TraitVector::default());
        zeroed.traits = Some(TraitVector {
            openness: 0,
            conscientiousness: 0,
            extraversion: 0,
            agreeableness: 0,
            neuroticism: 0,
        });

        let err = model.team_cost(&[&neutral, &zeroed]).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidTrait {
                trait_name: "Openness",
                value: 0,
                min: 10,
                max: 50,
            }
        );
        assert!(model.team_cost_or_infinite(&[&neutral, &zeroed]).is_infinite());

        let wide = CompatibilityCostModel::new(
            CostWeights::default(),
            TraitScale::new(0, 50).unwrap(),
        )
        .unwrap();
        assert!(wide.team_cost(&[&neutral, &zeroed]).is_ok());
    }

    #[test]
    fn test_constructor_validates() {
        let negative = CostWeights {
            neuroticism: -0.5,
            ..CostWeights::default()
        };
        assert!(CompatibilityCostModel::new(negative, TraitScale::default()).is_err());
        assert!(matches!(
            CompatibilityCostModel::new(CostWeights::default(), TraitScale { min: 40, max: 20 }),
            Err(Error::InvalidScale { min: 40, max: 20 })
        ));
    }

    fn trait_vector() -> impl Strategy<Value = TraitVector> {
        prop::array::uniform5(10u8..=50).prop_map(|[o, c, e, a, n]| TraitVector {
            openness: o,
            conscientiousness: c,
            extraversion: e,
            agreeableness: a,
            neuroticism: n,
        })
    }

    proptest! {
        #[test]
        fn prop_cost_permutation_invariant(
            team in prop::collection::vec(trait_vector(), 2..8),
            rotation in 0usize..8,
        ) {
            let model = CompatibilityCostModel::default();
            let mut rotated = team.clone();
            rotated.rotate_left(rotation % team.len());
            let mut reversed = team.clone();
            reversed.reverse();

            let base = model.cost(&team);
            prop_assert!((base - model.cost(&rotated)).abs() < 1e-9);
            prop_assert!((base - model.cost(&reversed)).abs() < 1e-9);
        }

        #[test]
        fn prop_cost_non_negative_and_bounded(team in prop::collection::vec(trait_vector(), 0..8)) {
            let model = CompatibilityCostModel::default();
            let cost = model.cost(&team);
            prop_assert!(cost >= 0.0);
            prop_assert!(cost <= model.weights().theoretical_max_cost() + 1e-9);
        }
    }
}
