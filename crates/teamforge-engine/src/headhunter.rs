//! Greedy leader-first team builder ("headhunter").
//!
//! Starting from a fixed leader, each round adds whichever remaining
//! candidate yields the lowest team cost once added. A [`TeamBias`] may
//! tilt the *comparison* towards a team flavour (energetic, inventive,
//! steady); the reported cost is always the unbiased one.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use teamforge_core::{
    CostEvaluation, Error, Person, PersonalityTrait, Result, RoleId, Team, TeamMember, TraitScale,
    TraitVector,
};

use crate::config::HeadhunterConfig;
use crate::cost::{normalized_mean, CompatibilityCostModel};
use crate::score::ScoreTransform;

/// Role the leader occupies in built teams
pub const LEADER_ROLE: &str = "leader";
/// Role every recruited member occupies in built teams
pub const MEMBER_ROLE: &str = "member";

/// Heuristic preference applied while comparing prospective teams.
///
/// `affinity` returns how strongly a prospective team matches the
/// preference, in [0, 1]; the builder subtracts `bias_weight × affinity`
/// from the comparison cost.
pub trait TeamBias: Send + Sync {
    fn affinity(&self, team: &[TraitVector], scale: &TraitScale) -> f64;

    /// Human-readable summary for logs and reports
    fn describe(&self) -> &str {
        "Custom bias"
    }
}

/// Built-in team-building strategies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Pure cost minimisation
    #[default]
    Balanced,
    /// Favours high extraversion
    Aggressive,
    /// Favours high openness
    Creative,
    /// Favours high agreeableness and conscientiousness
    Supportive,
}

impl Strategy {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "balanced" => Some(Strategy::Balanced),
            "aggressive" => Some(Strategy::Aggressive),
            "creative" => Some(Strategy::Creative),
            "supportive" => Some(Strategy::Supportive),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Strategy::Balanced => "Balanced: lowest friction across every trait",
            Strategy::Aggressive => "Aggressive: outgoing members who push execution",
            Strategy::Creative => "Creative: open members who find new approaches",
            Strategy::Supportive => "Supportive: cooperative, dependable members",
        }
    }
}

impl TeamBias for Strategy {
    fn affinity(&self, team: &[TraitVector], scale: &TraitScale) -> f64 {
        match self {
            Strategy::Balanced => 0.0,
            Strategy::Aggressive => normalized_mean(team, PersonalityTrait::Extraversion, scale),
            Strategy::Creative => normalized_mean(team, PersonalityTrait::Openness, scale),
            Strategy::Supportive => {
                (normalized_mean(team, PersonalityTrait::Agreeableness, scale)
                    + normalized_mean(team, PersonalityTrait::Conscientiousness, scale))
                    / 2.0
            }
        }
    }

    fn describe(&self) -> &str {
        self.description()
    }
}

/// Team produced by the greedy builder. The leader is always member 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuiltTeam {
    pub team: Team,
    pub evaluation: CostEvaluation,
}

#[derive(Debug, Clone)]
pub struct GreedyIncrementalBuilder {
    model: CompatibilityCostModel,
    transform: ScoreTransform,
    bias_weight: f64,
}

impl Default for GreedyIncrementalBuilder {
    fn default() -> Self {
        Self {
            model: CompatibilityCostModel::default(),
            transform: ScoreTransform::default(),
            bias_weight: HeadhunterConfig::default().bias_weight,
        }
    }
}

impl GreedyIncrementalBuilder {
    pub fn new(
        model: CompatibilityCostModel,
        transform: ScoreTransform,
        config: &HeadhunterConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            model,
            transform,
            bias_weight: config.bias_weight,
        })
    }

    /// Add `count` members to `leader`, one best candidate per round.
    ///
    /// Eligible candidates are available, assessed and not the leader;
    /// repeated entries count once. Fails before any work when fewer than
    /// `count` are eligible, or when anyone's traits fall outside the scale.
    pub fn build(
        &self,
        leader: &Person,
        candidates: &[Person],
        count: usize,
        bias: &dyn TeamBias,
    ) -> Result<BuiltTeam> {
        let scale = self.model.scale();
        let leader_traits = leader.checked_traits(scale)?;

        let mut seen = HashSet::from([leader.id]);
        let mut pool: Vec<(&Person, TraitVector)> = Vec::new();
        for candidate in candidates {
            if !candidate.available || !candidate.has_complete_traits() || !seen.insert(candidate.id) {
                continue;
            }
            pool.push((candidate, candidate.checked_traits(scale)?));
        }

        if pool.len() < count {
            tracing::warn!(
                required = count,
                available = pool.len(),
                "Not enough eligible candidates for greedy build"
            );
            return Err(Error::InsufficientCandidates {
                role: RoleId::from(MEMBER_ROLE),
                required: count,
                available: pool.len(),
            });
        }

        let mut team = Team::new();
        team.push(TeamMember {
            person: leader.id,
            role: RoleId::from(LEADER_ROLE),
        })?;
        let mut vectors = vec![leader_traits];

        for round in 0..count {
            let mut best: Option<(usize, f64, f64)> = None;

            for (idx, (_, traits)) in pool.iter().enumerate() {
                vectors.push(*traits);
                let true_cost = self.model.cost(&vectors);
                let biased = true_cost - self.bias_weight * bias.affinity(&vectors, scale);
                vectors.pop();

                let better = match best {
                    None => true,
                    Some((_, best_biased, best_true)) => biased
                        .total_cmp(&best_biased)
                        .then(true_cost.total_cmp(&best_true))
                        .is_lt(),
                };
                if better {
                    best = Some((idx, biased, true_cost));
                }
            }

            let Some((idx, _, true_cost)) = best else {
                break;
            };
            let (person, traits) = pool.remove(idx);
            team.push(TeamMember {
                person: person.id,
                role: RoleId::from(MEMBER_ROLE),
            })?;
            vectors.push(traits);

            tracing::debug!(round, person = %person.id, cost = true_cost, "Recruited member");
        }

        let evaluation = self.transform.evaluate(self.model.cost(&vectors));
        tracing::info!(
            strategy = bias.describe(),
            members = team.len(),
            cost = evaluation.cost,
            score = evaluation.score,
            "Greedy team built"
        );

        Ok(BuiltTeam { team, evaluation })
    }
}
