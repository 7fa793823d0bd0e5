//! Role-structured Monte Carlo team search with elitist mutation.
//!
//! Each role draws its members from its own eligibility pool and nobody
//! fills two slots. Every iteration either mutates the best team found so
//! far (swap one slot's occupant for an unused eligible candidate) or
//! resamples every role from scratch, then keeps the result if it is
//! cheaper. The search stops at the iteration budget or as soon as the
//! best cost reaches the success threshold.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use teamforge_core::{
    CostEvaluation, Error, Person, PersonId, Result, RoleRequirement, Team, TeamMember,
    TraitScale, TraitVector,
};

use crate::config::SearchConfig;
use crate::cost::CompatibilityCostModel;
use crate::score::ScoreTransform;

/// Result of a randomized search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledTeam {
    /// Members in role order; empty when no complete team was ever assembled
    pub team: Team,
    pub evaluation: CostEvaluation,
    /// Iterations actually run
    pub iterations: usize,
}

impl AssembledTeam {
    fn empty(iterations: usize) -> Self {
        Self {
            team: Team::new(),
            evaluation: CostEvaluation::empty(),
            iterations,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.team.is_empty()
    }
}

/// Eligible people for one role
struct RolePool<'a> {
    role: &'a RoleRequirement,
    candidates: Vec<(&'a Person, TraitVector)>,
}

/// One occupied slot: index into the role pools plus the occupant
type Slot<'a> = (usize, &'a Person, TraitVector);

#[derive(Debug, Clone, Default)]
pub struct RandomizedTeamSearch {
    model: CompatibilityCostModel,
    transform: ScoreTransform,
    config: SearchConfig,
}

impl RandomizedTeamSearch {
    pub fn new(
        model: CompatibilityCostModel,
        transform: ScoreTransform,
        config: SearchConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            model,
            transform,
            config,
        })
    }

    /// Assemble the cheapest team found within the iteration budget.
    ///
    /// Fails with `InsufficientCandidates` before searching if any role's
    /// pool is smaller than its headcount, and with `InvalidTrait` if an
    /// eligible person's scores fall outside the scale. An exhausted
    /// budget is not an error: it yields an empty, zero-score result.
    pub fn search<R: Rng + ?Sized>(
        &self,
        people: &[Person],
        roles: &[RoleRequirement],
        rng: &mut R,
    ) -> Result<AssembledTeam> {
        self.search_observed(people, roles, rng, |_| {})
    }

    /// [`search`](Self::search), reporting the cost of every sampled team
    pub fn search_observed<R, F>(
        &self,
        people: &[Person],
        roles: &[RoleRequirement],
        rng: &mut R,
        mut on_sample: F,
    ) -> Result<AssembledTeam>
    where
        R: Rng + ?Sized,
        F: FnMut(f64),
    {
        let pools = build_pools(people, roles, self.model.scale())?;

        if roles.iter().all(|r| r.headcount == 0) {
            return Ok(AssembledTeam::empty(0));
        }

        tracing::info!(
            roles = roles.len(),
            iterations = self.config.iterations,
            "Starting randomized team search"
        );

        let mut best: Option<(Vec<Slot<'_>>, f64)> = None;
        let mut iterations = 0;

        for i in 0..self.config.iterations {
            iterations = i + 1;

            let mutated = match &best {
                Some((team, _)) if rng.gen_bool(self.config.mutation_probability) => {
                    mutate(team, &pools, rng)
                }
                _ => None,
            };

            let Some(candidate) = mutated.or_else(|| resample(&pools, rng)) else {
                continue;
            };

            let vectors: Vec<TraitVector> = candidate.iter().map(|(_, _, t)| *t).collect();
            let cost = self.model.cost(&vectors);
            on_sample(cost);

            if best.as_ref().map_or(true, |(_, best_cost)| cost < *best_cost) {
                tracing::debug!(iteration = i, cost, "New best team");
                best = Some((candidate, cost));
            }

            if let Some((_, best_cost)) = &best {
                if *best_cost <= self.config.success_threshold {
                    tracing::debug!(iteration = i, cost = *best_cost, "Success threshold reached");
                    break;
                }
            }
        }

        let Some((slots, cost)) = best else {
            tracing::info!(iterations, "No feasible team assembled");
            return Ok(AssembledTeam::empty(iterations));
        };

        let members = slots
            .iter()
            .map(|(role_idx, person, _)| TeamMember {
                person: person.id,
                role: pools[*role_idx].role.id.clone(),
            })
            .collect();
        let team = Team::from_members(members)?;
        let evaluation = self.transform.evaluate(cost);

        tracing::info!(
            iterations,
            members = team.len(),
            cost = evaluation.cost,
            score = evaluation.score,
            "Randomized team search finished"
        );

        Ok(AssembledTeam {
            team,
            evaluation,
            iterations,
        })
    }
}

/// Eligible people per role, each listed once
fn build_pools<'a>(
    people: &'a [Person],
    roles: &'a [RoleRequirement],
    scale: &TraitScale,
) -> Result<Vec<RolePool<'a>>> {
    roles
        .iter()
        .map(|role| {
            let mut seen = HashSet::new();
            let mut candidates: Vec<(&Person, TraitVector)> = Vec::new();
            for person in people {
                if !person.available
                    || !person.has_complete_traits()
                    || !role.admits(person)
                    || !seen.insert(person.id)
                {
                    continue;
                }
                candidates.push((person, person.checked_traits(scale)?));
            }

            if candidates.len() < role.headcount {
                tracing::warn!(
                    role = %role.id,
                    required = role.headcount,
                    available = candidates.len(),
                    "Role pool too small"
                );
                return Err(Error::InsufficientCandidates {
                    role: role.id.clone(),
                    required: role.headcount,
                    available: candidates.len(),
                });
            }

            Ok(RolePool { role, candidates })
        })
        .collect()
}

/// Clone `team` and swap one random slot's occupant for an unused
/// eligible candidate. `None` when that slot has no replacement.
fn mutate<'a, R: Rng + ?Sized>(
    team: &[Slot<'a>],
    pools: &[RolePool<'a>],
    rng: &mut R,
) -> Option<Vec<Slot<'a>>> {
    if team.is_empty() {
        return None;
    }

    let slot = rng.gen_range(0..team.len());
    let role_idx = team[slot].0;
    let used: HashSet<PersonId> = team.iter().map(|(_, p, _)| p.id).collect();

    let replacements: Vec<&(&Person, TraitVector)> = pools[role_idx]
        .candidates
        .iter()
        .filter(|(p, _)| !used.contains(&p.id))
        .collect();
    let (person, traits) = **replacements.choose(rng)?;

    let mut mutated = team.to_vec();
    mutated[slot] = (role_idx, person, traits);
    Some(mutated)
}

/// Draw every role independently from what is left of its pool.
/// `None` when some role runs out of unused candidates.
fn resample<'a, R: Rng + ?Sized>(pools: &[RolePool<'a>], rng: &mut R) -> Option<Vec<Slot<'a>>> {
    let mut used = HashSet::new();
    let mut team = Vec::new();

    for (role_idx, pool) in pools.iter().enumerate() {
        let remaining: Vec<&(&Person, TraitVector)> = pool
            .candidates
            .iter()
            .filter(|(p, _)| !used.contains(&p.id))
            .collect();

        if remaining.len() < pool.role.headcount {
            return None;
        }

        for (person, traits) in remaining
            .choose_multiple(rng, pool.role.headcount)
            .map(|entry| **entry)
        {
            used.insert(person.id);
            team.push((role_idx, person, traits));
        }
    }

    (!team.is_empty()).then_some(team)
}
