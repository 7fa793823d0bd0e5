//! # Teamforge-Engine
//!
//! Personality-aware team composition:
//!
//! - [`CompatibilityCostModel`]: pure team → cost function over OCEAN traits
//! - [`ScoreTransform`]: cost → 0-100 score → rating
//! - [`IndividualMatchScorer`]: one person against one role
//! - [`GapFillingRanker`]: candidates ranked by the skill gaps they close
//! - [`GreedyIncrementalBuilder`]: leader-first greedy team building
//! - [`RandomizedTeamSearch`]: multi-role Monte Carlo search
//! - [`TeamAnalyzer`]: coverage and harmony reports
//!
//! [`TeamEngine`] wires all of them from one [`EngineConfig`].

pub mod analysis;
pub mod config;
pub mod cost;
pub mod gap;
pub mod headhunter;
pub mod individual;
pub mod score;
pub mod search;

pub use analysis::{CoverageStatus, SkillCoverage, TeamAnalyzer, TeamReport, TraitProfile};
pub use crate::config::*;
pub use cost::{CompatibilityCostModel, CostBreakdown};
pub use gap::{CandidateRanking, GapFillingRanker, SkillGap, SkillMatch, SkillMatchKind};
pub use headhunter::{BuiltTeam, GreedyIncrementalBuilder, Strategy, TeamBias};
pub use individual::{IndividualMatchScorer, MatchLevel, MatchReport, SkillShortfall};
pub use score::ScoreTransform;
pub use search::{AssembledTeam, RandomizedTeamSearch};

use rand::Rng;
use teamforge_core::{CostEvaluation, Person, PersonId, Result, RoleRequirement, SkillRequirement};

/// All engine components configured from a single [`EngineConfig`]
#[derive(Debug, Clone)]
pub struct TeamEngine {
    config: EngineConfig,
    model: CompatibilityCostModel,
    transform: ScoreTransform,
    scorer: IndividualMatchScorer,
    ranker: GapFillingRanker,
    builder: GreedyIncrementalBuilder,
    search: RandomizedTeamSearch,
    analyzer: TeamAnalyzer,
}

impl Default for TeamEngine {
    fn default() -> Self {
        let model = CompatibilityCostModel::default();
        let transform = ScoreTransform::default();
        Self {
            config: EngineConfig::default(),
            scorer: IndividualMatchScorer::default(),
            ranker: GapFillingRanker::default(),
            builder: GreedyIncrementalBuilder::default(),
            search: RandomizedTeamSearch::default(),
            analyzer: TeamAnalyzer::default(),
            model,
            transform,
        }
    }
}

impl TeamEngine {
    /// Validate `config` and build every component from it
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let model = CompatibilityCostModel::new(config.cost.clone(), config.scale)?;
        let transform = ScoreTransform::new(config.score.clone())?;

        tracing::debug!(
            iterations = config.search.iterations,
            scaling_max_cost = config.score.scaling_max_cost,
            "Team engine configured"
        );

        Ok(Self {
            scorer: IndividualMatchScorer::new(
                config.individual.clone(),
                config.cost.clone(),
                config.scale,
            )?,
            ranker: GapFillingRanker::new(
                config.gap.clone(),
                config.individual.clone(),
                config.scale,
            )?,
            builder: GreedyIncrementalBuilder::new(
                model.clone(),
                transform.clone(),
                &config.headhunter,
            )?,
            search: RandomizedTeamSearch::new(
                model.clone(),
                transform.clone(),
                config.search.clone(),
            )?,
            analyzer: TeamAnalyzer::new(model.clone(), transform.clone(), &config.gap),
            model,
            transform,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Cost, score and rating of a team; rejected if anyone lacks traits
    pub fn evaluate(&self, team: &[&Person]) -> CostEvaluation {
        self.transform
            .evaluate(self.model.team_cost_or_infinite(team))
    }

    /// [`evaluate`](Self::evaluate) for a team given by ids
    pub fn evaluate_ids(&self, people: &[Person], ids: &[PersonId]) -> Result<CostEvaluation> {
        let team = analysis::resolve(people, ids)?;
        Ok(self.evaluate(&team))
    }

    /// Weighted cost terms of a team; every member needs in-scale traits
    pub fn breakdown(&self, team: &[&Person]) -> Result<CostBreakdown> {
        let vectors = team
            .iter()
            .map(|p| p.checked_traits(self.model.scale()))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.model.breakdown(&vectors))
    }

    pub fn match_person(&self, person: &Person, role: &RoleRequirement) -> MatchReport {
        self.scorer.score(person, role)
    }

    pub fn rank_candidates(
        &self,
        role: &RoleRequirement,
        candidates: &[Person],
        team: &[&Person],
        top_n: usize,
    ) -> Vec<CandidateRanking> {
        self.ranker.rank(role, candidates, team, top_n)
    }

    pub fn build_team(
        &self,
        leader: &Person,
        candidates: &[Person],
        count: usize,
        bias: &dyn TeamBias,
    ) -> Result<BuiltTeam> {
        self.builder.build(leader, candidates, count, bias)
    }

    pub fn assemble_team<R: Rng + ?Sized>(
        &self,
        people: &[Person],
        roles: &[RoleRequirement],
        rng: &mut R,
    ) -> Result<AssembledTeam> {
        self.search.search(people, roles, rng)
    }

    pub fn analyze_team(
        &self,
        leader: &Person,
        members: &[&Person],
        requirements: &[SkillRequirement],
    ) -> Result<TeamReport> {
        self.analyzer.analyze(leader, members, requirements)
    }

    pub fn pair(&self, a: &Person, b: &Person) -> CostEvaluation {
        self.analyzer.pair(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use teamforge_core::{Error, Rating, TraitPreference, TraitVector};

    fn person(o: u8, c: u8, e: u8, a: u8, n: u8) -> Person {
        Person::new(TraitVector::new(o, c, e, a, n).unwrap())
    }

    fn roster() -> Vec<Person> {
        vec![
            person(30, 45, 30, 45, 15).with_skill("Rust", 4),
            person(32, 44, 28, 46, 14).with_skill("Rust", 3),
            person(12, 15, 48, 12, 45).with_skill("Rust", 5),
            person(31, 46, 31, 44, 16).with_skill("Testing", 4),
            person(48, 12, 15, 14, 48).with_skill("Testing", 5),
        ]
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EngineConfig::default();
        config.search.mutation_probability = 1.5;
        assert!(matches!(TeamEngine::new(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_out_of_range_snapshot_rejected() {
        let engine = TeamEngine::default();
        let people = roster();
        let mut skewed = person(30, 30, 30, 30, 30);
        skewed.traits = Some(TraitVector {
            openness: 250,
            conscientiousness: 0,
            ..TraitVector::default()
        });

        let evaluation = engine.evaluate(&[&people[0], &skewed]);
        assert!(evaluation.is_rejected());
        assert_eq!(evaluation.rating, Rating::NotRecommended);
        assert!(matches!(
            engine.build_team(&skewed, &people, 1, &Strategy::Balanced),
            Err(Error::InvalidTrait { .. })
        ));
        assert!(matches!(
            engine.breakdown(&[&people[0], &skewed]),
            Err(Error::InvalidTrait { .. })
        ));
    }

    #[test]
    fn test_evaluate_and_pair_agree() {
        let engine = TeamEngine::default();
        let people = roster();

        let team = engine.evaluate(&[&people[0], &people[1]]);
        let pair = engine.pair(&people[0], &people[1]);
        assert_eq!(team, pair);
        assert_eq!(team.rating, Rating::Excellent);

        let by_id = engine.evaluate_ids(&people, &[people[0].id, people[1].id]).unwrap();
        assert_eq!(by_id, team);
    }

    #[test]
    fn test_pair_scenarios() {
        let engine = TeamEngine::default();

        let steady = person(30, 50, 30, 50, 10);
        let harmonious = engine.evaluate(&[&steady, &steady.clone()]);
        assert!(harmonious.cost < 0.2);
        assert!(harmonious.score > 90.0);
        assert_eq!(harmonious.rating, Rating::Excellent);

        let hostile = person(30, 10, 30, 10, 50);
        let toxic = engine.evaluate(&[&hostile, &hostile.clone()]);
        assert!(toxic.cost > 1.0);
        assert!(toxic.score < 50.0);
        assert_eq!(toxic.rating, Rating::Risky);
    }

    #[test]
    fn test_breakdown_requires_traits() {
        let engine = TeamEngine::default();
        let people = roster();
        let unassessed = Person::unassessed();

        let breakdown = engine.breakdown(&[&people[0], &people[2]]).unwrap();
        assert!((breakdown.total() - engine.evaluate(&[&people[0], &people[2]]).cost).abs() < 1e-12);
        assert_eq!(
            engine.breakdown(&[&people[0], &unassessed]).unwrap_err(),
            Error::IncompleteData { person: unassessed.id }
        );
    }

    #[test]
    fn test_config_flows_into_search() {
        let config = EngineConfig::from_toml_str(
            r#"
            [search]
            iterations = 25
            success_threshold = 0.0
            "#,
        )
        .unwrap();
        let engine = TeamEngine::new(config).unwrap();
        let people = roster();
        let roles = vec![
            RoleRequirement::department("eng", "Engineering", vec!["Rust".to_string()], 2),
            RoleRequirement::department("qa", "Quality", vec!["Testing".to_string()], 1),
        ];

        let result = engine
            .assemble_team(&people, &roles, &mut ChaCha8Rng::seed_from_u64(7))
            .unwrap();

        assert_eq!(result.iterations, 25);
        assert_eq!(result.team.len(), 3);
    }

    #[test]
    fn test_end_to_end_workflow() {
        let engine = TeamEngine::default();
        let people = roster();
        let role = RoleRequirement::skills(
            "delivery",
            vec![
                SkillRequirement::new("Rust", 3),
                SkillRequirement::new("Testing", 4),
            ],
            TraitPreference::default(),
            2,
        );

        let built = engine
            .build_team(&people[0], &people, 2, &Strategy::Balanced)
            .unwrap();
        assert_eq!(built.team.len(), 3);
        assert_eq!(built.team.members()[0].person, people[0].id);

        let ranked = engine.rank_candidates(&role, &people, &[&people[0]], 3);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].person, people[3].id);

        let report = engine
            .analyze_team(&people[0], &[&people[3]], &role.skill_requirements())
            .unwrap();
        assert!(report.all_covered);

        let matched = engine.match_person(&people[3], &role);
        assert_eq!(matched.matching_skills, vec!["Testing".to_string()]);
        assert_eq!(matched.missing_skills, vec!["Rust".to_string()]);
    }
}
