//! Reporting on an existing team: skill coverage, trait profile and
//! harmony, plus one-to-one pair compatibility.

use serde::{Deserialize, Serialize};
use teamforge_core::{
    unique_ids, CostEvaluation, Person, PersonId, PersonalityTrait, Result, SkillRequirement,
    TraitScale, TraitVector,
};

use crate::config::GapRankingConfig;
use crate::cost::{mean, CompatibilityCostModel};
use crate::gap::team_inventory;
use crate::score::ScoreTransform;

/// How well the team covers one requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageStatus {
    Covered,
    Partial,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCoverage {
    pub name: String,
    pub required: u8,
    /// Best level on the team, 0 when nobody holds the skill
    pub held: u8,
    pub status: CoverageStatus,
}

/// Mean raw trait scores of the assessed members and what stands out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitProfile {
    pub openness: f64,
    pub conscientiousness: f64,
    pub extraversion: f64,
    pub agreeableness: f64,
    pub neuroticism: f64,
    pub dominant: PersonalityTrait,
    pub high: Vec<PersonalityTrait>,
    pub low: Vec<PersonalityTrait>,
    /// One behavioral line per high trait, then per low trait
    pub summary: Vec<String>,
}

impl TraitProfile {
    pub fn get(&self, trait_type: PersonalityTrait) -> f64 {
        match trait_type {
            PersonalityTrait::Openness => self.openness,
            PersonalityTrait::Conscientiousness => self.conscientiousness,
            PersonalityTrait::Extraversion => self.extraversion,
            PersonalityTrait::Agreeableness => self.agreeableness,
            PersonalityTrait::Neuroticism => self.neuroticism,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamReport {
    pub size: usize,
    pub coverage: Vec<SkillCoverage>,
    /// Share of requirements fully covered, 100 when there are none
    pub coverage_percent: f64,
    pub all_covered: bool,
    /// `None` when nobody on the team is assessed
    pub traits: Option<TraitProfile>,
    /// `None` for a single-person team
    pub harmony: Option<CostEvaluation>,
}

#[derive(Debug, Clone)]
pub struct TeamAnalyzer {
    model: CompatibilityCostModel,
    transform: ScoreTransform,
    high_threshold: f64,
    low_threshold: f64,
}

impl Default for TeamAnalyzer {
    fn default() -> Self {
        Self::new(
            CompatibilityCostModel::default(),
            ScoreTransform::default(),
            &GapRankingConfig::default(),
        )
    }
}

impl TeamAnalyzer {
    /// High/low trait cut-offs are shared with the gap ranker
    pub fn new(
        model: CompatibilityCostModel,
        transform: ScoreTransform,
        thresholds: &GapRankingConfig,
    ) -> Self {
        Self {
            model,
            transform,
            high_threshold: thresholds.high_threshold,
            low_threshold: thresholds.low_threshold,
        }
    }

    /// Analyze `leader` plus `members` against a requirement list.
    ///
    /// Fails with `DuplicateMember` if anyone appears twice. Harmony is
    /// the rejected evaluation when a member lacks usable trait data; the
    /// profile covers members whose traits fit the scale.
    pub fn analyze(
        &self,
        leader: &Person,
        members: &[&Person],
        requirements: &[SkillRequirement],
    ) -> Result<TeamReport> {
        let mut team = Vec::with_capacity(members.len() + 1);
        team.push(leader);
        team.extend_from_slice(members);
        unique_ids(team.iter().map(|p| &p.id))?;

        let inventory = team_inventory(&team);
        let coverage: Vec<SkillCoverage> = requirements
            .iter()
            .map(|req| {
                let held = inventory.get(&req.name).copied().unwrap_or(0);
                let status = if held >= req.level {
                    CoverageStatus::Covered
                } else if held > 0 {
                    CoverageStatus::Partial
                } else {
                    CoverageStatus::Missing
                };
                SkillCoverage {
                    name: req.name.clone(),
                    required: req.level,
                    held,
                    status,
                }
            })
            .collect();

        let covered = coverage
            .iter()
            .filter(|c| c.status == CoverageStatus::Covered)
            .count();
        let coverage_percent = if coverage.is_empty() {
            100.0
        } else {
            covered as f64 / coverage.len() as f64 * 100.0
        };

        let harmony = (team.len() >= 2)
            .then(|| self.transform.evaluate(self.model.team_cost_or_infinite(&team)));

        Ok(TeamReport {
            size: team.len(),
            all_covered: covered == coverage.len(),
            coverage,
            coverage_percent,
            traits: self.trait_profile(&team),
            harmony,
        })
    }

    /// One-to-one compatibility of two people
    pub fn pair(&self, a: &Person, b: &Person) -> CostEvaluation {
        self.transform
            .evaluate(self.model.team_cost_or_infinite(&[a, b]))
    }

    fn trait_profile(&self, team: &[&Person]) -> Option<TraitProfile> {
        let scale: &TraitScale = self.model.scale();
        let vectors: Vec<TraitVector> = team
            .iter()
            .filter_map(|p| p.checked_traits(scale).ok())
            .collect();
        if vectors.is_empty() {
            return None;
        }

        let avg = |t: PersonalityTrait| {
            let values: Vec<f64> = vectors.iter().map(|v| f64::from(v.get(t))).collect();
            mean(&values)
        };
        let (openness, conscientiousness, extraversion, agreeableness, neuroticism) = (
            avg(PersonalityTrait::Openness),
            avg(PersonalityTrait::Conscientiousness),
            avg(PersonalityTrait::Extraversion),
            avg(PersonalityTrait::Agreeableness),
            avg(PersonalityTrait::Neuroticism),
        );

        // Means of in-scale scores stay in scale
        let rounded = TraitVector {
            openness: openness.round() as u8,
            conscientiousness: conscientiousness.round() as u8,
            extraversion: extraversion.round() as u8,
            agreeableness: agreeableness.round() as u8,
            neuroticism: neuroticism.round() as u8,
        };
        let high = rounded.high_traits(scale, self.high_threshold);
        let low = rounded.low_traits(scale, self.low_threshold);
        let summary = high
            .iter()
            .map(|t| format!("{}: {}", t.name(), t.high_description()))
            .chain(low.iter().map(|t| format!("{}: {}", t.name(), t.low_description())))
            .collect();

        Some(TraitProfile {
            openness,
            conscientiousness,
            extraversion,
            agreeableness,
            neuroticism,
            dominant: rounded.dominant_trait(),
            high,
            low,
            summary,
        })
    }
}

/// Look up the people behind a list of ids
pub fn resolve<'a>(people: &'a [Person], ids: &[PersonId]) -> Result<Vec<&'a Person>> {
    ids.iter()
        .map(|id| {
            people
                .iter()
                .find(|p| p.id == *id)
                .ok_or(teamforge_core::Error::UnknownPerson { person: *id })
        })
        .collect()
}
