//! Person-vs-role match scoring, independent of any team.
//!
//! ## Sub-scores
//!
//! - **Skills** (up to `skill_ceiling`): every requirement is worth its
//!   required level. Meeting it earns the full required level; falling
//!   short earns `partial_credit` × the held level; not holding the skill
//!   earns nothing and lists it as missing.
//! - **Personality** (up to `personality_ceiling`): the inverse of a
//!   badness composite made of low conscientiousness/agreeableness,
//!   extraversion/openness away from mid-range, the stress level and the
//!   same toxic-agreeableness penalty the team cost model uses.

use serde::{Deserialize, Serialize};
use teamforge_core::{
    Person, PersonId, Result, RoleRequirement, SkillRequirement, TraitScale, TraitVector,
};

use crate::config::{CostWeights, IndividualMatchConfig};

/// Qualitative match bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchLevel {
    Perfect,
    Good,
    Moderate,
    Risky,
}

impl MatchLevel {
    /// Bucket a total score using the configured thresholds
    pub fn classify(total: f64, config: &IndividualMatchConfig) -> Self {
        if total >= config.perfect {
            MatchLevel::Perfect
        } else if total >= config.good {
            MatchLevel::Good
        } else if total >= config.moderate {
            MatchLevel::Moderate
        } else {
            MatchLevel::Risky
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchLevel::Perfect => "perfect",
            MatchLevel::Good => "good",
            MatchLevel::Moderate => "moderate",
            MatchLevel::Risky => "risky",
        }
    }
}

/// A held skill that falls short of the requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillShortfall {
    pub name: String,
    pub required: u8,
    pub has: u8,
}

/// Result of scoring one person against one role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub person: PersonId,
    pub total_score: f64,
    pub skill_score: f64,
    pub personality_score: f64,
    pub level: MatchLevel,
    /// Requirements met in full
    pub matching_skills: Vec<String>,
    /// Requirements the person does not hold at all
    pub missing_skills: Vec<String>,
    /// Requirements held below the required level
    pub skill_gaps: Vec<SkillShortfall>,
}

/// Scores a person against a role's skill and personality needs
#[derive(Debug, Clone, Default)]
pub struct IndividualMatchScorer {
    config: IndividualMatchConfig,
    weights: CostWeights,
    scale: TraitScale,
}

impl IndividualMatchScorer {
    pub fn new(
        config: IndividualMatchConfig,
        weights: CostWeights,
        scale: TraitScale,
    ) -> Result<Self> {
        config.validate()?;
        weights.validate()?;
        scale.validate()?;
        Ok(Self {
            config,
            weights,
            scale,
        })
    }

    pub fn score(&self, person: &Person, role: &RoleRequirement) -> MatchReport {
        self.score_requirements(person, &role.skill_requirements())
    }

    /// Score against a bare requirement list.
    ///
    /// Unassessed people are scored at the neutral trait vector.
    pub fn score_requirements(&self, person: &Person, requirements: &[SkillRequirement]) -> MatchReport {
        let mut earned = 0.0;
        let mut available = 0.0;
        let mut matching_skills = Vec::new();
        let mut missing_skills = Vec::new();
        let mut skill_gaps = Vec::new();

        for req in requirements {
            let required = f64::from(req.level);
            available += required;

            match person.skill_level(&req.name) {
                Some(has) if has >= req.level => {
                    earned += required;
                    matching_skills.push(req.name.clone());
                }
                Some(has) => {
                    earned += f64::from(has) * self.config.partial_credit;
                    skill_gaps.push(SkillShortfall {
                        name: req.name.clone(),
                        required: req.level,
                        has,
                    });
                }
                None => missing_skills.push(req.name.clone()),
            }
        }

        let skill_score = if available > 0.0 {
            (earned / available * self.config.skill_ceiling).min(self.config.skill_ceiling)
        } else {
            0.0
        };

        let traits = person.traits_or_neutral(&self.scale);
        let personality_score = self.personality_score(&traits);
        let total_score = skill_score + personality_score;

        MatchReport {
            person: person.id,
            total_score,
            skill_score,
            personality_score,
            level: self.level(total_score),
            matching_skills,
            missing_skills,
            skill_gaps,
        }
    }

    /// Badness composite of one trait vector; 0 is ideal
    pub fn badness(&self, traits: &TraitVector) -> f64 {
        let [o, c, e, a, n] = traits.normalized(&self.scale);
        let cfg = &self.config;

        let core = cfg.conscientiousness_weight * (1.0 - c) + cfg.agreeableness_weight * (1.0 - a);
        let style = cfg.extraversion_weight * (e - 0.5).abs() * 2.0
            + cfg.openness_weight * (o - 0.5).abs() * 2.0;
        let stress = self.weights.neuroticism * n;
        let toxic = self.weights.toxic_penalty * (self.weights.toxic_threshold - a).max(0.0);

        core + style + stress + toxic
    }

    pub fn personality_score(&self, traits: &TraitVector) -> f64 {
        let fraction = (1.0 - self.badness(traits) / self.config.badness_ceiling).clamp(0.0, 1.0);
        fraction * self.config.personality_ceiling
    }

    pub fn level(&self, total: f64) -> MatchLevel {
        MatchLevel::classify(total, &self.config)
    }
}
