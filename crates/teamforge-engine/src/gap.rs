//! Dynamic skill-gap candidate ranking.
//!
//! Candidates are ranked by how much of the team's *currently unmet*
//! skill requirement they close, so a team that already has a strong
//! designer is not offered a third one ahead of the missing tester.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use teamforge_core::{
    Person, PersonId, Result, RoleRequirement, SkillRequirement, TraitPreference, TraitScale,
    DEPARTMENT_SKILL_PREFIX,
};

use crate::config::{GapRankingConfig, IndividualMatchConfig};
use crate::individual::MatchLevel;

/// Best proficiency per skill across a set of people
pub fn team_inventory(members: &[&Person]) -> BTreeMap<String, u8> {
    let mut inventory = BTreeMap::new();
    for member in members {
        for skill in &member.skills {
            let name = skill
                .name
                .strip_prefix(DEPARTMENT_SKILL_PREFIX)
                .unwrap_or(&skill.name);
            let best = inventory.entry(name.to_string()).or_insert(0);
            *best = (*best).max(skill.level);
        }
    }
    inventory
}

/// Requirement the current team does not yet meet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGap {
    pub name: String,
    pub required: u8,
    /// Best level currently on the team (0 when nobody holds it)
    pub current: u8,
    pub gap: u8,
}

/// Requirements left uncovered by the team, in requirement order
pub fn remaining_gaps(requirements: &[SkillRequirement], members: &[&Person]) -> Vec<SkillGap> {
    let inventory = team_inventory(members);
    requirements
        .iter()
        .filter_map(|req| {
            let current = inventory.get(&req.name).copied().unwrap_or(0);
            (req.level > current).then(|| SkillGap {
                name: req.name.clone(),
                required: req.level,
                current,
                gap: req.level - current,
            })
        })
        .collect()
}

/// How a candidate's skill relates to a requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillMatchKind {
    /// Holds a required skill (shown regardless of the team's coverage)
    Required,
    /// Closes a remaining gap in full
    GapFiller,
    /// Holds a gap skill below the required level
    Partial,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub name: String,
    pub level: u8,
    pub kind: SkillMatchKind,
}

/// One ranked candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRanking {
    pub person: PersonId,
    pub match_score: f64,
    pub skill_score: f64,
    pub personality_score: f64,
    pub level: MatchLevel,
    pub matching_skills: Vec<SkillMatch>,
    /// Remaining gaps the candidate does not hold at all
    pub missing_skills: Vec<String>,
    /// Remaining gaps the candidate closes in full
    pub gaps_resolved: usize,
}

/// Ranks candidates by complementary coverage of unmet requirements
#[derive(Debug, Clone, Default)]
pub struct GapFillingRanker {
    config: GapRankingConfig,
    levels: IndividualMatchConfig,
    scale: TraitScale,
}

impl GapFillingRanker {
    pub fn new(
        config: GapRankingConfig,
        levels: IndividualMatchConfig,
        scale: TraitScale,
    ) -> Result<Self> {
        config.validate()?;
        levels.validate()?;
        scale.validate()?;
        Ok(Self {
            config,
            levels,
            scale,
        })
    }

    /// Top `top_n` available candidates not already on `team`.
    ///
    /// Ordered by gaps fully resolved, then by total score; ties keep
    /// candidate order.
    pub fn rank(
        &self,
        role: &RoleRequirement,
        candidates: &[Person],
        team: &[&Person],
        top_n: usize,
    ) -> Vec<CandidateRanking> {
        let requirements = role.skill_requirements();
        let gaps = remaining_gaps(&requirements, team);
        let preference = role.preference();

        let mut ranked: Vec<CandidateRanking> = candidates
            .iter()
            .filter(|c| c.available && !team.iter().any(|m| m.id == c.id))
            .map(|c| self.score_candidate(c, &requirements, &gaps, preference))
            .collect();

        ranked.sort_by(|a, b| {
            b.gaps_resolved
                .cmp(&a.gaps_resolved)
                .then_with(|| b.match_score.total_cmp(&a.match_score))
        });
        ranked.truncate(top_n);

        tracing::debug!(
            role = %role.id,
            remaining_gaps = gaps.len(),
            returned = ranked.len(),
            "Ranked gap-filling candidates"
        );

        ranked
    }

    fn score_candidate(
        &self,
        candidate: &Person,
        requirements: &[SkillRequirement],
        gaps: &[SkillGap],
        preference: Option<&TraitPreference>,
    ) -> CandidateRanking {
        let mut matching_skills: Vec<SkillMatch> = requirements
            .iter()
            .filter_map(|req| {
                candidate.skill_level(&req.name).map(|level| SkillMatch {
                    name: req.name.clone(),
                    level,
                    kind: SkillMatchKind::Required,
                })
            })
            .collect();

        let mut credit = 0.0;
        let mut gaps_resolved = 0;
        let mut missing_skills = Vec::new();

        for gap in gaps {
            match candidate.skill_level(&gap.name) {
                Some(level) if level >= gap.required => {
                    credit += 1.0;
                    gaps_resolved += 1;
                    matching_skills.push(SkillMatch {
                        name: gap.name.clone(),
                        level,
                        kind: SkillMatchKind::GapFiller,
                    });
                }
                Some(level) => {
                    credit += f64::from(level) / f64::from(gap.required);
                    matching_skills.push(SkillMatch {
                        name: gap.name.clone(),
                        level,
                        kind: SkillMatchKind::Partial,
                    });
                }
                None => missing_skills.push(gap.name.clone()),
            }
        }

        let skill_score = if gaps.is_empty() {
            0.0
        } else {
            (credit / gaps.len() as f64 * self.config.skill_ceiling).min(self.config.skill_ceiling)
        };
        let personality_score = self.personality_bonus(candidate, preference);
        let match_score = skill_score + personality_score;

        CandidateRanking {
            person: candidate.id,
            match_score,
            skill_score,
            personality_score,
            level: MatchLevel::classify(match_score, &self.levels),
            matching_skills,
            missing_skills,
            gaps_resolved,
        }
    }

    /// Base points plus a bonus for every preferred trait the candidate shows
    pub fn personality_bonus(&self, candidate: &Person, preference: Option<&TraitPreference>) -> f64 {
        let cfg = &self.config;
        let Some(preference) = preference else {
            return cfg.personality_base.min(cfg.personality_cap);
        };

        let traits = candidate.traits_or_neutral(&self.scale);
        let normalized = |t| self.scale.normalize(f64::from(traits.get(t)));

        let high = preference
            .high
            .iter()
            .filter(|t| normalized(**t) >= cfg.high_threshold)
            .count() as f64;
        let low = preference
            .low
            .iter()
            .filter(|t| normalized(**t) <= cfg.low_threshold)
            .count() as f64;

        (cfg.personality_base + high * cfg.high_bonus + low * cfg.low_bonus).min(cfg.personality_cap)
    }
}
