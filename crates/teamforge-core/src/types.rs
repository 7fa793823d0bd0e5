//! Fundamental types for the Teamforge composition engine.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::traits::{TraitPreference, TraitScale, TraitVector};

/// Unique identifier for a person in the roster snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(pub Uuid);

impl PersonId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PersonId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a role slot (department id or quest role name)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleId(pub String);

impl From<&str> for RoleId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Proficiency levels run from 1 (novice) to 5 (expert)
pub const MIN_PROFICIENCY: u8 = 1;
pub const MAX_PROFICIENCY: u8 = 5;

/// A skill held by a person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub level: u8,
}

impl Skill {
    pub fn new(name: impl Into<String>, level: u8) -> Self {
        Self {
            name: name.into(),
            level: level.clamp(MIN_PROFICIENCY, MAX_PROFICIENCY),
        }
    }
}

/// Minimum proficiency a role asks for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRequirement {
    pub name: String,
    pub level: u8,
}

impl SkillRequirement {
    pub fn new(name: impl Into<String>, level: u8) -> Self {
        Self {
            name: name.into(),
            level: level.clamp(MIN_PROFICIENCY, MAX_PROFICIENCY),
        }
    }
}

/// Person snapshot handed to the engine. Never mutated by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    /// `None` when the person has not completed the personality assessment
    pub traits: Option<TraitVector>,
    pub available: bool,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

impl Person {
    pub fn new(traits: TraitVector) -> Self {
        Self {
            id: PersonId::new(),
            traits: Some(traits),
            available: true,
            skills: Vec::new(),
        }
    }

    /// A person whose assessment is missing
    pub fn unassessed() -> Self {
        Self {
            id: PersonId::new(),
            traits: None,
            available: true,
            skills: Vec::new(),
        }
    }

    pub fn with_skill(mut self, name: impl Into<String>, level: u8) -> Self {
        self.skills.push(Skill::new(name, level));
        self
    }

    pub fn with_availability(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// Highest level held for a skill, if any. Department membership
    /// entries match with or without their prefix.
    pub fn skill_level(&self, name: &str) -> Option<u8> {
        self.skills
            .iter()
            .filter(|s| s.name.strip_prefix(DEPARTMENT_SKILL_PREFIX).unwrap_or(&s.name) == name)
            .map(|s| s.level)
            .max()
    }

    /// Traits, or `Err(IncompleteData)` when the assessment is missing
    pub fn require_traits(&self) -> Result<&TraitVector> {
        self.traits
            .as_ref()
            .ok_or(Error::IncompleteData { person: self.id })
    }

    /// Traits checked against `scale`.
    ///
    /// `IncompleteData` when the assessment is missing, `InvalidTrait` when
    /// a score lies outside the scale (snapshots built through serde or
    /// struct literals bypass the validating constructors).
    pub fn checked_traits(&self, scale: &TraitScale) -> Result<TraitVector> {
        let traits = *self.require_traits()?;
        traits.validate(scale)?;
        Ok(traits)
    }

    /// Traits, falling back to the scale midpoint for unassessed people
    pub fn traits_or_neutral(&self, scale: &TraitScale) -> TraitVector {
        self.traits.unwrap_or_else(|| TraitVector::neutral(scale))
    }

    pub fn has_complete_traits(&self) -> bool {
        self.traits.is_some()
    }
}

/// Prefix some rosters put in front of department membership skills
pub const DEPARTMENT_SKILL_PREFIX: &str = "Dept: ";

/// How a role decides who may fill it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoleKind {
    /// Department membership: the department name or any of its skills
    Department { name: String, skills: Vec<String> },
    /// Explicit skill list with minimum levels and optional personality preference
    Skills {
        skills: Vec<SkillRequirement>,
        #[serde(default)]
        preference: TraitPreference,
    },
}

/// One role of a quest and how many people it needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRequirement {
    pub id: RoleId,
    pub headcount: usize,
    #[serde(flatten)]
    pub kind: RoleKind,
}

impl RoleRequirement {
    pub fn department(
        id: impl Into<String>,
        name: impl Into<String>,
        skills: Vec<String>,
        headcount: usize,
    ) -> Self {
        Self {
            id: RoleId(id.into()),
            headcount,
            kind: RoleKind::Department {
                name: name.into(),
                skills,
            },
        }
    }

    pub fn skills(
        id: impl Into<String>,
        skills: Vec<SkillRequirement>,
        preference: TraitPreference,
        headcount: usize,
    ) -> Self {
        Self {
            id: RoleId(id.into()),
            headcount,
            kind: RoleKind::Skills { skills, preference },
        }
    }

    /// Whether the person's skills qualify them for this role.
    ///
    /// Availability and trait completeness are checked by the callers that
    /// need them.
    pub fn admits(&self, person: &Person) -> bool {
        match &self.kind {
            RoleKind::Department { name, skills } => person.skills.iter().any(|s| {
                let clean = s
                    .name
                    .strip_prefix(DEPARTMENT_SKILL_PREFIX)
                    .unwrap_or(&s.name);
                clean == name || skills.iter().any(|d| d == clean)
            }),
            RoleKind::Skills { skills, .. } => skills
                .iter()
                .any(|req| person.skill_level(&req.name).is_some()),
        }
    }

    /// Skill requirements the role imposes.
    ///
    /// A department role requires its own name at level 1.
    pub fn skill_requirements(&self) -> Vec<SkillRequirement> {
        match &self.kind {
            RoleKind::Department { name, .. } => vec![SkillRequirement::new(name.clone(), 1)],
            RoleKind::Skills { skills, .. } => skills.clone(),
        }
    }

    pub fn preference(&self) -> Option<&TraitPreference> {
        match &self.kind {
            RoleKind::Skills { preference, .. } if !preference.is_empty() => Some(preference),
            _ => None,
        }
    }
}

/// A person assigned to a role slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub person: PersonId,
    pub role: RoleId,
}

/// Candidate team. No person appears twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    members: Vec<TeamMember>,
}

impl Team {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_members(members: Vec<TeamMember>) -> Result<Self> {
        let mut team = Self::new();
        for member in members {
            team.push(member)?;
        }
        Ok(team)
    }

    pub fn push(&mut self, member: TeamMember) -> Result<()> {
        if self.contains(&member.person) {
            return Err(Error::DuplicateMember {
                person: member.person,
            });
        }
        self.members.push(member);
        Ok(())
    }

    pub fn contains(&self, person: &PersonId) -> bool {
        self.members.iter().any(|m| &m.person == person)
    }

    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    pub fn person_ids(&self) -> Vec<PersonId> {
        self.members.iter().map(|m| m.person).collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn into_members(self) -> Vec<TeamMember> {
        self.members
    }
}

/// Qualitative bucket derived from a team score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    Excellent,
    Good,
    Acceptable,
    Risky,
    NotRecommended,
}

impl Rating {
    pub fn label(&self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent",
            Rating::Good => "Good",
            Rating::Acceptable => "Acceptable",
            Rating::Risky => "Risky",
            Rating::NotRecommended => "Not Recommended",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cost, score and rating of a team. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostEvaluation {
    pub cost: f64,
    pub score: f64,
    pub rating: Rating,
}

impl CostEvaluation {
    /// Evaluation for a team with incomplete trait data
    pub fn rejected() -> Self {
        Self {
            cost: f64::INFINITY,
            score: 0.0,
            rating: Rating::NotRecommended,
        }
    }

    /// Evaluation reported when no team could be assembled
    pub fn empty() -> Self {
        Self {
            cost: 0.0,
            score: 0.0,
            rating: Rating::NotRecommended,
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.cost.is_infinite()
    }
}

/// Collect ids into a set, failing on the first duplicate
pub fn unique_ids<'a>(ids: impl IntoIterator<Item = &'a PersonId>) -> Result<HashSet<PersonId>> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(*id) {
            return Err(Error::DuplicateMember { person: *id });
        }
    }
    Ok(seen)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutral_person() -> Person {
        Person::new(TraitVector::default())
    }

    #[test]
    fn test_team_rejects_duplicates() {
        let person = PersonId::new();
        let mut team = Team::new();
        team.push(TeamMember {
            person,
            role: RoleId::from("dev"),
        })
        .unwrap();

        let err = team
            .push(TeamMember {
                person,
                role: RoleId::from("qa"),
            })
            .unwrap_err();
        assert_eq!(err, Error::DuplicateMember { person });
        assert_eq!(team.len(), 1);
    }

    #[test]
    fn test_department_admission() {
        let role = RoleRequirement::department(
            "eng",
            "Engineering",
            vec!["Rust".to_string(), "Go".to_string()],
            2,
        );

        let by_skill = neutral_person().with_skill("Go", 2);
        let by_membership = neutral_person().with_skill("Dept: Engineering", 1);
        let outsider = neutral_person().with_skill("Sales", 5);

        assert!(role.admits(&by_skill));
        assert!(role.admits(&by_membership));
        assert!(!role.admits(&outsider));
        assert_eq!(
            role.skill_requirements(),
            vec![SkillRequirement::new("Engineering", 1)]
        );
    }

    #[test]
    fn test_skill_role_admission() {
        let role = RoleRequirement::skills(
            "coder",
            vec![SkillRequirement::new("Coding", 4)],
            TraitPreference::default(),
            1,
        );
        assert!(role.admits(&neutral_person().with_skill("Coding", 1)));
        assert!(!role.admits(&neutral_person().with_skill("Archery", 5)));
        assert!(role.preference().is_none());
    }

    #[test]
    fn test_require_traits() {
        let person = Person::unassessed();
        assert_eq!(
            person.require_traits().unwrap_err(),
            Error::IncompleteData { person: person.id }
        );
        assert_eq!(
            person.traits_or_neutral(&TraitScale::default()),
            TraitVector::default()
        );
    }

    #[test]
    fn test_out_of_range_snapshot_rejected() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000001",
            "traits": {
                "openness": 250,
                "conscientiousness": 0,
                "extraversion": 30,
                "agreeableness": 30,
                "neuroticism": 30
            },
            "available": true
        }"#;
        let person: Person = serde_json::from_str(json).unwrap();

        assert_eq!(
            person.checked_traits(&TraitScale::default()).unwrap_err(),
            Error::InvalidTrait {
                trait_name: "Openness",
                value: 250,
                min: 10,
                max: 50,
            }
        );

        let wide = TraitScale::new(0, 255).unwrap();
        assert!(person.checked_traits(&wide).is_ok());
        let unassessed = Person::unassessed();
        assert_eq!(
            unassessed.checked_traits(&wide).unwrap_err(),
            Error::IncompleteData {
                person: unassessed.id
            }
        );
    }

    #[test]
    fn test_skill_level_clamped() {
        let person = neutral_person().with_skill("Coding", 9).with_skill("Coding", 3);
        assert_eq!(person.skill_level("Coding"), Some(5));
        assert_eq!(person.skill_level("Design"), None);

        let member = neutral_person().with_skill("Dept: Marketing", 2);
        assert_eq!(member.skill_level("Marketing"), Some(2));
    }

    #[test]
    fn test_role_requirement_deserialize() {
        let json = r#"{
            "id": "frontend",
            "headcount": 2,
            "kind": "skills",
            "skills": [{"name": "React", "level": 3}],
            "preference": {"high": ["O"]}
        }"#;
        let role: RoleRequirement = serde_json::from_str(json).unwrap();
        assert_eq!(role.headcount, 2);
        assert!(role.preference().is_some());
    }
}
