//! Big Five (OCEAN) personality traits on a bounded integer scale.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Individual OCEAN trait enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonalityTrait {
    #[serde(alias = "O")]
    Openness,
    #[serde(alias = "C")]
    Conscientiousness,
    #[serde(alias = "E")]
    Extraversion,
    #[serde(alias = "A")]
    Agreeableness,
    #[serde(alias = "N")]
    Neuroticism,
}

impl PersonalityTrait {
    pub const ALL: [PersonalityTrait; 5] = [
        PersonalityTrait::Openness,
        PersonalityTrait::Conscientiousness,
        PersonalityTrait::Extraversion,
        PersonalityTrait::Agreeableness,
        PersonalityTrait::Neuroticism,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PersonalityTrait::Openness => "Openness",
            PersonalityTrait::Conscientiousness => "Conscientiousness",
            PersonalityTrait::Extraversion => "Extraversion",
            PersonalityTrait::Agreeableness => "Agreeableness",
            PersonalityTrait::Neuroticism => "Neuroticism",
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            PersonalityTrait::Openness => "O",
            PersonalityTrait::Conscientiousness => "C",
            PersonalityTrait::Extraversion => "E",
            PersonalityTrait::Agreeableness => "A",
            PersonalityTrait::Neuroticism => "N",
        }
    }

    /// Parse either the full name or the single-letter abbreviation
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        PersonalityTrait::ALL.into_iter().find(|t| {
            t.abbreviation().eq_ignore_ascii_case(value) || t.name().eq_ignore_ascii_case(value)
        })
    }

    /// High score behavioral description
    pub fn high_description(&self) -> &'static str {
        match self {
            PersonalityTrait::Openness => "Inventive, curious, drawn to new approaches",
            PersonalityTrait::Conscientiousness => "Organized, dependable, finishes what they start",
            PersonalityTrait::Extraversion => "Outgoing, energetic, drives execution",
            PersonalityTrait::Agreeableness => "Cooperative, supportive, keeps the peace",
            PersonalityTrait::Neuroticism => "Stress-prone, reactive under pressure",
        }
    }

    /// Low score behavioral description
    pub fn low_description(&self) -> &'static str {
        match self {
            PersonalityTrait::Openness => "Practical, prefers proven routines",
            PersonalityTrait::Conscientiousness => "Flexible, improvises, loose with process",
            PersonalityTrait::Extraversion => "Reserved, focused, works independently",
            PersonalityTrait::Agreeableness => "Blunt, skeptical, competitive",
            PersonalityTrait::Neuroticism => "Calm, steady, resilient",
        }
    }
}

impl std::fmt::Display for PersonalityTrait {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive integer range every raw trait score must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitScale {
    pub min: u8,
    pub max: u8,
}

impl TraitScale {
    pub const DEFAULT_MIN: u8 = 10;
    pub const DEFAULT_MAX: u8 = 50;

    pub fn new(min: u8, max: u8) -> Result<Self> {
        let scale = Self { min, max };
        scale.validate()?;
        Ok(scale)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min >= self.max {
            return Err(Error::InvalidScale {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    pub fn range(&self) -> f64 {
        f64::from(self.max) - f64::from(self.min)
    }

    /// Mid-range value used when a person has not been assessed
    pub fn midpoint(&self) -> u8 {
        ((u16::from(self.min) + u16::from(self.max)) / 2) as u8
    }

    pub fn contains(&self, value: u8) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Map a raw value (or mean of raw values) onto [0, 1]
    pub fn normalize(&self, raw: f64) -> f64 {
        ((raw - f64::from(self.min)) / self.range()).clamp(0.0, 1.0)
    }

    /// Largest population variance attainable on this range
    /// (half the team at `min`, half at `max`).
    pub fn max_variance(&self) -> f64 {
        (self.range() / 2.0).powi(2)
    }
}

impl Default for TraitScale {
    fn default() -> Self {
        Self {
            min: Self::DEFAULT_MIN,
            max: Self::DEFAULT_MAX,
        }
    }
}

/// Raw OCEAN scores of one person.
///
/// Values are validated against a [`TraitScale`] on construction; the
/// default vector sits at the scale midpoint for every trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraitVector {
    pub openness: u8,
    pub conscientiousness: u8,
    pub extraversion: u8,
    pub agreeableness: u8,
    pub neuroticism: u8,
}

impl TraitVector {
    /// Build a vector on the default 10-50 scale
    pub fn new(
        openness: u8,
        conscientiousness: u8,
        extraversion: u8,
        agreeableness: u8,
        neuroticism: u8,
    ) -> Result<Self> {
        Self::with_scale(
            openness,
            conscientiousness,
            extraversion,
            agreeableness,
            neuroticism,
            &TraitScale::default(),
        )
    }

    pub fn with_scale(
        openness: u8,
        conscientiousness: u8,
        extraversion: u8,
        agreeableness: u8,
        neuroticism: u8,
        scale: &TraitScale,
    ) -> Result<Self> {
        let vector = Self {
            openness,
            conscientiousness,
            extraversion,
            agreeableness,
            neuroticism,
        };
        vector.validate(scale)?;
        Ok(vector)
    }

    pub fn neutral(scale: &TraitScale) -> Self {
        let mid = scale.midpoint();
        Self {
            openness: mid,
            conscientiousness: mid,
            extraversion: mid,
            agreeableness: mid,
            neuroticism: mid,
        }
    }

    /// Check every trait against the scale
    pub fn validate(&self, scale: &TraitScale) -> Result<()> {
        for trait_type in PersonalityTrait::ALL {
            let value = self.get(trait_type);
            if !scale.contains(value) {
                return Err(Error::InvalidTrait {
                    trait_name: trait_type.name(),
                    value,
                    min: scale.min,
                    max: scale.max,
                });
            }
        }
        Ok(())
    }

    pub fn get(&self, trait_type: PersonalityTrait) -> u8 {
        match trait_type {
            PersonalityTrait::Openness => self.openness,
            PersonalityTrait::Conscientiousness => self.conscientiousness,
            PersonalityTrait::Extraversion => self.extraversion,
            PersonalityTrait::Agreeableness => self.agreeableness,
            PersonalityTrait::Neuroticism => self.neuroticism,
        }
    }

    /// Raw scores in O, C, E, A, N order
    pub fn to_array(&self) -> [u8; 5] {
        [
            self.openness,
            self.conscientiousness,
            self.extraversion,
            self.agreeableness,
            self.neuroticism,
        ]
    }

    /// Normalized scores in O, C, E, A, N order
    pub fn normalized(&self, scale: &TraitScale) -> [f64; 5] {
        self.to_array().map(|v| scale.normalize(f64::from(v)))
    }

    /// Get the dominant trait (highest score, first wins on ties)
    pub fn dominant_trait(&self) -> PersonalityTrait {
        PersonalityTrait::ALL
            .into_iter()
            .rev()
            .max_by_key(|t| self.get(*t))
            .unwrap_or(PersonalityTrait::Openness)
    }

    /// Traits at or above `threshold` on the normalized scale
    pub fn high_traits(&self, scale: &TraitScale, threshold: f64) -> Vec<PersonalityTrait> {
        PersonalityTrait::ALL
            .into_iter()
            .filter(|t| scale.normalize(f64::from(self.get(*t))) >= threshold)
            .collect()
    }

    /// Traits at or below `threshold` on the normalized scale
    pub fn low_traits(&self, scale: &TraitScale, threshold: f64) -> Vec<PersonalityTrait> {
        PersonalityTrait::ALL
            .into_iter()
            .filter(|t| scale.normalize(f64::from(self.get(*t))) <= threshold)
            .collect()
    }
}

impl Default for TraitVector {
    fn default() -> Self {
        Self::neutral(&TraitScale::default())
    }
}

/// Personality a role prefers in its candidates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitPreference {
    #[serde(default)]
    pub high: Vec<PersonalityTrait>,
    #[serde(default)]
    pub low: Vec<PersonalityTrait>,
}

impl TraitPreference {
    pub fn new(high: Vec<PersonalityTrait>, low: Vec<PersonalityTrait>) -> Self {
        Self { high, low }
    }

    pub fn is_empty(&self) -> bool {
        self.high.is_empty() && self.low.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_range_validation() {
        assert!(TraitVector::new(30, 30, 30, 30, 30).is_ok());

        let err = TraitVector::new(55, 30, 30, 30, 30).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTrait {
                trait_name: "Openness",
                value: 55,
                ..
            }
        ));
    }

    #[test]
    fn test_normalization_clamps() {
        let scale = TraitScale::default();
        assert_eq!(scale.normalize(10.0), 0.0);
        assert_eq!(scale.normalize(50.0), 1.0);
        assert_eq!(scale.normalize(30.0), 0.5);
        assert_eq!(scale.normalize(70.0), 1.0);
        assert_eq!(scale.normalize(0.0), 0.0);
        assert_eq!(scale.max_variance(), 400.0);
    }

    #[test]
    fn test_neutral_default() {
        let neutral = TraitVector::default();
        assert_eq!(neutral.to_array(), [30; 5]);

        let wide = TraitScale::new(0, 100).unwrap();
        assert_eq!(TraitVector::neutral(&wide).openness, 50);
    }

    #[test]
    fn test_invalid_scale() {
        assert!(TraitScale::new(50, 10).is_err());
        assert!(TraitScale::new(20, 20).is_err());
    }

    #[test]
    fn test_dominant_and_extremes() {
        let scale = TraitScale::default();
        let v = TraitVector::new(48, 20, 30, 30, 12).unwrap();
        assert_eq!(v.dominant_trait(), PersonalityTrait::Openness);
        assert_eq!(v.high_traits(&scale, 0.65), vec![PersonalityTrait::Openness]);
        assert_eq!(
            v.low_traits(&scale, 0.35),
            vec![PersonalityTrait::Conscientiousness, PersonalityTrait::Neuroticism]
        );
    }

    #[test]
    fn test_parse_and_deserialize_abbreviations() {
        assert_eq!(PersonalityTrait::parse("e"), Some(PersonalityTrait::Extraversion));
        assert_eq!(PersonalityTrait::parse("Openness"), Some(PersonalityTrait::Openness));
        assert_eq!(PersonalityTrait::parse("X"), None);

        let pref: TraitPreference = serde_json::from_str(r#"{"high":["C","Agreeableness"]}"#).unwrap();
        assert_eq!(
            pref.high,
            vec![PersonalityTrait::Conscientiousness, PersonalityTrait::Agreeableness]
        );
        assert!(pref.low.is_empty());
    }
}
