//! Engine configuration.
//!
//! Every tunable constant of the cost model, score transform and the
//! search algorithms lives here. Defaults are the calibrated values; a
//! deployment can override any of them from a file or `TEAMFORGE_*`
//! environment variables (nested keys separated by `__`, e.g.
//! `TEAMFORGE_SEARCH__ITERATIONS=500`).

use serde::{Deserialize, Serialize};
use teamforge_core::{Error, Result, TraitScale};

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Raw trait range
    pub scale: TraitScale,

    /// Compatibility cost weights
    pub cost: CostWeights,

    /// Cost to score/rating transform
    pub score: ScoreConfig,

    /// Randomized multi-role search
    pub search: SearchConfig,

    /// Greedy leader-first builder
    pub headhunter: HeadhunterConfig,

    /// Person-vs-role scoring
    pub individual: IndividualMatchConfig,

    /// Skill-gap candidate ranking
    pub gap: GapRankingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostWeights {
    /// Conscientiousness dispersion
    pub conscientiousness: f64,
    /// Agreeableness dispersion
    pub agreeableness: f64,
    /// Extraversion dispersion
    pub extraversion: f64,
    /// Openness dispersion
    pub openness: f64,
    /// Mean neuroticism (stress level)
    pub neuroticism: f64,
    /// Toxic penalty multiplier (lambda)
    pub toxic_penalty: f64,
    /// Normalized mean agreeableness below which the toxic penalty fires (tau)
    pub toxic_threshold: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            conscientiousness: 1.5,
            agreeableness: 1.5,
            extraversion: 1.0,
            openness: 1.0,
            neuroticism: 1.0,
            toxic_penalty: 2.0,
            toxic_threshold: 0.625,
        }
    }
}

impl CostWeights {
    /// Worst case of the formula: every term saturated
    pub fn theoretical_max_cost(&self) -> f64 {
        self.conscientiousness
            + self.agreeableness
            + self.extraversion
            + self.openness
            + self.neuroticism
            + self.toxic_penalty * self.toxic_threshold
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    /// Empirical cost ceiling mapped to score 0. Calibrate against real
    /// team data; it sits well below the theoretical maximum so realistic
    /// teams spread across the whole 0-100 range.
    pub scaling_max_cost: f64,
    pub excellent: f64,
    pub good: f64,
    pub acceptable: f64,
    pub risky: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            scaling_max_cost: 4.0,
            excellent: 85.0,
            good: 70.0,
            acceptable: 55.0,
            risky: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Iteration budget
    pub iterations: usize,
    /// Chance of mutating the best-known team instead of resampling
    pub mutation_probability: f64,
    /// Stop as soon as the best cost is at or below this value
    pub success_threshold: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            mutation_probability: 0.7,
            success_threshold: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadhunterConfig {
    /// Weight of the strategy bonus subtracted from comparison cost
    pub bias_weight: f64,
}

impl Default for HeadhunterConfig {
    fn default() -> Self {
        Self { bias_weight: 0.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndividualMatchConfig {
    /// Points available for skills
    pub skill_ceiling: f64,
    /// Fraction of the held level credited when below the requirement
    pub partial_credit: f64,
    /// Points available for personality
    pub personality_ceiling: f64,
    /// Badness at which the personality sub-score reaches 0
    pub badness_ceiling: f64,
    /// Penalty on low conscientiousness
    pub conscientiousness_weight: f64,
    /// Penalty on low agreeableness
    pub agreeableness_weight: f64,
    /// Penalty on extraversion away from mid-range
    pub extraversion_weight: f64,
    /// Penalty on openness away from mid-range
    pub openness_weight: f64,
    pub perfect: f64,
    pub good: f64,
    pub moderate: f64,
}

impl Default for IndividualMatchConfig {
    fn default() -> Self {
        Self {
            skill_ceiling: 70.0,
            partial_credit: 0.5,
            personality_ceiling: 30.0,
            badness_ceiling: 7.5,
            conscientiousness_weight: 1.5,
            agreeableness_weight: 1.5,
            extraversion_weight: 1.0,
            openness_weight: 1.0,
            perfect: 80.0,
            good: 60.0,
            moderate: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapRankingConfig {
    /// Points available for closing skill gaps
    pub skill_ceiling: f64,
    /// Personality points every candidate starts with
    pub personality_base: f64,
    /// Bonus per preferred-high trait the candidate shows
    pub high_bonus: f64,
    /// Bonus per preferred-low trait the candidate shows
    pub low_bonus: f64,
    /// Cap on personality points
    pub personality_cap: f64,
    /// Normalized value at or above which a trait counts as high
    pub high_threshold: f64,
    /// Normalized value at or below which a trait counts as low
    pub low_threshold: f64,
}

impl Default for GapRankingConfig {
    fn default() -> Self {
        Self {
            skill_ceiling: 70.0,
            personality_base: 10.0,
            high_bonus: 3.0,
            low_bonus: 2.0,
            personality_cap: 20.0,
            high_threshold: 0.5,
            low_threshold: 0.25,
        }
    }
}

impl EngineConfig {
    /// Load configuration from file, with environment overrides
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(Self::environment())
            .build()?;

        let parsed: Self = settings.try_deserialize()?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(Self::environment())
            .build()?;

        let parsed: Self = settings.try_deserialize()?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Parse a TOML document
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;

        let parsed: Self = settings.try_deserialize()?;
        parsed.validate()?;
        Ok(parsed)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("TEAMFORGE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Reject settings the algorithms cannot run with
    pub fn validate(&self) -> Result<()> {
        self.scale.validate()?;
        self.cost.validate()?;
        self.score.validate()?;
        self.search.validate()?;
        self.headhunter.validate()?;
        self.individual.validate()?;
        self.gap.validate()
    }
}

fn check_unit(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::Config(format!("{name} must be in [0, 1], got {value}")));
    }
    Ok(())
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(Error::Config(format!("{name} must be positive, got {value}")));
    }
    Ok(())
}

fn check_descending(message: &str, thresholds: &[f64]) -> Result<()> {
    if thresholds.iter().any(|t| !t.is_finite()) || thresholds.windows(2).any(|w| w[0] < w[1]) {
        return Err(Error::Config(message.to_string()));
    }
    Ok(())
}

impl CostWeights {
    pub fn validate(&self) -> Result<()> {
        let weights = [
            self.conscientiousness,
            self.agreeableness,
            self.extraversion,
            self.openness,
            self.neuroticism,
            self.toxic_penalty,
        ];
        if weights.iter().any(|w| !(w.is_finite() && *w >= 0.0)) {
            return Err(Error::Config("cost weights must be non-negative".to_string()));
        }
        check_unit("cost.toxic_threshold", self.toxic_threshold)
    }
}

impl ScoreConfig {
    pub fn validate(&self) -> Result<()> {
        check_positive("score.scaling_max_cost", self.scaling_max_cost)?;
        check_descending(
            "score thresholds must descend: excellent >= good >= acceptable >= risky",
            &[self.excellent, self.good, self.acceptable, self.risky],
        )
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::Config("search.iterations must be at least 1".to_string()));
        }
        check_unit("search.mutation_probability", self.mutation_probability)?;
        if self.success_threshold.is_nan() {
            return Err(Error::Config("search.success_threshold must be a number".to_string()));
        }
        Ok(())
    }
}

impl HeadhunterConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.bias_weight.is_finite() {
            return Err(Error::Config(format!(
                "headhunter.bias_weight must be finite, got {}",
                self.bias_weight
            )));
        }
        Ok(())
    }
}

impl IndividualMatchConfig {
    pub fn validate(&self) -> Result<()> {
        check_unit("individual.partial_credit", self.partial_credit)?;
        check_positive("individual.badness_ceiling", self.badness_ceiling)?;
        check_descending(
            "match level thresholds must descend: perfect >= good >= moderate",
            &[self.perfect, self.good, self.moderate],
        )
    }
}

impl GapRankingConfig {
    pub fn validate(&self) -> Result<()> {
        check_unit("gap.high_threshold", self.high_threshold)?;
        check_unit("gap.low_threshold", self.low_threshold)?;
        if self.personality_cap < 0.0 || self.skill_ceiling < 0.0 {
            return Err(Error::Config("gap ceilings must be non-negative".to_string()));
        }
        Ok(())
    }
}
