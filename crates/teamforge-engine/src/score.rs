//! Cost → 0-100 score → qualitative rating.

use teamforge_core::{CostEvaluation, Rating, Result};

use crate::config::ScoreConfig;

/// Maps a team cost onto a bounded score and its rating bucket
#[derive(Debug, Clone, Default)]
pub struct ScoreTransform {
    config: ScoreConfig,
}

impl ScoreTransform {
    pub fn new(config: ScoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// `100 · clamp01(1 − cost / scaling_max_cost)`, rounded to one decimal.
    ///
    /// Non-finite costs (incomplete data) score 0.
    pub fn score(&self, cost: f64) -> f64 {
        if !cost.is_finite() {
            return 0.0;
        }
        let fraction = (1.0 - cost / self.config.scaling_max_cost).clamp(0.0, 1.0);
        (fraction * 1000.0).round() / 10.0
    }

    pub fn rating(&self, score: f64) -> Rating {
        let c = &self.config;
        if score >= c.excellent {
            Rating::Excellent
        } else if score >= c.good {
            Rating::Good
        } else if score >= c.acceptable {
            Rating::Acceptable
        } else if score >= c.risky {
            Rating::Risky
        } else {
            Rating::NotRecommended
        }
    }

    pub fn evaluate(&self, cost: f64) -> CostEvaluation {
        if !cost.is_finite() {
            return CostEvaluation::rejected();
        }
        let score = self.score(cost);
        CostEvaluation {
            cost,
            score,
            rating: self.rating(score),
        }
    }

    pub fn config(&self) -> &ScoreConfig {
        &self.config
    }
}
