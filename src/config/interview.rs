//! Interview flow configuration

use serde::Deserialize;
use std::time::Duration;

use crate::domain::{DecisionPolicy, Difficulty, ProfileSettings, SkillArea, SkillTaxonomy};

use super::error::ValidationError;

/// Interview flow configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InterviewConfig {
    /// Hard upper bound on evaluated questions per session
    #[serde(default = "default_max_questions")]
    pub max_questions: usize,

    /// Questions requested per generation round
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Difficulty of the opening questions
    #[serde(default)]
    pub initial_difficulty: Difficulty,

    /// Comma-separated skill areas; unset means the default Excel taxonomy
    pub skill_areas: Option<String>,

    /// Weight of the newest score in the recency-aware average
    #[serde(default = "default_recency_weight")]
    pub recency_weight: f64,

    /// Number of recent scores the trend indicator looks at
    #[serde(default = "default_trend_window")]
    pub trend_window: usize,

    /// Score delta over the window required to call a trend
    #[serde(default = "default_trend_delta")]
    pub trend_delta: f64,

    /// Score at or above which difficulty is raised
    #[serde(default = "default_raise_threshold")]
    pub raise_threshold: f64,

    /// Score below which difficulty is lowered
    #[serde(default = "default_lower_threshold")]
    pub lower_threshold: f64,

    /// Whole-session deadline in seconds; 0 disables expiry
    #[serde(default = "default_session_timeout")]
    pub session_timeout_secs: u64,
}

impl InterviewConfig {
    /// Skill taxonomy from configuration, falling back to the default Excel
    /// categories.
    pub fn taxonomy(&self) -> SkillTaxonomy {
        match &self.skill_areas {
            Some(raw) if !raw.trim().is_empty() => SkillTaxonomy::new(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(SkillArea::new),
            ),
            _ => SkillTaxonomy::default_excel(),
        }
    }

    /// Profile scoring knobs.
    pub fn profile_settings(&self) -> ProfileSettings {
        ProfileSettings {
            recency_weight: self.recency_weight,
            trend_window: self.trend_window,
            trend_delta: self.trend_delta,
        }
    }

    /// Decision thresholds.
    pub fn decision_policy(&self) -> DecisionPolicy {
        DecisionPolicy {
            raise_threshold: self.raise_threshold,
            lower_threshold: self.lower_threshold,
        }
    }

    /// Session deadline, or `None` when disabled.
    pub fn session_timeout(&self) -> Option<Duration> {
        (self.session_timeout_secs > 0).then(|| Duration::from_secs(self.session_timeout_secs))
    }

    /// Validate interview configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_questions == 0 {
            return Err(ValidationError::InvalidMaxQuestions);
        }
        if self.batch_size == 0 {
            return Err(ValidationError::InvalidBatchSize);
        }
        if !(self.recency_weight > 0.0 && self.recency_weight <= 1.0) {
            return Err(ValidationError::InvalidRecencyWeight);
        }
        if self.trend_window < 2 {
            return Err(ValidationError::InvalidTrendWindow);
        }
        if !(0.0..=100.0).contains(&self.lower_threshold)
            || !(0.0..=100.0).contains(&self.raise_threshold)
            || self.lower_threshold >= self.raise_threshold
        {
            return Err(ValidationError::InvalidThresholds);
        }
        if self.taxonomy().is_empty() {
            return Err(ValidationError::EmptyTaxonomy);
        }
        Ok(())
    }
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            max_questions: default_max_questions(),
            batch_size: default_batch_size(),
            initial_difficulty: Difficulty::default(),
            skill_areas: None,
            recency_weight: default_recency_weight(),
            trend_window: default_trend_window(),
            trend_delta: default_trend_delta(),
            raise_threshold: default_raise_threshold(),
            lower_threshold: default_lower_threshold(),
            session_timeout_secs: default_session_timeout(),
        }
    }
}

fn default_max_questions() -> usize {
    10
}

fn default_batch_size() -> usize {
    2
}

fn default_recency_weight() -> f64 {
    0.4
}

fn default_trend_window() -> usize {
    3
}

fn default_trend_delta() -> f64 {
    10.0
}

fn default_raise_threshold() -> f64 {
    80.0
}

fn default_lower_threshold() -> f64 {
    60.0
}

fn default_session_timeout() -> u64 {
    30 * 60
}
