//! Candidate profile store.
//!
//! Accumulates performance signal for one candidate session: per-skill
//! competency estimates, the monotonically growing set of tested areas, the
//! current working difficulty, and a trend indicator over recent scores.
//! Every mutation goes through [`CandidateProfile::record_evaluation`] and is
//! all-or-nothing: the taxonomy check runs before any state changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::errors::InterviewError;
use super::evaluation::ResponseEvaluation;
use super::ids::SessionId;
use super::skill::{Difficulty, SkillArea, SkillTaxonomy};

/// Tuning knobs for profile scoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileSettings {
    /// Weight of the newest score in the recency-aware average (`0.0..=1.0`).
    pub recency_weight: f64,
    /// Number of most recent scores the trend indicator looks at.
    pub trend_window: usize,
    /// Score delta over the window required to call a trend.
    pub trend_delta: f64,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            recency_weight: 0.4,
            trend_window: 3,
            trend_delta: 10.0,
        }
    }
}

/// Running competency estimate for one skill area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillEstimate {
    /// Recency-weighted average score.
    pub score: f64,
    /// Number of evaluations folded into the estimate.
    pub samples: u32,
}

/// Direction of the candidate's recent performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    #[default]
    Stable,
}

/// One point in the candidate's score trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub skill_area: SkillArea,
    pub score: f64,
    pub difficulty: Difficulty,
    pub recorded_at: DateTime<Utc>,
}

/// Accumulated performance signal for one candidate session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    session_id: SessionId,
    candidate_name: String,
    taxonomy: SkillTaxonomy,
    settings: ProfileSettings,
    estimates: BTreeMap<SkillArea, SkillEstimate>,
    tested: BTreeSet<SkillArea>,
    current_difficulty: Difficulty,
    trajectory: Vec<TrajectoryPoint>,
    trend_history: Vec<Trend>,
}

impl CandidateProfile {
    /// Creates an empty profile: no scores, every taxonomy area untested.
    pub fn new(
        session_id: SessionId,
        candidate_name: impl Into<String>,
        taxonomy: SkillTaxonomy,
        initial_difficulty: Difficulty,
        settings: ProfileSettings,
    ) -> Self {
        Self {
            session_id,
            candidate_name: candidate_name.into(),
            taxonomy,
            settings,
            estimates: BTreeMap::new(),
            tested: BTreeSet::new(),
            current_difficulty: initial_difficulty,
            trajectory: Vec::new(),
            trend_history: Vec::new(),
        }
    }

    /// Folds a completed evaluation into the profile.
    ///
    /// Fails with [`InterviewError::UnknownSkillArea`] before touching any
    /// state when the evaluation references an area outside the taxonomy.
    pub fn record_evaluation(
        &mut self,
        evaluation: &ResponseEvaluation,
    ) -> Result<(), InterviewError> {
        if !self.taxonomy.contains(&evaluation.skill_area) {
            return Err(InterviewError::UnknownSkillArea {
                skill: evaluation.skill_area.clone(),
            });
        }

        let weight = self.settings.recency_weight;
        self.estimates
            .entry(evaluation.skill_area.clone())
            .and_modify(|est| {
                est.score += weight * (evaluation.score - est.score);
                est.samples += 1;
            })
            .or_insert(SkillEstimate {
                score: evaluation.score,
                samples: 1,
            });

        self.tested.insert(evaluation.skill_area.clone());
        self.trajectory.push(TrajectoryPoint {
            skill_area: evaluation.skill_area.clone(),
            score: evaluation.score,
            difficulty: self.current_difficulty,
            recorded_at: evaluation.evaluated_at,
        });

        let trend = self.compute_trend();
        self.trend_history.push(trend);

        Ok(())
    }

    /// Trend over the last `trend_window` recorded scores. Fewer than two
    /// samples reads as stable.
    fn compute_trend(&self) -> Trend {
        let window = self.settings.trend_window.max(2);
        let scores: Vec<f64> = self
            .trajectory
            .iter()
            .rev()
            .take(window)
            .map(|p| p.score)
            .collect();

        if scores.len() < 2 {
            return Trend::Stable;
        }

        // `scores` is newest-first.
        let newest = scores[0];
        let oldest = scores[scores.len() - 1];
        if newest > oldest + self.settings.trend_delta {
            Trend::Improving
        } else if newest < oldest - self.settings.trend_delta {
            Trend::Declining
        } else {
            Trend::Stable
        }
    }

    /// Current trend indicator.
    pub fn trend(&self) -> Trend {
        self.trend_history.last().copied().unwrap_or_default()
    }

    /// True if the trend read stable after each of the last `n` evaluations.
    pub fn trend_stable_for(&self, n: usize) -> bool {
        self.trend_history.len() >= n
            && self
                .trend_history
                .iter()
                .rev()
                .take(n)
                .all(|t| *t == Trend::Stable)
    }

    /// Highest-priority taxonomy area that has not been tested yet.
    pub fn first_untested(&self) -> Option<&SkillArea> {
        self.taxonomy.areas().iter().find(|a| !self.tested.contains(a))
    }

    /// Weakest-scoring tested area; ties broken by taxonomy order.
    pub fn weakest_tested(&self) -> Option<(&SkillArea, SkillEstimate)> {
        self.taxonomy
            .areas()
            .iter()
            .filter_map(|area| self.estimates.get(area).map(|est| (area, *est)))
            .min_by(|(_, a), (_, b)| a.score.total_cmp(&b.score))
    }

    /// True once every taxonomy area has at least one evaluation.
    pub fn all_tested(&self) -> bool {
        self.tested.len() == self.taxonomy.len()
    }

    /// Tested areas scoring at or above the threshold, in taxonomy order.
    pub fn areas_scoring_at_least(&self, threshold: f64) -> Vec<SkillArea> {
        self.taxonomy
            .areas()
            .iter()
            .filter(|a| {
                self.estimates
                    .get(a)
                    .is_some_and(|est| est.score >= threshold)
            })
            .cloned()
            .collect()
    }

    /// Tested areas scoring below the threshold, in taxonomy order.
    pub fn areas_scoring_below(&self, threshold: f64) -> Vec<SkillArea> {
        self.taxonomy
            .areas()
            .iter()
            .filter(|a| {
                self.estimates
                    .get(a)
                    .is_some_and(|est| est.score < threshold)
            })
            .cloned()
            .collect()
    }

    /// Adjusts the working difficulty for subsequent questions.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.current_difficulty = difficulty;
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn candidate_name(&self) -> &str {
        &self.candidate_name
    }

    pub fn taxonomy(&self) -> &SkillTaxonomy {
        &self.taxonomy
    }

    pub fn current_difficulty(&self) -> Difficulty {
        self.current_difficulty
    }

    /// Per-skill estimates for tested areas.
    pub fn estimates(&self) -> &BTreeMap<SkillArea, SkillEstimate> {
        &self.estimates
    }

    /// Estimate for a single area, if tested.
    pub fn estimate(&self, area: &SkillArea) -> Option<SkillEstimate> {
        self.estimates.get(area).copied()
    }

    /// Areas with at least one evaluation.
    pub fn tested(&self) -> &BTreeSet<SkillArea> {
        &self.tested
    }

    /// Untested areas, in taxonomy priority order.
    pub fn untested(&self) -> Vec<SkillArea> {
        self.taxonomy
            .areas()
            .iter()
            .filter(|a| !self.tested.contains(a))
            .cloned()
            .collect()
    }

    /// Full score trajectory, oldest first.
    pub fn trajectory(&self) -> &[TrajectoryPoint] {
        &self.trajectory
    }
}
