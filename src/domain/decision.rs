//! Decision module: the pure per-turn trajectory policy.
//!
//! Given the updated profile and the question budget, [`DecisionPolicy::decide`]
//! picks the next action. It is deterministic for identical inputs; there is
//! no randomness and no clock, which keeps the interview loop reproducible.

use serde::{Deserialize, Serialize};

use super::profile::CandidateProfile;
use super::skill::{Difficulty, SkillArea};

/// The per-turn choice of next action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrajectoryAction {
    /// Keep probing with an already-prepared question.
    Continue,
    /// Switch focus to a different skill area.
    Refocus,
    /// Switch focus and change the working difficulty.
    AdjustDifficulty,
    /// End the assessment.
    Terminate,
}

/// One per-turn trajectory decision, appended to the session history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryDecision {
    /// Chosen action.
    pub action: TrajectoryAction,
    /// Skill area selected for the next question, absent on termination.
    pub target: Option<SkillArea>,
    /// Difficulty for the next question, absent on termination.
    pub difficulty: Option<Difficulty>,
    /// Logged reasoning behind the choice.
    pub rationale: String,
}

impl TrajectoryDecision {
    /// Builds a termination decision.
    pub fn terminate(rationale: impl Into<String>) -> Self {
        Self {
            action: TrajectoryAction::Terminate,
            target: None,
            difficulty: None,
            rationale: rationale.into(),
        }
    }

    /// Builds a refocus decision at the given difficulty.
    pub fn refocus(
        target: SkillArea,
        difficulty: Difficulty,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            action: TrajectoryAction::Refocus,
            target: Some(target),
            difficulty: Some(difficulty),
            rationale: rationale.into(),
        }
    }

    /// Builds a difficulty-adjusting decision.
    pub fn adjust(
        target: SkillArea,
        difficulty: Difficulty,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            action: TrajectoryAction::AdjustDifficulty,
            target: Some(target),
            difficulty: Some(difficulty),
            rationale: rationale.into(),
        }
    }

    /// Builds a continue decision; used by the orchestrator when the queued
    /// question already satisfies the policy's target.
    pub fn continue_with(
        target: SkillArea,
        difficulty: Difficulty,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            action: TrajectoryAction::Continue,
            target: Some(target),
            difficulty: Some(difficulty),
            rationale: rationale.into(),
        }
    }

    /// True when the decision ends the session.
    pub fn is_terminal(&self) -> bool {
        self.action == TrajectoryAction::Terminate
    }
}

/// Score thresholds driving difficulty adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionPolicy {
    /// At or above this estimate the weakest area is probed harder.
    pub raise_threshold: f64,
    /// Below this estimate the weakest area is probed easier.
    pub lower_threshold: f64,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            raise_threshold: 80.0,
            lower_threshold: 60.0,
        }
    }
}

impl DecisionPolicy {
    /// Decides the next trajectory step. Rules are evaluated in order:
    ///
    /// 1. question budget exhausted: terminate;
    /// 2. full coverage and a trend that read stable after each of the last
    ///    two evaluations: terminate;
    /// 3. any untested area: refocus to the highest-priority one at the
    ///    current difficulty;
    /// 4. otherwise target the weakest tested area, raising difficulty for a
    ///    high estimate, lowering it for a low one, keeping it in between.
    pub fn decide(
        &self,
        profile: &CandidateProfile,
        questions_asked: usize,
        max_questions: usize,
    ) -> TrajectoryDecision {
        if questions_asked >= max_questions {
            return TrajectoryDecision::terminate(format!(
                "reached the maximum of {} questions",
                max_questions
            ));
        }

        if profile.all_tested() && profile.trend_stable_for(2) {
            return TrajectoryDecision::terminate(
                "all skill areas tested and performance stable across the last two evaluations",
            );
        }

        if let Some(untested) = profile.first_untested() {
            return TrajectoryDecision::refocus(
                untested.clone(),
                profile.current_difficulty(),
                format!("probing untested area '{}' next by taxonomy priority", untested),
            );
        }

        // All areas tested but the trend has not settled: drill into the
        // weakest one. The empty-taxonomy case never reaches here because
        // all_tested() is trivially true for it.
        match profile.weakest_tested() {
            Some((weakest, estimate)) => {
                let current = profile.current_difficulty();
                let adjusted = if estimate.score >= self.raise_threshold {
                    current.raised()
                } else if estimate.score < self.lower_threshold {
                    current.lowered()
                } else {
                    current
                };

                if adjusted != current {
                    TrajectoryDecision::adjust(
                        weakest.clone(),
                        adjusted,
                        format!(
                            "weakest area '{}' scores {:.0}; moving difficulty {} -> {}",
                            weakest, estimate.score, current, adjusted
                        ),
                    )
                } else {
                    TrajectoryDecision::refocus(
                        weakest.clone(),
                        current,
                        format!(
                            "weakest area '{}' scores {:.0}; probing again at {} difficulty",
                            weakest, estimate.score, current
                        ),
                    )
                }
            }
            None => TrajectoryDecision::terminate("no skill areas to assess"),
        }
    }
}
