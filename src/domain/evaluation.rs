//! Structured assessment of one candidate response.
//!
//! Produced once per response by the evaluation capability and never
//! mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::QuestionId;
use super::skill::SkillArea;

/// Maximum score an evaluation can award.
pub const MAX_SCORE: f64 = 100.0;

/// Scored assessment of a candidate's free-text answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEvaluation {
    /// Question being answered.
    pub question_id: QuestionId,
    /// Skill area the question probed.
    pub skill_area: SkillArea,
    /// Score in `0.0..=100.0`.
    pub score: f64,
    /// Coarse grade band.
    pub grade: Grade,
    /// Identified strength tags.
    pub strengths: Vec<String>,
    /// Identified weakness tags.
    pub weaknesses: Vec<String>,
    /// Free-text justification of the grade.
    pub rationale: String,
    /// Suggested follow-up probe, if the evaluator wanted one. Surfaced to
    /// the presentation layer only; the decision loop ignores it to stay
    /// deterministic.
    pub follow_up: Option<String>,
    /// When the evaluation was produced.
    pub evaluated_at: DateTime<Utc>,
}

impl ResponseEvaluation {
    /// Creates an evaluation, clamping the score into the valid range.
    pub fn new(
        question_id: QuestionId,
        skill_area: SkillArea,
        score: f64,
        grade: Grade,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            question_id,
            skill_area,
            score: score.clamp(0.0, MAX_SCORE),
            grade,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            rationale: rationale.into(),
            follow_up: None,
            evaluated_at: Utc::now(),
        }
    }

    /// Adds strength tags.
    pub fn with_strengths(mut self, strengths: Vec<String>) -> Self {
        self.strengths = strengths;
        self
    }

    /// Adds weakness tags.
    pub fn with_weaknesses(mut self, weaknesses: Vec<String>) -> Self {
        self.weaknesses = weaknesses;
        self
    }

    /// Records a suggested follow-up probe.
    pub fn with_follow_up(mut self, follow_up: impl Into<String>) -> Self {
        self.follow_up = Some(follow_up.into());
        self
    }
}

/// Grade bands used by the reviewer role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    Satisfactory,
    PartlyAcceptable,
    Unsatisfactory,
    RequiresMoreAssessment,
}

impl Grade {
    /// Parses the reviewer's free-form grade label.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "satisfactory" => Some(Grade::Satisfactory),
            "partly acceptable" => Some(Grade::PartlyAcceptable),
            "unsatisfactory" => Some(Grade::Unsatisfactory),
            "requires more assessment" => Some(Grade::RequiresMoreAssessment),
            _ => None,
        }
    }
}

/// Outcome of one evaluation attempt, including the degraded case where the
/// evaluator could not produce a score after retries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EvaluationOutcome {
    /// The evaluator produced a valid assessment.
    Scored(ResponseEvaluation),
    /// Retries were exhausted; the question neither credits nor penalizes
    /// any skill score.
    Failed {
        /// Why the evaluation could not complete.
        reason: String,
    },
}

impl EvaluationOutcome {
    /// Returns the evaluation when one was produced.
    pub fn evaluation(&self) -> Option<&ResponseEvaluation> {
        match self {
            EvaluationOutcome::Scored(eval) => Some(eval),
            EvaluationOutcome::Failed { .. } => None,
        }
    }
}

/// One completed interview turn: the question, the candidate's answer, and
/// what the evaluator made of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// The question as presented.
    pub question: super::question::Question,
    /// The candidate's verbatim answer.
    pub answer: String,
    /// Evaluation outcome for this turn.
    pub outcome: EvaluationOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::skill::Difficulty;

    #[test]
    fn score_is_clamped_into_range() {
        let eval = ResponseEvaluation::new(
            QuestionId::new(),
            SkillArea::from("Lookups"),
            140.0,
            Grade::Satisfactory,
            "solid",
        );
        assert_eq!(eval.score, MAX_SCORE);

        let eval = ResponseEvaluation::new(
            QuestionId::new(),
            SkillArea::from("Lookups"),
            -3.0,
            Grade::Unsatisfactory,
            "weak",
        );
        assert_eq!(eval.score, 0.0);
    }

    #[test]
    fn grade_parses_reviewer_labels() {
        assert_eq!(Grade::parse("Satisfactory"), Some(Grade::Satisfactory));
        assert_eq!(
            Grade::parse("partly acceptable"),
            Some(Grade::PartlyAcceptable)
        );
        assert_eq!(
            Grade::parse("Requires More Assessment"),
            Some(Grade::RequiresMoreAssessment)
        );
        assert_eq!(Grade::parse("excellent"), None);
    }

    #[test]
    fn failed_outcome_has_no_evaluation() {
        let outcome = EvaluationOutcome::Failed {
            reason: "evaluator unavailable".into(),
        };
        assert!(outcome.evaluation().is_none());
    }

    #[test]
    fn record_keeps_question_and_answer_together() {
        let question = crate::domain::question::Question::new(
            SkillArea::from("Charts"),
            Difficulty::Easy,
            "Which chart fits a trend over time?",
        );
        let eval = ResponseEvaluation::new(
            question.id,
            question.skill_area.clone(),
            75.0,
            Grade::PartlyAcceptable,
            "mostly right",
        );
        let record = EvaluationRecord {
            question,
            answer: "A line chart".into(),
            outcome: EvaluationOutcome::Scored(eval),
        };
        assert_eq!(record.outcome.evaluation().unwrap().score, 75.0);
    }
}
