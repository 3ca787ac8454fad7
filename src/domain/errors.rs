//! Interview error taxonomy.

use thiserror::Error;

use super::skill::SkillArea;
use crate::ports::{EvaluationFailure, GenerationFailure};

/// Errors surfaced by the interview session.
///
/// Generation and evaluation failures are retried locally before they reach
/// this level; an [`InterviewError::UnknownSkillArea`] is a data
/// inconsistency between generated content and the fixed taxonomy and is
/// never retried.
#[derive(Debug, Error)]
pub enum InterviewError {
    /// The gateway could not produce a valid question/dataset batch.
    #[error("question generation failed: {0}")]
    Generation(#[from] GenerationFailure),

    /// The evaluator could not produce a valid score.
    #[error("response evaluation failed: {0}")]
    Evaluation(#[from] EvaluationFailure),

    /// Generated content referenced a skill area outside the taxonomy.
    #[error("unknown skill area: {skill}")]
    UnknownSkillArea {
        /// The offending skill area.
        skill: SkillArea,
    },

    /// The session deadline elapsed; partial results are preserved on the
    /// session.
    #[error("session expired after {elapsed_secs}s")]
    SessionExpired {
        /// Seconds the session had been running.
        elapsed_secs: u64,
    },

    /// Operation not valid in the session's current state.
    #[error("invalid session state: {0}")]
    InvalidState(String),
}
