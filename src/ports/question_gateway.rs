//! Question/Data Generation Gateway port.
//!
//! Abstracts the capability that produces a batch of interview questions
//! with matching synthetic datasets; backed externally by an LLM call
//! (the QueCraft role). Implementations live in `adapters::ai`.

use async_trait::async_trait;

use crate::domain::{CandidateProfile, Dataset, Difficulty, Question, SkillArea};

/// A generated question and its optional supporting dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedQuestion {
    pub question: Question,
    pub dataset: Option<Dataset>,
}

impl GeneratedQuestion {
    /// Folds the dataset into the question for presentation.
    pub fn into_question(self) -> Question {
        match self.dataset {
            Some(dataset) => self.question.with_dataset(dataset),
            None => self.question,
        }
    }
}

/// Port for adaptive question generation.
///
/// Calls are treated as slow, fallible remote operations: the orchestrator
/// wraps every call in a timeout and a bounded retry loop.
#[async_trait]
pub trait QuestionGateway: Send + Sync {
    /// Generates `count` questions targeting one skill area at one
    /// difficulty, informed by the candidate's profile so far.
    ///
    /// An empty batch is a [`GenerationFailure::EmptyBatch`], never an empty
    /// `Ok`.
    async fn generate_batch(
        &self,
        profile: &CandidateProfile,
        target: &SkillArea,
        difficulty: Difficulty,
        count: usize,
    ) -> Result<Vec<GeneratedQuestion>, GenerationFailure>;
}

/// Failure modes of question generation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GenerationFailure {
    /// The model produced no usable questions.
    #[error("model returned an empty question batch")]
    EmptyBatch,

    /// The model output could not be parsed into questions.
    #[error("malformed model output: {0}")]
    MalformedOutput(String),

    /// Rate limited by the provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during the request.
    #[error("network error: {0}")]
    Network(String),

    /// The call exceeded its configured timeout.
    #[error("generation timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },
}

impl GenerationFailure {
    /// True when another attempt may succeed. Authentication failures never
    /// do; malformed or empty model output often does, because generation is
    /// not deterministic on the provider side.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, GenerationFailure::AuthenticationFailed)
    }
}
