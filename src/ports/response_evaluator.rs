//! Response Evaluator port.
//!
//! Abstracts the capability that scores a candidate's free-text answer
//! against a question (the Reviewer role). Implementations live in
//! `adapters::ai`.

use async_trait::async_trait;

use crate::domain::{Question, ResponseEvaluation};

/// Port for response scoring.
///
/// Like the gateway, calls are slow and fallible; the orchestrator wraps
/// them in a timeout and a bounded retry loop, and degrades gracefully when
/// retries exhaust.
#[async_trait]
pub trait ResponseEvaluator: Send + Sync {
    /// Scores `response_text` against the question, returning a structured
    /// assessment.
    async fn evaluate(
        &self,
        question: &Question,
        response_text: &str,
    ) -> Result<ResponseEvaluation, EvaluationFailure>;
}

/// Failure modes of response evaluation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EvaluationFailure {
    /// The model output could not be parsed into an evaluation.
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
    #[error("evaluation timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },
}

impl EvaluationFailure {
    /// True when another attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, EvaluationFailure::AuthenticationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(EvaluationFailure::MalformedOutput("junk".into()).is_retryable());
        assert!(EvaluationFailure::Unavailable { message: "down".into() }.is_retryable());
        assert!(EvaluationFailure::Network("reset".into()).is_retryable());
        assert!(!EvaluationFailure::AuthenticationFailed.is_retryable());
    }

    #[test]
    fn failures_display_their_cause() {
        let err = EvaluationFailure::Timeout { timeout_secs: 45 };
        assert_eq!(err.to_string(), "evaluation timed out after 45s");
    }
}
