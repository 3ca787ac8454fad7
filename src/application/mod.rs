//! Application layer - the interview session loop.
//!
//! This layer orchestrates domain operations and coordinates between ports:
//! the per-session state machine lives in `orchestrator`, and `retry` wraps
//! every remote capability call in a timeout plus bounded backoff.

pub mod orchestrator;
pub mod retry;

pub use orchestrator::{
    CompletionReason, InterviewReport, InterviewSession, InterviewState, ProgressSnapshot,
    SessionSettings, Turn,
};
pub use retry::{with_retries, Retryable, RetryPolicy};
