//! Ports - Interfaces for external capabilities.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `QuestionGateway` - Adaptive question/dataset generation (QueCraft role)
//! - `ResponseEvaluator` - Free-text response scoring (Reviewer role)
//!
//! Both capabilities are backed by external LLM calls and are modeled as
//! slow, fallible remote operations with typed, retry-classified failures.

mod question_gateway;
mod response_evaluator;

pub use question_gateway::{GeneratedQuestion, GenerationFailure, QuestionGateway};
pub use response_evaluator::{EvaluationFailure, ResponseEvaluator};
