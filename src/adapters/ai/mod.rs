//! AI Adapters.
//!
//! Implementations of the `QuestionGateway` and `ResponseEvaluator` ports.
//!
//! ## Available Adapters
//!
//! - `QueCraftGateway` / `ReviewerEvaluator` - OpenAI chat-completions backed
//! - `MockGateway` / `MockEvaluator` - Scriptable doubles for tests and
//!   offline runs

mod client;
mod mock;
mod quecraft;
mod reviewer;

pub use client::{ChatClient, ChatClientConfig, ChatError};
pub use mock::{GatewayCall, MockEvaluator, MockGateway};
pub use quecraft::QueCraftGateway;
pub use reviewer::ReviewerEvaluator;
