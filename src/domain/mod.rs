//! Domain layer containing the interview business logic.
//!
//! # Module Organization
//!
//! - `ids` - Strongly-typed session and question identifiers
//! - `skill` - Skill taxonomy and ordinal difficulty
//! - `question` - Questions and their synthetic datasets
//! - `evaluation` - Scored assessments of candidate responses
//! - `profile` - Candidate profile store (per-session performance signal)
//! - `decision` - Deterministic trajectory decision policy
//! - `errors` - Interview error taxonomy
//!
//! Nothing in this module performs I/O or knows about LLM providers.

pub mod decision;
pub mod errors;
pub mod evaluation;
pub mod ids;
pub mod profile;
pub mod question;
pub mod skill;

pub use decision::{DecisionPolicy, TrajectoryAction, TrajectoryDecision};
pub use errors::InterviewError;
pub use evaluation::{EvaluationOutcome, EvaluationRecord, Grade, ResponseEvaluation};
pub use ids::{QuestionId, SessionId};
pub use profile::{CandidateProfile, ProfileSettings, SkillEstimate, TrajectoryPoint, Trend};
pub use question::{DataIssue, DataIssueKind, Dataset, Question};
pub use skill::{Difficulty, SkillArea, SkillTaxonomy};
