//! QueCraft adapter: LLM-backed question and dataset generation.
//!
//! Builds an adaptive prompt from the candidate's profile, asks the chat
//! client for a JSON batch, and parses it into domain questions. Parsing is
//! strict about structure but lenient about optional fields the model may
//! omit.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::domain::{
    CandidateProfile, DataIssue, DataIssueKind, Dataset, Difficulty, Question, SkillArea, Trend,
};
use crate::ports::{GeneratedQuestion, GenerationFailure, QuestionGateway};

use super::client::{extract_json_block, ChatClient, ChatError};

const SYSTEM_PROMPT: &str = "You are QueCraft, an expert Excel interview question designer. \
You produce practical, scenario-based Excel questions with small synthetic datasets. \
Respond with JSON only, no prose, matching the schema the user provides.";

/// [`QuestionGateway`] implementation backed by a chat-completions model.
pub struct QueCraftGateway {
    client: Arc<ChatClient>,
}

impl QueCraftGateway {
    pub fn new(client: Arc<ChatClient>) -> Self {
        Self { client }
    }

    fn build_prompt(
        profile: &CandidateProfile,
        target: &SkillArea,
        difficulty: Difficulty,
        count: usize,
    ) -> String {
        let mut prompt = String::new();

        prompt.push_str(&format!(
            "Generate {count} Excel interview question(s) targeting the skill area \
             \"{target}\" at {difficulty} difficulty.\n\n"
        ));

        prompt.push_str("Candidate performance so far:\n");
        if profile.estimates().is_empty() {
            prompt.push_str("- No areas assessed yet; this is the opening of the interview.\n");
        } else {
            for (area, estimate) in profile.estimates() {
                prompt.push_str(&format!(
                    "- {}: {:.0}/100 over {} answer(s)\n",
                    area, estimate.score, estimate.samples
                ));
            }
            let trend = match profile.trend() {
                Trend::Improving => "improving",
                Trend::Declining => "declining",
                Trend::Stable => "stable",
            };
            prompt.push_str(&format!("- Recent trend: {trend}\n"));
        }

        let untested = profile.untested();
        if !untested.is_empty() {
            prompt.push_str(&format!(
                "- Not yet assessed: {}\n",
                untested
                    .iter()
                    .map(|a| a.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        prompt.push_str(
            "\nEach question must describe a realistic business scenario. When the task \
             involves working with data, include a small dataset (4-8 rows) and bake in \
             realistic quality issues.\n\nRespond with this JSON schema:\n",
        );
        prompt.push_str(
            r#"{
  "questions": [
    {
      "scenario": "...",
      "skill_area": "...",
      "difficulty": "easy|medium|hard",
      "dataset": {
        "columns": ["..."],
        "rows": [["..."]],
        "issues": [{"column": "...", "kind": "missing_values|inconsistent_format|duplicates"}]
      }
    }
  ]
}
The "dataset" field may be null for conceptual questions."#,
        );

        prompt
    }

    fn parse_batch(
        raw: &str,
        target: &SkillArea,
        difficulty: Difficulty,
    ) -> Result<Vec<GeneratedQuestion>, GenerationFailure> {
        let payload = extract_json_block(raw);
        let wire: WireBatch = serde_json::from_str(payload)
            .map_err(|e| GenerationFailure::MalformedOutput(e.to_string()))?;

        if wire.questions.is_empty() {
            return Err(GenerationFailure::EmptyBatch);
        }

        let mut batch = Vec::with_capacity(wire.questions.len());
        for wire_question in wire.questions {
            if wire_question.scenario.trim().is_empty() {
                return Err(GenerationFailure::MalformedOutput(
                    "question with empty scenario".to_string(),
                ));
            }

            // The model sometimes drifts off target; pin the requested skill
            // and difficulty so downstream bookkeeping stays coherent.
            let skill_area = wire_question
                .skill_area
                .map(SkillArea::new)
                .unwrap_or_else(|| target.clone());
            let parsed_difficulty = wire_question
                .difficulty
                .as_deref()
                .and_then(parse_difficulty)
                .unwrap_or(difficulty);

            let dataset = wire_question.dataset.map(WireDataset::into_dataset);
            if let Some(dataset) = &dataset {
                validate_dataset(dataset)?;
            }

            batch.push(GeneratedQuestion {
                question: Question::new(skill_area, parsed_difficulty, wire_question.scenario),
                dataset,
            });
        }

        Ok(batch)
    }
}

#[async_trait]
impl QuestionGateway for QueCraftGateway {
    async fn generate_batch(
        &self,
        profile: &CandidateProfile,
        target: &SkillArea,
        difficulty: Difficulty,
        count: usize,
    ) -> Result<Vec<GeneratedQuestion>, GenerationFailure> {
        let prompt = Self::build_prompt(profile, target, difficulty, count);
        debug!(%target, %difficulty, count, "requesting question batch");

        let raw = self
            .client
            .complete(SYSTEM_PROMPT, &prompt)
            .await
            .map_err(map_chat_error)?;

        Self::parse_batch(&raw, target, difficulty)
    }
}

fn map_chat_error(error: ChatError) -> GenerationFailure {
    match error {
        ChatError::RateLimited { retry_after_secs } => {
            GenerationFailure::RateLimited { retry_after_secs }
        }
        ChatError::AuthenticationFailed => GenerationFailure::AuthenticationFailed,
        ChatError::Unavailable { message } => GenerationFailure::Unavailable { message },
        ChatError::Network(message) => GenerationFailure::Network(message),
        ChatError::Parse(message) | ChatError::InvalidRequest(message) => {
            GenerationFailure::MalformedOutput(message)
        }
        ChatError::Timeout { timeout_secs } => GenerationFailure::Timeout { timeout_secs },
    }
}

fn parse_difficulty(label: &str) -> Option<Difficulty> {
    match label.trim().to_ascii_lowercase().as_str() {
        "easy" => Some(Difficulty::Easy),
        "medium" => Some(Difficulty::Medium),
        "hard" => Some(Difficulty::Hard),
        _ => None,
    }
}

fn validate_dataset(dataset: &Dataset) -> Result<(), GenerationFailure> {
    if dataset.columns.is_empty() {
        return Err(GenerationFailure::MalformedOutput(
            "dataset with no columns".to_string(),
        ));
    }
    for row in &dataset.rows {
        if row.len() != dataset.columns.len() {
            return Err(GenerationFailure::MalformedOutput(format!(
                "dataset row has {} cells for {} columns",
                row.len(),
                dataset.columns.len()
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct WireBatch {
    #[serde(default)]
    questions: Vec<WireQuestion>,
}

#[derive(Debug, Deserialize)]
struct WireQuestion {
    scenario: String,
    #[serde(default)]
    skill_area: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    dataset: Option<WireDataset>,
}

#[derive(Debug, Deserialize)]
struct WireDataset {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    #[serde(default)]
    issues: Vec<WireIssue>,
}

impl WireDataset {
    fn into_dataset(self) -> Dataset {
        let mut dataset = Dataset::new(self.columns, self.rows);
        for issue in self.issues {
            if let Some(kind) = issue.parse_kind() {
                dataset = dataset.with_issue(DataIssue {
                    column: issue.column,
                    kind,
                });
            }
        }
        dataset
    }
}

#[derive(Debug, Deserialize)]
struct WireIssue {
    column: String,
    kind: String,
}

impl WireIssue {
    fn parse_kind(&self) -> Option<DataIssueKind> {
        match self.kind.as_str() {
            "missing_values" => Some(DataIssueKind::MissingValues),
            "inconsistent_format" => Some(DataIssueKind::InconsistentFormat),
            "duplicates" => Some(DataIssueKind::Duplicates),
            _ => None,
        }
    }
}
