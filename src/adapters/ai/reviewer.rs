//! Reviewer adapter: LLM-backed response evaluation.
//!
//! Sends the question, its dataset, and the candidate's verbatim answer to
//! the chat client and parses the returned assessment. The grade label is
//! parsed leniently; when the model invents a label, the score decides the
//! band instead of failing the whole evaluation.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::domain::{Grade, Question, ResponseEvaluation};
use crate::ports::{EvaluationFailure, ResponseEvaluator};

use super::client::{extract_json_block, ChatClient, ChatError};

const SYSTEM_PROMPT: &str = "You are an expert Excel interviewer reviewing a candidate's \
answer. Grade rigorously but fairly, crediting correct reasoning even when the exact \
function name is off. Respond with JSON only, matching the schema the user provides.";

/// [`ResponseEvaluator`] implementation backed by a chat-completions model.
pub struct ReviewerEvaluator {
    client: Arc<ChatClient>,
}

impl ReviewerEvaluator {
    pub fn new(client: Arc<ChatClient>) -> Self {
        Self { client }
    }

    fn build_prompt(question: &Question, response_text: &str) -> String {
        let mut prompt = String::new();

        prompt.push_str(&format!(
            "Question ({} difficulty, skill area \"{}\"):\n{}\n",
            question.difficulty, question.skill_area, question.scenario
        ));

        if let Some(dataset) = &question.dataset {
            prompt.push_str("\nDataset provided with the question:\n");
            prompt.push_str(&dataset.columns.join(" | "));
            prompt.push('\n');
            for row in &dataset.rows {
                prompt.push_str(&row.join(" | "));
                prompt.push('\n');
            }
        }

        prompt.push_str(&format!("\nCandidate's answer:\n{response_text}\n"));

        prompt.push_str(
            "\nAssess the answer. Grade must be one of: Satisfactory, Partly Acceptable, \
             Unsatisfactory, Requires More Assessment. Score is 0-100.\n\
             Respond with this JSON schema:\n",
        );
        prompt.push_str(
            r#"{
  "grade": "...",
  "score": 0,
  "justification": "...",
  "strengths": ["..."],
  "weaknesses": ["..."],
  "follow_up": null
}"#,
        );

        prompt
    }

    fn parse_evaluation(
        raw: &str,
        question: &Question,
    ) -> Result<ResponseEvaluation, EvaluationFailure> {
        let payload = extract_json_block(raw);
        let wire: WireEvaluation = serde_json::from_str(payload)
            .map_err(|e| EvaluationFailure::MalformedOutput(e.to_string()))?;

        if !wire.score.is_finite() {
            return Err(EvaluationFailure::MalformedOutput(
                "non-finite score".to_string(),
            ));
        }

        let grade = wire
            .grade
            .as_deref()
            .and_then(Grade::parse)
            .unwrap_or_else(|| grade_from_score(wire.score));

        let mut evaluation = ResponseEvaluation::new(
            question.id,
            question.skill_area.clone(),
            wire.score,
            grade,
            wire.justification,
        )
        .with_strengths(wire.strengths)
        .with_weaknesses(wire.weaknesses);

        if let Some(follow_up) = wire.follow_up {
            if !follow_up.trim().is_empty() {
                evaluation = evaluation.with_follow_up(follow_up);
            }
        }

        Ok(evaluation)
    }
}

#[async_trait]
impl ResponseEvaluator for ReviewerEvaluator {
    async fn evaluate(
        &self,
        question: &Question,
        response_text: &str,
    ) -> Result<ResponseEvaluation, EvaluationFailure> {
        let prompt = Self::build_prompt(question, response_text);
        debug!(question_id = %question.id, "requesting response evaluation");

        let raw = self
            .client
            .complete(SYSTEM_PROMPT, &prompt)
            .await
            .map_err(map_chat_error)?;

        Self::parse_evaluation(&raw, question)
    }
}

fn map_chat_error(error: ChatError) -> EvaluationFailure {
    match error {
        ChatError::RateLimited { retry_after_secs } => {
            EvaluationFailure::RateLimited { retry_after_secs }
        }
        ChatError::AuthenticationFailed => EvaluationFailure::AuthenticationFailed,
        ChatError::Unavailable { message } => EvaluationFailure::Unavailable { message },
        ChatError::Network(message) => EvaluationFailure::Network(message),
        ChatError::Parse(message) | ChatError::InvalidRequest(message) => {
            EvaluationFailure::MalformedOutput(message)
        }
        ChatError::Timeout { timeout_secs } => EvaluationFailure::Timeout { timeout_secs },
    }
}

/// Grade band from the score alone, mirroring the reviewer's own bands.
fn grade_from_score(score: f64) -> Grade {
    if score >= 80.0 {
        Grade::Satisfactory
    } else if score >= 60.0 {
        Grade::PartlyAcceptable
    } else {
        Grade::Unsatisfactory
    }
}

#[derive(Debug, Deserialize)]
struct WireEvaluation {
    #[serde(default)]
    grade: Option<String>,
    score: f64,
    #[serde(default)]
    justification: String,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    weaknesses: Vec<String>,
    #[serde(default)]
    follow_up: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Difficulty, SkillArea};

    fn question() -> Question {
        Question::new(
            SkillArea::from("Conditional Logic and IF Statements"),
            Difficulty::Medium,
            "Flag orders above the regional average.",
        )
    }

    #[test]
    fn parses_a_complete_evaluation() {
        let raw = r#"```json
        {
          "grade": "Partly Acceptable",
          "score": 68,
          "justification": "Right approach, missed the absolute reference.",
          "strengths": ["correct IF structure"],
          "weaknesses": ["relative reference breaks when filled down"],
          "follow_up": "Ask how they would lock the average cell."
        }
        ```"#;

        let evaluation = ReviewerEvaluator::parse_evaluation(raw, &question()).unwrap();
        assert_eq!(evaluation.grade, Grade::PartlyAcceptable);
        assert_eq!(evaluation.score, 68.0);
        assert_eq!(evaluation.skill_area, question().skill_area);
        assert!(evaluation.follow_up.is_some());
    }

    #[test]
    fn unknown_grade_label_falls_back_to_score_band() {
        let raw = r#"{"grade": "Excellent", "score": 91, "justification": "spot on"}"#;
        let evaluation = ReviewerEvaluator::parse_evaluation(raw, &question()).unwrap();
        assert_eq!(evaluation.grade, Grade::Satisfactory);

        let raw = r#"{"grade": "meh", "score": 45, "justification": "vague"}"#;
        let evaluation = ReviewerEvaluator::parse_evaluation(raw, &question()).unwrap();
        assert_eq!(evaluation.grade, Grade::Unsatisfactory);
    }

    #[test]
    fn out_of_range_score_is_clamped() {
        let raw = r#"{"grade": "Satisfactory", "score": 130, "justification": "great"}"#;
        let evaluation = ReviewerEvaluator::parse_evaluation(raw, &question()).unwrap();
        assert_eq!(evaluation.score, 100.0);
    }

    #[test]
    fn non_json_output_is_malformed() {
        let err =
            ReviewerEvaluator::parse_evaluation("The answer looks fine to me.", &question())
                .unwrap_err();
        assert!(matches!(err, EvaluationFailure::MalformedOutput(_)));
    }

    #[test]
    fn empty_follow_up_is_dropped() {
        let raw = r#"{"grade": "Satisfactory", "score": 85, "justification": "good", "follow_up": "  "}"#;
        let evaluation = ReviewerEvaluator::parse_evaluation(raw, &question()).unwrap();
        assert!(evaluation.follow_up.is_none());
    }

    #[test]
    fn prompt_includes_dataset_rows() {
        let question = question().with_dataset(crate::domain::Dataset::new(
            vec!["Order".into(), "Amount".into()],
            vec![vec!["1001".into(), "250".into()]],
        ));
        let prompt = ReviewerEvaluator::build_prompt(&question, "Use AVERAGEIF.");
        assert!(prompt.contains("Order | Amount"));
        assert!(prompt.contains("1001 | 250"));
        assert!(prompt.contains("Use AVERAGEIF."));
    }
}
