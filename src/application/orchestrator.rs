//! Adaptive interview orchestrator.
//!
//! One [`InterviewSession`] drives one candidate's assessment as a
//! sequential state machine:
//!
//! ```text
//! Initializing -> AwaitingResponse -> Evaluating -> Deciding
//!                       ^                               |
//!                       |<---------- Generating <-------+-- (refocus/adjust)
//!                       |<-------------------------------+-- (continue)
//!                                                        +-> Completed
//! ```
//!
//! The only suspension point is awaiting the candidate's textual response
//! between calls to [`InterviewSession::submit_response`]. Gateway and
//! evaluator calls are wrapped in bounded retry with backoff; an exhausted
//! evaluation degrades to an uncredited turn and an exhausted mid-session
//! generation degrades to graceful termination. The session never hangs.
//!
//! Sessions are independent: each owns its profile and collaborators, so
//! serving many candidates concurrently needs no shared mutable state.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::{
    CandidateProfile, DecisionPolicy, Difficulty, EvaluationOutcome, EvaluationRecord,
    InterviewError, ProfileSettings, Question, SessionId, SkillArea, SkillTaxonomy,
    TrajectoryDecision, Trend,
};
use crate::ports::{EvaluationFailure, GenerationFailure, QuestionGateway, ResponseEvaluator};

use super::retry::{with_retries, RetryPolicy};

/// Everything a session needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Fixed skill taxonomy for the assessment.
    pub taxonomy: SkillTaxonomy,
    /// Difficulty of the first questions.
    pub initial_difficulty: Difficulty,
    /// Hard upper bound on evaluated questions.
    pub max_questions: usize,
    /// Questions requested per generation round.
    pub batch_size: usize,
    /// Profile scoring knobs.
    pub profile: ProfileSettings,
    /// Decision thresholds.
    pub policy: DecisionPolicy,
    /// Retry/backoff/timeout for gateway and evaluator calls.
    pub retry: RetryPolicy,
    /// Whole-session deadline; `None` disables expiry.
    pub session_timeout: Option<Duration>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            taxonomy: SkillTaxonomy::default_excel(),
            initial_difficulty: Difficulty::Medium,
            max_questions: 10,
            batch_size: 2,
            profile: ProfileSettings::default(),
            policy: DecisionPolicy::default(),
            retry: RetryPolicy::default(),
            session_timeout: Some(Duration::from_secs(30 * 60)),
        }
    }
}

/// Observable session states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewState {
    Initializing,
    AwaitingResponse,
    Evaluating,
    Deciding,
    Generating,
    Completed,
    Expired,
}

/// Why a session reached a terminal state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CompletionReason {
    /// The decision policy chose to terminate.
    Decided { rationale: String },
    /// Question generation kept failing mid-session; the assessment ended
    /// early with the results gathered so far.
    GenerationExhausted { detail: String },
    /// The session deadline elapsed.
    Expired,
}

/// Outcome of one submitted response.
#[derive(Debug, Clone, PartialEq)]
pub enum Turn {
    /// The interview continues with this question.
    Next(Question),
    /// The interview is over; results are available via
    /// [`InterviewSession::report`].
    Complete(CompletionReason),
}

/// Point-in-time view of session progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub state: InterviewState,
    pub questions_completed: usize,
    pub current_question_number: usize,
    pub skills_tested: Vec<SkillArea>,
    pub current_difficulty: Difficulty,
    pub trend: Trend,
    pub decisions_made: usize,
}

/// Read-only results exposed once the session is terminal, for external
/// report assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewReport {
    pub session_id: SessionId,
    pub candidate_name: String,
    pub reason: CompletionReason,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_secs: i64,
    pub profile: CandidateProfile,
    pub evaluations: Vec<EvaluationRecord>,
    pub decisions: Vec<TrajectoryDecision>,
    pub strengths: Vec<SkillArea>,
    pub weaknesses: Vec<SkillArea>,
}

/// Sequential state machine for one candidate's adaptive assessment.
pub struct InterviewSession {
    settings: SessionSettings,
    gateway: Arc<dyn QuestionGateway>,
    evaluator: Arc<dyn ResponseEvaluator>,
    profile: CandidateProfile,
    state: InterviewState,
    queue: VecDeque<Question>,
    records: Vec<EvaluationRecord>,
    decisions: Vec<TrajectoryDecision>,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    completion: Option<CompletionReason>,
}

impl InterviewSession {
    /// Starts a session: creates the profile and requests the initial
    /// question batch.
    ///
    /// Unlike mid-session generation, exhausting retries here is a hard
    /// error: with no question generated there is nothing to ask.
    pub async fn begin(
        candidate_name: impl Into<String>,
        settings: SessionSettings,
        gateway: Arc<dyn QuestionGateway>,
        evaluator: Arc<dyn ResponseEvaluator>,
    ) -> Result<Self, InterviewError> {
        let session_id = SessionId::new();
        let profile = CandidateProfile::new(
            session_id,
            candidate_name,
            settings.taxonomy.clone(),
            settings.initial_difficulty,
            settings.profile,
        );

        let first_target = profile
            .first_untested()
            .cloned()
            .ok_or_else(|| InterviewError::InvalidState("skill taxonomy is empty".into()))?;

        info!(%session_id, candidate = profile.candidate_name(), "starting adaptive interview");

        let mut session = Self {
            settings,
            gateway,
            evaluator,
            profile,
            state: InterviewState::Initializing,
            queue: VecDeque::new(),
            records: Vec::new(),
            decisions: Vec::new(),
            started_at: Utc::now(),
            ended_at: None,
            completion: None,
        };

        let difficulty = session.profile.current_difficulty();
        let batch = session.generate(&first_target, difficulty).await?;
        session.queue.extend(batch);
        session.state = InterviewState::AwaitingResponse;

        Ok(session)
    }

    /// The question currently awaiting a response.
    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            InterviewState::AwaitingResponse => self.queue.front(),
            _ => None,
        }
    }

    /// Processes one candidate response and advances the state machine.
    pub async fn submit_response(&mut self, answer: &str) -> Result<Turn, InterviewError> {
        if self.state != InterviewState::AwaitingResponse {
            return Err(InterviewError::InvalidState(format!(
                "cannot accept a response in the {:?} state",
                self.state
            )));
        }

        if let Some(limit) = self.settings.session_timeout {
            let elapsed = Utc::now() - self.started_at;
            if elapsed.num_seconds() >= limit.as_secs() as i64 {
                warn!(session_id = %self.profile.session_id(), "session deadline elapsed");
                self.finish(InterviewState::Expired, CompletionReason::Expired);
                return Err(InterviewError::SessionExpired {
                    elapsed_secs: elapsed.num_seconds().max(0) as u64,
                });
            }
        }

        let question = self
            .queue
            .pop_front()
            .ok_or_else(|| InterviewError::InvalidState("no question is pending".into()))?;

        // Evaluating
        self.state = InterviewState::Evaluating;
        let outcome = self.evaluate(&question, answer).await;

        if let EvaluationOutcome::Scored(ref evaluation) = outcome {
            if let Err(err) = self.profile.record_evaluation(evaluation) {
                // Data inconsistency between generated content and the
                // taxonomy: a defect, surfaced immediately and not retried.
                // The profile is untouched; restore the turn so the session
                // stays usable.
                self.queue.push_front(question);
                self.state = InterviewState::AwaitingResponse;
                return Err(err);
            }
        }

        self.records.push(EvaluationRecord {
            question,
            answer: answer.to_string(),
            outcome,
        });

        // Deciding
        self.state = InterviewState::Deciding;
        let asked = self.records.len();
        let decision =
            self.settings
                .policy
                .decide(&self.profile, asked, self.settings.max_questions);
        debug!(
            session_id = %self.profile.session_id(),
            action = ?decision.action,
            rationale = %decision.rationale,
            "trajectory decision"
        );

        if decision.is_terminal() {
            let rationale = decision.rationale.clone();
            self.decisions.push(decision);
            let reason = CompletionReason::Decided { rationale };
            self.finish(InterviewState::Completed, reason.clone());
            return Ok(Turn::Complete(reason));
        }

        // Both remaining actions carry a target and difficulty.
        let target = decision
            .target
            .clone()
            .ok_or_else(|| InterviewError::InvalidState("decision without a target".into()))?;
        let difficulty = decision.difficulty.unwrap_or(self.profile.current_difficulty());
        self.profile.set_difficulty(difficulty);

        // A prepared question that already matches the chosen trajectory is
        // served as-is instead of discarding the batch.
        let reusable = self
            .queue
            .front()
            .is_some_and(|q| q.skill_area == target && q.difficulty == difficulty);

        if reusable {
            self.decisions.push(TrajectoryDecision::continue_with(
                target,
                difficulty,
                format!("{} (served from prepared batch)", decision.rationale),
            ));
        } else {
            self.decisions.push(decision);
            self.state = InterviewState::Generating;
            match self.generate(&target, difficulty).await {
                Ok(batch) => {
                    self.queue.clear();
                    self.queue.extend(batch);
                }
                Err(err) => {
                    // Degrade gracefully: end the assessment with what was
                    // gathered rather than aborting the candidate's session.
                    warn!(
                        session_id = %self.profile.session_id(),
                        error = %err,
                        "question generation exhausted retries, ending session"
                    );
                    let detail = err.to_string();
                    self.decisions
                        .push(TrajectoryDecision::terminate(detail.clone()));
                    let reason = CompletionReason::GenerationExhausted { detail };
                    self.finish(InterviewState::Completed, reason.clone());
                    return Ok(Turn::Complete(reason));
                }
            }
        }

        self.state = InterviewState::AwaitingResponse;
        let next = self
            .queue
            .front()
            .cloned()
            .ok_or_else(|| InterviewError::InvalidState("generated batch was empty".into()))?;
        Ok(Turn::Next(next))
    }

    /// Marks the session expired by the caller (external cancellation).
    /// Partial results stay available through [`InterviewSession::report`].
    pub fn expire(&mut self) {
        if !self.is_terminal() {
            self.finish(InterviewState::Expired, CompletionReason::Expired);
        }
    }

    /// Point-in-time progress view.
    pub fn progress(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            state: self.state,
            questions_completed: self.records.len(),
            current_question_number: self.records.len() + 1,
            skills_tested: self.profile.tested().iter().cloned().collect(),
            current_difficulty: self.profile.current_difficulty(),
            trend: self.profile.trend(),
            decisions_made: self.decisions.len(),
        }
    }

    /// Full results, available once the session is terminal.
    pub fn report(&self) -> Option<InterviewReport> {
        let reason = self.completion.clone()?;
        let ended_at = self.ended_at?;
        Some(InterviewReport {
            session_id: self.profile.session_id(),
            candidate_name: self.profile.candidate_name().to_string(),
            reason,
            started_at: self.started_at,
            ended_at,
            duration_secs: (ended_at - self.started_at).num_seconds(),
            profile: self.profile.clone(),
            evaluations: self.records.clone(),
            decisions: self.decisions.clone(),
            strengths: self
                .profile
                .areas_scoring_at_least(self.settings.policy.raise_threshold),
            weaknesses: self
                .profile
                .areas_scoring_below(self.settings.policy.lower_threshold),
        })
    }

    pub fn state(&self) -> InterviewState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            InterviewState::Completed | InterviewState::Expired
        )
    }

    pub fn profile(&self) -> &CandidateProfile {
        &self.profile
    }

    /// Append-only trajectory decision history.
    pub fn decisions(&self) -> &[TrajectoryDecision] {
        &self.decisions
    }

    /// Evaluation records in interview order.
    pub fn records(&self) -> &[EvaluationRecord] {
        &self.records
    }

    fn finish(&mut self, state: InterviewState, reason: CompletionReason) {
        self.state = state;
        self.ended_at = Some(Utc::now());
        self.completion = Some(reason);
        info!(
            session_id = %self.profile.session_id(),
            questions = self.records.len(),
            decisions = self.decisions.len(),
            "interview session finished"
        );
    }

    /// One generation round under the retry policy.
    async fn generate(
        &self,
        target: &SkillArea,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>, InterviewError> {
        let batch = with_retries(
            &self.settings.retry,
            "generate_batch",
            |secs| GenerationFailure::Timeout { timeout_secs: secs },
            || {
                self.gateway.generate_batch(
                    &self.profile,
                    target,
                    difficulty,
                    self.settings.batch_size,
                )
            },
        )
        .await?;

        if batch.is_empty() {
            return Err(InterviewError::Generation(GenerationFailure::EmptyBatch));
        }

        debug!(
            target = %target,
            %difficulty,
            count = batch.len(),
            "generated question batch"
        );
        Ok(batch.into_iter().map(|g| g.into_question()).collect())
    }

    /// One evaluation round under the retry policy, degrading to a failed
    /// outcome when retries exhaust.
    async fn evaluate(&self, question: &Question, answer: &str) -> EvaluationOutcome {
        let result = with_retries(
            &self.settings.retry,
            "evaluate",
            |secs| EvaluationFailure::Timeout { timeout_secs: secs },
            || self.evaluator.evaluate(question, answer),
        )
        .await;

        match result {
            Ok(evaluation) => EvaluationOutcome::Scored(evaluation),
            Err(err) => {
                warn!(
                    question_id = %question.id,
                    error = %err,
                    "evaluation exhausted retries, recording uncredited turn"
                );
                EvaluationOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}
