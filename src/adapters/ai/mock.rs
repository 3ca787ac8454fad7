//! Mock gateway and evaluator for tests and offline demo runs.
//!
//! Both mocks drain a scripted behavior queue, then fall back to a sensible
//! synthesized default, so a test only scripts the turns it cares about.
//! Calls are recorded for assertion and an optional artificial delay
//! exercises the timeout path.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::{
    CandidateProfile, Difficulty, Grade, Question, ResponseEvaluation, SkillArea,
};
use crate::ports::{
    EvaluationFailure, GeneratedQuestion, GenerationFailure, QuestionGateway, ResponseEvaluator,
};

/// One scripted gateway response.
#[derive(Debug, Clone)]
enum GatewayScript {
    Batch(Vec<GeneratedQuestion>),
    Error(GenerationFailure),
}

/// Arguments of one recorded `generate_batch` call.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayCall {
    pub target: SkillArea,
    pub difficulty: Difficulty,
    pub count: usize,
}

/// Scriptable [`QuestionGateway`] double.
pub struct MockGateway {
    script: Mutex<VecDeque<GatewayScript>>,
    calls: Mutex<Vec<GatewayCall>>,
    delay: Option<Duration>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Queues a successful batch for the next unscripted call.
    pub fn with_batch(self, batch: Vec<GeneratedQuestion>) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(GatewayScript::Batch(batch));
        self
    }

    /// Queues a failure for the next unscripted call.
    pub fn with_error(self, error: GenerationFailure) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(GatewayScript::Error(error));
        self
    }

    /// Queues the same failure `n` times, enough to exhaust a retry loop.
    pub fn with_repeated_error(mut self, error: GenerationFailure, n: usize) -> Self {
        for _ in 0..n {
            self = self.with_error(error.clone());
        }
        self
    }

    /// Adds an artificial delay before every response.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `generate_batch` calls received.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    fn synthesize(target: &SkillArea, difficulty: Difficulty, count: usize) -> Vec<GeneratedQuestion> {
        (0..count.max(1))
            .map(|n| GeneratedQuestion {
                question: Question::new(
                    target.clone(),
                    difficulty,
                    format!("Mock scenario {} probing {}.", n + 1, target),
                ),
                dataset: None,
            })
            .collect()
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuestionGateway for MockGateway {
    async fn generate_batch(
        &self,
        _profile: &CandidateProfile,
        target: &SkillArea,
        difficulty: Difficulty,
        count: usize,
    ) -> Result<Vec<GeneratedQuestion>, GenerationFailure> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.calls.lock().unwrap().push(GatewayCall {
            target: target.clone(),
            difficulty,
            count,
        });

        let scripted = self.script.lock().unwrap().pop_front();
        match scripted {
            Some(GatewayScript::Batch(batch)) => Ok(batch),
            Some(GatewayScript::Error(error)) => Err(error),
            None => Ok(Self::synthesize(target, difficulty, count)),
        }
    }
}

/// One scripted evaluator response. Scores are bound to the question at call
/// time so scripts do not need question ids up front.
#[derive(Debug, Clone)]
enum EvaluatorScript {
    Score { score: f64, grade: Grade },
    ScoreForSkill { skill: SkillArea, score: f64, grade: Grade },
    Error(EvaluationFailure),
}

/// Scriptable [`ResponseEvaluator`] double.
pub struct MockEvaluator {
    script: Mutex<VecDeque<EvaluatorScript>>,
    calls: Mutex<Vec<String>>,
    delay: Option<Duration>,
    default_score: f64,
}

impl MockEvaluator {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            delay: None,
            default_score: 70.0,
        }
    }

    /// Queues a score for the next unscripted call, graded by band.
    pub fn with_score(self, score: f64) -> Self {
        let grade = grade_for(score);
        self.script
            .lock()
            .unwrap()
            .push_back(EvaluatorScript::Score { score, grade });
        self
    }

    /// Queues scores for several consecutive calls.
    pub fn with_scores(mut self, scores: impl IntoIterator<Item = f64>) -> Self {
        for score in scores {
            self = self.with_score(score);
        }
        self
    }

    /// Queues an evaluation attributed to a different skill area than the
    /// question's, for exercising taxonomy validation.
    pub fn with_score_for_skill(self, skill: SkillArea, score: f64) -> Self {
        let grade = grade_for(score);
        self.script
            .lock()
            .unwrap()
            .push_back(EvaluatorScript::ScoreForSkill { skill, score, grade });
        self
    }

    /// Queues a failure for the next unscripted call.
    pub fn with_error(self, error: EvaluationFailure) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(EvaluatorScript::Error(error));
        self
    }

    /// Queues the same failure `n` times, enough to exhaust a retry loop.
    pub fn with_repeated_error(mut self, error: EvaluationFailure, n: usize) -> Self {
        for _ in 0..n {
            self = self.with_error(error.clone());
        }
        self
    }

    /// Adds an artificial delay before every response.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `evaluate` calls received.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The answers passed in, in order.
    pub fn answers(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseEvaluator for MockEvaluator {
    async fn evaluate(
        &self,
        question: &Question,
        response_text: &str,
    ) -> Result<ResponseEvaluation, EvaluationFailure> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.calls.lock().unwrap().push(response_text.to_string());

        let scripted = self.script.lock().unwrap().pop_front();
        let (skill, score, grade) = match scripted {
            Some(EvaluatorScript::Score { score, grade }) => {
                (question.skill_area.clone(), score, grade)
            }
            Some(EvaluatorScript::ScoreForSkill { skill, score, grade }) => (skill, score, grade),
            Some(EvaluatorScript::Error(error)) => return Err(error),
            None => (
                question.skill_area.clone(),
                self.default_score,
                grade_for(self.default_score),
            ),
        };

        Ok(ResponseEvaluation::new(
            question.id,
            skill,
            score,
            grade,
            "mock evaluation",
        ))
    }
}

fn grade_for(score: f64) -> Grade {
    if score >= 80.0 {
        Grade::Satisfactory
    } else if score >= 60.0 {
        Grade::PartlyAcceptable
    } else {
        Grade::Unsatisfactory
    }
}
