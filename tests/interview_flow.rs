//! End-to-end interview session tests against the mock adapters.
//!
//! These exercise the full state machine: adaptive targeting, difficulty
//! adjustment, graceful degradation on evaluator and gateway failures, and
//! terminal-state bookkeeping.

use std::sync::Arc;
use std::time::Duration;

use excel_interviewer::adapters::ai::{MockEvaluator, MockGateway};
use excel_interviewer::application::{
    CompletionReason, InterviewSession, InterviewState, RetryPolicy, SessionSettings, Turn,
};
use excel_interviewer::domain::{
    Difficulty, EvaluationOutcome, InterviewError, SkillArea, SkillTaxonomy, TrajectoryAction,
};
use excel_interviewer::ports::{EvaluationFailure, GenerationFailure};

fn taxonomy() -> SkillTaxonomy {
    SkillTaxonomy::new(["Lookups", "Pivots", "Charts"].map(SkillArea::from))
}

fn settings() -> SessionSettings {
    SessionSettings {
        taxonomy: taxonomy(),
        retry: RetryPolicy {
            max_retries: 2,
            timeout: Duration::from_millis(200),
            backoff: Duration::from_millis(1),
        },
        ..SessionSettings::default()
    }
}

#[tokio::test]
async fn session_opens_on_the_first_taxonomy_area() {
    let gateway = Arc::new(MockGateway::new());
    let evaluator = Arc::new(MockEvaluator::new());

    let session = InterviewSession::begin("Ada", settings(), gateway.clone(), evaluator)
        .await
        .unwrap();

    assert_eq!(session.state(), InterviewState::AwaitingResponse);
    let question = session.current_question().unwrap();
    assert_eq!(question.skill_area, SkillArea::from("Lookups"));
    assert_eq!(question.difficulty, Difficulty::Medium);

    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].target, SkillArea::from("Lookups"));
    assert_eq!(calls[0].count, 2);
}

#[tokio::test]
async fn steady_performance_covers_the_taxonomy_then_terminates() {
    let gateway = Arc::new(MockGateway::new());
    // Scores within the trend delta of each other: stable once two trend
    // readings exist, so the session ends right after full coverage.
    let evaluator = Arc::new(MockEvaluator::new().with_scores([70.0, 72.0, 74.0]));

    let mut session = InterviewSession::begin("Ada", settings(), gateway.clone(), evaluator)
        .await
        .unwrap();

    let first = session.submit_response("VLOOKUP with FALSE for exact match").await.unwrap();
    let Turn::Next(question) = first else {
        panic!("expected a second question");
    };
    assert_eq!(question.skill_area, SkillArea::from("Pivots"));

    let second = session.submit_response("Rows by region, values as sum").await.unwrap();
    let Turn::Next(question) = second else {
        panic!("expected a third question");
    };
    assert_eq!(question.skill_area, SkillArea::from("Charts"));

    let third = session.submit_response("A line chart over time").await.unwrap();
    let Turn::Complete(reason) = third else {
        panic!("expected completion after full coverage");
    };
    assert!(matches!(reason, CompletionReason::Decided { .. }));
    assert!(session.is_terminal());

    let report = session.report().unwrap();
    assert_eq!(report.evaluations.len(), 3);
    assert_eq!(report.profile.tested().len(), 3);
    assert!(report
        .decisions
        .last()
        .is_some_and(|d| d.action == TrajectoryAction::Terminate));
}

#[tokio::test]
async fn weak_answers_lower_difficulty_for_the_weakest_area() {
    let gateway = Arc::new(MockGateway::new());
    // Coverage in three turns; the spread keeps the trend from settling so
    // the fourth decision drills into the weakest area.
    let evaluator = Arc::new(MockEvaluator::new().with_scores([90.0, 40.0, 60.0]));

    let mut session = InterviewSession::begin("Ada", settings(), gateway.clone(), evaluator)
        .await
        .unwrap();

    session.submit_response("a").await.unwrap();
    session.submit_response("b").await.unwrap();
    let turn = session.submit_response("c").await.unwrap();

    let Turn::Next(question) = turn else {
        panic!("expected the session to keep probing");
    };
    assert_eq!(question.skill_area, SkillArea::from("Pivots"));
    assert_eq!(question.difficulty, Difficulty::Easy);
    assert_eq!(session.profile().current_difficulty(), Difficulty::Easy);

    let last_call = gateway.calls().pop().unwrap();
    assert_eq!(last_call.target, SkillArea::from("Pivots"));
    assert_eq!(last_call.difficulty, Difficulty::Easy);
}

#[tokio::test]
async fn strong_answers_raise_difficulty() {
    let gateway = Arc::new(MockGateway::new());
    let evaluator = Arc::new(MockEvaluator::new().with_scores([95.0, 88.0, 60.0]));

    let mut session = InterviewSession::begin("Ada", settings(), gateway, evaluator)
        .await
        .unwrap();

    session.submit_response("a").await.unwrap();
    session.submit_response("b").await.unwrap();
    let turn = session.submit_response("c").await.unwrap();

    // Weakest is Charts at 60, inside the keep band, so difficulty holds;
    // the weakest area gets probed again.
    let Turn::Next(question) = turn else {
        panic!("expected another question");
    };
    assert_eq!(question.skill_area, SkillArea::from("Charts"));
    assert_eq!(question.difficulty, Difficulty::Medium);
}

#[tokio::test]
async fn failed_evaluation_is_an_uncredited_turn() {
    let gateway = Arc::new(MockGateway::new());
    // Three failures exhaust one retry loop (initial attempt plus two
    // retries); the turn records a failed outcome and the session continues.
    let evaluator = Arc::new(MockEvaluator::new().with_repeated_error(
        EvaluationFailure::Unavailable {
            message: "reviewer down".into(),
        },
        3,
    ));

    let mut session = InterviewSession::begin("Ada", settings(), gateway, evaluator.clone())
        .await
        .unwrap();

    let turn = session.submit_response("an answer").await.unwrap();
    assert!(matches!(turn, Turn::Next(_)));
    assert_eq!(evaluator.call_count(), 3);

    assert_eq!(session.records().len(), 1);
    assert!(matches!(
        session.records()[0].outcome,
        EvaluationOutcome::Failed { .. }
    ));
    // No skill was credited or penalized.
    assert!(session.profile().tested().is_empty());

    // The next turn scores normally.
    session.submit_response("another answer").await.unwrap();
    assert_eq!(session.profile().tested().len(), 1);
}

#[tokio::test]
async fn generation_exhaustion_ends_the_session_gracefully() {
    let gateway = Arc::new(scripted_opening_then_failures());
    let evaluator = Arc::new(MockEvaluator::new().with_score(70.0));

    let mut session = InterviewSession::begin("Ada", settings(), gateway, evaluator)
        .await
        .unwrap();

    // The first answer triggers a refocus to an untested area, whose
    // generation round fails through every retry.
    let turn = session.submit_response("an answer").await.unwrap();
    let Turn::Complete(reason) = turn else {
        panic!("expected graceful termination");
    };
    assert!(matches!(reason, CompletionReason::GenerationExhausted { .. }));
    assert_eq!(session.state(), InterviewState::Completed);

    let report = session.report().unwrap();
    assert_eq!(report.evaluations.len(), 1);
    assert!(report
        .decisions
        .last()
        .is_some_and(|d| d.action == TrajectoryAction::Terminate));
}

/// Gateway whose first call succeeds (synthesized) and whose subsequent
/// calls all fail, covering one full retry loop.
fn scripted_opening_then_failures() -> MockGateway {
    use excel_interviewer::domain::Question;
    use excel_interviewer::ports::GeneratedQuestion;

    let opening = vec![GeneratedQuestion {
        question: Question::new(
            SkillArea::from("Lookups"),
            Difficulty::Medium,
            "Find the unit price for a product code.",
        ),
        dataset: None,
    }];

    MockGateway::new().with_batch(opening).with_repeated_error(
        GenerationFailure::Unavailable {
            message: "generator down".into(),
        },
        3,
    )
}

#[tokio::test]
async fn misattributed_skill_surfaces_unknown_skill_area() {
    let gateway = Arc::new(MockGateway::new());
    let evaluator = Arc::new(
        MockEvaluator::new().with_score_for_skill(SkillArea::from("Macros"), 60.0),
    );

    let mut session = InterviewSession::begin("Ada", settings(), gateway, evaluator)
        .await
        .unwrap();
    let pending = session.current_question().unwrap().id;

    let err = session.submit_response("an answer").await.unwrap_err();
    assert!(matches!(err, InterviewError::UnknownSkillArea { .. }));

    // The turn is restored: same question pending, nothing recorded.
    assert_eq!(session.state(), InterviewState::AwaitingResponse);
    assert_eq!(session.current_question().unwrap().id, pending);
    assert!(session.records().is_empty());
    assert!(session.profile().tested().is_empty());

    // A well-attributed retry goes through.
    let turn = session.submit_response("an answer").await.unwrap();
    assert!(matches!(turn, Turn::Next(_)));
    assert_eq!(session.records().len(), 1);
}

#[tokio::test]
async fn expired_session_preserves_partial_results() {
    let gateway = Arc::new(MockGateway::new());
    let evaluator = Arc::new(MockEvaluator::new());

    let mut expired_settings = settings();
    expired_settings.session_timeout = Some(Duration::ZERO);

    let mut session = InterviewSession::begin("Ada", expired_settings, gateway, evaluator)
        .await
        .unwrap();

    let err = session.submit_response("too late").await.unwrap_err();
    assert!(matches!(err, InterviewError::SessionExpired { .. }));
    assert_eq!(session.state(), InterviewState::Expired);

    let report = session.report().unwrap();
    assert!(matches!(report.reason, CompletionReason::Expired));
    assert!(report.evaluations.is_empty());
}

#[tokio::test]
async fn responses_are_rejected_after_completion() {
    let gateway = Arc::new(MockGateway::new());
    let evaluator = Arc::new(MockEvaluator::new());

    let mut session = InterviewSession::begin("Ada", settings(), gateway, evaluator)
        .await
        .unwrap();
    session.expire();

    let err = session.submit_response("anything").await.unwrap_err();
    assert!(matches!(err, InterviewError::InvalidState(_)));
}

#[tokio::test]
async fn failed_initial_generation_is_a_hard_error() {
    let gateway = Arc::new(MockGateway::new().with_repeated_error(
        GenerationFailure::Unavailable {
            message: "down".into(),
        },
        3,
    ));
    let evaluator = Arc::new(MockEvaluator::new());

    let err = InterviewSession::begin("Ada", settings(), gateway, evaluator)
        .await
        .err()
        .expect("session start should fail without any question");
    assert!(matches!(err, InterviewError::Generation(_)));
}

#[tokio::test]
async fn slow_evaluator_degrades_instead_of_hanging() {
    let gateway = Arc::new(MockGateway::new());
    let evaluator = Arc::new(MockEvaluator::new().with_delay(Duration::from_millis(100)));

    let mut slow_settings = settings();
    slow_settings.retry = RetryPolicy {
        max_retries: 1,
        timeout: Duration::from_millis(10),
        backoff: Duration::from_millis(1),
    };

    let mut session = InterviewSession::begin("Ada", slow_settings, gateway, evaluator)
        .await
        .unwrap();

    let turn = session.submit_response("an answer").await.unwrap();
    assert!(matches!(turn, Turn::Next(_)));
    assert!(matches!(
        session.records()[0].outcome,
        EvaluationOutcome::Failed { .. }
    ));
}

#[tokio::test]
async fn question_budget_caps_the_session() {
    let gateway = Arc::new(MockGateway::new());
    // Monotonically rising scores keep the trend improving, so only the
    // budget can end the session.
    let evaluator = Arc::new(MockEvaluator::new().with_scores([10.0, 30.0, 50.0, 70.0]));

    let mut capped = settings();
    capped.taxonomy = SkillTaxonomy::new([SkillArea::from("Lookups")]);
    capped.max_questions = 4;

    let mut session = InterviewSession::begin("Ada", capped, gateway, evaluator)
        .await
        .unwrap();

    let mut completed = None;
    for n in 0..4 {
        match session.submit_response(&format!("answer {n}")).await.unwrap() {
            Turn::Next(_) => {}
            Turn::Complete(reason) => {
                completed = Some(reason);
                break;
            }
        }
    }

    let reason = completed.expect("budget should end the session");
    assert!(matches!(reason, CompletionReason::Decided { .. }));
    assert_eq!(session.records().len(), 4);
}
