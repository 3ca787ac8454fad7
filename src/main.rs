//! Interactive interview runner.
//!
//! Reads configuration from the environment, wires the OpenAI adapters when
//! an API key is set (mocks otherwise), and drives one interview session
//! over stdin/stdout.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use excel_interviewer::adapters::ai::{
    ChatClient, ChatClientConfig, MockEvaluator, MockGateway, QueCraftGateway, ReviewerEvaluator,
};
use excel_interviewer::application::{
    CompletionReason, InterviewSession, RetryPolicy, SessionSettings, Turn,
};
use excel_interviewer::config::AppConfig;
use excel_interviewer::domain::Question;
use excel_interviewer::ports::{QuestionGateway, ResponseEvaluator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let (gateway, evaluator): (Arc<dyn QuestionGateway>, Arc<dyn ResponseEvaluator>) =
        if config.ai.has_openai() {
            let client_config = ChatClientConfig::new(
                config.ai.openai_api_key.clone().unwrap_or_default(),
            )
            .with_model(&config.ai.model)
            .with_base_url(&config.ai.base_url)
            .with_timeout(config.ai.timeout())
            .with_temperature(config.ai.temperature);
            let client = Arc::new(ChatClient::new(client_config));
            info!(model = %client.model(), "using OpenAI adapters");
            (
                Arc::new(QueCraftGateway::new(client.clone())),
                Arc::new(ReviewerEvaluator::new(client)),
            )
        } else {
            info!("no API key configured, using mock adapters");
            (Arc::new(MockGateway::new()), Arc::new(MockEvaluator::new()))
        };

    let settings = SessionSettings {
        taxonomy: config.interview.taxonomy(),
        initial_difficulty: config.interview.initial_difficulty,
        max_questions: config.interview.max_questions,
        batch_size: config.interview.batch_size,
        profile: config.interview.profile_settings(),
        policy: config.interview.decision_policy(),
        retry: RetryPolicy {
            max_retries: config.ai.max_retries,
            timeout: config.ai.timeout(),
            backoff: config.ai.backoff(),
        },
        session_timeout: config.interview.session_timeout(),
    };

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    print!("Candidate name: ");
    io::stdout().flush()?;
    let name = lines.next().transpose()?.unwrap_or_default();
    let name = if name.trim().is_empty() { "Candidate".to_string() } else { name.trim().to_string() };

    let mut session = InterviewSession::begin(name, settings, gateway, evaluator).await?;

    while let Some(question) = session.current_question().cloned() {
        present(&question, session.progress().current_question_number);

        print!("> ");
        io::stdout().flush()?;
        let answer = match lines.next().transpose()? {
            Some(line) => line,
            None => {
                session.expire();
                break;
            }
        };

        match session.submit_response(&answer).await? {
            Turn::Next(_) => {}
            Turn::Complete(reason) => {
                match reason {
                    CompletionReason::Decided { rationale } => {
                        println!("\nInterview complete: {rationale}");
                    }
                    CompletionReason::GenerationExhausted { detail } => {
                        println!("\nInterview ended early (generation failed: {detail})");
                    }
                    CompletionReason::Expired => {
                        println!("\nInterview session expired");
                    }
                }
                break;
            }
        }
    }

    if let Some(report) = session.report() {
        println!("\n=== Assessment Report for {} ===", report.candidate_name);
        println!("Questions answered: {}", report.evaluations.len());
        println!("Duration: {}s", report.duration_secs);

        println!("\nSkill estimates:");
        for (area, estimate) in report.profile.estimates() {
            println!("  {}: {:.0}/100 ({} sample(s))", area, estimate.score, estimate.samples);
        }
        if !report.strengths.is_empty() {
            println!(
                "\nStrengths: {}",
                report
                    .strengths
                    .iter()
                    .map(|a| a.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        if !report.weaknesses.is_empty() {
            println!(
                "Needs work: {}",
                report
                    .weaknesses
                    .iter()
                    .map(|a| a.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        println!("\nTrajectory decisions:");
        for decision in &report.decisions {
            println!("  [{:?}] {}", decision.action, decision.rationale);
        }
    }

    Ok(())
}

fn present(question: &Question, number: usize) {
    println!(
        "\nQuestion {} [{} | {}]",
        number, question.skill_area, question.difficulty
    );
    println!("{}", question.scenario);

    if let Some(dataset) = &question.dataset {
        println!("\n{}", dataset.columns.join(" | "));
        for row in &dataset.rows {
            println!("{}", row.join(" | "));
        }
    }
}
