//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `EXCEL_INTERVIEWER_` prefix and nested values use underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use excel_interviewer::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Max questions per session: {}", config.interview.max_questions);
//! ```

mod ai;
mod error;
mod interview;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use interview::InterviewConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Contains all configuration sections for the interviewer. Load using
/// [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// AI provider configuration (OpenAI, or mocks when no key is set)
    #[serde(default)]
    pub ai: AiConfig,

    /// Interview flow configuration (limits, thresholds, taxonomy)
    #[serde(default)]
    pub interview: InterviewConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `EXCEL_INTERVIEWER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `EXCEL_INTERVIEWER__AI__OPENAI_API_KEY=sk-...` -> `ai.openai_api_key`
    /// - `EXCEL_INTERVIEWER__INTERVIEW__MAX_QUESTIONS=8` -> `interview.max_questions`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("EXCEL_INTERVIEWER")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.interview.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("EXCEL_INTERVIEWER__AI__OPENAI_API_KEY");
        env::remove_var("EXCEL_INTERVIEWER__AI__MODEL");
        env::remove_var("EXCEL_INTERVIEWER__INTERVIEW__MAX_QUESTIONS");
        env::remove_var("EXCEL_INTERVIEWER__INTERVIEW__INITIAL_DIFFICULTY");
    }

    #[test]
    fn test_load_with_no_env_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert!(!config.ai.has_openai());
        assert_eq!(config.interview.max_questions, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("EXCEL_INTERVIEWER__AI__OPENAI_API_KEY", "sk-test");
        env::set_var("EXCEL_INTERVIEWER__AI__MODEL", "gpt-4-turbo");
        env::set_var("EXCEL_INTERVIEWER__INTERVIEW__MAX_QUESTIONS", "6");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.ai.has_openai());
        assert_eq!(config.ai.model, "gpt-4-turbo");
        assert_eq!(config.interview.max_questions, 6);
    }

    #[test]
    fn test_initial_difficulty_parses_from_env() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("EXCEL_INTERVIEWER__INTERVIEW__INITIAL_DIFFICULTY", "hard");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.interview.initial_difficulty,
            crate::domain::Difficulty::Hard
        );
    }
}
