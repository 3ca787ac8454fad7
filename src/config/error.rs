//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("max_questions must be at least 1")]
    InvalidMaxQuestions,

    #[error("batch_size must be at least 1")]
    InvalidBatchSize,

    #[error("recency_weight must be within (0.0, 1.0]")]
    InvalidRecencyWeight,

    #[error("trend_window must be at least 2")]
    InvalidTrendWindow,

    #[error("score thresholds must satisfy 0 <= lower < raise <= 100")]
    InvalidThresholds,

    #[error("skill taxonomy must contain at least one area")]
    EmptyTaxonomy,
}
