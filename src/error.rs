//! Error types for quiz-ads

use crate::types::AdFormat;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdError {
    #[error("Ads are not supported on this platform")]
    Unsupported,

    #[error("No ad unit id configured for {0} ads")]
    MissingUnitId(AdFormat),

    #[error("Failed to load ad: {0}")]
    Load(String),

    #[error("Failed to show ad: {0}")]
    Show(String),

    #[error("Ad provider error: {0}")]
    Provider(String),

    #[error("Invalid ad config: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Question bank is empty")]
    EmptyBank,

    #[error("Invalid question {id}: {reason}")]
    InvalidQuestion { id: u32, reason: String },

    #[error("Game is already finished")]
    Finished,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AdError>;
