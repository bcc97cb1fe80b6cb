use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    FertilizerRecommendation, FertilizerRequest, GeneratedText, TextGenerationRequest,
    YieldPrediction, YieldRequest,
};

/// Failure of a remote advisor call.
///
/// Each variant displays as its human-readable message alone, so callers can
/// surface it to the user without further formatting.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The request never produced a response (connect failure, timeout).
    #[error("{0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("{0}")]
    Decode(String),

    /// No usable backend could be built from the configuration.
    #[error("{0}")]
    Configuration(String),
}

/// The three remote operations the wizard depends on.
#[async_trait]
pub trait AdvisorService: Send + Sync {
    async fn predict_yield(
        &self,
        request: &YieldRequest,
    ) -> Result<YieldPrediction, ServiceError>;

    async fn recommend_fertilizer(
        &self,
        request: &FertilizerRequest,
    ) -> Result<FertilizerRecommendation, ServiceError>;

    async fn generate_text(
        &self,
        request: &TextGenerationRequest,
    ) -> Result<GeneratedText, ServiceError>;
}
