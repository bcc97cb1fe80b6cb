//! Submission pipeline.
//!
//! A submission runs in two stages with typed hand-offs:
//!
//! 1. [`ResultAggregator::fetch_raw`] calls the yield model, then the
//!    fertilizer model. Any failure here ends the submission; whatever was
//!    captured before it is carried in the [`RawFailure`].
//! 2. [`ResultAggregator::summarize`] asks the text generator to explain each
//!    raw result that is present. The two calls run concurrently and a failure
//!    only affects its own summary.
//!
//! The aggregator holds no wizard state. The controller decides whether and
//! where each stage's output is written.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::models::{FertilizerRequest, FormData, TextGenerationRequest, YieldRequest};
use crate::service::{AdvisorService, ServiceError};

use super::prompts::{fertilizer_prompt, yield_prompt};

/// Both raw predictions of a successful first stage.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPredictions {
    pub predicted_yield: f64,
    pub recommended_fertilizer: String,
}

/// First-stage failure, with the yield prediction if it arrived before the
/// fertilizer call failed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFailure {
    pub predicted_yield: Option<f64>,
    pub error: ServiceError,
}

pub type RawOutcome = Result<RawPredictions, RawFailure>;

/// Raw values as seen by the summary stage; either may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawResults {
    pub predicted_yield: Option<f64>,
    pub recommended_fertilizer: Option<String>,
}

impl From<&RawPredictions> for RawResults {
    fn from(raw: &RawPredictions) -> Self {
        Self {
            predicted_yield: Some(raw.predicted_yield),
            recommended_fertilizer: Some(raw.recommended_fertilizer.clone()),
        }
    }
}

/// Second-stage output. `None` means the summary was not attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summaries {
    pub yield_summary: Option<String>,
    pub fertilizer_summary: Option<String>,
}

const YIELD_SUMMARY_FAILURE: &str = "Could not generate AI summary for yield: ";
const FERTILIZER_SUMMARY_FAILURE: &str = "Could not generate AI summary for fertilizer: ";

/// Runs the remote calls of a submission against an [`AdvisorService`].
#[derive(Clone)]
pub struct ResultAggregator {
    service: Arc<dyn AdvisorService>,
    text_model: Option<String>,
}

impl ResultAggregator {
    pub fn new(service: Arc<dyn AdvisorService>) -> Self {
        Self {
            service,
            text_model: None,
        }
    }

    /// Request a specific text-generation model for summaries.
    pub fn with_text_model(
        mut self,
        model: Option<String>,
    ) -> Self {
        self.text_model = model;
        self
    }

    /// Calls the yield model and then the fertilizer model. The fertilizer
    /// call is only issued once the yield call has succeeded.
    pub async fn fetch_raw(
        &self,
        yield_request: &YieldRequest,
        fertilizer_request: &FertilizerRequest,
    ) -> RawOutcome {
        info!(crop = %yield_request.crop, "requesting yield prediction");
        let predicted_yield = match self.service.predict_yield(yield_request).await {
            Ok(prediction) => prediction.predicted_yield,
            Err(err) => {
                error!(error = %err, "yield prediction failed");
                return Err(RawFailure {
                    predicted_yield: None,
                    error: err,
                });
            }
        };

        info!(predicted_yield, "requesting fertilizer recommendation");
        match self.service.recommend_fertilizer(fertilizer_request).await {
            Ok(recommendation) => Ok(RawPredictions {
                predicted_yield,
                recommended_fertilizer: recommendation.recommended_fertilizer,
            }),
            Err(err) => {
                error!(error = %err, "fertilizer recommendation failed");
                Err(RawFailure {
                    predicted_yield: Some(predicted_yield),
                    error: err,
                })
            }
        }
    }

    /// Generates a summary for every raw value that is present. A failed call
    /// yields an explanatory string in place of the summary; it never fails
    /// the stage.
    pub async fn summarize(
        &self,
        form: &FormData,
        raw: &RawResults,
    ) -> Summaries {
        let yield_prompt = raw.predicted_yield.map(|value| yield_prompt(form, value));
        let fertilizer_prompt = raw
            .recommended_fertilizer
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(|name| fertilizer_prompt(form, name));

        let (yield_summary, fertilizer_summary) = tokio::join!(
            self.summary_for(yield_prompt, YIELD_SUMMARY_FAILURE),
            self.summary_for(fertilizer_prompt, FERTILIZER_SUMMARY_FAILURE),
        );

        Summaries {
            yield_summary,
            fertilizer_summary,
        }
    }

    async fn summary_for(
        &self,
        prompt: Option<String>,
        failure_prefix: &'static str,
    ) -> Option<String> {
        let request = TextGenerationRequest {
            prompt: prompt?,
            model_name: self.text_model.clone(),
        };

        match self.service.generate_text(&request).await {
            Ok(generated) => Some(generated.generated_text),
            Err(err) => {
                warn!(error = %err, "summary generation failed");
                Some(format!("{failure_prefix}{err}"))
            }
        }
    }
}
