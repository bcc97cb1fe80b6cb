use serde::{Deserialize, Serialize};

/// Outcome of the most recent analysis run.
///
/// `error` may be set alongside raw values: a prediction captured before a
/// later failure is kept so it can be shown next to the error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultsState {
    pub yield_prediction_raw: Option<f64>,
    pub fertilizer_recommendation_raw: Option<String>,
    pub yield_prediction_summary: Option<String>,
    pub fertilizer_recommendation_summary: Option<String>,
    pub error: Option<String>,
}

impl ResultsState {
    /// Reset every field to `None`.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// True when a raw prediction or an error is available to show.
    pub fn has_any_result(&self) -> bool {
        self.yield_prediction_raw.is_some()
            || self.fertilizer_recommendation_raw.is_some()
            || self.error.is_some()
    }
}
