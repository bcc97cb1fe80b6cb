//! Request and response bodies exchanged with the advisor backend.
//!
//! Field names follow the backend's JSON schema exactly, so most fields carry
//! a `serde(rename)`.

use serde::{Deserialize, Serialize};

use super::FormData;
use crate::wizard::common::parse_or_zero;

/// Reference production value sent with every yield request.
///
/// The yield model was calibrated against a production of 1, so user input
/// never overrides it.
pub const PRODUCTION_REFERENCE: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldRequest {
    #[serde(rename = "Crop")]
    pub crop: String,
    #[serde(rename = "Season")]
    pub season: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Area")]
    pub area: f64,
    #[serde(rename = "Production")]
    pub production: f64,
    #[serde(rename = "Annual_Rainfall")]
    pub annual_rainfall: f64,
    #[serde(rename = "Fertilizer")]
    pub fertilizer: f64,
    #[serde(rename = "Pesticide")]
    pub pesticide: f64,
}

impl YieldRequest {
    pub fn from_form(form: &FormData) -> Self {
        Self {
            crop: form.crop.clone(),
            season: form.season.clone(),
            state: form.state.clone(),
            area: parse_or_zero(&form.area),
            production: PRODUCTION_REFERENCE,
            annual_rainfall: parse_or_zero(&form.annual_rainfall_yield),
            fertilizer: parse_or_zero(&form.fertilizer_quantity),
            pesticide: parse_or_zero(&form.pesticide),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerRequest {
    #[serde(rename = "Crop")]
    pub crop: String,
    #[serde(rename = "Soil_color")]
    pub soil_color: String,
    #[serde(rename = "Nitrogen")]
    pub nitrogen: f64,
    #[serde(rename = "Phosphorus")]
    pub phosphorus: f64,
    #[serde(rename = "Potassium")]
    pub potassium: f64,
    #[serde(rename = "pH")]
    pub ph: f64,
    #[serde(rename = "Rainfall")]
    pub rainfall: f64,
    #[serde(rename = "Temperature")]
    pub temperature: f64,
}

impl FertilizerRequest {
    pub fn from_form(form: &FormData) -> Self {
        Self {
            crop: form.crop.clone(),
            soil_color: form.soil_color.clone(),
            nitrogen: parse_or_zero(&form.nitrogen),
            phosphorus: parse_or_zero(&form.phosphorus),
            potassium: parse_or_zero(&form.potassium),
            ph: parse_or_zero(&form.ph),
            rainfall: parse_or_zero(&form.rainfall_fert),
            temperature: parse_or_zero(&form.temperature),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldPrediction {
    pub predicted_yield: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FertilizerRecommendation {
    pub recommended_fertilizer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextGenerationRequest {
    pub prompt: String,
    /// Backend picks its default model when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedText {
    pub generated_text: String,
}
