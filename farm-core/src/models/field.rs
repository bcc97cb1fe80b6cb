use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::options::{CROP_OPTIONS, SEASON_OPTIONS, SOIL_OPTIONS, STATE_OPTIONS};

/// Error returned when a string does not name a form field.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldNameError {
    #[error("unknown field '{0}'")]
    Unknown(String),
}

/// How a field is edited. Every value is stored as text either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// One of a fixed list of options.
    Choice(&'static [&'static str]),
    /// Free text that is coerced to a number on submission.
    Number,
}

/// Every field collected by the wizard.
///
/// The serialized form is the wire name used by the prediction backend
/// (`"Soil_color"`, `"pH"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldName {
    Crop,
    State,
    Season,
    #[serde(rename = "Soil_color")]
    SoilColor,
    Nitrogen,
    Phosphorus,
    Potassium,
    #[serde(rename = "pH")]
    Ph,
    #[serde(rename = "Rainfall_Fert")]
    RainfallFert,
    Temperature,
    Area,
    #[serde(rename = "Annual_Rainfall_Yield")]
    AnnualRainfallYield,
    #[serde(rename = "Fertilizer_Quantity")]
    FertilizerQuantity,
    Pesticide,
}

impl FieldName {
    pub const ALL: [FieldName; 14] = [
        Self::Crop,
        Self::State,
        Self::Season,
        Self::SoilColor,
        Self::Nitrogen,
        Self::Phosphorus,
        Self::Potassium,
        Self::Ph,
        Self::RainfallFert,
        Self::Temperature,
        Self::Area,
        Self::AnnualRainfallYield,
        Self::FertilizerQuantity,
        Self::Pesticide,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crop => "Crop",
            Self::State => "State",
            Self::Season => "Season",
            Self::SoilColor => "Soil_color",
            Self::Nitrogen => "Nitrogen",
            Self::Phosphorus => "Phosphorus",
            Self::Potassium => "Potassium",
            Self::Ph => "pH",
            Self::RainfallFert => "Rainfall_Fert",
            Self::Temperature => "Temperature",
            Self::Area => "Area",
            Self::AnnualRainfallYield => "Annual_Rainfall_Yield",
            Self::FertilizerQuantity => "Fertilizer_Quantity",
            Self::Pesticide => "Pesticide",
        }
    }

    /// Looks a field up by its wire name, ignoring ASCII case.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s))
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Crop => FieldKind::Choice(CROP_OPTIONS),
            Self::State => FieldKind::Choice(STATE_OPTIONS),
            Self::Season => FieldKind::Choice(SEASON_OPTIONS),
            Self::SoilColor => FieldKind::Choice(SOIL_OPTIONS),
            _ => FieldKind::Number,
        }
    }

    /// Options for a categorical field, `None` for numeric ones.
    pub fn options(&self) -> Option<&'static [&'static str]> {
        match self.kind() {
            FieldKind::Choice(options) => Some(options),
            FieldKind::Number => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Crop => "Crop",
            Self::State => "State",
            Self::Season => "Season",
            Self::SoilColor => "Soil Color",
            Self::Nitrogen => "Nitrogen (N)",
            Self::Phosphorus => "Phosphorus (P)",
            Self::Potassium => "Potassium (K)",
            Self::Ph => "Soil pH",
            Self::RainfallFert => "Typical Rainfall (mm)",
            Self::Temperature => "Avg. Temperature (°C)",
            Self::Area => "Area to Cultivate (Hectares)",
            Self::AnnualRainfallYield => "Expected Annual Rainfall (mm)",
            Self::FertilizerQuantity => "Planned Fertilizer Quantity (Total kg)",
            Self::Pesticide => "Planned Pesticide Quantity (Total kg or L)",
        }
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::Nitrogen => Some("e.g., 75 kg/ha"),
            Self::Phosphorus => Some("e.g., 50 kg/ha"),
            Self::Potassium => Some("e.g., 100 kg/ha"),
            Self::Ph => Some("e.g., 6.5"),
            Self::RainfallFert => Some("e.g., 700"),
            Self::Temperature => Some("e.g., 25"),
            Self::Area => Some("e.g., 10.5"),
            Self::AnnualRainfallYield => Some("e.g., 1200"),
            Self::FertilizerQuantity => Some("e.g., 150"),
            Self::Pesticide => Some("e.g., 2.5"),
            _ => None,
        }
    }

    pub fn help_text(&self) -> Option<&'static str> {
        match self {
            Self::RainfallFert => Some("For fertilizer context."),
            Self::AnnualRainfallYield => Some("For yield context."),
            Self::FertilizerQuantity => Some("Total NPK product for the area."),
            _ => None,
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = FieldNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| FieldNameError::Unknown(s.to_string()))
    }
}
