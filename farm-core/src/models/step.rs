use serde::{Deserialize, Serialize};

use super::FieldName;

/// Number of input steps before the results step.
pub const INPUT_STEPS: u8 = 3;

/// Position in the wizard. Numbered 1 through `INPUT_STEPS + 1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WizardStep {
    #[default]
    CropLocation,
    SoilEnvironment,
    CultivationPractices,
    Results,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        match self {
            Self::CropLocation => 1,
            Self::SoilEnvironment => 2,
            Self::CultivationPractices => 3,
            Self::Results => INPUT_STEPS + 1,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::CropLocation),
            2 => Some(Self::SoilEnvironment),
            3 => Some(Self::CultivationPractices),
            4 => Some(Self::Results),
            _ => None,
        }
    }

    pub fn is_input(&self) -> bool {
        !self.is_results()
    }

    pub fn is_results(&self) -> bool {
        matches!(self, Self::Results)
    }

    /// True for the last input step, where "next" submits the form.
    pub fn is_final_input(&self) -> bool {
        self.number() == INPUT_STEPS
    }

    /// Fields that must be non-blank before leaving this step.
    pub fn required_fields(&self) -> &'static [FieldName] {
        match self {
            Self::CropLocation => &[FieldName::Crop, FieldName::State, FieldName::Season],
            Self::SoilEnvironment => &[
                FieldName::SoilColor,
                FieldName::Nitrogen,
                FieldName::Phosphorus,
                FieldName::Potassium,
                FieldName::Ph,
                FieldName::RainfallFert,
                FieldName::Temperature,
            ],
            Self::CultivationPractices => &[
                FieldName::Area,
                FieldName::AnnualRainfallYield,
                FieldName::FertilizerQuantity,
                FieldName::Pesticide,
            ],
            Self::Results => &[],
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::CropLocation => "Crop & Location",
            Self::SoilEnvironment => "Soil & Environment",
            Self::CultivationPractices => "Cultivation Practices",
            Self::Results => "Analysis Results",
        }
    }

    pub fn intro(&self) -> &'static str {
        match self {
            Self::CropLocation => {
                "Let's start planning! Tell us about your crop and farm location."
            }
            Self::SoilEnvironment => {
                "Describe your soil and local conditions for the best fertilizer match."
            }
            Self::CultivationPractices => {
                "Detail your planned area and management for yield estimation."
            }
            Self::Results => "Your Farm Analysis Results",
        }
    }
}
