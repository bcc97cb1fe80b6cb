mod field;
mod form;
mod options;
mod payloads;
mod results;
mod step;

pub use field::{FieldKind, FieldName, FieldNameError};
pub use form::{FormData, FormErrors};
pub use options::{CROP_OPTIONS, SEASON_OPTIONS, SOIL_OPTIONS, STATE_OPTIONS};
pub use payloads::{
    FertilizerRecommendation, FertilizerRequest, GeneratedText, PRODUCTION_REFERENCE,
    TextGenerationRequest, YieldPrediction, YieldRequest,
};
pub use results::ResultsState;
pub use step::{INPUT_STEPS, WizardStep};
