use crate::models::{FormData, FormErrors, WizardStep};

use super::common::required_message;

/// Result of validating one step.
///
/// `errors` holds an entry for every blank required field of the step that
/// was checked, and nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub step: WizardStep,
    pub valid: bool,
    pub errors: FormErrors,
}

/// Required-field rules per wizard step.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepValidator;

impl StepValidator {
    /// Checks the required fields of `step`. A field fails when its trimmed
    /// value is empty. Steps without required fields always pass.
    pub fn validate(
        &self,
        step: WizardStep,
        form: &FormData,
    ) -> Validation {
        let mut errors = FormErrors::new();

        for &field in step.required_fields() {
            if form.get(field).trim().is_empty() {
                errors.insert(field, required_message(field.as_str()));
            }
        }

        Validation {
            step,
            valid: errors.is_empty(),
            errors,
        }
    }
}
