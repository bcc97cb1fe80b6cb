use tracing::trace;

use crate::models::{FieldName, FormData, FormErrors};

use super::validator::Validation;

/// Field values and validation messages for the wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormStore {
    data: FormData,
    errors: FormErrors,
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    /// Overwrites one field and drops that field's error, if any.
    pub fn set_field(
        &mut self,
        field: FieldName,
        value: impl Into<String>,
    ) {
        self.data.set(field, value);
        if self.errors.remove(field).is_some() {
            trace!(field = %field, "cleared validation error on edit");
        }
    }

    /// Replaces the errors of the fields the validation looked at. Errors on
    /// fields belonging to other steps are left as they are.
    pub fn apply_validation(
        &mut self,
        validation: &Validation,
    ) {
        for &field in validation.step.required_fields() {
            match validation.errors.get(field) {
                Some(message) => self.errors.insert(field, message),
                None => {
                    self.errors.remove(field);
                }
            }
        }
    }

    /// All fields back to empty, all errors cleared.
    pub fn reset(&mut self) {
        self.data = FormData::default();
        self.errors.clear();
    }
}
