use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::FieldName;

/// Raw values entered by the user.
///
/// Every field is kept as text, including the numeric ones. Conversion to
/// numbers happens only when the request payloads are built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    #[serde(rename = "Crop")]
    pub crop: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Season")]
    pub season: String,
    #[serde(rename = "Soil_color")]
    pub soil_color: String,
    #[serde(rename = "Nitrogen")]
    pub nitrogen: String,
    #[serde(rename = "Phosphorus")]
    pub phosphorus: String,
    #[serde(rename = "Potassium")]
    pub potassium: String,
    #[serde(rename = "pH")]
    pub ph: String,
    #[serde(rename = "Rainfall_Fert")]
    pub rainfall_fert: String,
    #[serde(rename = "Temperature")]
    pub temperature: String,
    #[serde(rename = "Area")]
    pub area: String,
    #[serde(rename = "Annual_Rainfall_Yield")]
    pub annual_rainfall_yield: String,
    #[serde(rename = "Fertilizer_Quantity")]
    pub fertilizer_quantity: String,
    #[serde(rename = "Pesticide")]
    pub pesticide: String,
}

impl FormData {
    pub fn get(
        &self,
        field: FieldName,
    ) -> &str {
        match field {
            FieldName::Crop => &self.crop,
            FieldName::State => &self.state,
            FieldName::Season => &self.season,
            FieldName::SoilColor => &self.soil_color,
            FieldName::Nitrogen => &self.nitrogen,
            FieldName::Phosphorus => &self.phosphorus,
            FieldName::Potassium => &self.potassium,
            FieldName::Ph => &self.ph,
            FieldName::RainfallFert => &self.rainfall_fert,
            FieldName::Temperature => &self.temperature,
            FieldName::Area => &self.area,
            FieldName::AnnualRainfallYield => &self.annual_rainfall_yield,
            FieldName::FertilizerQuantity => &self.fertilizer_quantity,
            FieldName::Pesticide => &self.pesticide,
        }
    }

    pub fn set(
        &mut self,
        field: FieldName,
        value: impl Into<String>,
    ) {
        let slot = match field {
            FieldName::Crop => &mut self.crop,
            FieldName::State => &mut self.state,
            FieldName::Season => &mut self.season,
            FieldName::SoilColor => &mut self.soil_color,
            FieldName::Nitrogen => &mut self.nitrogen,
            FieldName::Phosphorus => &mut self.phosphorus,
            FieldName::Potassium => &mut self.potassium,
            FieldName::Ph => &mut self.ph,
            FieldName::RainfallFert => &mut self.rainfall_fert,
            FieldName::Temperature => &mut self.temperature,
            FieldName::Area => &mut self.area,
            FieldName::AnnualRainfallYield => &mut self.annual_rainfall_yield,
            FieldName::FertilizerQuantity => &mut self.fertilizer_quantity,
            FieldName::Pesticide => &mut self.pesticide,
        };
        *slot = value.into();
    }

    /// True when every field is the empty string.
    pub fn is_empty(&self) -> bool {
        FieldName::ALL
            .into_iter()
            .all(|field| self.get(field).is_empty())
    }
}

/// Validation messages keyed by field.
///
/// A field has an entry if and only if it currently has an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<FieldName, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &self,
        field: FieldName,
    ) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(
        &self,
        field: FieldName,
    ) -> bool {
        self.0.contains_key(&field)
    }

    pub fn insert(
        &mut self,
        field: FieldName,
        message: impl Into<String>,
    ) {
        self.0.insert(field, message.into());
    }

    /// Removes the error for `field`, returning it if there was one.
    pub fn remove(
        &mut self,
        field: FieldName,
    ) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_form_is_empty() {
        assert!(FormData::default().is_empty());
    }

    #[test]
    fn set_then_get_every_field() {
        let mut form = FormData::default();
        for (i, field) in FieldName::ALL.into_iter().enumerate() {
            form.set(field, i.to_string());
        }
        for (i, field) in FieldName::ALL.into_iter().enumerate() {
            assert_eq!(form.get(field), i.to_string());
        }
        assert!(!form.is_empty());
    }

    #[test]
    fn form_serializes_with_wire_names() {
        let mut form = FormData::default();
        form.set(FieldName::SoilColor, "Black");
        form.set(FieldName::Ph, "6.5");

        let json = serde_json::to_value(&form).unwrap();

        assert_eq!(json["Soil_color"], "Black");
        assert_eq!(json["pH"], "6.5");
        assert_eq!(json["Crop"], "");
    }

    #[test]
    fn errors_track_presence_per_field() {
        let mut errors = FormErrors::new();
        errors.insert(FieldName::Crop, "Crop is required.");

        assert!(errors.contains(FieldName::Crop));
        assert_eq!(errors.get(FieldName::Crop), Some("Crop is required."));
        assert_eq!(errors.get(FieldName::State), None);

        assert_eq!(
            errors.remove(FieldName::Crop),
            Some("Crop is required.".to_string())
        );
        assert!(errors.is_empty());
    }
}
