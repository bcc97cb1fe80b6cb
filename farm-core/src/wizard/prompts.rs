//! Prompts for the text-generation summaries.

use crate::models::FormData;

/// Prompt asking for a short farmer-facing explanation of a yield prediction.
pub fn yield_prompt(
    form: &FormData,
    predicted_yield: f64,
) -> String {
    format!(
        "Given the following farm conditions and inputs for {crop} in {state} ({season} season):\n\
         - Area: {area} Hectares\n\
         - Annual Rainfall: {rainfall} mm\n\
         - Planned Fertilizer Quantity: {fertilizer} kg\n\
         - Planned Pesticide Quantity: {pesticide} kg/L\n\
         The ML model predicted a yield of: {predicted_yield:.2} units/hectare.\n\
         Please provide a brief, insightful summary (2-3 sentences) explaining this prediction \
         in simple terms for a farmer. Mention key contributing factors if possible and any general advice.\n\
         (Note: The model used a reference 'Production' value of 1, so 'units/hectare' is relative.)",
        crop = form.crop,
        state = form.state,
        season = form.season,
        area = form.area,
        rainfall = form.annual_rainfall_yield,
        fertilizer = form.fertilizer_quantity,
        pesticide = form.pesticide,
    )
}

/// Prompt asking why the recommended fertilizer suits the given soil.
pub fn fertilizer_prompt(
    form: &FormData,
    recommended_fertilizer: &str,
) -> String {
    format!(
        "For a {crop} crop with the following soil and climate conditions:\n\
         - Soil Color: {soil}\n\
         - Nitrogen: {n} kg/ha\n\
         - Phosphorus: {p} kg/ha\n\
         - Potassium: {k} kg/ha\n\
         - Soil pH: {ph}\n\
         - Typical Rainfall: {rainfall} mm\n\
         - Average Temperature: {temperature}°C\n\
         The ML model recommended the fertilizer: \"{recommended_fertilizer}\".\n\
         Please provide a brief, insightful summary (2-3 sentences) explaining this recommendation \
         in simple terms for a farmer. Why might this fertilizer be suitable?",
        crop = form.crop,
        soil = form.soil_color,
        n = form.nitrogen,
        p = form.phosphorus,
        k = form.potassium,
        ph = form.ph,
        rainfall = form.rainfall_fert,
        temperature = form.temperature,
    )
}
