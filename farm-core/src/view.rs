//! Presentation adapter.
//!
//! [`present`] turns a wizard [`Snapshot`] into a front-end agnostic [`View`].
//! It is a pure function: the same snapshot always yields the same view, and
//! nothing here reaches back into the wizard.

use crate::models::{FieldName, FormData, FormErrors, INPUT_STEPS, ResultsState, WizardStep};
use crate::wizard::Snapshot;

const YIELD_NOTE: &str =
    "Note: Yield model used a reference 'Production' value. Interpret 'units/hectare' relatively.";

const NEXT_STEPS: &[&str] = &[
    "Review application rates for any recommended fertilizer.",
    "Consult local agricultural extension services for tailored advice.",
    "Maintain good water management and pest control practices.",
];

const NUTRIENT_NOTES: &[(&str, &str)] = &[
    ("Nitrogen (N)", "Vital for lush leaf growth and overall plant greenness."),
    ("Phosphorus (P)", "Key for strong root development, flowering, and fruiting."),
    (
        "Potassium (K)",
        "Boosts overall plant health, disease resistance, and fruit quality.",
    ),
];

const FERTILIZER_QUANTITY_NOTE: &str = "The fertilizer quantity here is your planned application. \
     We'll provide a specific fertilizer type recommendation in the analysis.";

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub progress: Progress,
    pub body: Body,
    /// Back/next controls; absent on the results step.
    pub navigation: Option<Navigation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// "Step n of 3", or "Results" on the terminal step.
    pub label: String,
    pub step_title: &'static str,
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Step(StepView),
    /// Busy with nothing to show yet.
    Processing,
    Results(ResultsView),
    /// Results step reached with no data and no error.
    NoAnalysis,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepView {
    pub title: &'static str,
    pub intro: &'static str,
    pub fields: Vec<FieldView>,
    pub tips: Vec<Tip>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub name: FieldName,
    pub label: &'static str,
    pub value: String,
    pub placeholder: Option<&'static str>,
    pub help: Option<&'static str>,
    /// Allowed values for categorical fields.
    pub options: Option<&'static [&'static str]>,
    pub error: Option<String>,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tip {
    pub title: Option<&'static str>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub back_enabled: bool,
    pub primary_label: &'static str,
    pub primary_enabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub heading: &'static str,
    pub error: Option<String>,
    pub fertilizer: Option<ResultCard>,
    pub yield_estimate: Option<ResultCard>,
    pub next_steps: Option<&'static [&'static str]>,
    pub reset_label: &'static str,
    pub reset_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    pub title: &'static str,
    pub value: String,
    pub insight: Insight,
    pub context: String,
    pub note: Option<&'static str>,
}

/// What a result card shows under its raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insight {
    Summary(String),
    /// Summary still being generated.
    Generating(&'static str),
    /// No summary and none pending.
    Unavailable,
}

pub fn present(snapshot: &Snapshot<'_>) -> View {
    let body = match snapshot.step {
        WizardStep::Results => results_body(snapshot),
        step => Body::Step(step_view(step, snapshot.form, snapshot.errors, snapshot.busy)),
    };

    let navigation = snapshot
        .step
        .is_input()
        .then(|| navigation(snapshot.step, snapshot.busy, snapshot.phase_message));

    View {
        progress: progress(snapshot.step),
        body,
        navigation,
    }
}

pub fn progress(step: WizardStep) -> Progress {
    if step.is_results() {
        return Progress {
            label: "Results".to_string(),
            step_title: step.title(),
            percent: 100,
        };
    }

    let denominator = u32::from(INPUT_STEPS.saturating_sub(1).max(1));
    let percent = u32::from(step.number() - 1) * 100 / denominator;
    Progress {
        label: format!("Step {} of {}", step.number(), INPUT_STEPS),
        step_title: step.title(),
        percent: u8::try_from(percent.min(100)).unwrap_or(100),
    }
}

fn navigation(
    step: WizardStep,
    busy: bool,
    phase_message: &'static str,
) -> Navigation {
    let primary_label = match (busy, step.is_final_input()) {
        (true, true) => phase_message,
        (true, false) => "Loading...",
        (false, true) => "Get Farm Analysis",
        (false, false) => "Next Step",
    };

    Navigation {
        back_enabled: step != WizardStep::CropLocation && !busy,
        primary_label,
        primary_enabled: !busy,
    }
}

fn step_view(
    step: WizardStep,
    form: &FormData,
    errors: &FormErrors,
    busy: bool,
) -> StepView {
    let fields = step
        .required_fields()
        .iter()
        .map(|&name| FieldView {
            name,
            label: name.label(),
            value: form.get(name).to_string(),
            placeholder: name.placeholder(),
            help: name.help_text(),
            options: name.options(),
            error: errors.get(name).map(str::to_string),
            disabled: busy,
        })
        .collect();

    StepView {
        title: step.title(),
        intro: step.intro(),
        fields,
        tips: tips(step, form, errors),
    }
}

fn tips(
    step: WizardStep,
    form: &FormData,
    errors: &FormErrors,
) -> Vec<Tip> {
    match step {
        WizardStep::CropLocation => {
            let ready = step
                .required_fields()
                .iter()
                .all(|&field| !form.get(field).is_empty() && !errors.contains(field));
            if !ready {
                return Vec::new();
            }
            vec![Tip {
                title: None,
                text: format!(
                    "For {} in {} during {}, ensure proper seed treatment to boost early vigor.",
                    form.crop, form.state, form.season
                ),
            }]
        }
        WizardStep::SoilEnvironment => NUTRIENT_NOTES
            .iter()
            .map(|&(title, text)| Tip {
                title: Some(title),
                text: text.to_string(),
            })
            .collect(),
        WizardStep::CultivationPractices => vec![Tip {
            title: None,
            text: FERTILIZER_QUANTITY_NOTE.to_string(),
        }],
        WizardStep::Results => Vec::new(),
    }
}

fn results_body(snapshot: &Snapshot<'_>) -> Body {
    let results = snapshot.results;
    let has_any = results.has_any_result();

    if snapshot.busy && !has_any {
        return Body::Processing;
    }
    if !has_any {
        return Body::NoAnalysis;
    }

    Body::Results(ResultsView {
        heading: WizardStep::Results.intro(),
        error: results.error.clone(),
        fertilizer: fertilizer_card(snapshot.form, results, snapshot.busy),
        yield_estimate: yield_card(snapshot.form, results, snapshot.busy),
        next_steps: (results.error.is_none()).then_some(NEXT_STEPS),
        reset_label: "Start New Farm Plan",
        reset_enabled: !snapshot.busy,
    })
}

fn insight(
    summary: Option<&String>,
    busy: bool,
    pending: &'static str,
) -> Insight {
    match summary {
        Some(text) => Insight::Summary(text.clone()),
        None if busy => Insight::Generating(pending),
        None => Insight::Unavailable,
    }
}

fn fertilizer_card(
    form: &FormData,
    results: &ResultsState,
    busy: bool,
) -> Option<ResultCard> {
    let name = results
        .fertilizer_recommendation_raw
        .as_deref()
        .filter(|name| !name.is_empty())?;

    Some(ResultCard {
        title: "Fertilizer Recommendation",
        value: name.to_string(),
        insight: insight(
            results.fertilizer_recommendation_summary.as_ref(),
            busy,
            "Generating AI summary for fertilizer...",
        ),
        context: format!(
            "Input context: Crop ({}), Soil ({}), NPK ({}-{}-{}), pH ({}).",
            form.crop, form.soil_color, form.nitrogen, form.phosphorus, form.potassium, form.ph
        ),
        note: None,
    })
}

fn yield_card(
    form: &FormData,
    results: &ResultsState,
    busy: bool,
) -> Option<ResultCard> {
    let value = results.yield_prediction_raw.filter(|v| !v.is_nan())?;

    Some(ResultCard {
        title: "Crop Yield Estimation",
        value: format!("{value:.2} units/hectare"),
        insight: insight(
            results.yield_prediction_summary.as_ref(),
            busy,
            "Generating AI summary for yield...",
        ),
        context: format!(
            "Input context: Crop ({}), Area ({} Ha), Rainfall ({} mm), Fertilizer ({} kg), Pesticide ({} kg/L).",
            form.crop,
            form.area,
            form.annual_rainfall_yield,
            form.fertilizer_quantity,
            form.pesticide
        ),
        note: Some(YIELD_NOTE),
    })
}
