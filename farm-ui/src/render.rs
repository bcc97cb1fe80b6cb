//! Plain-text rendering of a [`View`].

use std::fmt::Write;

use farm_core::FieldName;
use farm_core::view::{Body, FieldView, Insight, Navigation, Progress, ResultCard, ResultsView, StepView, View};

const BAR_WIDTH: usize = 30;

pub fn render(view: &View) -> String {
    let mut out = String::new();
    progress(&mut out, &view.progress);

    match &view.body {
        Body::Step(step) => step_body(&mut out, step),
        Body::Processing => out.push_str("\nProcessing analysis...\n"),
        Body::NoAnalysis => out.push_str("\nNo analysis performed yet or an issue occurred.\n"),
        Body::Results(results) => results_body(&mut out, results),
    }

    if let Some(nav) = &view.navigation {
        navigation(&mut out, nav);
    }
    out
}

/// Numbered option list for one field, or `None` for numeric fields.
pub fn render_options(field: FieldName) -> Option<String> {
    let options = field.options()?;
    let mut out = format!("{} ({}):\n", field.label(), field.as_str());
    for (i, option) in options.iter().enumerate() {
        let _ = writeln!(out, "  {}. {option}", i + 1);
    }
    Some(out)
}

fn progress(
    out: &mut String,
    progress: &Progress,
) {
    let filled = BAR_WIDTH * usize::from(progress.percent) / 100;
    let _ = writeln!(out, "{:<14}{:>46}", progress.label, progress.step_title);
    let _ = writeln!(
        out,
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        progress.percent
    );
}

fn step_body(
    out: &mut String,
    step: &StepView,
) {
    let _ = writeln!(out, "\n== {} ==", step.title);
    let _ = writeln!(out, "{}\n", step.intro);

    for field in &step.fields {
        field_line(out, field);
    }

    for tip in &step.tips {
        match tip.title {
            Some(title) => {
                let _ = writeln!(out, "\n  * {title}: {}", tip.text);
            }
            None => {
                let _ = writeln!(out, "\n  Tip: {}", tip.text);
            }
        }
    }
}

fn field_line(
    out: &mut String,
    field: &FieldView,
) {
    let value = if field.value.is_empty() {
        field.placeholder.map_or_else(|| "-".to_string(), |p| format!("({p})"))
    } else {
        field.value.clone()
    };
    let lock = if field.disabled { " [locked]" } else { "" };
    let _ = writeln!(
        out,
        "  {:<44} {:<22} {}{lock}",
        field.label,
        field.name.as_str(),
        value
    );

    if let Some(options) = field.options {
        let _ = writeln!(out, "      options: {}", options.join(", "));
    }
    if let Some(help) = field.help {
        let _ = writeln!(out, "      {help}");
    }
    if let Some(error) = &field.error {
        let _ = writeln!(out, "      ! {error}");
    }
}

fn navigation(
    out: &mut String,
    nav: &Navigation,
) {
    let back = if nav.back_enabled { "[back]" } else { "      " };
    let primary = if nav.primary_enabled {
        format!("[next] {}", nav.primary_label)
    } else {
        nav.primary_label.to_string()
    };
    let _ = writeln!(out, "\n{back}{primary:>54}");
}

fn results_body(
    out: &mut String,
    results: &ResultsView,
) {
    let _ = writeln!(out, "\n== {} ==", results.heading);

    if let Some(error) = &results.error {
        let _ = writeln!(out, "\nAnalysis Error:\n  {error}");
    }
    if let Some(card) = &results.fertilizer {
        result_card(out, card);
    }
    if let Some(card) = &results.yield_estimate {
        result_card(out, card);
    }

    if let Some(steps) = results.next_steps {
        out.push_str("\nGeneral Next Steps\n");
        for step in steps {
            let _ = writeln!(out, "  - {step}");
        }
    }

    if results.reset_enabled {
        let _ = writeln!(out, "\n[reset] {}", results.reset_label);
    } else {
        let _ = writeln!(out, "\n{}", results.reset_label);
    }
}

fn result_card(
    out: &mut String,
    card: &ResultCard,
) {
    let _ = writeln!(out, "\n{}\n  {}", card.title, card.value);
    match &card.insight {
        Insight::Summary(text) => {
            out.push_str("  AI Powered Insight:\n");
            for line in text.lines() {
                let _ = writeln!(out, "    {line}");
            }
        }
        Insight::Generating(message) => {
            let _ = writeln!(out, "  {message}");
        }
        Insight::Unavailable => {}
    }
    let _ = writeln!(out, "  {}", card.context);
    if let Some(note) = card.note {
        let _ = writeln!(out, "  {note}");
    }
}

#[cfg(test)]
mod tests {
    use farm_core::view::present;
    use farm_core::{ResultsState, Wizard, WizardStep};

    use super::*;

    #[test]
    fn first_step_lists_fields_and_progress() {
        let wizard = Wizard::new();
        let text = render(&present(&wizard.snapshot()));

        assert!(text.contains("Step 1 of 3"));
        assert!(text.contains("Crop & Location"));
        assert!(!text.contains("Soil_color"));
        assert!(text.contains("options: Wheat, Rice"));
        assert!(text.contains("[next] Next Step"));
        assert!(!text.contains("[back]"));
    }

    #[test]
    fn validation_errors_are_shown_under_fields() {
        let mut wizard = Wizard::new();
        wizard.next();

        let text = render(&present(&wizard.snapshot()));

        assert!(text.contains("! Crop is required."));
        assert!(text.contains("! Season is required."));
    }

    #[test]
    fn results_with_error_show_error_and_partial_card() {
        let form = farm_core::FormData::default();
        let errors = farm_core::FormErrors::new();
        let results = ResultsState {
            yield_prediction_raw: Some(42.5),
            error: Some("timeout".to_string()),
            ..ResultsState::default()
        };
        let snapshot = farm_core::wizard::Snapshot {
            step: WizardStep::Results,
            form: &form,
            errors: &errors,
            results: &results,
            busy: false,
            phase_message: "Analyzing...",
        };

        let text = render(&present(&snapshot));

        assert!(text.contains("Analysis Error:\n  timeout"));
        assert!(text.contains("42.50 units/hectare"));
        assert!(!text.contains("General Next Steps"));
        assert!(text.contains("[reset] Start New Farm Plan"));
    }

    #[test]
    fn numeric_fields_have_no_option_list() {
        assert_eq!(render_options(FieldName::Nitrogen), None);
        let crops = render_options(FieldName::Crop).unwrap();
        assert!(crops.contains("  1. Wheat"));
        assert!(crops.contains("  7. Arhar/Tur"));
    }
}
