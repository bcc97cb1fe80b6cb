use tracing::{debug, info, warn};

use crate::models::{
    FertilizerRequest, FieldName, FormData, FormErrors, ResultsState, WizardStep, YieldRequest,
};

use super::aggregator::{RawOutcome, RawResults, ResultAggregator, Summaries};
use super::store::FormStore;
use super::validator::StepValidator;

/// What a submission is currently doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    FetchingPredictions,
    GeneratingSummaries,
}

impl Phase {
    /// Progress text shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Idle => "Analyzing...",
            Self::FetchingPredictions => "Fetching ML predictions...",
            Self::GeneratingSummaries => "Generating AI summaries...",
        }
    }
}

/// Handle for one submission.
///
/// Carries the request payloads and a copy of the form taken when the
/// submission started, plus the generation it belongs to. Results are only
/// written while that generation is still current.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionTicket {
    generation: u64,
    form: FormData,
    yield_request: YieldRequest,
    fertilizer_request: FertilizerRequest,
}

impl SubmissionTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn yield_request(&self) -> &YieldRequest {
        &self.yield_request
    }

    pub fn fertilizer_request(&self) -> &FertilizerRequest {
        &self.fertilizer_request
    }
}

/// Result of a navigation request.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// The wizard is now on this step.
    Moved(WizardStep),
    /// Validation failed; errors were recorded for the current step.
    Blocked,
    /// Nothing to do (first step, terminal step, or busy).
    Stayed,
    /// The final step validated and a submission has started. Drive it with
    /// [`ResultAggregator`] and feed the outcome back through
    /// [`Wizard::apply_raw`] and [`Wizard::apply_summaries`].
    Submitting(SubmissionTicket),
}

/// Read-only view of everything the presentation layer needs.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub step: WizardStep,
    pub form: &'a FormData,
    pub errors: &'a FormErrors,
    pub results: &'a ResultsState,
    pub busy: bool,
    pub phase_message: &'static str,
}

/// State container for the farm advisor wizard.
#[derive(Debug, Clone, Default)]
pub struct Wizard {
    step: WizardStep,
    store: FormStore,
    validator: StepValidator,
    results: ResultsState,
    busy: bool,
    phase: Phase,
    generation: u64,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn form(&self) -> &FormData {
        self.store.data()
    }

    pub fn errors(&self) -> &FormErrors {
        self.store.errors()
    }

    pub fn results(&self) -> &ResultsState {
        &self.results
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Submission generation; bumped by every new submission and by reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            step: self.step,
            form: self.store.data(),
            errors: self.store.errors(),
            results: &self.results,
            busy: self.busy,
            phase_message: self.phase.message(),
        }
    }

    pub fn set_field(
        &mut self,
        field: FieldName,
        value: impl Into<String>,
    ) {
        self.store.set_field(field, value);
    }

    /// Validates the current step and moves forward. On the last input step
    /// this starts a submission instead; the wizard stays on that step until
    /// the submission settles.
    pub fn next(&mut self) -> Transition {
        if self.busy || self.step.is_results() {
            return Transition::Stayed;
        }

        let validation = self.validator.validate(self.step, self.store.data());
        self.store.apply_validation(&validation);
        if !validation.valid {
            debug!(step = self.step.number(), errors = validation.errors.len(), "step blocked");
            return Transition::Blocked;
        }

        if self.step.is_final_input() {
            return Transition::Submitting(self.begin_submission());
        }

        // Only input steps before the last one reach this point.
        if let Some(next) = WizardStep::from_number(self.step.number() + 1) {
            self.step = next;
        }
        debug!(step = self.step.number(), "advanced");
        Transition::Moved(self.step)
    }

    /// Moves back one step. Never validates.
    pub fn prev(&mut self) -> Transition {
        if self.busy {
            return Transition::Stayed;
        }
        match WizardStep::from_number(self.step.number().saturating_sub(1)) {
            Some(previous) => {
                self.step = previous;
                Transition::Moved(previous)
            }
            None => Transition::Stayed,
        }
    }

    /// Back to an empty first step. Any submission still in flight belongs
    /// to an older generation afterwards and its results are discarded.
    pub fn reset(&mut self) {
        self.store.reset();
        self.results.clear();
        self.step = WizardStep::CropLocation;
        self.busy = false;
        self.phase = Phase::Idle;
        self.generation = self.generation.wrapping_add(1);
        info!(generation = self.generation, "wizard reset");
    }

    fn begin_submission(&mut self) -> SubmissionTicket {
        self.generation = self.generation.wrapping_add(1);
        self.busy = true;
        self.phase = Phase::FetchingPredictions;
        self.results.clear();
        info!(generation = self.generation, "{}", self.phase.message());

        let form = self.store.data().clone();
        SubmissionTicket {
            generation: self.generation,
            yield_request: YieldRequest::from_form(&form),
            fertilizer_request: FertilizerRequest::from_form(&form),
            form,
        }
    }

    fn is_current(
        &self,
        ticket: &SubmissionTicket,
    ) -> bool {
        if ticket.generation == self.generation && self.busy {
            return true;
        }
        warn!(
            ticket = ticket.generation,
            current = self.generation,
            "discarding result of a superseded submission"
        );
        false
    }

    /// Records the outcome of the raw-prediction stage.
    ///
    /// On success the raw values are stored and the summary phase begins. On
    /// failure the submission ends: the error and any captured yield are
    /// stored and the wizard moves to the results step.
    ///
    /// Returns `false` without touching state when the ticket is stale.
    pub fn apply_raw(
        &mut self,
        ticket: &SubmissionTicket,
        outcome: &RawOutcome,
    ) -> bool {
        if !self.is_current(ticket) {
            return false;
        }

        match outcome {
            Ok(raw) => {
                self.results.yield_prediction_raw = Some(raw.predicted_yield);
                self.results.fertilizer_recommendation_raw = Some(raw.recommended_fertilizer.clone());
                self.phase = Phase::GeneratingSummaries;
                info!(generation = ticket.generation, "{}", self.phase.message());
            }
            Err(failure) => {
                self.results = ResultsState {
                    yield_prediction_raw: failure.predicted_yield,
                    error: Some(failure.error.to_string()),
                    ..ResultsState::default()
                };
                self.finish();
            }
        }
        true
    }

    /// Stores both summaries in one update and completes the submission.
    ///
    /// Returns `false` without touching state when the ticket is stale.
    pub fn apply_summaries(
        &mut self,
        ticket: &SubmissionTicket,
        summaries: Summaries,
    ) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.results.yield_prediction_summary = summaries.yield_summary;
        self.results.fertilizer_recommendation_summary = summaries.fertilizer_summary;
        self.finish();
        true
    }

    fn finish(&mut self) {
        self.step = WizardStep::Results;
        self.busy = false;
        self.phase = Phase::Idle;
        info!(
            generation = self.generation,
            failed = self.results.error.is_some(),
            "submission settled"
        );
    }

    /// Runs both stages of `ticket` to completion.
    pub async fn submit(
        &mut self,
        ticket: SubmissionTicket,
        aggregator: &ResultAggregator,
    ) {
        let outcome = aggregator
            .fetch_raw(&ticket.yield_request, &ticket.fertilizer_request)
            .await;
        if !self.apply_raw(&ticket, &outcome) {
            return;
        }

        if let Ok(raw) = &outcome {
            let summaries = aggregator
                .summarize(&ticket.form, &RawResults::from(raw))
                .await;
            self.apply_summaries(&ticket, summaries);
        }
    }

    /// [`Wizard::next`], running the submission inline when one starts.
    pub async fn advance(
        &mut self,
        aggregator: &ResultAggregator,
    ) -> Transition {
        match self.next() {
            Transition::Submitting(ticket) => {
                self.submit(ticket, aggregator).await;
                Transition::Moved(self.step)
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::service::ServiceError;
    use crate::wizard::aggregator::tests::{ScriptedService, filled_form};

    fn fill_step(
        wizard: &mut Wizard,
        step: WizardStep,
    ) {
        let form = filled_form();
        for &field in step.required_fields() {
            wizard.set_field(field, form.get(field));
        }
    }

    /// A wizard sitting on the last input step with every field filled.
    fn wizard_on_final_step() -> Wizard {
        let mut wizard = Wizard::new();
        fill_step(&mut wizard, WizardStep::CropLocation);
        assert_eq!(wizard.next(), Transition::Moved(WizardStep::SoilEnvironment));
        fill_step(&mut wizard, WizardStep::SoilEnvironment);
        assert_eq!(wizard.next(), Transition::Moved(WizardStep::CultivationPractices));
        fill_step(&mut wizard, WizardStep::CultivationPractices);
        wizard
    }

    fn aggregator(service: ScriptedService) -> ResultAggregator {
        ResultAggregator::new(Arc::new(service))
    }

    // ── navigation ───────────────────────────────────────────────────────

    #[test]
    fn starts_empty_on_step_one() {
        let wizard = Wizard::new();
        assert_eq!(wizard.step(), WizardStep::CropLocation);
        assert!(wizard.form().is_empty());
        assert!(wizard.errors().is_empty());
        assert!(wizard.results().is_empty());
        assert!(!wizard.is_busy());
    }

    #[test]
    fn next_blocks_on_blank_required_fields() {
        let mut wizard = Wizard::new();
        wizard.set_field(FieldName::Crop, "Wheat");

        assert_eq!(wizard.next(), Transition::Blocked);
        assert_eq!(wizard.step(), WizardStep::CropLocation);
        assert_eq!(wizard.errors().len(), 2);
        assert!(!wizard.errors().contains(FieldName::Crop));
    }

    #[test]
    fn blocked_step_keeps_errors_of_other_steps() {
        let mut wizard = Wizard::new();
        fill_step(&mut wizard, WizardStep::CropLocation);
        wizard.next();
        assert_eq!(wizard.next(), Transition::Blocked);
        assert_eq!(wizard.prev(), Transition::Moved(WizardStep::CropLocation));

        wizard.set_field(FieldName::Crop, "");
        assert_eq!(wizard.next(), Transition::Blocked);

        // Step 2 errors survive the step 1 validation.
        assert_eq!(wizard.errors().len(), 7 + 1);
    }

    #[test]
    fn prev_at_step_one_is_a_no_op() {
        let mut wizard = Wizard::new();
        assert_eq!(wizard.prev(), Transition::Stayed);
        assert_eq!(wizard.step(), WizardStep::CropLocation);
    }

    #[test]
    fn prev_skips_validation() {
        let mut wizard = Wizard::new();
        fill_step(&mut wizard, WizardStep::CropLocation);
        wizard.next();

        assert_eq!(wizard.prev(), Transition::Moved(WizardStep::CropLocation));
        assert!(wizard.errors().is_empty());
    }

    #[test]
    fn final_step_starts_submission_without_advancing() {
        let mut wizard = wizard_on_final_step();
        wizard.set_field(FieldName::Area, "abc");

        let ticket = match wizard.next() {
            Transition::Submitting(ticket) => ticket,
            other => panic!("expected a submission, got {other:?}"),
        };

        assert_eq!(wizard.step(), WizardStep::CultivationPractices);
        assert!(wizard.is_busy());
        assert_eq!(wizard.phase(), Phase::FetchingPredictions);
        assert_eq!(ticket.yield_request().area, 0.0);
        assert_eq!(ticket.yield_request().production, 1.0);
        assert_eq!(ticket.generation(), wizard.generation());
    }

    #[test]
    fn next_while_busy_is_a_no_op() {
        let mut wizard = wizard_on_final_step();
        assert!(matches!(wizard.next(), Transition::Submitting(_)));

        assert_eq!(wizard.next(), Transition::Stayed);
        assert_eq!(wizard.prev(), Transition::Stayed);
    }

    // ── submission ───────────────────────────────────────────────────────

    #[tokio::test]
    async fn successful_submission_fills_results() {
        let mut wizard = wizard_on_final_step();
        let aggregator = aggregator(
            ScriptedService::new()
                .push_yield(Ok(42.5))
                .push_fertilizer(Ok("Urea"))
                .push_text(Ok("yield insight"))
                .push_text(Ok("fertilizer insight")),
        );

        let transition = wizard.advance(&aggregator).await;

        assert_eq!(transition, Transition::Moved(WizardStep::Results));
        assert_eq!(
            wizard.results(),
            &ResultsState {
                yield_prediction_raw: Some(42.5),
                fertilizer_recommendation_raw: Some("Urea".to_string()),
                yield_prediction_summary: Some("yield insight".to_string()),
                fertilizer_recommendation_summary: Some("fertilizer insight".to_string()),
                error: None,
            }
        );
        assert!(!wizard.is_busy());
        assert_eq!(wizard.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn fertilizer_failure_keeps_yield_and_skips_summaries() {
        let mut wizard = wizard_on_final_step();
        let service = Arc::new(
            ScriptedService::new()
                .push_yield(Ok(42.5))
                .push_fertilizer(Err(ServiceError::Transport("timeout".to_string()))),
        );
        let aggregator = ResultAggregator::new(service.clone());

        wizard.advance(&aggregator).await;

        assert_eq!(
            wizard.results(),
            &ResultsState {
                yield_prediction_raw: Some(42.5),
                fertilizer_recommendation_raw: None,
                yield_prediction_summary: None,
                fertilizer_recommendation_summary: None,
                error: Some("timeout".to_string()),
            }
        );
        assert_eq!(wizard.step(), WizardStep::Results);
        assert!(!wizard.is_busy());
        assert_eq!(service.calls(), vec!["yield", "fertilizer"]);
    }

    #[tokio::test]
    async fn summary_failure_does_not_set_error() {
        let mut wizard = wizard_on_final_step();
        let aggregator = aggregator(
            ScriptedService::new()
                .push_yield(Ok(3.2))
                .push_fertilizer(Ok("DAP"))
                .push_text(Err(ServiceError::Transport("Network Error".to_string())))
                .push_text(Ok("fertilizer insight")),
        );

        wizard.advance(&aggregator).await;

        let results = wizard.results();
        assert_eq!(results.error, None);
        assert_eq!(
            results.yield_prediction_summary.as_deref(),
            Some("Could not generate AI summary for yield: Network Error")
        );
        assert_eq!(
            results.fertilizer_recommendation_summary.as_deref(),
            Some("fertilizer insight")
        );
    }

    #[tokio::test]
    async fn next_at_results_step_is_a_no_op() {
        let mut wizard = wizard_on_final_step();
        let aggregator = aggregator(
            ScriptedService::new().push_yield(Err(ServiceError::Transport("down".to_string()))),
        );
        wizard.advance(&aggregator).await;
        assert_eq!(wizard.step(), WizardStep::Results);

        assert_eq!(wizard.next(), Transition::Stayed);
        assert_eq!(wizard.step(), WizardStep::Results);
    }

    #[test]
    fn raw_stage_success_moves_to_summary_phase() {
        let mut wizard = wizard_on_final_step();
        let Transition::Submitting(ticket) = wizard.next() else {
            panic!("expected a submission");
        };

        let applied = wizard.apply_raw(
            &ticket,
            &Ok(crate::wizard::RawPredictions {
                predicted_yield: 2.0,
                recommended_fertilizer: "Urea".to_string(),
            }),
        );

        assert!(applied);
        assert!(wizard.is_busy());
        assert_eq!(wizard.phase().message(), "Generating AI summaries...");
        assert_eq!(wizard.step(), WizardStep::CultivationPractices);
        assert_eq!(wizard.results().yield_prediction_raw, Some(2.0));
        assert_eq!(wizard.results().yield_prediction_summary, None);
    }

    // ── reset and stale results ──────────────────────────────────────────

    #[tokio::test]
    async fn reset_from_results_clears_everything() {
        let mut wizard = wizard_on_final_step();
        let aggregator = aggregator(
            ScriptedService::new()
                .push_yield(Ok(1.0))
                .push_fertilizer(Err(ServiceError::Transport("boom".to_string()))),
        );
        wizard.advance(&aggregator).await;

        wizard.reset();

        assert_eq!(wizard.step(), WizardStep::CropLocation);
        assert!(wizard.form().is_empty());
        assert!(wizard.errors().is_empty());
        assert!(wizard.results().is_empty());
    }

    #[test]
    fn reset_from_an_input_step_clears_errors() {
        let mut wizard = Wizard::new();
        wizard.next();
        assert!(!wizard.errors().is_empty());

        wizard.reset();

        assert!(wizard.errors().is_empty());
        assert_eq!(wizard.step(), WizardStep::CropLocation);
    }

    #[test]
    fn results_of_a_superseded_submission_are_discarded() {
        let mut wizard = wizard_on_final_step();
        let Transition::Submitting(ticket) = wizard.next() else {
            panic!("expected a submission");
        };

        wizard.reset();
        let applied = wizard.apply_raw(
            &ticket,
            &Err(crate::wizard::RawFailure {
                predicted_yield: Some(9.0),
                error: ServiceError::Transport("late".to_string()),
            }),
        );

        assert!(!applied);
        assert!(wizard.results().is_empty());
        assert_eq!(wizard.step(), WizardStep::CropLocation);
        assert!(!wizard.is_busy());
    }

    #[test]
    fn summaries_need_the_current_ticket() {
        let mut wizard = wizard_on_final_step();
        let Transition::Submitting(first) = wizard.next() else {
            panic!("expected a submission");
        };
        wizard.reset();

        let applied = wizard.apply_summaries(
            &first,
            Summaries {
                yield_summary: Some("stale".to_string()),
                fertilizer_summary: None,
            },
        );

        assert!(!applied);
        assert_eq!(wizard.results().yield_prediction_summary, None);
    }
}
