//! The multi-step wizard: form store, per-step validation, the submission
//! pipeline and the controller that ties them together.

pub mod aggregator;
pub mod common;
pub mod controller;
pub mod prompts;
pub mod store;
pub mod validator;

pub use aggregator::{RawFailure, RawOutcome, RawPredictions, RawResults, ResultAggregator, Summaries};
pub use controller::{Phase, Snapshot, SubmissionTicket, Transition, Wizard};
pub use store::FormStore;
pub use validator::{StepValidator, Validation};
