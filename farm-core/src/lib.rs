pub mod models;
pub mod service;
pub mod view;
pub mod wizard;

pub use models::*;
pub use service::{AdvisorService, ServiceError};
pub use wizard::{ResultAggregator, SubmissionTicket, Transition, Wizard};
