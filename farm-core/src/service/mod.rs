pub mod advisor;
pub mod factory;

pub use advisor::{AdvisorService, ServiceError};
pub use factory::{AdvisorServiceFactory, ServiceConfig, ServiceRegistry};
