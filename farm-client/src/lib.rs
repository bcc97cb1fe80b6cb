//! HTTP/JSON backend for the farm advisor.

pub mod client;
pub mod factory;

pub use client::HttpAdvisorService;
pub use factory::HttpAdvisorServiceFactory;
