use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use farm_core::service::{AdvisorServiceFactory, ServiceConfig};
use farm_core::{AdvisorService, ServiceError};

use crate::client::HttpAdvisorService;

/// [`AdvisorServiceFactory`] for the JSON-over-HTTP backend.
///
/// Register this with a [`farm_core::service::ServiceRegistry`] to make the
/// `"http"` backend available:
///
/// ```rust,no_run
/// use farm_client::HttpAdvisorServiceFactory;
/// use farm_core::service::ServiceRegistry;
///
/// let mut registry = ServiceRegistry::new();
/// registry.register(Box::new(HttpAdvisorServiceFactory));
/// ```
pub struct HttpAdvisorServiceFactory;

#[async_trait]
impl AdvisorServiceFactory for HttpAdvisorServiceFactory {
    fn backend_name(&self) -> &'static str {
        "http"
    }

    /// Builds a client for `config.base_url`. No request is made here; an
    /// unreachable backend surfaces on the first call.
    async fn create(
        &self,
        config: &ServiceConfig,
    ) -> Result<Arc<dyn AdvisorService>, ServiceError> {
        let service = HttpAdvisorService::from_config(config)?;
        info!(base_url = %service.base_url(), timeout_secs = config.timeout_secs, "advisor backend ready");
        Ok(Arc::new(service))
    }
}
