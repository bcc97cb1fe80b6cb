use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;

use super::advisor::{AdvisorService, ServiceError};

/// Backend-agnostic connection settings for the advisor service.
///
/// `backend` must match the [`AdvisorServiceFactory::backend_name`] of a
/// registered factory. The remaining fields are passed through to that
/// factory unchanged.
///
/// | backend | base_url examples                              |
/// |---------|------------------------------------------------|
/// | `http`  | `http://localhost:8000`, `https://agro.example` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Lowercase identifier matching a registered factory (e.g. `"http"`).
    pub backend: String,
    /// Root URL the endpoint paths are appended to.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Text-generation model to request; `None` lets the backend choose.
    pub text_model: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            backend: "http".to_string(),
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
            text_model: None,
        }
    }
}

/// One implementation per transport. Each backend crate exports a unit
/// struct implementing this trait, registered with a [`ServiceRegistry`]
/// at startup.
#[async_trait]
pub trait AdvisorServiceFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    /// Build a ready-to-use service from `config`.
    async fn create(
        &self,
        config: &ServiceConfig,
    ) -> Result<Arc<dyn AdvisorService>, ServiceError>;
}

/// Registry of [`AdvisorServiceFactory`] instances, keyed by backend name.
pub struct ServiceRegistry {
    factories: HashMap<&'static str, Box<dyn AdvisorServiceFactory>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a backend factory, replacing any with the same name.
    pub fn register(
        &mut self,
        factory: Box<dyn AdvisorServiceFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch to the factory matching `config.backend`.
    ///
    /// # Errors
    /// * [`ServiceError::Configuration`] when no factory is registered under
    ///   the requested name.
    /// * Any error the chosen factory returns.
    pub async fn create(
        &self,
        config: &ServiceConfig,
    ) -> Result<Arc<dyn AdvisorService>, ServiceError> {
        let factory = self
            .factories
            .get(config.backend.as_str())
            .ok_or_else(|| {
                ServiceError::Configuration(format!(
                    "unknown backend '{}'; available: {:?}",
                    config.backend,
                    self.available_backends()
                ))
            })?;

        tracing::debug!(backend = %config.backend, base_url = %config.base_url, "creating advisor service");
        factory.create(config).await
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
