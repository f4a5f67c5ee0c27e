//! The registry of host services an executor dispatches Action components
//! against.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use nebula_value::VariableValue;

use crate::host_service::{execute_guarded, HostService, ServiceResult};

/// Maps service names to their [`HostService`] implementations.
///
/// Written once during setup, read concurrently during execution — this is
/// the only mutable shared-state element at the executor's boundary.
#[derive(Default, Clone)]
pub struct HostServiceRegistry {
    services: HashMap<String, Arc<dyn HostService>>,
}

impl HostServiceRegistry {
    /// Build an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `service` under `name`, replacing any prior registration.
    #[must_use]
    pub fn with_service(mut self, name: impl Into<String>, service: Arc<dyn HostService>) -> Self {
        self.services.insert(name.into(), service);
        self
    }

    /// Look up a registered service by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn HostService>> {
        self.services.get(name)
    }

    /// Dispatch `service_name.method_name(params)`. An unregistered service
    /// name yields `ServiceResult::failure("service not found")` rather
    /// than an error — host-service failure is always in-band.
    pub async fn execute(
        &self,
        service_name: &str,
        method_name: &str,
        params: IndexMap<String, VariableValue>,
    ) -> ServiceResult {
        match self.services.get(service_name) {
            Some(service) => execute_guarded(service.as_ref(), method_name, params).await,
            None => ServiceResult::failure("service not found"),
        }
    }
}
