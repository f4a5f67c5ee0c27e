//! The capability boundary Action components dispatch through.

use std::panic::AssertUnwindSafe;

use async_trait::async_trait;
use futures::FutureExt;
use indexmap::IndexMap;
use nebula_value::VariableValue;

/// The outcome of a single [`HostService::execute`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceResult {
    /// The method ran and produced a value.
    Success(VariableValue),
    /// The method did not complete; `message` is human-readable.
    Failure(String),
}

impl ServiceResult {
    /// Build a successful result.
    #[must_use]
    pub fn success(value: VariableValue) -> Self {
        Self::Success(value)
    }

    /// Build a failed result.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    /// `true` iff this is [`ServiceResult::Success`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// An externally-supplied capability invoked by [`nebula_workflow::Component::Action`]
/// components.
///
/// Implementations are free to do network I/O, touch disk, or anything else
/// — this is the only suspension point the executor has. A panic inside
/// `execute` is caught at the call site and turned into a
/// [`ServiceResult::Failure`]; it never escapes into the executor.
#[async_trait]
pub trait HostService: Send + Sync {
    /// Invoke `method` with `params`, returning the outcome.
    async fn execute(&self, method: &str, params: IndexMap<String, VariableValue>) -> ServiceResult;
}

/// Call `service.execute`, catching a panic and reporting it as a failure
/// instead of unwinding into the executor.
pub(crate) async fn execute_guarded(
    service: &dyn HostService,
    method: &str,
    params: IndexMap<String, VariableValue>,
) -> ServiceResult {
    match AssertUnwindSafe(service.execute(method, params))
        .catch_unwind()
        .await
    {
        Ok(result) => result,
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "host service panicked".to_string());
            ServiceResult::failure(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoService;

    #[async_trait]
    impl HostService for EchoService {
        async fn execute(&self, method: &str, _params: IndexMap<String, VariableValue>) -> ServiceResult {
            if method == "boom" {
                panic!("simulated host service panic");
            }
            ServiceResult::success(VariableValue::String(method.to_string()))
        }
    }

    #[tokio::test]
    async fn execute_guarded_passes_through_success() {
        let result = execute_guarded(&EchoService, "ping", IndexMap::new()).await;
        assert_eq!(result, ServiceResult::success(VariableValue::String("ping".into())));
    }

    #[tokio::test]
    async fn execute_guarded_catches_panics() {
        let result = execute_guarded(&EchoService, "boom", IndexMap::new()).await;
        assert!(!result.is_success());
    }
}
