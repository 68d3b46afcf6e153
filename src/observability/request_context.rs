//! Request context propagation for correlation IDs.

use std::future::Future;
use uuid::Uuid;

/// Per-invocation context with a correlation ID.
#[derive(Clone, Debug)]
pub struct RequestContext {
    request_id: String,
}

impl RequestContext {
    /// Creates a new request context with a generated ID.
    #[must_use]
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
        }
    }

    /// Creates a request context with an existing ID.
    #[must_use]
    pub fn from_id(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Creates a span carrying the request ID for one pipeline invocation.
    #[must_use]
    pub fn span(&self, operation: &'static str) -> tracing::Span {
        tracing::info_span!("inventix.request", request_id = %self.request_id, operation)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

tokio::task_local! {
    static TASK_CONTEXT: RequestContext;
}

/// Scopes a request context across an async future.
pub async fn scope_request_context<F, T>(context: RequestContext, fut: F) -> T
where
    F: Future<Output = T>,
{
    TASK_CONTEXT.scope(context, fut).await
}

/// Returns the current request ID, if set.
#[must_use]
pub fn current_request_id() -> Option<String> {
    TASK_CONTEXT.try_with(|ctx| ctx.request_id.clone()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = RequestContext::new();
        let b = RequestContext::new();
        assert_ne!(a.request_id(), b.request_id());
        assert!(Uuid::parse_str(a.request_id()).is_ok());
    }

    #[test]
    fn test_no_context_outside_scope() {
        assert!(current_request_id().is_none());
    }

    #[tokio::test]
    async fn test_scope_request_context_propagates_across_await() {
        let context = RequestContext::from_id("async-test");
        let observed = scope_request_context(context, async {
            tokio::task::yield_now().await;
            current_request_id()
        })
        .await;
        assert_eq!(observed.as_deref(), Some("async-test"));
    }
}
