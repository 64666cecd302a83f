//! Submission controller: hands validated values to the caller's handler

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::FormValues;

/// Receives the full value map once a form passes validation
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmitHandler: Send + Sync {
    async fn submit(&self, values: FormValues) -> Result<()>;
}

/// Adapter turning an async closure into a [`SubmitHandler`]
pub struct FnSubmitHandler<F>(F);

#[async_trait]
impl<F, Fut> SubmitHandler for FnSubmitHandler<F>
where
    F: Fn(FormValues) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send,
{
    async fn submit(&self, values: FormValues) -> Result<()> {
        (self.0)(values).await
    }
}

/// Wrap an async closure as a submit handler
pub fn submit_fn<F, Fut>(f: F) -> Arc<dyn SubmitHandler>
where
    F: Fn(FormValues) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(FnSubmitHandler(f))
}

/// Issues submissions without waiting on them.
///
/// Handler failures are logged and dropped: they never reach the form's
/// field errors and never block a later attempt. There is no retry and no
/// timeout; callers wanting either wrap their handler.
#[derive(Clone)]
pub struct SubmissionController {
    handler: Arc<dyn SubmitHandler>,
}

impl SubmissionController {
    pub fn new(handler: Arc<dyn SubmitHandler>) -> Self {
        Self { handler }
    }

    /// Spawn the handler on the current tokio runtime.
    ///
    /// Returns `None` when called outside a runtime; nothing is sent then.
    pub fn dispatch(&self, form_id: Uuid, values: FormValues) -> Option<JoinHandle<()>> {
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!(%form_id, "Form submission error: {err}");
                return None;
            }
        };
        let handler = Arc::clone(&self.handler);
        tracing::debug!(%form_id, fields = values.len(), "dispatching submission");
        Some(runtime.spawn(async move {
            match handler.submit(values).await {
                Ok(()) => tracing::info!(%form_id, "form submitted"),
                Err(err) => tracing::error!(%form_id, "Form submission error: {err:#}"),
            }
        }))
    }
}

impl std::fmt::Debug for SubmissionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionController").finish_non_exhaustive()
    }
}
