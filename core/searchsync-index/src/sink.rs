//! Error sinks for failed document updates.
//!
//! Lifecycle hooks route every document batch failure through one sink.
//! A sink that returns `Ok(())` swallows the failure and lets the
//! triggering operation carry on, so callers cannot assume a hook raises.

use searchsync_cloud::{CloudError, CloudResult};
use tracing::error;

/// Receives document update failures raised during synchronization.
pub trait ErrorSink: Send + Sync {
    /// Returns `Err` to fail the triggering operation, `Ok` to continue.
    fn on_error(&self, error: CloudError) -> CloudResult<()>;
}

/// Default sink: hands the failure back to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rethrow;

impl ErrorSink for Rethrow {
    fn on_error(&self, error: CloudError) -> CloudResult<()> {
        Err(error)
    }
}

/// Logs the failure and continues.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAndContinue;

impl ErrorSink for LogAndContinue {
    fn on_error(&self, err: CloudError) -> CloudResult<()> {
        error!(error = %err, status = ?err.status(), "index update failed, continuing");
        Ok(())
    }
}

impl<F> ErrorSink for F
where
    F: Fn(CloudError) -> CloudResult<()> + Send + Sync,
{
    fn on_error(&self, error: CloudError) -> CloudResult<()> {
        self(error)
    }
}
