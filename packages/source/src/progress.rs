//! Load progress reporting.
//!
//! [`ProgressCallback`] keeps the loader independent of how progress is
//! shown. The CLI renders it with `indicatif`; the server and tests use
//! [`NullProgress`].

use std::sync::Arc;

/// Receives progress updates while the occurrence table loads.
pub trait ProgressCallback: Send + Sync {
    /// Update the message shown next to the indicator.
    fn set_message(&self, msg: String);

    /// Mark the load as complete with a final message.
    fn finish(&self, msg: String);

    /// Mark the load as complete and remove the indicator.
    fn finish_and_clear(&self);
}

/// Ignores all progress updates.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
    fn finish_and_clear(&self) {}
}

/// Returns a shared [`NullProgress`] instance.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
