//! Structured progress reporting
//!
//! The engine's only progress signal is a structured callback invoked
//! synchronously after each unit of work. No human-readable formatting
//! happens here; the consuming CLI or server layer renders events however it
//! likes. A panicking callback is caught and ignored at the call site so it
//! can never abort the underlying operation.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// One progress event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Coarse phase of the run (e.g. `collect`, `pack`, `migrate`)
    pub phase: String,

    /// Short description of the completed unit of work
    pub message: String,

    /// Units completed so far within the phase
    pub current: usize,

    /// Total units expected within the phase
    pub total: usize,
}

/// Callback type consumed by the engine
pub type ProgressCallback = Arc<dyn Fn(&ProgressEvent) + Send + Sync>;

/// Wrapper that dispatches progress events to an optional callback
///
/// Cloneable and cheap; a reporter without a callback is a no-op.
#[derive(Clone, Default)]
pub struct ProgressReporter {
    callback: Option<ProgressCallback>,
}

impl ProgressReporter {
    /// Creates a reporter dispatching to the given callback
    pub fn new(callback: ProgressCallback) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    /// Creates a reporter that drops all events
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Emits one event
    ///
    /// Invoked synchronously; a panic inside the callback is caught and
    /// ignored.
    pub fn emit(&self, phase: &str, message: impl Into<String>, current: usize, total: usize) {
        let Some(callback) = &self.callback else {
            return;
        };
        let event = ProgressEvent {
            phase: phase.to_string(),
            message: message.into(),
            current,
            total,
        };
        if catch_unwind(AssertUnwindSafe(|| callback(&event))).is_err() {
            tracing::debug!(phase = %event.phase, "progress callback panicked, ignoring");
        }
    }
}
