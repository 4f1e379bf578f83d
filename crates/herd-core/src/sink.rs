//! Diagnostic sink passed explicitly to the engine and its tasks.
//!
//! The engine never reaches for a process-wide handle to report what it
//! is doing. Whoever builds a simulation hands it a [`SharedSink`]; the
//! engine clones that handle into every worker task. Simulation results
//! are identical whichever sink is installed.

use std::sync::Arc;

/// Receiver for optional human-readable diagnostic lines.
///
/// Implementations must be cheap and must not block for long: they are
/// called from worker threads in the middle of a tick.
pub trait DebugSink: Send + Sync {
    /// Accept one diagnostic line.
    fn emit(&self, message: &str);
}

/// Shared handle to a diagnostic sink.
pub type SharedSink = Arc<dyn DebugSink>;

/// Discards every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DebugSink for NullSink {
    fn emit(&self, _message: &str) {}
}

/// Forwards messages to the `log` facade at debug level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl DebugSink for LogSink {
    fn emit(&self, message: &str) {
        log::debug!(target: "herd::sink", "{message}");
    }
}

/// Adapts a closure into a [`DebugSink`].
pub struct FnSink<F>(pub F);

impl<F> DebugSink for FnSink<F>
where
    F: Fn(&str) + Send + Sync,
{
    fn emit(&self, message: &str) {
        (self.0)(message)
    }
}

/// A shared [`NullSink`].
pub fn null_sink() -> SharedSink {
    Arc::new(NullSink)
}
