//! Progress reporting for execution
//!
//! Lets the declarative crate run without depending on a specific UI.

use crate::planner::Operation;
use crate::types::ApplyResult;

/// Progress callback for execution operations
///
/// Implement this trait to receive progress updates during execution.
pub trait ProgressCallback: Send {
    /// Called when starting to apply a batch of tasks
    fn on_batch_start(&mut self, count: usize);

    /// Called when starting to apply a single task
    ///
    /// Only called for sequential execution; parallel workers report
    /// completions after the batch finishes.
    fn on_task_start(&mut self, address: &str, operation: &Operation);

    /// Called when a task completes
    fn on_task_complete(&mut self, address: &str, result: &ApplyResult);

    /// Called when a batch completes
    fn on_batch_complete(&mut self);
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_batch_start(&mut self, _count: usize) {}
    fn on_task_start(&mut self, _address: &str, _operation: &Operation) {}
    fn on_task_complete(&mut self, _address: &str, _result: &ApplyResult) {}
    fn on_batch_complete(&mut self) {}
}

/// Progress callback that logs through the `log` facade
pub struct LogProgress;

impl ProgressCallback for LogProgress {
    fn on_batch_start(&mut self, count: usize) {
        log::info!("Applying {count} task(s)");
    }

    fn on_task_start(&mut self, address: &str, operation: &Operation) {
        log::debug!("{address}: {operation}");
    }

    fn on_task_complete(&mut self, address: &str, result: &ApplyResult) {
        match result {
            ApplyResult::Failed { error } => log::warn!("{address}: failed: {error}"),
            other => log::debug!("{address}: {other:?}"),
        }
    }

    fn on_batch_complete(&mut self) {}
}
