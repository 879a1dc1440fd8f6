//! Workflow execution outcome types.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Message reported when every step of a workflow completed.
pub const EXECUTION_SUCCEEDED_MESSAGE: &str = "Workflow executed successfully";

/// Prefix of the message reported when execution stopped on a failing step.
pub const EXECUTION_FAILED_PREFIX: &str = "Workflow execution failed: ";

/// Result message recorded on a step that finished without a more specific one.
pub const STEP_SUCCEEDED_MESSAGE: &str = "Step completed successfully";

/// A step failed and execution of the remaining steps was abandoned.
#[derive(Debug, thiserror::Error)]
#[error("Step execution failed: {step_name}")]
pub struct StepFailure {
    pub step_name: String,
    #[source]
    pub source: CoreError,
}

/// Outcome of one `execute` call, returned to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowExecutionResult {
    pub workflow_id: DbId,
    pub success: bool,
    pub message: String,
    pub error: Option<String>,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    pub duration_secs: i64,
}

impl WorkflowExecutionResult {
    pub fn succeeded(workflow_id: DbId, start_time: Timestamp, end_time: Timestamp) -> Self {
        Self {
            workflow_id,
            success: true,
            message: EXECUTION_SUCCEEDED_MESSAGE.to_string(),
            error: None,
            start_time,
            end_time: Some(end_time),
            duration_secs: duration_secs(start_time, Some(end_time)),
        }
    }

    /// A failed run. `message` and `error` both carry the prefixed cause.
    pub fn failed(
        workflow_id: DbId,
        cause: &str,
        start_time: Timestamp,
        end_time: Timestamp,
    ) -> Self {
        let message = format!("{EXECUTION_FAILED_PREFIX}{cause}");
        Self {
            workflow_id,
            success: false,
            error: Some(message.clone()),
            message,
            start_time,
            end_time: Some(end_time),
            duration_secs: duration_secs(start_time, Some(end_time)),
        }
    }
}

/// Whole seconds between `start` and `end`; 0 while the run has no end.
pub fn duration_secs(start: Timestamp, end: Option<Timestamp>) -> i64 {
    end.map_or(0, |end| (end - start).num_seconds())
}
