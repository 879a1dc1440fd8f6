//! Workflow step entity model and DTOs.

use autoflow_core::error::CoreError;
use autoflow_core::status::{StatusId, StepStatus};
use autoflow_core::types::{DbId, Timestamp};
use autoflow_core::workflow::{StepType, DEFAULT_STEPS};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `workflow_steps` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkflowStep {
    pub id: DbId,
    pub workflow_id: DbId,
    pub step_order: i32,
    pub step_name: String,
    pub step_description: Option<String>,
    pub step_type: String,
    pub status_id: StatusId,
    pub configuration: Option<String>,
    pub executed_at: Option<Timestamp>,
    pub result: Option<String>,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl WorkflowStep {
    pub fn status(&self) -> Result<StepStatus, CoreError> {
        StepStatus::from_id(self.status_id)
    }
}

/// DTO for a step created together with its workflow.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkflowStep {
    pub step_order: i32,
    pub step_name: String,
    pub step_description: Option<String>,
    pub step_type: StepType,
    pub configuration: Option<String>,
}

impl CreateWorkflowStep {
    /// The default Validation .. Testing pipeline.
    pub fn defaults() -> Vec<CreateWorkflowStep> {
        DEFAULT_STEPS
            .iter()
            .map(|def| CreateWorkflowStep {
                step_order: def.step_order,
                step_name: def.step_name.to_string(),
                step_description: Some(def.step_description.to_string()),
                step_type: def.step_type,
                configuration: None,
            })
            .collect()
    }
}
