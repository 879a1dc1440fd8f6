//! Workflow entity model and DTOs.

use std::collections::BTreeMap;

use autoflow_core::error::CoreError;
use autoflow_core::status::{StatusId, WorkflowStatus};
use autoflow_core::types::{DbId, Timestamp};
use autoflow_core::workflow::{ComponentCategory, WorkflowSpec};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::workflow_step::{CreateWorkflowStep, WorkflowStep};

/// A row from the `workflows` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Workflow {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub status_id: StatusId,
    pub category: String,
    pub component_name: String,
    pub component_type: String,
    pub dependencies: Vec<String>,
    pub validation_rules: Vec<String>,
    pub template_name: Option<String>,
    pub configuration: Option<String>,
    pub created_by: String,
    pub approved_by: Option<String>,
    pub approved_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Workflow {
    /// Decode the stored status id.
    pub fn status(&self) -> Result<WorkflowStatus, CoreError> {
        WorkflowStatus::from_id(self.status_id)
    }

    /// The subset of the workflow that validation and code generation use.
    pub fn to_spec(&self) -> Result<WorkflowSpec, CoreError> {
        let category: ComponentCategory = self.category.parse().map_err(|_| {
            CoreError::Internal(format!("Unknown stored category '{}'", self.category))
        })?;
        Ok(WorkflowSpec {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            category,
            component_name: self.component_name.clone(),
            component_type: self.component_type.clone(),
            dependencies: self.dependencies.clone(),
            validation_rules: self.validation_rules.clone(),
            created_by: self.created_by.clone(),
        })
    }
}

/// DTO for creating a new workflow. New workflows always start as DRAFT.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkflow {
    pub name: String,
    pub description: Option<String>,
    pub category: ComponentCategory,
    pub component_name: String,
    pub component_type: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub validation_rules: Vec<String>,
    pub template_name: Option<String>,
    pub configuration: Option<String>,
    pub created_by: String,
    /// Steps to create with the workflow; the default five when absent.
    pub steps: Option<Vec<CreateWorkflowStep>>,
}

/// DTO for updating a workflow. Only non-`None` fields are applied; the
/// status is never touched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWorkflow {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<ComponentCategory>,
    pub component_name: Option<String>,
    pub component_type: Option<String>,
    pub dependencies: Option<Vec<String>>,
    pub validation_rules: Option<Vec<String>>,
    pub template_name: Option<String>,
    pub configuration: Option<String>,
}

/// A workflow together with its ordered steps.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowWithSteps {
    #[serde(flatten)]
    pub workflow: Workflow,
    pub status: WorkflowStatus,
    pub steps: Vec<WorkflowStep>,
}

impl WorkflowWithSteps {
    pub fn new(workflow: Workflow, steps: Vec<WorkflowStep>) -> Result<Self, CoreError> {
        let status = workflow.status()?;
        Ok(Self {
            workflow,
            status,
            steps,
        })
    }
}

/// Query parameters for listing workflows.
#[derive(Debug, Deserialize)]
pub struct WorkflowListParams {
    pub status: Option<String>,
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Body of `POST /workflows/{id}/approve`.
#[derive(Debug, Default, Deserialize)]
pub struct ApproveWorkflow {
    pub approved_by: Option<String>,
}

/// Body of `POST /workflows/{id}/reject`.
#[derive(Debug, Default, Deserialize)]
pub struct RejectWorkflow {
    pub rejected_by: Option<String>,
    pub reason: Option<String>,
}

// ---------------------------------------------------------------------------
// Reporting
// ---------------------------------------------------------------------------

/// Number of workflows in one status.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkflowStatusCount {
    pub status: String,
    pub count: i64,
}

/// Aggregate workflow counts.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowStatistics {
    pub total: i64,
    pub by_status: BTreeMap<String, i64>,
}

/// Condensed progress view of one workflow.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowStatusSummary {
    pub workflow_id: DbId,
    pub name: String,
    pub status: WorkflowStatus,
    pub approved_by: Option<String>,
    pub approved_at: Option<Timestamp>,
    pub total_steps: usize,
    pub completed_steps: usize,
    pub failed_steps: usize,
    pub updated_at: Timestamp,
}
