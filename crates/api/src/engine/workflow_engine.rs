//! Workflow lifecycle transitions.
//!
//! Every transition locks the workflow row with `SELECT ... FOR UPDATE`,
//! checks the transition table and writes the new status in the same
//! transaction. Execution commits its IN_PROGRESS claim before any step
//! runs, so a concurrent second execute sees IN_PROGRESS and is refused.

use autoflow_core::error::CoreError;
use autoflow_core::execution::{StepFailure, WorkflowExecutionResult};
use autoflow_core::status::WorkflowStatus;
use autoflow_core::types::DbId;
use autoflow_core::workflow::{is_expected_rejection, validate_transition, WorkflowSpec};
use autoflow_db::models::workflow::Workflow;
use autoflow_db::repositories::{WorkflowRepo, WorkflowStepRepo};
use chrono::Utc;
use sqlx::{PgConnection, PgPool};

use crate::engine::executor;
use crate::engine::generator::PgComponentGenerator;
use crate::error::AppResult;

/// Drives workflows through their lifecycle.
pub struct WorkflowEngine {
    pool: PgPool,
}

impl WorkflowEngine {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// DRAFT -> PENDING_APPROVAL.
    pub async fn submit_for_approval(&self, id: DbId) -> AppResult<Workflow> {
        let mut tx = self.pool.begin().await?;
        let (_, status) = lock_workflow(&mut tx, id).await?;

        validate_transition(status, WorkflowStatus::PendingApproval)?;
        let workflow = WorkflowRepo::set_status(&mut tx, id, WorkflowStatus::PendingApproval).await?;
        tx.commit().await?;

        tracing::info!(workflow_id = id, "Workflow submitted for approval");
        Ok(workflow)
    }

    /// PENDING_APPROVAL -> APPROVED, recording the approver.
    pub async fn approve_workflow(&self, id: DbId, approved_by: &str) -> AppResult<Workflow> {
        let mut tx = self.pool.begin().await?;
        let (_, status) = lock_workflow(&mut tx, id).await?;

        if status != WorkflowStatus::PendingApproval {
            return Err(CoreError::IllegalState(format!(
                "Workflow must be pending approval to approve (current status: {status})"
            ))
            .into());
        }
        validate_transition(status, WorkflowStatus::Approved)?;
        let workflow = WorkflowRepo::mark_approved(&mut tx, id, approved_by).await?;
        tx.commit().await?;

        tracing::info!(workflow_id = id, approved_by, "Workflow approved");
        Ok(workflow)
    }

    /// Any status -> REJECTED. The reason is logged, not stored.
    pub async fn reject_workflow(
        &self,
        id: DbId,
        rejected_by: &str,
        reason: &str,
    ) -> AppResult<Workflow> {
        let mut tx = self.pool.begin().await?;
        let (_, status) = lock_workflow(&mut tx, id).await?;

        if !is_expected_rejection(status) {
            tracing::warn!(
                workflow_id = id,
                from = %status,
                "Rejecting workflow that is not pending approval",
            );
        }
        validate_transition(status, WorkflowStatus::Rejected)?;
        let workflow = WorkflowRepo::set_status(&mut tx, id, WorkflowStatus::Rejected).await?;
        tx.commit().await?;

        tracing::info!(workflow_id = id, rejected_by, reason, "Workflow rejected");
        Ok(workflow)
    }

    /// Run an APPROVED workflow's steps.
    ///
    /// A failing step is reported in the returned result, not as an error.
    /// Steps that completed before the failure, and any component they
    /// generated, are kept.
    pub async fn execute_workflow(&self, id: DbId) -> AppResult<WorkflowExecutionResult> {
        let start_time = Utc::now();
        let workflow = self.claim_for_execution(id).await?;
        let spec = workflow.to_spec()?;

        tracing::info!(workflow_id = id, name = %spec.name, "Starting workflow execution");

        let outcome = match self.run_steps(&spec).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(workflow_id = id, error = %e, "Workflow execution aborted");
                if let Err(mark_err) = force_failed(&self.pool, id).await {
                    tracing::error!(
                        workflow_id = id,
                        error = %mark_err,
                        "Failed to mark workflow as failed",
                    );
                }
                return Err(e);
            }
        };

        let end_time = Utc::now();
        let result = match outcome {
            Ok(()) => {
                tracing::info!(workflow_id = id, "Workflow executed successfully");
                WorkflowExecutionResult::succeeded(id, start_time, end_time)
            }
            Err(failure) => {
                tracing::warn!(
                    workflow_id = id,
                    step = %failure.step_name,
                    error = %failure.source,
                    "Workflow execution failed",
                );
                WorkflowExecutionResult::failed(id, &failure.to_string(), start_time, end_time)
            }
        };
        Ok(result)
    }

    /// APPROVED -> IN_PROGRESS, committed before any step runs.
    async fn claim_for_execution(&self, id: DbId) -> AppResult<Workflow> {
        let mut tx = self.pool.begin().await?;
        let (_, status) = lock_workflow(&mut tx, id).await?;

        if status != WorkflowStatus::Approved {
            return Err(CoreError::IllegalState(format!(
                "Workflow must be approved before execution (current status: {status})"
            ))
            .into());
        }
        validate_transition(status, WorkflowStatus::InProgress)?;
        let workflow = WorkflowRepo::set_status(&mut tx, id, WorkflowStatus::InProgress).await?;
        tx.commit().await?;
        Ok(workflow)
    }

    /// Execute the steps and persist their outcomes together with the final
    /// status. The inner result is the step outcome.
    async fn run_steps(&self, spec: &WorkflowSpec) -> AppResult<Result<(), StepFailure>> {
        let mut tx = self.pool.begin().await?;
        let mut steps = WorkflowStepRepo::list_for_workflow(&mut *tx, spec.id).await?;

        let outcome = {
            let mut generator = PgComponentGenerator::new(&mut tx);
            executor::execute_steps(spec, &mut steps, &mut generator).await
        };

        for step in steps.iter().filter(|s| s.executed_at.is_some()) {
            WorkflowStepRepo::record_outcome(&mut tx, step).await?;
        }

        let final_status = if outcome.is_ok() {
            WorkflowStatus::Completed
        } else {
            WorkflowStatus::Failed
        };
        // A reject may have committed while the steps ran.
        let (_, current) = lock_workflow(&mut tx, spec.id).await?;
        validate_transition(current, final_status)?;
        WorkflowRepo::set_status(&mut tx, spec.id, final_status).await?;
        tx.commit().await?;

        Ok(outcome)
    }
}

/// Lock a workflow row and decode its status.
async fn lock_workflow(conn: &mut PgConnection, id: DbId) -> AppResult<(Workflow, WorkflowStatus)> {
    let workflow = WorkflowRepo::find_for_update(conn, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Workflow",
            id,
        })?;
    let status = workflow.status()?;
    Ok((workflow, status))
}

/// Move an IN_PROGRESS workflow to FAILED after an infrastructure error.
///
/// Leaves the workflow alone if it is no longer IN_PROGRESS.
async fn force_failed(pool: &PgPool, id: DbId) -> AppResult<()> {
    let mut tx = pool.begin().await?;
    let (_, current) = lock_workflow(&mut tx, id).await?;

    if current != WorkflowStatus::InProgress {
        tracing::debug!(workflow_id = id, status = %current, "Skipping forced failure");
        return Ok(());
    }
    validate_transition(current, WorkflowStatus::Failed)?;
    WorkflowRepo::set_status(&mut tx, id, WorkflowStatus::Failed).await?;
    tx.commit().await?;
    Ok(())
}
