//! Repository for the `workflow_steps` table.
//!
//! Steps are created with their workflow and removed with it; there is no
//! standalone delete.

use autoflow_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::workflow_step::{CreateWorkflowStep, WorkflowStep};

/// Column list for `workflow_steps` queries.
const COLUMNS: &str = "\
    id, workflow_id, step_order, step_name, step_description, step_type, status_id, \
    configuration, executed_at, result, error_message, created_at, updated_at";

/// Provides access to workflow steps.
pub struct WorkflowStepRepo;

impl WorkflowStepRepo {
    /// Insert every step for `workflow_id`, returning them in step order.
    pub async fn create_many(
        conn: &mut PgConnection,
        workflow_id: DbId,
        steps: &[CreateWorkflowStep],
    ) -> Result<Vec<WorkflowStep>, sqlx::Error> {
        let query = format!(
            "INSERT INTO workflow_steps \
                (workflow_id, step_order, step_name, step_description, step_type, configuration) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );

        let mut created = Vec::with_capacity(steps.len());
        for step in steps {
            let row = sqlx::query_as::<_, WorkflowStep>(&query)
                .bind(workflow_id)
                .bind(step.step_order)
                .bind(&step.step_name)
                .bind(&step.step_description)
                .bind(step.step_type.as_str())
                .bind(&step.configuration)
                .fetch_one(&mut *conn)
                .await?;
            created.push(row);
        }

        created.sort_by_key(|s| s.step_order);
        Ok(created)
    }

    /// List the steps of a workflow in ascending `step_order`.
    pub async fn list_for_workflow<'e, E>(
        executor: E,
        workflow_id: DbId,
    ) -> Result<Vec<WorkflowStep>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM workflow_steps WHERE workflow_id = $1 ORDER BY step_order"
        );
        sqlx::query_as::<_, WorkflowStep>(&query)
            .bind(workflow_id)
            .fetch_all(executor)
            .await
    }

    /// Persist the execution state of a step (status, timestamps, outcome).
    pub async fn record_outcome(
        conn: &mut PgConnection,
        step: &WorkflowStep,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE workflow_steps \
             SET status_id = $2, executed_at = $3, result = $4, error_message = $5 \
             WHERE id = $1",
        )
        .bind(step.id)
        .bind(step.status_id)
        .bind(step.executed_at)
        .bind(&step.result)
        .bind(&step.error_message)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}
