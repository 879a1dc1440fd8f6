//! Repository for the `workflows` table.

use autoflow_core::status::{StatusId, WorkflowStatus};
use autoflow_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::workflow::{CreateWorkflow, UpdateWorkflow, Workflow, WorkflowStatusCount};
use crate::models::workflow_step::{CreateWorkflowStep, WorkflowStep};
use crate::repositories::WorkflowStepRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, name, description, status_id, category, component_name, component_type, \
    dependencies, validation_rules, template_name, configuration, created_by, \
    approved_by, approved_at, created_at, updated_at";

/// Provides CRUD operations and status transitions for workflows.
pub struct WorkflowRepo;

impl WorkflowRepo {
    /// Insert a new DRAFT workflow together with its steps.
    ///
    /// Both inserts share one transaction, so a duplicate step order leaves
    /// no orphaned workflow behind.
    pub async fn create(
        pool: &PgPool,
        input: &CreateWorkflow,
        steps: &[CreateWorkflowStep],
    ) -> Result<(Workflow, Vec<WorkflowStep>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO workflows \
                (name, description, status_id, category, component_name, component_type, \
                 dependencies, validation_rules, template_name, configuration, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );
        let workflow = sqlx::query_as::<_, Workflow>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(WorkflowStatus::Draft.id())
            .bind(input.category.as_str())
            .bind(&input.component_name)
            .bind(&input.component_type)
            .bind(&input.dependencies)
            .bind(&input.validation_rules)
            .bind(&input.template_name)
            .bind(&input.configuration)
            .bind(&input.created_by)
            .fetch_one(&mut *tx)
            .await?;

        let steps = WorkflowStepRepo::create_many(&mut tx, workflow.id, steps).await?;

        tx.commit().await?;
        Ok((workflow, steps))
    }

    /// Find a workflow by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Workflow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workflows WHERE id = $1");
        sqlx::query_as::<_, Workflow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List workflows with optional status and category filters.
    ///
    /// Results are ordered newest-first.
    pub async fn list_filtered(
        pool: &PgPool,
        status_id: Option<StatusId>,
        category: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Workflow>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if status_id.is_some() {
            conditions.push(format!("status_id = ${param_idx}"));
            param_idx += 1;
        }
        if category.is_some() {
            conditions.push(format!("category = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM workflows {where_clause} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut q = sqlx::query_as::<_, Workflow>(&query);

        if let Some(s) = status_id {
            q = q.bind(s);
        }
        if let Some(c) = category {
            q = q.bind(c);
        }
        q = q.bind(limit).bind(offset);

        q.fetch_all(pool).await
    }

    /// Update a workflow. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWorkflow,
    ) -> Result<Option<Workflow>, sqlx::Error> {
        let query = format!(
            "UPDATE workflows SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                category = COALESCE($4, category), \
                component_name = COALESCE($5, component_name), \
                component_type = COALESCE($6, component_type), \
                dependencies = COALESCE($7, dependencies), \
                validation_rules = COALESCE($8, validation_rules), \
                template_name = COALESCE($9, template_name), \
                configuration = COALESCE($10, configuration) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workflow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.category.map(|c| c.as_str()))
            .bind(&input.component_name)
            .bind(&input.component_type)
            .bind(&input.dependencies)
            .bind(&input.validation_rules)
            .bind(&input.template_name)
            .bind(&input.configuration)
            .fetch_optional(pool)
            .await
    }

    /// Delete a workflow; its steps go with it (`ON DELETE CASCADE`).
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workflows WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of workflows.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM workflows")
            .fetch_one(pool)
            .await
    }

    /// Number of workflows per status, including statuses with none.
    pub async fn count_by_status(pool: &PgPool) -> Result<Vec<WorkflowStatusCount>, sqlx::Error> {
        sqlx::query_as::<_, WorkflowStatusCount>(
            "SELECT s.name AS status, COUNT(w.id) AS count \
             FROM workflow_statuses s \
             LEFT JOIN workflows w ON w.status_id = s.id \
             GROUP BY s.id, s.name \
             ORDER BY s.id",
        )
        .fetch_all(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // In-transaction helpers
    // -----------------------------------------------------------------------

    /// Fetch a workflow and lock its row until the transaction ends.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Workflow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workflows WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Workflow>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Overwrite the status of a workflow.
    pub async fn set_status(
        conn: &mut PgConnection,
        id: DbId,
        status: WorkflowStatus,
    ) -> Result<Workflow, sqlx::Error> {
        let query = format!("UPDATE workflows SET status_id = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Workflow>(&query)
            .bind(id)
            .bind(status.id())
            .fetch_one(&mut *conn)
            .await
    }

    /// Move a workflow to APPROVED, recording who approved it and when.
    pub async fn mark_approved(
        conn: &mut PgConnection,
        id: DbId,
        approved_by: &str,
    ) -> Result<Workflow, sqlx::Error> {
        let query = format!(
            "UPDATE workflows SET status_id = $2, approved_by = $3, approved_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workflow>(&query)
            .bind(id)
            .bind(WorkflowStatus::Approved.id())
            .bind(approved_by)
            .fetch_one(&mut *conn)
            .await
    }
}
