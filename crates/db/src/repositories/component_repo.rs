//! Repository for the `components` table.

use autoflow_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::component::{Component, ComponentCategoryCount, CreateComponent};

/// Column list for `components` queries.
const COLUMNS: &str = "\
    id, name, description, category, component_type, selector, template_code, \
    style_code, test_code, dependencies, version, created_by, workflow_id, is_active, \
    created_at, updated_at";

/// Provides CRUD operations for generated components.
pub struct ComponentRepo;

impl ComponentRepo {
    /// Insert a new active component, returning the created row.
    pub async fn create<'e, E>(executor: E, input: &CreateComponent) -> Result<Component, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO components \
                (name, description, category, component_type, selector, template_code, \
                 style_code, test_code, dependencies, version, created_by, workflow_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Component>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.component_type)
            .bind(&input.selector)
            .bind(&input.template_code)
            .bind(&input.style_code)
            .bind(&input.test_code)
            .bind(&input.dependencies)
            .bind(&input.version)
            .bind(&input.created_by)
            .bind(input.workflow_id)
            .fetch_one(executor)
            .await
    }

    /// Find a component by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Component>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM components WHERE id = $1");
        sqlx::query_as::<_, Component>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List components with optional category and active-flag filters,
    /// newest first.
    pub async fn list_filtered(
        pool: &PgPool,
        category: Option<&str>,
        active: Option<bool>,
    ) -> Result<Vec<Component>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if category.is_some() {
            conditions.push(format!("category = ${param_idx}"));
            param_idx += 1;
        }
        if active.is_some() {
            conditions.push(format!("is_active = ${param_idx}"));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM components {where_clause} ORDER BY created_at DESC, id DESC"
        );

        let mut q = sqlx::query_as::<_, Component>(&query);
        if let Some(c) = category {
            q = q.bind(c);
        }
        if let Some(a) = active {
            q = q.bind(a);
        }
        q.fetch_all(pool).await
    }

    /// Components generated by a workflow.
    pub async fn list_by_workflow(
        pool: &PgPool,
        workflow_id: DbId,
    ) -> Result<Vec<Component>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM components WHERE workflow_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Component>(&query)
            .bind(workflow_id)
            .fetch_all(pool)
            .await
    }

    /// Active components whose name matches an `ILIKE` pattern.
    ///
    /// Build `pattern` with `autoflow_core::search::contains_pattern`.
    pub async fn search_active(pool: &PgPool, pattern: &str) -> Result<Vec<Component>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM components \
             WHERE is_active AND name ILIKE $1 ESCAPE '\\' \
             ORDER BY name"
        );
        sqlx::query_as::<_, Component>(&query)
            .bind(pattern)
            .fetch_all(pool)
            .await
    }

    /// Set the active flag. Returns `None` if the component does not exist.
    pub async fn set_active(
        pool: &PgPool,
        id: DbId,
        is_active: bool,
    ) -> Result<Option<Component>, sqlx::Error> {
        let query = format!("UPDATE components SET is_active = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Component>(&query)
            .bind(id)
            .bind(is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a component. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM components WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total and active component counts.
    pub async fn count_totals(pool: &PgPool) -> Result<(i64, i64), sqlx::Error> {
        sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE is_active) FROM components",
        )
        .fetch_one(pool)
        .await
    }

    /// Number of active components per category. Categories with none are omitted.
    pub async fn count_active_by_category(
        pool: &PgPool,
    ) -> Result<Vec<ComponentCategoryCount>, sqlx::Error> {
        sqlx::query_as::<_, ComponentCategoryCount>(
            "SELECT category, COUNT(*) AS count FROM components \
             WHERE is_active \
             GROUP BY category \
             ORDER BY category",
        )
        .fetch_all(pool)
        .await
    }
}
