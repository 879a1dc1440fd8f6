//! Handlers for the `/workflows` resource.
//!
//! CRUD, listing and reporting go straight to the repositories; lifecycle
//! actions (submit, approve, reject, execute) go through [`WorkflowEngine`].

use autoflow_core::error::CoreError;
use autoflow_core::search::{clamp_limit, clamp_offset, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};
use autoflow_core::status::{StepStatus, WorkflowStatus};
use autoflow_core::types::DbId;
use autoflow_core::validation;
use autoflow_core::workflow::{
    validate_step_orders, validate_workflow_name, ComponentCategory, DEFAULT_REJECTION_REASON,
    SYSTEM_ACTOR,
};
use autoflow_db::models::workflow::{
    ApproveWorkflow, CreateWorkflow, RejectWorkflow, UpdateWorkflow, Workflow,
    WorkflowListParams, WorkflowStatistics, WorkflowStatusSummary, WorkflowWithSteps,
};
use autoflow_db::models::workflow_step::CreateWorkflowStep;
use autoflow_db::repositories::{WorkflowRepo, WorkflowStepRepo};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::engine::WorkflowEngine;
use crate::error::{AppError, AppResult};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body of `POST /workflows/{id}/validate`.
#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub workflow_id: DbId,
    pub valid: bool,
    pub violations: Vec<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Workflow",
        id,
    })
}

async fn find_workflow(state: &AppState, id: DbId) -> AppResult<Workflow> {
    WorkflowRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

fn parse_status(value: &str) -> AppResult<WorkflowStatus> {
    Ok(value.parse::<WorkflowStatus>()?)
}

fn parse_category(value: &str) -> AppResult<ComponentCategory> {
    Ok(value.parse::<ComponentCategory>()?)
}

async fn list_page(
    state: &AppState,
    status: Option<WorkflowStatus>,
    category: Option<ComponentCategory>,
    limit: Option<i64>,
    offset: Option<i64>,
) -> AppResult<Vec<Workflow>> {
    let limit = clamp_limit(limit, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT);
    let offset = clamp_offset(offset);
    let workflows = WorkflowRepo::list_filtered(
        &state.pool,
        status.map(WorkflowStatus::id),
        category.map(ComponentCategory::as_str),
        limit,
        offset,
    )
    .await?;
    Ok(workflows)
}

// ---------------------------------------------------------------------------
// POST /workflows
// ---------------------------------------------------------------------------

/// Create a workflow in DRAFT together with its steps.
///
/// When no steps are supplied the default five-step pipeline is used.
pub async fn create_workflow(
    State(state): State<AppState>,
    Json(input): Json<CreateWorkflow>,
) -> AppResult<impl IntoResponse> {
    validate_workflow_name(&input.name)?;

    let steps = match &input.steps {
        Some(steps) if !steps.is_empty() => steps.clone(),
        _ => CreateWorkflowStep::defaults(),
    };
    let orders: Vec<i32> = steps.iter().map(|s| s.step_order).collect();
    validate_step_orders(&orders)?;

    let (workflow, steps) = WorkflowRepo::create(&state.pool, &input, &steps).await?;

    tracing::info!(
        workflow_id = workflow.id,
        name = %workflow.name,
        steps = steps.len(),
        "Workflow created",
    );

    let data = WorkflowWithSteps::new(workflow, steps)?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

// ---------------------------------------------------------------------------
// GET /workflows
// ---------------------------------------------------------------------------

/// List workflows, newest first, with optional status and category filters.
pub async fn list_workflows(
    State(state): State<AppState>,
    Query(params): Query<WorkflowListParams>,
) -> AppResult<impl IntoResponse> {
    let status = params.status.as_deref().map(parse_status).transpose()?;
    let category = params.category.as_deref().map(parse_category).transpose()?;

    let data = list_page(&state, status, category, params.limit, params.offset).await?;
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// GET /workflows/{id}
// ---------------------------------------------------------------------------

pub async fn get_workflow(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let workflow = find_workflow(&state, id).await?;
    let steps = WorkflowStepRepo::list_for_workflow(&state.pool, id).await?;
    let data = WorkflowWithSteps::new(workflow, steps)?;
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// PUT /workflows/{id}
// ---------------------------------------------------------------------------

/// Update the editable fields of a workflow. The status is never changed here.
pub async fn update_workflow(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWorkflow>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        validate_workflow_name(name)?;
    }

    let workflow = WorkflowRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(workflow_id = id, "Workflow updated");
    Ok(Json(DataResponse { data: workflow }))
}

// ---------------------------------------------------------------------------
// DELETE /workflows/{id}
// ---------------------------------------------------------------------------

/// Delete a workflow and, by cascade, its steps.
pub async fn delete_workflow(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !WorkflowRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(workflow_id = id, "Workflow deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// GET /workflows/status/{status}
// ---------------------------------------------------------------------------

pub async fn list_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let status = parse_status(&status)?;
    let data = list_page(&state, Some(status), None, page.limit, page.offset).await?;
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// GET /workflows/category/{category}
// ---------------------------------------------------------------------------

pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let category = parse_category(&category)?;
    let data = list_page(&state, None, Some(category), page.limit, page.offset).await?;
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// GET /workflows/pending-approval
// ---------------------------------------------------------------------------

/// Workflows awaiting review, newest first.
pub async fn list_pending_approval(
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let data = list_page(
        &state,
        Some(WorkflowStatus::PendingApproval),
        None,
        page.limit,
        page.offset,
    )
    .await?;
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// GET /workflows/statistics
// ---------------------------------------------------------------------------

/// Total number of workflows and the count in every status.
pub async fn get_statistics(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let total = WorkflowRepo::count(&state.pool).await?;
    let by_status = WorkflowRepo::count_by_status(&state.pool)
        .await?
        .into_iter()
        .map(|c| (c.status, c.count))
        .collect();

    Ok(Json(DataResponse {
        data: WorkflowStatistics { total, by_status },
    }))
}

// ---------------------------------------------------------------------------
// GET /workflows/{id}/status
// ---------------------------------------------------------------------------

/// Condensed progress view: status, approval and step counts.
pub async fn get_status_summary(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let workflow = find_workflow(&state, id).await?;
    let steps = WorkflowStepRepo::list_for_workflow(&state.pool, id).await?;

    let count = |status: StepStatus| steps.iter().filter(|s| s.status_id == status.id()).count();

    let summary = WorkflowStatusSummary {
        workflow_id: workflow.id,
        status: workflow.status()?,
        total_steps: steps.len(),
        completed_steps: count(StepStatus::Completed),
        failed_steps: count(StepStatus::Failed),
        name: workflow.name,
        approved_by: workflow.approved_by,
        approved_at: workflow.approved_at,
        updated_at: workflow.updated_at,
    };
    Ok(Json(DataResponse { data: summary }))
}

// ---------------------------------------------------------------------------
// POST /workflows/{id}/validate
// ---------------------------------------------------------------------------

/// Run the workflow rules without changing anything.
pub async fn validate_workflow(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let workflow = find_workflow(&state, id).await?;
    let report = validation::validate_workflow(&workflow.to_spec()?);

    tracing::debug!(
        workflow_id = id,
        valid = report.is_valid(),
        violations = report.violations.len(),
        "Workflow validated",
    );
    Ok(Json(DataResponse {
        data: ValidationResponse {
            workflow_id: id,
            valid: report.is_valid(),
            violations: report.violations,
        },
    }))
}

// ---------------------------------------------------------------------------
// POST /workflows/{id}/submit
// ---------------------------------------------------------------------------

pub async fn submit_workflow(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let workflow = WorkflowEngine::new(state.pool.clone())
        .submit_for_approval(id)
        .await?;
    Ok(Json(DataResponse { data: workflow }))
}

// ---------------------------------------------------------------------------
// POST /workflows/{id}/approve
// ---------------------------------------------------------------------------

pub async fn approve_workflow(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ApproveWorkflow>,
) -> AppResult<impl IntoResponse> {
    let approved_by = input.approved_by.as_deref().unwrap_or(SYSTEM_ACTOR);
    let workflow = WorkflowEngine::new(state.pool.clone())
        .approve_workflow(id, approved_by)
        .await?;
    Ok(Json(DataResponse { data: workflow }))
}

// ---------------------------------------------------------------------------
// POST /workflows/{id}/reject
// ---------------------------------------------------------------------------

pub async fn reject_workflow(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RejectWorkflow>,
) -> AppResult<impl IntoResponse> {
    let rejected_by = input.rejected_by.as_deref().unwrap_or(SYSTEM_ACTOR);
    let reason = input.reason.as_deref().unwrap_or(DEFAULT_REJECTION_REASON);
    let workflow = WorkflowEngine::new(state.pool.clone())
        .reject_workflow(id, rejected_by, reason)
        .await?;
    Ok(Json(DataResponse { data: workflow }))
}

// ---------------------------------------------------------------------------
// POST /workflows/{id}/execute
// ---------------------------------------------------------------------------

/// Execute an approved workflow. A failing step yields `success: false`
/// with status 200; only precondition and infrastructure errors are errors.
pub async fn execute_workflow(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let result = WorkflowEngine::new(state.pool.clone())
        .execute_workflow(id)
        .await?;
    Ok(Json(DataResponse { data: result }))
}
