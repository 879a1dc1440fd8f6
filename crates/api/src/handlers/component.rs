//! Handlers for the `/components` resource.
//!
//! Components are created only by workflow execution; this surface reads,
//! toggles and deletes them.

use autoflow_core::error::CoreError;
use autoflow_core::search::contains_pattern;
use autoflow_core::types::DbId;
use autoflow_core::workflow::ComponentCategory;
use autoflow_db::models::component::{
    Component, ComponentCode, ComponentListParams, ComponentSearchParams, ComponentStatistics,
};
use autoflow_db::repositories::ComponentRepo;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Component",
        id,
    })
}

async fn find_component(state: &AppState, id: DbId) -> AppResult<Component> {
    ComponentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

async fn set_active(state: &AppState, id: DbId, is_active: bool) -> AppResult<Component> {
    let component = ComponentRepo::set_active(&state.pool, id, is_active)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(component_id = id, is_active, "Component active flag changed");
    Ok(component)
}

// ---------------------------------------------------------------------------
// GET /components
// ---------------------------------------------------------------------------

/// List components, newest first, optionally by category and active flag.
pub async fn list_components(
    State(state): State<AppState>,
    Query(params): Query<ComponentListParams>,
) -> AppResult<impl IntoResponse> {
    let category = params
        .category
        .as_deref()
        .map(str::parse::<ComponentCategory>)
        .transpose()?;

    let data =
        ComponentRepo::list_filtered(&state.pool, category.map(ComponentCategory::as_str), params.active)
            .await?;
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// GET /components/active
// ---------------------------------------------------------------------------

pub async fn list_active(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let data = ComponentRepo::list_filtered(&state.pool, None, Some(true)).await?;
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// GET /components/search?query=
// ---------------------------------------------------------------------------

/// Case-insensitive substring match on the names of active components.
pub async fn search_components(
    State(state): State<AppState>,
    Query(params): Query<ComponentSearchParams>,
) -> AppResult<impl IntoResponse> {
    let pattern = contains_pattern(&params.query);
    let data = ComponentRepo::search_active(&state.pool, &pattern).await?;
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// GET /components/category/{category}
// ---------------------------------------------------------------------------

pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> AppResult<impl IntoResponse> {
    let category: ComponentCategory = category.parse()?;
    let data = ComponentRepo::list_filtered(&state.pool, Some(category.as_str()), None).await?;
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// GET /components/workflow/{workflow_id}
// ---------------------------------------------------------------------------

pub async fn list_by_workflow(
    State(state): State<AppState>,
    Path(workflow_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let data = ComponentRepo::list_by_workflow(&state.pool, workflow_id).await?;
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// GET /components/statistics
// ---------------------------------------------------------------------------

pub async fn get_statistics(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let (total, active) = ComponentRepo::count_totals(&state.pool).await?;
    let by_category = ComponentRepo::count_active_by_category(&state.pool)
        .await?
        .into_iter()
        .map(|c| (c.category, c.count))
        .collect();

    Ok(Json(DataResponse {
        data: ComponentStatistics {
            total,
            active,
            by_category,
        },
    }))
}

// ---------------------------------------------------------------------------
// GET /components/{id}
// ---------------------------------------------------------------------------

pub async fn get_component(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let data = find_component(&state, id).await?;
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// DELETE /components/{id}
// ---------------------------------------------------------------------------

pub async fn delete_component(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ComponentRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(component_id = id, "Component deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// PUT /components/{id}/activate, PUT /components/{id}/deactivate
// ---------------------------------------------------------------------------

pub async fn activate_component(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let data = set_active(&state, id, true).await?;
    Ok(Json(DataResponse { data }))
}

pub async fn deactivate_component(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let data = set_active(&state, id, false).await?;
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// GET /components/{id}/code
// ---------------------------------------------------------------------------

/// The generated TypeScript, SCSS and test sources of a component.
pub async fn get_component_code(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let component = find_component(&state, id).await?;
    Ok(Json(DataResponse {
        data: ComponentCode::from(component),
    }))
}
