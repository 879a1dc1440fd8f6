//! Route definitions for the `/workflows` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::workflow;
use crate::state::AppState;

/// Routes mounted at `/workflows`.
///
/// ```text
/// GET    /                       -> list_workflows
/// POST   /                       -> create_workflow
/// GET    /statistics             -> get_statistics
/// GET    /pending-approval       -> list_pending_approval
/// GET    /status/{status}        -> list_by_status
/// GET    /category/{category}    -> list_by_category
/// GET    /{id}                   -> get_workflow
/// PUT    /{id}                   -> update_workflow
/// DELETE /{id}                   -> delete_workflow
/// GET    /{id}/status            -> get_status_summary
/// POST   /{id}/validate          -> validate_workflow
/// POST   /{id}/submit            -> submit_workflow
/// POST   /{id}/approve           -> approve_workflow
/// POST   /{id}/reject            -> reject_workflow
/// POST   /{id}/execute           -> execute_workflow
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(workflow::list_workflows).post(workflow::create_workflow),
        )
        .route("/statistics", get(workflow::get_statistics))
        .route("/pending-approval", get(workflow::list_pending_approval))
        .route("/status/{status}", get(workflow::list_by_status))
        .route("/category/{category}", get(workflow::list_by_category))
        .route(
            "/{id}",
            get(workflow::get_workflow)
                .put(workflow::update_workflow)
                .delete(workflow::delete_workflow),
        )
        .route("/{id}/status", get(workflow::get_status_summary))
        .route("/{id}/validate", post(workflow::validate_workflow))
        .route("/{id}/submit", post(workflow::submit_workflow))
        .route("/{id}/approve", post(workflow::approve_workflow))
        .route("/{id}/reject", post(workflow::reject_workflow))
        .route("/{id}/execute", post(workflow::execute_workflow))
}
