pub mod component;
pub mod health;
pub mod workflow;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /workflows                                  list, create
/// /workflows/statistics                       counts by status
/// /workflows/pending-approval                 awaiting review
/// /workflows/status/{status}                  by status
/// /workflows/category/{category}              by category
/// /workflows/{id}                             get, update, delete
/// /workflows/{id}/status                      status summary
/// /workflows/{id}/validate                    dry-run validation (POST)
/// /workflows/{id}/submit                      submit for approval (POST)
/// /workflows/{id}/approve                     approve (POST)
/// /workflows/{id}/reject                      reject (POST)
/// /workflows/{id}/execute                     execute steps (POST)
///
/// /components                                 list
/// /components/statistics                      totals
/// /components/active                          active only
/// /components/search                          name search (?query=)
/// /components/category/{category}             by category
/// /components/workflow/{workflow_id}          by generating workflow
/// /components/{id}                            get, delete
/// /components/{id}/activate                   activate (PUT)
/// /components/{id}/deactivate                 deactivate (PUT)
/// /components/{id}/code                       generated sources
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/workflows", workflow::router())
        .nest("/components", component::router())
}
