//! Route definitions for the `/components` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::component;
use crate::state::AppState;

/// Routes mounted at `/components`.
///
/// ```text
/// GET    /                          -> list_components
/// GET    /statistics                -> get_statistics
/// GET    /active                    -> list_active
/// GET    /search                    -> search_components
/// GET    /category/{category}       -> list_by_category
/// GET    /workflow/{workflow_id}    -> list_by_workflow
/// GET    /{id}                      -> get_component
/// DELETE /{id}                      -> delete_component
/// PUT    /{id}/activate             -> activate_component
/// PUT    /{id}/deactivate           -> deactivate_component
/// GET    /{id}/code                 -> get_component_code
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(component::list_components))
        .route("/statistics", get(component::get_statistics))
        .route("/active", get(component::list_active))
        .route("/search", get(component::search_components))
        .route("/category/{category}", get(component::list_by_category))
        .route("/workflow/{workflow_id}", get(component::list_by_workflow))
        .route(
            "/{id}",
            get(component::get_component).delete(component::delete_component),
        )
        .route("/{id}/activate", put(component::activate_component))
        .route("/{id}/deactivate", put(component::deactivate_component))
        .route("/{id}/code", get(component::get_component_code))
}
