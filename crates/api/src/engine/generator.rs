//! Stores generated components during workflow execution.

use async_trait::async_trait;
use autoflow_core::codegen;
use autoflow_core::error::CoreError;
use autoflow_core::types::DbId;
use autoflow_core::workflow::WorkflowSpec;
use autoflow_db::models::component::CreateComponent;
use autoflow_db::repositories::ComponentRepo;
use sqlx::{Connection, PgConnection};

use crate::engine::executor::ComponentGenerator;
use crate::error::is_unique_violation;

/// [`ComponentGenerator`] that inserts into `components` on the execution
/// transaction's connection.
///
/// Each insert runs under a savepoint so a rejected row (e.g. a duplicate
/// name) leaves the outer transaction usable for recording the failure.
pub struct PgComponentGenerator<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> PgComponentGenerator<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }
}

/// Build the insert payload for a workflow's generated component.
pub fn component_input(spec: &WorkflowSpec) -> CreateComponent {
    let generated = codegen::generate(spec);
    CreateComponent {
        name: spec.component_name.clone(),
        description: spec.description.clone(),
        category: spec.category.as_str().to_string(),
        component_type: spec.component_type.clone(),
        selector: generated.selector,
        template_code: generated.template_code,
        style_code: generated.style_code,
        test_code: generated.test_code,
        dependencies: spec.dependencies.clone(),
        version: generated.version.to_string(),
        created_by: spec.created_by.clone(),
        workflow_id: Some(spec.id),
    }
}

#[async_trait]
impl ComponentGenerator for PgComponentGenerator<'_> {
    async fn generate_component(&mut self, spec: &WorkflowSpec) -> Result<DbId, CoreError> {
        tracing::info!(
            workflow_id = spec.id,
            component = %spec.component_name,
            "Generating component",
        );

        let input = component_input(spec);

        let mut savepoint = self
            .conn
            .begin()
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to open savepoint: {e}")))?;

        let component = match ComponentRepo::create(&mut *savepoint, &input).await {
            Ok(component) => component,
            Err(e) if is_unique_violation(&e) => {
                return Err(CoreError::Conflict(format!(
                    "Component name already exists: {}",
                    spec.component_name
                )));
            }
            Err(e) => {
                return Err(CoreError::Internal(format!(
                    "Failed to store generated component: {e}"
                )));
            }
        };

        savepoint
            .commit()
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to release savepoint: {e}")))?;

        tracing::info!(
            workflow_id = spec.id,
            component_id = component.id,
            selector = %component.selector,
            "Component generated",
        );
        Ok(component.id)
    }
}
