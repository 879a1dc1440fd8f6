//! Step executor.
//!
//! Runs a workflow's steps in ascending `step_order`, recording each step's
//! outcome on the in-memory row. Execution stops at the first failing step;
//! the remaining steps stay PENDING. Persisting the rows is the caller's job.

use async_trait::async_trait;
use autoflow_core::codegen;
use autoflow_core::error::CoreError;
use autoflow_core::execution::{StepFailure, STEP_SUCCEEDED_MESSAGE};
use autoflow_core::status::StepStatus;
use autoflow_core::types::DbId;
use autoflow_core::validation;
use autoflow_core::workflow::{StepType, WorkflowSpec};
use autoflow_db::models::workflow_step::WorkflowStep;
use chrono::Utc;

/// Produces and stores the component for a CODE_GENERATION step.
#[async_trait]
pub trait ComponentGenerator: Send {
    /// Generate the workflow's component, returning the stored component id.
    async fn generate_component(&mut self, spec: &WorkflowSpec) -> Result<DbId, CoreError>;
}

/// Execute `steps` in order against `spec`.
///
/// On success every step is COMPLETED. On failure the failing step is FAILED
/// with its error text and a [`StepFailure`] naming it is returned.
pub async fn execute_steps<G: ComponentGenerator>(
    spec: &WorkflowSpec,
    steps: &mut [WorkflowStep],
    generator: &mut G,
) -> Result<(), StepFailure> {
    steps.sort_by_key(|s| s.step_order);

    for step in steps.iter_mut() {
        step.status_id = StepStatus::InProgress.id();
        step.executed_at = Some(Utc::now());

        tracing::info!(
            workflow_id = spec.id,
            step = %step.step_name,
            step_order = step.step_order,
            step_type = %step.step_type,
            "Executing step",
        );

        match run_step(spec, step, generator).await {
            Ok(message) => {
                step.status_id = StepStatus::Completed.id();
                step.result = Some(message);
                step.error_message = None;
                tracing::info!(workflow_id = spec.id, step = %step.step_name, "Step completed");
            }
            Err(source) => {
                step.status_id = StepStatus::Failed.id();
                step.error_message = Some(source.to_string());
                tracing::error!(
                    workflow_id = spec.id,
                    step = %step.step_name,
                    error = %source,
                    "Step failed",
                );
                return Err(StepFailure {
                    step_name: step.step_name.clone(),
                    source,
                });
            }
        }
    }

    Ok(())
}

/// Dispatch one step by type, returning the result message.
async fn run_step<G: ComponentGenerator>(
    spec: &WorkflowSpec,
    step: &WorkflowStep,
    generator: &mut G,
) -> Result<String, CoreError> {
    let Ok(step_type) = step.step_type.parse::<StepType>() else {
        tracing::warn!(
            workflow_id = spec.id,
            step = %step.step_name,
            step_type = %step.step_type,
            "Unknown step type, nothing to do",
        );
        return Ok(STEP_SUCCEEDED_MESSAGE.to_string());
    };

    match step_type {
        StepType::Validation => {
            validation::validate_workflow(spec).into_result()?;
        }
        StepType::DependencyCheck => {
            let checked = validation::check_dependencies(spec);
            tracing::info!(workflow_id = spec.id, dependencies = ?checked, "Dependencies checked");
        }
        StepType::CodeGeneration => {
            let component_id = generator.generate_component(spec).await?;
            return Ok(format!(
                "Component {} generated with id {component_id}",
                spec.component_name
            ));
        }
        StepType::FileCreation => {
            // Files are not written yet; log where they would go.
            let plan = codegen::planned_component_files(&spec.component_name);
            tracing::info!(
                workflow_id = spec.id,
                directory = %plan.directory,
                files = ?plan.files,
                "Component files would be created",
            );
        }
        StepType::Testing => {
            tracing::debug!(workflow_id = spec.id, "No automated tests configured");
        }
        StepType::Approval | StepType::Notification | StepType::Deployment => {
            tracing::warn!(
                workflow_id = spec.id,
                step = %step.step_name,
                step_type = %step_type,
                "Step type is not executable, skipping",
            );
        }
    }

    Ok(STEP_SUCCEEDED_MESSAGE.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
