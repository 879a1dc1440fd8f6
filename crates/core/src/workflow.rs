//! Workflow domain vocabulary and the status state machine.
//!
//! Categories and step types are stored as TEXT in the database (guarded by
//! CHECK constraints); workflow and step statuses live in lookup tables, see
//! [`crate::status`].

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::status::WorkflowStatus;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum length of a workflow name.
pub const MAX_WORKFLOW_NAME_LENGTH: usize = 200;

/// Identity recorded when a caller approves or rejects without naming itself.
pub const SYSTEM_ACTOR: &str = "system";

/// Rejection reason used when the caller gives none.
pub const DEFAULT_REJECTION_REASON: &str = "Not specified";

// ---------------------------------------------------------------------------
// Text enums
// ---------------------------------------------------------------------------

macro_rules! define_text_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $( $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $( $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The canonical upper-case name stored in the database.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let upper = s.trim().to_ascii_uppercase();
                match upper.as_str() {
                    $( $text => Ok($name::$variant), )+
                    _ => Err(CoreError::Validation(format!(
                        "Invalid {} '{s}'. Must be one of: {}",
                        $label,
                        [$($text),+].join(", ")
                    ))),
                }
            }
        }
    };
}

define_text_enum! {
    /// Closed domain classification driving validation rules and template
    /// selection.
    ComponentCategory ("category") {
        EngineManagement => "ENGINE_MANAGEMENT",
        SafetySystem => "SAFETY_SYSTEM",
        Infotainment => "INFOTAINMENT",
        Diagnostic => "DIAGNOSTIC",
        Powertrain => "POWERTRAIN",
        ChassisControl => "CHASSIS_CONTROL",
        BodyElectronics => "BODY_ELECTRONICS",
        Telematics => "TELEMATICS",
    }
}

define_text_enum! {
    /// What a workflow step does when executed.
    StepType ("step type") {
        Validation => "VALIDATION",
        CodeGeneration => "CODE_GENERATION",
        FileCreation => "FILE_CREATION",
        DependencyCheck => "DEPENDENCY_CHECK",
        Approval => "APPROVAL",
        Notification => "NOTIFICATION",
        Testing => "TESTING",
        Deployment => "DEPLOYMENT",
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Returns the set of statuses that `from` may transition to.
///
/// Transition rules:
/// - `DRAFT`            -> `PENDING_APPROVAL`
/// - `PENDING_APPROVAL` -> `APPROVED`
/// - `APPROVED`         -> `IN_PROGRESS`
/// - `IN_PROGRESS`      -> `COMPLETED`, `FAILED`
/// - any status         -> `REJECTED`
///
/// Rejection carries no guard: a workflow can be rejected after it has
/// completed. Callers that care log the unusual cases, see
/// [`is_expected_rejection`].
pub fn valid_transitions(from: WorkflowStatus) -> &'static [WorkflowStatus] {
    use WorkflowStatus::*;
    match from {
        Draft => &[PendingApproval, Rejected],
        PendingApproval => &[Approved, Rejected],
        Approved => &[InProgress, Rejected],
        InProgress => &[Completed, Failed, Rejected],
        Completed | Failed | Rejected => &[Rejected],
    }
}

/// Check whether a transition from `from` to `to` is valid.
pub fn can_transition(from: WorkflowStatus, to: WorkflowStatus) -> bool {
    valid_transitions(from).contains(&to)
}

/// Validate a transition, producing an `IllegalState` error for invalid ones.
pub fn validate_transition(from: WorkflowStatus, to: WorkflowStatus) -> Result<(), CoreError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(CoreError::IllegalState(format!(
            "Cannot transition workflow from {from} to {to}"
        )))
    }
}

/// Whether rejecting from `from` is the ordinary review path.
pub fn is_expected_rejection(from: WorkflowStatus) -> bool {
    from == WorkflowStatus::PendingApproval
}

// ---------------------------------------------------------------------------
// Workflow definition
// ---------------------------------------------------------------------------

/// The parts of a workflow that validation and code generation look at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowSpec {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub category: ComponentCategory,
    pub component_name: String,
    pub component_type: String,
    pub dependencies: Vec<String>,
    pub validation_rules: Vec<String>,
    pub created_by: String,
}

/// A step definition used when creating a workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDefinition {
    pub step_order: i32,
    pub step_name: &'static str,
    pub step_description: &'static str,
    pub step_type: StepType,
}

/// The five steps every workflow gets when the caller supplies none.
pub const DEFAULT_STEPS: &[StepDefinition] = &[
    StepDefinition {
        step_order: 1,
        step_name: "Validation",
        step_description: "Validate workflow configuration and dependencies",
        step_type: StepType::Validation,
    },
    StepDefinition {
        step_order: 2,
        step_name: "Dependency Check",
        step_description: "Check if all dependencies are available",
        step_type: StepType::DependencyCheck,
    },
    StepDefinition {
        step_order: 3,
        step_name: "Code Generation",
        step_description: "Generate component code from template",
        step_type: StepType::CodeGeneration,
    },
    StepDefinition {
        step_order: 4,
        step_name: "File Creation",
        step_description: "Create component files in the project",
        step_type: StepType::FileCreation,
    },
    StepDefinition {
        step_order: 5,
        step_name: "Testing",
        step_description: "Run automated tests on generated component",
        step_type: StepType::Testing,
    },
];

/// Validate a workflow name (non-empty, within length limits).
pub fn validate_workflow_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Workflow name must not be empty".to_string(),
        ));
    }
    if trimmed.len() > MAX_WORKFLOW_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Workflow name must be at most {MAX_WORKFLOW_NAME_LENGTH} characters, got {}",
            trimmed.len()
        )));
    }
    Ok(())
}

/// Validate caller-supplied step orders: positive and unique.
pub fn validate_step_orders(orders: &[i32]) -> Result<(), CoreError> {
    let mut seen = HashSet::with_capacity(orders.len());
    for &order in orders {
        if order < 1 {
            return Err(CoreError::Validation(format!(
                "Step order must be positive, got {order}"
            )));
        }
        if !seen.insert(order) {
            return Err(CoreError::Validation(format!(
                "Duplicate step order {order}"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
