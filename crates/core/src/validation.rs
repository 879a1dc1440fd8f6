//! Workflow validation rules.
//!
//! [`validate_workflow`] runs every rule and returns a [`ValidationReport`]
//! listing all violations, so callers can tell "validation ran and found
//! problems" apart from "validation could not run". The step executor turns
//! a failing report into [`CoreError::ValidationFailed`].

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::CoreError;
use crate::workflow::{ComponentCategory, WorkflowSpec};

/// PascalCase pattern shared by component and dependency names.
pub const PASCAL_CASE_PATTERN: &str = r"^[A-Z][a-zA-Z0-9]*$";

static PASCAL_CASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PASCAL_CASE_PATTERN).expect("valid regex"));

/// Dependencies every SAFETY_SYSTEM component must declare.
pub const SAFETY_SYSTEM_REQUIRED_DEPENDENCIES: &[&str] = &["SensorModule", "AlertSystem"];

/// Dependency every DIAGNOSTIC component must declare.
pub const DIAGNOSTIC_REQUIRED_DEPENDENCY: &str = "DataLogger";

/// ENGINE_MANAGEMENT component names must contain one of these.
pub const ENGINE_MANAGEMENT_NAME_MARKERS: &[&str] = &["Monitor", "Controller"];

/// INFOTAINMENT components need a dependency containing one of these.
pub const INFOTAINMENT_DEPENDENCY_MARKERS: &[&str] = &["UI", "Display"];

/// Outcome of running the validation rules against a workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub violations: Vec<String>,
}

impl ValidationReport {
    /// `true` when no rule was violated.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Convert into a `Result`, aggregating all violations into one error.
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(CoreError::ValidationFailed(self.violations))
        }
    }
}

/// Whether `name` is a non-empty PascalCase identifier.
pub fn is_valid_component_name(name: &str) -> bool {
    PASCAL_CASE_RE.is_match(name)
}

/// Run every validation rule against `spec` and collect the violations.
pub fn validate_workflow(spec: &WorkflowSpec) -> ValidationReport {
    let mut violations = Vec::new();

    if !is_valid_component_name(&spec.component_name) {
        violations.push(
            "Invalid component name. Must be PascalCase and start with a letter.".to_string(),
        );
    }

    check_category_rules(spec, &mut violations);

    for dependency in &spec.dependencies {
        if !is_valid_component_name(dependency) {
            violations.push(format!("Invalid dependency name: {dependency}"));
        }
    }

    for rule in &spec.validation_rules {
        if rule.trim().is_empty() {
            violations.push("Empty validation rule found".to_string());
        }
    }

    ValidationReport { violations }
}

/// Placeholder dependency-resolution check.
///
/// Always succeeds. Returns the dependency names that were looked at so the
/// caller can log them.
pub fn check_dependencies(spec: &WorkflowSpec) -> Vec<String> {
    spec.dependencies.clone()
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn has_dependency(spec: &WorkflowSpec, name: &str) -> bool {
    spec.dependencies.iter().any(|d| d == name)
}

fn check_category_rules(spec: &WorkflowSpec, violations: &mut Vec<String>) {
    match spec.category {
        ComponentCategory::SafetySystem => {
            for dep in SAFETY_SYSTEM_REQUIRED_DEPENDENCIES {
                if !has_dependency(spec, dep) {
                    violations.push(format!("Safety system requires dependency: {dep}"));
                }
            }
        }
        ComponentCategory::EngineManagement => {
            let has_marker = ENGINE_MANAGEMENT_NAME_MARKERS
                .iter()
                .any(|m| spec.component_name.contains(m));
            if !has_marker {
                violations.push(
                    "Engine management components should include 'Monitor' or 'Controller' in name"
                        .to_string(),
                );
            }
        }
        ComponentCategory::Infotainment => {
            let has_ui = spec.dependencies.iter().any(|d| {
                INFOTAINMENT_DEPENDENCY_MARKERS
                    .iter()
                    .any(|m| d.contains(m))
            });
            if !has_ui {
                violations
                    .push("Infotainment components should have UI/Display dependencies".to_string());
            }
        }
        ComponentCategory::Diagnostic => {
            if !has_dependency(spec, DIAGNOSTIC_REQUIRED_DEPENDENCY) {
                violations.push("Diagnostic components require DataLogger dependency".to_string());
            }
        }
        ComponentCategory::Powertrain
        | ComponentCategory::ChassisControl
        | ComponentCategory::BodyElectronics
        | ComponentCategory::Telematics => {}
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn spec(category: ComponentCategory, name: &str, deps: &[&str]) -> WorkflowSpec {
        WorkflowSpec {
            id: 1,
            name: "test workflow".to_string(),
            description: None,
            category,
            component_name: name.to_string(),
            component_type: "widget".to_string(),
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            validation_rules: Vec::new(),
            created_by: "tester".to_string(),
        }
    }

    // -- component names ------------------------------------------------------

    #[test]
    fn pascal_case_names_are_valid() {
        for name in ["EngineMonitor", "A", "Abs2", "DtcReader", "X9y"] {
            assert!(is_valid_component_name(name), "{name} should be valid");
        }
    }

    #[test]
    fn non_pascal_case_names_are_invalid() {
        for name in ["", "engineMonitor", "9Lives", "Engine-Monitor", "Engine Monitor", "Engine_1"] {
            assert!(!is_valid_component_name(name), "{name:?} should be invalid");
        }
    }

    // -- category rules -------------------------------------------------------

    #[test]
    fn safety_system_missing_alert_system_is_reported() {
        let report = validate_workflow(&spec(
            ComponentCategory::SafetySystem,
            "BrakeAssist",
            &["SensorModule"],
        ));
        assert_eq!(
            report.violations,
            vec!["Safety system requires dependency: AlertSystem".to_string()]
        );
    }

    #[test]
    fn safety_system_with_both_dependencies_passes() {
        let report = validate_workflow(&spec(
            ComponentCategory::SafetySystem,
            "BrakeAssist",
            &["SensorModule", "AlertSystem"],
        ));
        assert!(report.is_valid());
    }

    #[test]
    fn engine_management_requires_monitor_or_controller() {
        let bad = validate_workflow(&spec(ComponentCategory::EngineManagement, "FuelGauge", &[]));
        assert_eq!(bad.violations.len(), 1);
        assert!(bad.violations[0].contains("'Monitor' or 'Controller'"));

        let good = validate_workflow(&spec(ComponentCategory::EngineManagement, "EngineMonitor", &[]));
        assert!(good.is_valid());
        let good = validate_workflow(&spec(ComponentCategory::EngineManagement, "ThrottleController", &[]));
        assert!(good.is_valid());
    }

    #[test]
    fn infotainment_requires_ui_or_display_dependency() {
        let bad = validate_workflow(&spec(ComponentCategory::Infotainment, "MediaPanel", &["AudioBus"]));
        assert_eq!(
            bad.violations,
            vec!["Infotainment components should have UI/Display dependencies".to_string()]
        );

        let good = validate_workflow(&spec(ComponentCategory::Infotainment, "MediaPanel", &["TouchDisplay"]));
        assert!(good.is_valid());
        let good = validate_workflow(&spec(ComponentCategory::Infotainment, "MediaPanel", &["UIKit"]));
        assert!(good.is_valid());
    }

    #[test]
    fn diagnostic_requires_data_logger() {
        let bad = validate_workflow(&spec(ComponentCategory::Diagnostic, "DtcReader", &[]));
        assert_eq!(
            bad.violations,
            vec!["Diagnostic components require DataLogger dependency".to_string()]
        );
        let good = validate_workflow(&spec(ComponentCategory::Diagnostic, "DtcReader", &["DataLogger"]));
        assert!(good.is_valid());
    }

    #[test]
    fn uncovered_categories_have_no_extra_rules() {
        for category in [
            ComponentCategory::Powertrain,
            ComponentCategory::ChassisControl,
            ComponentCategory::BodyElectronics,
            ComponentCategory::Telematics,
        ] {
            assert!(validate_workflow(&spec(category, "Widget", &[])).is_valid());
        }
    }

    // -- aggregation ----------------------------------------------------------

    #[test]
    fn all_violations_are_collected() {
        let mut s = spec(ComponentCategory::SafetySystem, "brakeAssist", &["sensor-module"]);
        s.validation_rules = vec!["max_latency < 10ms".to_string(), "   ".to_string()];

        let report = validate_workflow(&s);

        assert_eq!(
            report.violations,
            vec![
                "Invalid component name. Must be PascalCase and start with a letter.".to_string(),
                "Safety system requires dependency: SensorModule".to_string(),
                "Safety system requires dependency: AlertSystem".to_string(),
                "Invalid dependency name: sensor-module".to_string(),
                "Empty validation rule found".to_string(),
            ]
        );
    }

    #[test]
    fn failing_report_converts_to_validation_failed() {
        let report = validate_workflow(&spec(ComponentCategory::Diagnostic, "DtcReader", &[]));
        let err = report.into_result().unwrap_err();
        assert_matches!(err, CoreError::ValidationFailed(ref v) if v.len() == 1);
        assert_eq!(
            err.to_string(),
            "Workflow validation failed: Diagnostic components require DataLogger dependency"
        );
    }

    #[test]
    fn passing_report_converts_to_ok() {
        let report = validate_workflow(&spec(ComponentCategory::Telematics, "GpsTracker", &[]));
        assert!(report.into_result().is_ok());
    }

    // -- dependency check -----------------------------------------------------

    #[test]
    fn dependency_check_always_succeeds() {
        let s = spec(ComponentCategory::Telematics, "GpsTracker", &["Modem", "not valid"]);
        assert_eq!(check_dependencies(&s), vec!["Modem".to_string(), "not valid".to_string()]);
    }
}
