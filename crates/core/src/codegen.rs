//! Component code generation from category templates.
//!
//! Everything here is pure string work: pick a template, substitute the
//! `{{PLACEHOLDER}}` markers and derive selector, style and test sources.
//! Persisting the result is the caller's job.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::workflow::{ComponentCategory, WorkflowSpec};

/// Version stamped on every freshly generated component.
pub const COMPONENT_VERSION: &str = "1.0.0";

/// Prefix applied to every generated element selector.
pub const SELECTOR_PREFIX: &str = "app-";

/// Directory (relative to the frontend project) that holds generated components.
pub const COMPONENTS_ROOT: &str = "src/app/components";

static CASE_BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").expect("valid regex"));

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

const BASE_TEMPLATE: &str = r#"{{IMPORTS}}
import { Component, OnInit } from '@angular/core';

/**
 * {{COMPONENT_NAME}} Component
 * {{DESCRIPTION}}
 * Category: {{CATEGORY}}
 */
@Component({
  selector: '{{SELECTOR}}',
  templateUrl: './{{SELECTOR}}.component.html',
  styleUrls: ['./{{SELECTOR}}.component.scss']
})
export class {{COMPONENT_NAME}}Component implements OnInit {

  category = '{{CATEGORY}}';

{{CATEGORY_LOGIC}}

  constructor() {
    console.log('{{COMPONENT_NAME}} initialized');
  }

  ngOnInit(): void {
    this.initialize();
  }

  private initialize(): void {
    // Component initialization logic
  }
}
"#;

const SAFETY_SYSTEM_TEMPLATE: &str = r#"{{IMPORTS}}
import { Component, OnInit, Input, Output, EventEmitter } from '@angular/core';

/**
 * {{COMPONENT_NAME}} Component - Safety System
 * {{DESCRIPTION}}
 *
 * This component handles safety-critical operations in the automobile system.
 */
@Component({
  selector: '{{SELECTOR}}',
  templateUrl: './{{SELECTOR}}.component.html',
  styleUrls: ['./{{SELECTOR}}.component.scss']
})
export class {{COMPONENT_NAME}}Component implements OnInit {

  @Input() sensorData: any;
  @Output() alertTriggered = new EventEmitter<string>();

  category = '{{CATEGORY}}';
  safetyStatus: 'NORMAL' | 'WARNING' | 'CRITICAL' = 'NORMAL';

{{CATEGORY_LOGIC}}

  constructor() {
    console.log('Safety System {{COMPONENT_NAME}} initialized');
  }

  ngOnInit(): void {
    this.initializeSafetyMonitoring();
  }

  private initializeSafetyMonitoring(): void {
    // Initialize safety monitoring systems
    this.checkSafetyParameters();
  }

  private checkSafetyParameters(): void {
    // Validate safety parameters
    if (this.sensorData) {
      this.evaluateSafetyStatus();
    }
  }

  private evaluateSafetyStatus(): void {
    // Evaluate current safety status
    // Trigger alerts if necessary
  }

  public triggerAlert(message: string): void {
    this.alertTriggered.emit(message);
  }
}
"#;

const ENGINE_MANAGEMENT_TEMPLATE: &str = r#"{{IMPORTS}}
import { Component, OnInit, Input } from '@angular/core';

/**
 * {{COMPONENT_NAME}} Component - Engine Management
 * {{DESCRIPTION}}
 *
 * Manages engine parameters and performance monitoring.
 */
@Component({
  selector: '{{SELECTOR}}',
  templateUrl: './{{SELECTOR}}.component.html',
  styleUrls: ['./{{SELECTOR}}.component.scss']
})
export class {{COMPONENT_NAME}}Component implements OnInit {

  @Input() engineData: any;

  category = '{{CATEGORY}}';
  rpm: number = 0;
  temperature: number = 0;
  fuelLevel: number = 100;

{{CATEGORY_LOGIC}}

  constructor() {
    console.log('Engine Management {{COMPONENT_NAME}} initialized');
  }

  ngOnInit(): void {
    this.initializeEngineMonitoring();
  }

  private initializeEngineMonitoring(): void {
    // Initialize engine monitoring
    this.updateEngineParameters();
  }

  private updateEngineParameters(): void {
    if (this.engineData) {
      this.rpm = this.engineData.rpm || 0;
      this.temperature = this.engineData.temperature || 0;
      this.fuelLevel = this.engineData.fuelLevel || 100;
    }
  }

  public getEngineStatus(): string {
    if (this.temperature > 100) return 'OVERHEATING';
    if (this.fuelLevel < 10) return 'LOW_FUEL';
    return 'NORMAL';
  }
}
"#;

const INFOTAINMENT_TEMPLATE: &str = r#"{{IMPORTS}}
import { Component, OnInit, Input, Output, EventEmitter } from '@angular/core';

/**
 * {{COMPONENT_NAME}} Component - Infotainment
 * {{DESCRIPTION}}
 *
 * Handles infotainment system functionality.
 */
@Component({
  selector: '{{SELECTOR}}',
  templateUrl: './{{SELECTOR}}.component.html',
  styleUrls: ['./{{SELECTOR}}.component.scss']
})
export class {{COMPONENT_NAME}}Component implements OnInit {

  @Input() displayMode: 'DAY' | 'NIGHT' = 'DAY';
  @Output() modeChanged = new EventEmitter<string>();

  category = '{{CATEGORY}}';
  currentMedia: any;
  volume: number = 50;

{{CATEGORY_LOGIC}}

  constructor() {
    console.log('Infotainment {{COMPONENT_NAME}} initialized');
  }

  ngOnInit(): void {
    this.initializeDisplay();
  }

  private initializeDisplay(): void {
    // Initialize display settings
    this.applyDisplayMode();
  }

  private applyDisplayMode(): void {
    // Apply current display mode settings
  }

  public changeVolume(newVolume: number): void {
    this.volume = Math.max(0, Math.min(100, newVolume));
  }

  public toggleDisplayMode(): void {
    this.displayMode = this.displayMode === 'DAY' ? 'NIGHT' : 'DAY';
    this.modeChanged.emit(this.displayMode);
    this.applyDisplayMode();
  }
}
"#;

const DIAGNOSTIC_TEMPLATE: &str = r#"{{IMPORTS}}
import { Component, OnInit, Output, EventEmitter } from '@angular/core';

/**
 * {{COMPONENT_NAME}} Component - Diagnostic
 * {{DESCRIPTION}}
 *
 * Performs diagnostic operations and error code management.
 */
@Component({
  selector: '{{SELECTOR}}',
  templateUrl: './{{SELECTOR}}.component.html',
  styleUrls: ['./{{SELECTOR}}.component.scss']
})
export class {{COMPONENT_NAME}}Component implements OnInit {

  @Output() diagnosticComplete = new EventEmitter<any>();

  category = '{{CATEGORY}}';
  diagnosticCodes: string[] = [];
  isRunning: boolean = false;

{{CATEGORY_LOGIC}}

  constructor() {
    console.log('Diagnostic {{COMPONENT_NAME}} initialized');
  }

  ngOnInit(): void {
    this.initializeDiagnostics();
  }

  private initializeDiagnostics(): void {
    // Initialize diagnostic systems
    this.loadDiagnosticCodes();
  }

  private loadDiagnosticCodes(): void {
    // Load existing diagnostic codes
  }

  public runDiagnostics(): void {
    this.isRunning = true;
    // Perform diagnostic tests
    setTimeout(() => {
      this.isRunning = false;
      this.diagnosticComplete.emit({
        codes: this.diagnosticCodes,
        timestamp: new Date()
      });
    }, 2000);
  }

  public clearDiagnosticCodes(): void {
    this.diagnosticCodes = [];
  }
}
"#;

const SAFETY_SYSTEM_LOGIC: &str = "  // Safety system logic
  private alertSystem: AlertSystem;
  private sensorData: any;

  monitorSafety(): void {
    // Monitor safety parameters
  }
";

const ENGINE_MANAGEMENT_LOGIC: &str = "  // Engine management logic
  private engineData: any;
  private fuelLevel: number;

  monitorEngine(): void {
    // Monitor engine parameters
  }
";

const INFOTAINMENT_LOGIC: &str = "  // Infotainment logic
  private mediaPlayer: any;
  private displayMode: string;

  updateDisplay(): void {
    // Update display content
  }
";

const DIAGNOSTIC_LOGIC: &str = "  // Diagnostic logic
  private diagnosticCodes: string[];
  private dataLogger: any;

  runDiagnostics(): void {
    // Run diagnostic tests
  }
";

const GENERIC_LOGIC: &str = "  // Component logic\n";

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Sources produced for one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedComponent {
    pub selector: String,
    pub template_code: String,
    pub style_code: String,
    pub test_code: String,
    pub version: &'static str,
}

/// Where the component's files would be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentFilePlan {
    pub directory: String,
    pub files: Vec<String>,
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Select the template for a category.
///
/// `_component_type` is part of the lookup key but no template varies on it.
pub fn template_for(category: ComponentCategory, _component_type: &str) -> &'static str {
    match category {
        ComponentCategory::SafetySystem => SAFETY_SYSTEM_TEMPLATE,
        ComponentCategory::EngineManagement => ENGINE_MANAGEMENT_TEMPLATE,
        ComponentCategory::Infotainment => INFOTAINMENT_TEMPLATE,
        ComponentCategory::Diagnostic => DIAGNOSTIC_TEMPLATE,
        _ => BASE_TEMPLATE,
    }
}

/// Category-specific class members spliced into `{{CATEGORY_LOGIC}}`.
pub fn category_logic(category: ComponentCategory) -> &'static str {
    match category {
        ComponentCategory::SafetySystem => SAFETY_SYSTEM_LOGIC,
        ComponentCategory::EngineManagement => ENGINE_MANAGEMENT_LOGIC,
        ComponentCategory::Infotainment => INFOTAINMENT_LOGIC,
        ComponentCategory::Diagnostic => DIAGNOSTIC_LOGIC,
        _ => GENERIC_LOGIC,
    }
}

/// Convert a PascalCase / camelCase identifier to kebab-case.
///
/// Only a lowercase letter directly followed by an uppercase letter is a
/// word boundary, so runs of capitals stay together (`ABSModule` ->
/// `absmodule`).
pub fn kebab_case(input: &str) -> String {
    CASE_BOUNDARY_RE
        .replace_all(input, "$1-$2")
        .to_lowercase()
}

/// Element selector for a component name, e.g. `app-engine-monitor`.
pub fn selector_for(component_name: &str) -> String {
    format!("{SELECTOR_PREFIX}{}", kebab_case(component_name))
}

/// Substitute every placeholder in `template` for the given workflow.
pub fn render_component_code(spec: &WorkflowSpec, template: &str) -> String {
    let imports: String = spec
        .dependencies
        .iter()
        .map(|dep| format!("import {{ {dep} }} from './{}';\n", kebab_case(dep)))
        .collect();

    template
        .replace("{{COMPONENT_NAME}}", &spec.component_name)
        .replace("{{SELECTOR}}", &selector_for(&spec.component_name))
        .replace("{{DESCRIPTION}}", spec.description.as_deref().unwrap_or(""))
        .replace("{{CATEGORY}}", spec.category.as_str())
        .replace("{{IMPORTS}}", &imports)
        .replace("{{CATEGORY_LOGIC}}", category_logic(spec.category))
}

/// SCSS stylesheet for a component.
pub fn render_style_code(component_name: &str) -> String {
    format!(
        r#"/* {component_name} Component Styles */

:host {{
  display: block;
  padding: 16px;
}}

.component-container {{
  background-color: #ffffff;
  border-radius: 8px;
  box-shadow: 0 2px 4px rgba(0, 0, 0, 0.1);
}}

.component-header {{
  font-size: 18px;
  font-weight: 600;
  margin-bottom: 16px;
  color: #333;
}}

.component-content {{
  padding: 16px;
}}
"#
    )
}

/// Angular TestBed spec for a component.
pub fn render_test_code(component_name: &str, category: ComponentCategory) -> String {
    let class_name = format!("{component_name}Component");
    let file_stem = kebab_case(component_name);
    format!(
        r#"import {{ ComponentFixture, TestBed }} from '@angular/core/testing';
import {{ {class_name} }} from './{file_stem}.component';

describe('{class_name}', () => {{
  let component: {class_name};
  let fixture: ComponentFixture<{class_name}>;

  beforeEach(async () => {{
    await TestBed.configureTestingModule({{
      declarations: [ {class_name} ]
    }})
    .compileComponents();

    fixture = TestBed.createComponent({class_name});
    component = fixture.componentInstance;
    fixture.detectChanges();
  }});

  it('should create', () => {{
    expect(component).toBeTruthy();
  }});

  it('should initialize with correct category', () => {{
    expect(component.category).toBe('{category}');
  }});
}});
"#
    )
}

/// Produce every source for the workflow's component.
pub fn generate(spec: &WorkflowSpec) -> GeneratedComponent {
    let template = template_for(spec.category, &spec.component_type);
    GeneratedComponent {
        selector: selector_for(&spec.component_name),
        template_code: render_component_code(spec, template),
        style_code: render_style_code(&spec.component_name),
        test_code: render_test_code(&spec.component_name, spec.category),
        version: COMPONENT_VERSION,
    }
}

/// The directory and file names a component would be written to.
pub fn planned_component_files(component_name: &str) -> ComponentFilePlan {
    let stem = kebab_case(component_name);
    ComponentFilePlan {
        directory: format!("{COMPONENTS_ROOT}/{stem}"),
        files: ["ts", "html", "scss", "spec.ts"]
            .iter()
            .map(|ext| format!("{stem}.component.{ext}"))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
