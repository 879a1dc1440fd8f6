//! Generated component entity model and DTOs.

use std::collections::BTreeMap;

use autoflow_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `components` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Component {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub component_type: String,
    pub selector: String,
    pub template_code: String,
    pub style_code: String,
    pub test_code: String,
    pub dependencies: Vec<String>,
    pub version: String,
    pub created_by: String,
    pub workflow_id: Option<DbId>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload produced by the code-generation step.
#[derive(Debug, Clone)]
pub struct CreateComponent {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub component_type: String,
    pub selector: String,
    pub template_code: String,
    pub style_code: String,
    pub test_code: String,
    pub dependencies: Vec<String>,
    pub version: String,
    pub created_by: String,
    pub workflow_id: Option<DbId>,
}

/// Query parameters for listing components.
#[derive(Debug, Deserialize)]
pub struct ComponentListParams {
    pub category: Option<String>,
    pub active: Option<bool>,
}

/// Query parameters for `GET /components/search`.
#[derive(Debug, Deserialize)]
pub struct ComponentSearchParams {
    #[serde(default)]
    pub query: String,
}

/// Number of active components in one category.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ComponentCategoryCount {
    pub category: String,
    pub count: i64,
}

/// Aggregate component counts.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentStatistics {
    pub total: i64,
    pub active: i64,
    pub by_category: BTreeMap<String, i64>,
}

/// The generated sources of a component.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentCode {
    pub component_id: DbId,
    pub name: String,
    pub selector: String,
    pub template_code: String,
    pub style_code: String,
    pub test_code: String,
}

impl From<Component> for ComponentCode {
    fn from(c: Component) -> Self {
        Self {
            component_id: c.id,
            name: c.name,
            selector: c.selector,
            template_code: c.template_code,
            style_code: c.style_code,
            test_code: c.test_code,
        }
    }
}
