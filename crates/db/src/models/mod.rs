//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` request DTOs for inserts and patches
//! - Small reporting structs assembled by the API layer

pub mod component;
pub mod workflow;
pub mod workflow_step;
