//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Helpers that must run inside
//! a caller's transaction take `&mut PgConnection` instead.

pub mod component_repo;
pub mod workflow_repo;
pub mod workflow_step_repo;

pub use component_repo::ComponentRepo;
pub use workflow_repo::WorkflowRepo;
pub use workflow_step_repo::WorkflowStepRepo;
