//! Workflow execution engine.
//!
//! Contains the step executor that runs a workflow's steps in order, the
//! Postgres-backed component generator used by CODE_GENERATION steps, and
//! the workflow engine that guards every status transition.

pub mod executor;
pub mod generator;
pub mod workflow_engine;

pub use workflow_engine::WorkflowEngine;
