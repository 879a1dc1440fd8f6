//! Request handlers.
//!
//! Each submodule provides the async handler functions for one resource.
//! Handlers delegate to the repositories in `autoflow_db` (or, for lifecycle
//! actions, to the workflow engine) and map errors via [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod component;
pub mod workflow;
