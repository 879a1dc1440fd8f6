//! Domain core for the autoflow workflow service.
//!
//! Pure, I/O-free building blocks shared by the database and API layers:
//! status enums and the transition table, workflow validation rules,
//! template-based code generation, and execution result types.

pub mod codegen;
pub mod error;
pub mod execution;
pub mod search;
pub mod status;
pub mod types;
pub mod validation;
pub mod workflow;
