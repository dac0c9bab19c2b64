//! Use case orchestration for stackguard.
//!
//! This crate provides the application layer: it wires rule packs and
//! reporting sinks into an engine run. It is intentionally thin and delegates
//! evaluation to the domain layer and output to the render layer.

#![forbid(unsafe_code)]

mod validate;

pub use validate::{ReportFormat, ValidateOptions, run_validation};
