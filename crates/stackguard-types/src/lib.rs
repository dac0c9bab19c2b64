//! Stable DTOs and IDs used across the stackguard workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted compliance records
//! - rule level and compliance enums with their wire spellings
//! - stable string IDs and metadata keys

#![forbid(unsafe_code)]

pub mod ids;
pub mod record;

pub use record::{Compliance, ComplianceRecord, RuleLevel};
