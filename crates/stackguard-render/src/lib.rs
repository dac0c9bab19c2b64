//! Reporting sinks: human-readable node annotations plus per-unit CSV and
//! JSON report files.
//!
//! File sinks accumulate records in memory during the traversal and write
//! once per report when flushed, so a unit with zero findings still produces
//! a (header-only or empty-lines) file.

#![forbid(unsafe_code)]

mod annotation;
mod csv;
mod json;
mod report;

pub use annotation::{AnnotationSink, UnrecognizedLevelError};
pub use csv::{CSV_HEADER, CsvSink};
pub use json::{JsonReportFile, JsonSink};
pub use report::sanitize_unit_name;
