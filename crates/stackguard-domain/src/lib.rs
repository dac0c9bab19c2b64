//! Pure compliance evaluation (no IO).
//!
//! Input: a construct tree and registered rule packs.
//! Output: compliance records fanned out to sinks, plus a run summary.

#![forbid(unsafe_code)]

pub mod rule;
pub mod sink;
pub mod summary;

mod engine;

pub use engine::{Engine, EvaluationFailed};
pub use rule::{RegisteredRule, RuleFn, RulePack, RuleResult};
pub use sink::Sink;
pub use summary::RunSummary;
