//! Stable identifiers shared between the engine, the suppression resolver,
//! and the reporting sinks.
//!
//! Rule ids are `{pack}-{suffix}`. Metadata keys are dotted namespaces on the
//! construct tree.

/// Reserved rule identifier used when a rule predicate fails instead of
/// returning a verdict. Operators suppress spurious evaluation failures under
/// this id, separately from the rule's real findings.
pub const VALIDATION_FAILURE_ID: &str = "ValidationFailure";

/// Exception reason recorded when no suppression applies.
pub const NO_EXCEPTION_REASON: &str = "N/A";

/// Metadata key holding the suppressions attached to a node or stack.
pub const SUPPRESSIONS_KEY: &str = "stackguard.suppressions";

/// Metadata keys for human-readable annotations attached by the annotation sink.
pub const ANNOTATION_ERROR_KEY: &str = "stackguard.error";
pub const ANNOTATION_WARNING_KEY: &str = "stackguard.warning";
pub const ANNOTATION_INFO_KEY: &str = "stackguard.info";
