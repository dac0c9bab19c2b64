use thiserror::Error;

/// A malformed suppression. Always surfaced synchronously to the caller of
/// the attachment API or, on read-back, to the evaluation run; never
/// silently dropped.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SuppressionFormatError {
    #[error(
        "suppression rule id '{rule_id}' embeds a finding id; use applies_to for finding-level suppression"
    )]
    FindingInRuleId { rule_id: String },

    #[error("suppression for rule '{rule_id}' needs a reason of at least {minimum} characters")]
    ShortReason { rule_id: String, minimum: usize },

    #[error("suppression for rule '{rule_id}' has an invalid regex '{raw}': {detail}")]
    InvalidRegex {
        rule_id: String,
        raw: String,
        detail: String,
    },

    #[error("stored suppressions are not in the expected shape: {detail}")]
    MalformedEntry { detail: String },
}

/// A by-path attachment matched no node.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("no resource found at path '{path}'")]
pub struct PathNotFoundError {
    pub path: String,
}

/// Union error for attachment operations that can fail either way.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SuppressionError {
    #[error(transparent)]
    Format(#[from] SuppressionFormatError),
    #[error(transparent)]
    PathNotFound(#[from] PathNotFoundError),
}
