use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rule severity. Intentionally small: it maps cleanly to annotation surfaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum RuleLevel {
    Error,
    Warning,
    Info,
}

impl RuleLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleLevel::Error => "Error",
            RuleLevel::Warning => "Warning",
            RuleLevel::Info => "Info",
        }
    }

    /// Parse the wire spelling back into a level. Returns `None` for anything
    /// outside the known set; callers decide how loudly to fail.
    pub fn parse(s: &str) -> Option<RuleLevel> {
        match s {
            "Error" => Some(RuleLevel::Error),
            "Warning" => Some(RuleLevel::Warning),
            "Info" => Some(RuleLevel::Info),
            _ => None,
        }
    }
}

impl fmt::Display for RuleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal compliance value of one (rule, node) evaluation.
///
/// The wire spellings are load-bearing: report consumers grep for them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Compliance {
    Compliant,
    #[serde(rename = "Non-Compliant")]
    NonCompliant,
    Suppressed,
    /// A rule predicate failed; the finding could not be classified.
    #[serde(rename = "UNKNOWN")]
    Unknown,
    /// The rule does not apply to this resource. Only surfaced by sinks that
    /// opt into verbose reporting.
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl Compliance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Compliance::Compliant => "Compliant",
            Compliance::NonCompliant => "Non-Compliant",
            Compliance::Suppressed => "Suppressed",
            Compliance::Unknown => "UNKNOWN",
            Compliance::NotApplicable => "N/A",
        }
    }
}

impl fmt::Display for Compliance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of compliance output, emitted per rule × node evaluation.
///
/// Records are immutable once constructed; the engine fans each record out to
/// every registered sink by reference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceRecord {
    pub pack_name: String,
    /// `{pack}-{suffix}`, the stable id findings and suppressions refer to.
    pub rule_id: String,
    /// The rule predicate's own name, preserved when a suffix override is set.
    pub rule_original_name: String,
    /// Tree path of the evaluated resource node.
    pub resource_id: String,
    pub compliance: Compliance,
    /// `"N/A"`, the matched suppression's reason, or (for UNKNOWN records)
    /// the message of the failed evaluation.
    pub exception_reason: String,
    /// Serialized [`RuleLevel`]; sinks that interpret it must reject unknown
    /// spellings loudly.
    pub rule_level: String,
    pub rule_info: String,
    pub rule_explanation: String,
    /// Sub-identifier of one violation when a rule reports several for one
    /// node; empty when the rule reports none.
    pub finding_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compliance_wire_spellings() {
        assert_eq!(
            serde_json::to_string(&Compliance::NonCompliant).unwrap(),
            "\"Non-Compliant\""
        );
        assert_eq!(
            serde_json::to_string(&Compliance::Unknown).unwrap(),
            "\"UNKNOWN\""
        );
        assert_eq!(
            serde_json::to_string(&Compliance::Compliant).unwrap(),
            "\"Compliant\""
        );
    }

    #[test]
    fn level_parse_round_trips() {
        for level in [RuleLevel::Error, RuleLevel::Warning, RuleLevel::Info] {
            assert_eq!(RuleLevel::parse(level.as_str()), Some(level));
        }
        assert_eq!(RuleLevel::parse("Fatal"), None);
        assert_eq!(RuleLevel::parse("error"), None);
    }

    #[test]
    fn record_serializes_camel_case() {
        let record = ComplianceRecord {
            pack_name: "Pack".to_string(),
            rule_id: "Pack-Rule1".to_string(),
            rule_original_name: "Rule1".to_string(),
            resource_id: "Stack1/rResource".to_string(),
            compliance: Compliance::Compliant,
            exception_reason: "N/A".to_string(),
            rule_level: "Warning".to_string(),
            rule_info: "foo.".to_string(),
            rule_explanation: "bar.".to_string(),
            finding_id: String::new(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["packName"], "Pack");
        assert_eq!(value["ruleOriginalName"], "Rule1");
        assert_eq!(value["exceptionReason"], "N/A");
        assert_eq!(value["findingId"], "");
    }
}
