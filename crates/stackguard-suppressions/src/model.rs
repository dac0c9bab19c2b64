use crate::validate::compile_pattern;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One operator-authored exception: silence `rule_id` on the target, with an
/// auditable justification.
///
/// Without `applies_to`, the suppression is blanket for its rule. With
/// `applies_to`, only findings matching a literal or regex entry are
/// silenced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Suppression {
    pub rule_id: String,

    /// Justification, at least ten characters. Recorded verbatim in every
    /// suppressed compliance record.
    pub reason: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applies_to: Option<Vec<AppliesTo>>,
}

/// One `applies_to` entry: a literal finding id, or a `/pattern/flags` regex.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AppliesTo {
    Literal(String),
    Regex { regex: String },
}

impl Suppression {
    pub fn new<R: Into<String>, S: Into<String>>(rule_id: R, reason: S) -> Self {
        Self {
            rule_id: rule_id.into(),
            reason: reason.into(),
            applies_to: None,
        }
    }

    pub fn applies_to(mut self, entries: Vec<AppliesTo>) -> Self {
        self.applies_to = Some(entries);
        self
    }

    /// Whether this suppression silences `finding_id` of `rule_id`.
    ///
    /// A granular suppression never blanket-matches: with `applies_to`
    /// present, an empty finding id is never silenced.
    pub fn matches(&self, rule_id: &str, finding_id: &str) -> bool {
        if self.rule_id != rule_id {
            return false;
        }
        let Some(entries) = &self.applies_to else {
            return true;
        };
        if finding_id.is_empty() {
            return false;
        }
        entries.iter().any(|entry| match entry {
            AppliesTo::Literal(literal) => literal == finding_id,
            AppliesTo::Regex { regex } => compile_pattern(&self.rule_id, regex)
                .map(|re| re.is_match(finding_id))
                .unwrap_or(false),
        })
    }

    /// Canonical serialized form, used for deduplication on attachment.
    pub(crate) fn canonical(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn granular(entries: Vec<AppliesTo>) -> Suppression {
        Suppression::new("Pack-Rule1", "valid reason here").applies_to(entries)
    }

    #[test]
    fn blanket_matches_every_finding_of_its_rule() {
        let s = Suppression::new("Pack-Rule1", "valid reason here");
        assert!(s.matches("Pack-Rule1", ""));
        assert!(s.matches("Pack-Rule1", "Tag::team"));
        assert!(!s.matches("Pack-Rule2", ""));
    }

    #[test]
    fn literal_entry_matches_exactly() {
        let s = granular(vec![AppliesTo::Literal("Tag::team".to_string())]);
        assert!(s.matches("Pack-Rule1", "Tag::team"));
        assert!(!s.matches("Pack-Rule1", "Tag::owner"));
        assert!(!s.matches("Pack-Rule1", "Tag::team2"));
    }

    #[test]
    fn regex_entry_matches_compiled_pattern() {
        let s = granular(vec![AppliesTo::Regex {
            regex: "/^Tag::/g".to_string(),
        }]);
        assert!(s.matches("Pack-Rule1", "Tag::team"));
        assert!(!s.matches("Pack-Rule1", "Policy::Tag"));
    }

    #[test]
    fn regex_flags_apply() {
        let s = granular(vec![AppliesTo::Regex {
            regex: "/^tag::/i".to_string(),
        }]);
        assert!(s.matches("Pack-Rule1", "Tag::team"));
    }

    #[test]
    fn granular_never_matches_the_empty_finding() {
        let s = granular(vec![
            AppliesTo::Literal(String::new()),
            AppliesTo::Regex {
                regex: "/.*/g".to_string(),
            },
        ]);
        assert!(!s.matches("Pack-Rule1", ""));
    }

    #[test]
    fn applies_to_serde_shapes() {
        let s: Suppression = serde_json::from_value(serde_json::json!({
            "rule_id": "Pack-Rule1",
            "reason": "valid reason here",
            "applies_to": ["Tag::team", {"regex": "/^Tag::/g"}],
        }))
        .expect("deserialize");
        let entries = s.applies_to.as_ref().expect("entries");
        assert_eq!(entries[0], AppliesTo::Literal("Tag::team".to_string()));
        assert_eq!(
            entries[1],
            AppliesTo::Regex {
                regex: "/^Tag::/g".to_string()
            }
        );
    }

    proptest! {
        #[test]
        fn never_matches_other_rule_ids(finding in "[ -~]{0,32}") {
            let blanket = Suppression::new("Pack-Rule1", "valid reason here");
            prop_assert!(!blanket.matches("Pack-Other", &finding));

            let s = granular(vec![AppliesTo::Regex { regex: "/.*/g".to_string() }]);
            prop_assert!(!s.matches("Pack-Other", &finding));
        }

        #[test]
        fn regex_only_granular_never_matches_empty(pattern in "[a-zA-Z0-9.*+^$]{0,16}") {
            let s = granular(vec![AppliesTo::Regex { regex: format!("/{pattern}/g") }]);
            prop_assert!(!s.matches("Pack-Rule1", ""));
        }
    }
}
