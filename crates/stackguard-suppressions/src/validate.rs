use crate::errors::SuppressionFormatError;
use crate::model::{AppliesTo, Suppression};
use regex::{Regex, RegexBuilder};

/// Minimum justification length. Shorter reasons are rejected as
/// non-auditable.
pub(crate) const MIN_REASON_LEN: usize = 10;

/// Validate a suppression set before it reaches storage, and again whenever
/// it is read back.
///
/// Fails when a rule id embeds a bracketed finding fragment (finding-level
/// suppression must use `applies_to`), when a reason is shorter than
/// [`MIN_REASON_LEN`], or when a regex entry is malformed.
pub fn validate(suppressions: &[Suppression]) -> Result<(), SuppressionFormatError> {
    for s in suppressions {
        if s.rule_id.contains('[') || s.rule_id.contains(']') {
            return Err(SuppressionFormatError::FindingInRuleId {
                rule_id: s.rule_id.clone(),
            });
        }
        if s.reason.chars().count() < MIN_REASON_LEN {
            return Err(SuppressionFormatError::ShortReason {
                rule_id: s.rule_id.clone(),
                minimum: MIN_REASON_LEN,
            });
        }
        if let Some(entries) = &s.applies_to {
            for entry in entries {
                if let AppliesTo::Regex { regex } = entry {
                    compile_pattern(&s.rule_id, regex)?;
                }
            }
        }
    }
    Ok(())
}

/// Parse a `/pattern/flags` string and compile it.
///
/// The parse-then-compile split is deliberate: it runs eagerly at validation
/// time so a bad pattern fails at the attachment call, not at match time.
/// Supported flags are `i`, `m`, `s` (mapped onto the regex builder) plus
/// `g`, `u`, and `y`, which affect repeated-match semantics the matcher does
/// not use and are accepted as no-ops.
pub(crate) fn compile_pattern(rule_id: &str, raw: &str) -> Result<Regex, SuppressionFormatError> {
    let invalid = |detail: &str| SuppressionFormatError::InvalidRegex {
        rule_id: rule_id.to_string(),
        raw: raw.to_string(),
        detail: detail.to_string(),
    };

    let rest = raw
        .strip_prefix('/')
        .ok_or_else(|| invalid("expected '/pattern/flags'"))?;
    let closing = rest
        .rfind('/')
        .ok_or_else(|| invalid("expected '/pattern/flags'"))?;
    let (pattern, flags) = rest.split_at(closing);
    let flags = &flags[1..];
    if pattern.is_empty() {
        return Err(invalid("empty pattern"));
    }

    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'g' | 'u' | 'y' => {}
            other => return Err(invalid(&format!("unsupported flag '{other}'"))),
        }
    }

    builder
        .build()
        .map_err(|e| invalid(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sup(rule_id: &str, reason: &str) -> Suppression {
        Suppression::new(rule_id, reason)
    }

    #[test]
    fn accepts_a_plain_valid_set() {
        let sups = vec![
            sup("Pack-Rule1", "lorem ipsum"),
            sup("Pack-Rule2", "valid reason here").applies_to(vec![
                AppliesTo::Literal("Tag::team".to_string()),
                AppliesTo::Regex {
                    regex: "/^Tag::/gi".to_string(),
                },
            ]),
        ];
        validate(&sups).expect("valid set");
    }

    #[test]
    fn rejects_finding_id_embedded_in_rule_id() {
        let err = validate(&[sup("Pack-Rule1[Tag::team]", "valid reason here")])
            .expect_err("bracketed id");
        assert!(matches!(
            err,
            SuppressionFormatError::FindingInRuleId { .. }
        ));
    }

    #[test]
    fn rejects_short_reason() {
        let err = validate(&[sup("Pack-Rule1", "too short")]).expect_err("nine chars");
        assert!(matches!(err, SuppressionFormatError::ShortReason { .. }));
        // Exactly ten characters is accepted.
        validate(&[sup("Pack-Rule1", "ten chars!")]).expect("boundary");
    }

    #[test]
    fn reason_length_counts_characters_not_bytes() {
        // Ten characters, more than ten bytes.
        validate(&[sup("Pack-Rule1", "порушення!")]).expect("multi-byte reason");
    }

    #[test]
    fn rejects_regex_without_slashes() {
        let s = sup("Pack-Rule1", "valid reason here").applies_to(vec![AppliesTo::Regex {
            regex: "^Tag::".to_string(),
        }]);
        let err = validate(&[s]).expect_err("bare pattern");
        assert!(matches!(err, SuppressionFormatError::InvalidRegex { .. }));
    }

    #[test]
    fn rejects_regex_that_does_not_compile() {
        let s = sup("Pack-Rule1", "valid reason here").applies_to(vec![AppliesTo::Regex {
            regex: "/((/g".to_string(),
        }]);
        let err = validate(&[s]).expect_err("unbalanced group");
        assert!(matches!(err, SuppressionFormatError::InvalidRegex { .. }));
    }

    #[test]
    fn rejects_unknown_flag() {
        let s = sup("Pack-Rule1", "valid reason here").applies_to(vec![AppliesTo::Regex {
            regex: "/abc/q".to_string(),
        }]);
        let err = validate(&[s]).expect_err("flag q");
        assert!(matches!(err, SuppressionFormatError::InvalidRegex { .. }));
    }

    #[test]
    fn pattern_may_contain_escaped_slashes() {
        let re = compile_pattern("Pack-Rule1", "/a\\/b/g").expect("escaped slash");
        assert!(re.is_match("a/b"));
    }
}
