use serde_json::json;
use stackguard_domain::Sink;
use stackguard_tree::ResourceNode;
use stackguard_types::{ComplianceRecord, RuleLevel, ids};
use thiserror::Error;

/// A record arrived carrying a rule level outside the known set. This is a
/// programming error in the producing pack, not a data error, and propagates
/// synchronously.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unrecognized rule level '{level}' on rule '{rule_id}'")]
pub struct UnrecognizedLevelError {
    pub level: String,
    pub rule_id: String,
}

/// Attaches human-readable messages directly to the offending node's
/// metadata, tagged error/warning/info per the record's rule level. The
/// immediate per-resource surface during synthesis; report files are the
/// durable one.
#[derive(Clone, Debug, Default)]
pub struct AnnotationSink {
    log_ignores: bool,
}

impl AnnotationSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also surface suppressed findings as info annotations, so silencing
    /// stays auditable without opening report files.
    pub fn log_ignores(mut self, log_ignores: bool) -> Self {
        self.log_ignores = log_ignores;
        self
    }
}

fn annotation_key(level: RuleLevel) -> &'static str {
    match level {
        RuleLevel::Error => ids::ANNOTATION_ERROR_KEY,
        RuleLevel::Warning => ids::ANNOTATION_WARNING_KEY,
        RuleLevel::Info => ids::ANNOTATION_INFO_KEY,
    }
}

fn parse_level(record: &ComplianceRecord) -> Result<RuleLevel, UnrecognizedLevelError> {
    RuleLevel::parse(&record.rule_level).ok_or_else(|| UnrecognizedLevelError {
        level: record.rule_level.clone(),
        rule_id: record.rule_id.clone(),
    })
}

fn finding_message(record: &ComplianceRecord) -> String {
    let mut message = record.rule_id.clone();
    if !record.finding_id.is_empty() {
        message.push_str(&format!("[{}]", record.finding_id));
    }
    message.push_str(": ");
    message.push_str(&record.rule_info);
    if !record.rule_explanation.is_empty() {
        message.push(' ');
        message.push_str(&record.rule_explanation);
    }
    message
}

fn annotate(node: &mut ResourceNode, key: &str, message: String) {
    node.metadata.push(key, json!(message));
}

impl Sink for AnnotationSink {
    fn on_compliance(
        &mut self,
        _record: &ComplianceRecord,
        _node: &mut ResourceNode,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_non_compliance(
        &mut self,
        record: &ComplianceRecord,
        node: &mut ResourceNode,
    ) -> anyhow::Result<()> {
        let level = parse_level(record)?;
        annotate(node, annotation_key(level), finding_message(record));
        Ok(())
    }

    fn on_suppressed(
        &mut self,
        record: &ComplianceRecord,
        node: &mut ResourceNode,
    ) -> anyhow::Result<()> {
        if self.log_ignores {
            let message = format!(
                "{} was suppressed: {}",
                record.rule_id, record.exception_reason
            );
            annotate(node, ids::ANNOTATION_INFO_KEY, message);
        }
        Ok(())
    }

    fn on_error(
        &mut self,
        record: &ComplianceRecord,
        node: &mut ResourceNode,
    ) -> anyhow::Result<()> {
        let message = format!(
            "{} failed to evaluate: {}",
            record.rule_id, record.exception_reason
        );
        annotate(node, ids::ANNOTATION_ERROR_KEY, message);
        Ok(())
    }

    fn on_suppressed_error(
        &mut self,
        record: &ComplianceRecord,
        node: &mut ResourceNode,
    ) -> anyhow::Result<()> {
        self.on_suppressed(record, node)
    }

    fn on_not_applicable(
        &mut self,
        _record: &ComplianceRecord,
        _node: &mut ResourceNode,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackguard_types::Compliance;

    fn record(level: &str) -> ComplianceRecord {
        ComplianceRecord {
            pack_name: "Pack".to_string(),
            rule_id: "Pack-Rule1".to_string(),
            rule_original_name: "Rule1".to_string(),
            resource_id: "Stack1/rResource".to_string(),
            compliance: Compliance::NonCompliant,
            exception_reason: "N/A".to_string(),
            rule_level: level.to_string(),
            rule_info: "Buckets must be encrypted.".to_string(),
            rule_explanation: "Unencrypted buckets leak data.".to_string(),
            finding_id: String::new(),
        }
    }

    #[test]
    fn violations_annotate_at_the_declared_level() {
        let mut sink = AnnotationSink::new();
        let mut node = ResourceNode::new("rResource", "AWS::S3::Bucket");
        sink.on_non_compliance(&record("Warning"), &mut node)
            .expect("annotate");

        let messages = node.metadata.all(ids::ANNOTATION_WARNING_KEY);
        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0],
            &json!("Pack-Rule1: Buckets must be encrypted. Unencrypted buckets leak data.")
        );
    }

    #[test]
    fn finding_ids_appear_in_brackets() {
        let mut sink = AnnotationSink::new();
        let mut node = ResourceNode::new("rResource", "AWS::S3::Bucket");
        let mut r = record("Error");
        r.finding_id = "Tag::team".to_string();
        sink.on_non_compliance(&r, &mut node).expect("annotate");

        let messages = node.metadata.all(ids::ANNOTATION_ERROR_KEY);
        assert!(
            messages[0]
                .as_str()
                .expect("string annotation")
                .starts_with("Pack-Rule1[Tag::team]:")
        );
    }

    #[test]
    fn unknown_level_fails_loudly() {
        let mut sink = AnnotationSink::new();
        let mut node = ResourceNode::new("rResource", "AWS::S3::Bucket");
        let err = sink
            .on_non_compliance(&record("Fatal"), &mut node)
            .expect_err("unknown level");
        let err = err
            .downcast::<UnrecognizedLevelError>()
            .expect("typed error");
        assert_eq!(err.level, "Fatal");
        assert!(node.metadata.is_empty());
    }

    #[test]
    fn evaluation_failures_annotate_as_errors() {
        let mut sink = AnnotationSink::new();
        let mut node = ResourceNode::new("rResource", "AWS::S3::Bucket");
        let mut r = record("Error");
        r.compliance = Compliance::Unknown;
        r.exception_reason = "missing property".to_string();
        sink.on_error(&r, &mut node).expect("annotate");

        let messages = node.metadata.all(ids::ANNOTATION_ERROR_KEY);
        assert_eq!(
            messages[0],
            &json!("Pack-Rule1 failed to evaluate: missing property")
        );
    }

    #[test]
    fn suppressions_are_silent_unless_log_ignores() {
        let mut node = ResourceNode::new("rResource", "AWS::S3::Bucket");
        let mut r = record("Warning");
        r.compliance = Compliance::Suppressed;
        r.exception_reason = "accepted risk until Q3".to_string();

        AnnotationSink::new()
            .on_suppressed(&r, &mut node)
            .expect("silent");
        assert!(node.metadata.is_empty());

        AnnotationSink::new()
            .log_ignores(true)
            .on_suppressed(&r, &mut node)
            .expect("logged");
        let messages = node.metadata.all(ids::ANNOTATION_INFO_KEY);
        assert_eq!(
            messages[0],
            &json!("Pack-Rule1 was suppressed: accepted risk until Q3")
        );
    }
}
