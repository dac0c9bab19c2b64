use anyhow::Context;
use camino::Utf8PathBuf;
use schemars::JsonSchema;
use serde::Serialize;
use stackguard_domain::Sink;
use stackguard_tree::{ResourceNode, Stack};
use stackguard_types::ComplianceRecord;

use crate::report::ReportSet;

/// On-disk shape of a JSON report: `{ "lines": [...] }` with camelCase
/// record keys.
#[derive(Debug, Serialize, JsonSchema)]
pub struct JsonReportFile<'a> {
    pub lines: &'a [ComplianceRecord],
}

/// Writes one `{pack}-{unit}.json` per template unit under the output
/// directory, flushed once after the full tree has been visited.
pub struct JsonSink {
    out_dir: Utf8PathBuf,
    reports: ReportSet,
    verbose: bool,
}

impl JsonSink {
    pub fn new<P: Into<Utf8PathBuf>>(out_dir: P, pack_names: Vec<String>, verbose: bool) -> Self {
        Self {
            out_dir: out_dir.into(),
            reports: ReportSet::new(pack_names),
            verbose,
        }
    }
}

impl Sink for JsonSink {
    fn begin_unit(&mut self, unit: &Stack) -> anyhow::Result<()> {
        self.reports.begin_unit(unit);
        Ok(())
    }

    fn on_compliance(
        &mut self,
        record: &ComplianceRecord,
        _node: &mut ResourceNode,
    ) -> anyhow::Result<()> {
        self.reports.append(record)
    }

    fn on_non_compliance(
        &mut self,
        record: &ComplianceRecord,
        _node: &mut ResourceNode,
    ) -> anyhow::Result<()> {
        self.reports.append(record)
    }

    fn on_suppressed(
        &mut self,
        record: &ComplianceRecord,
        _node: &mut ResourceNode,
    ) -> anyhow::Result<()> {
        self.reports.append(record)
    }

    fn on_error(
        &mut self,
        record: &ComplianceRecord,
        _node: &mut ResourceNode,
    ) -> anyhow::Result<()> {
        self.reports.append(record)
    }

    fn on_suppressed_error(
        &mut self,
        record: &ComplianceRecord,
        _node: &mut ResourceNode,
    ) -> anyhow::Result<()> {
        self.reports.append(record)
    }

    fn on_not_applicable(
        &mut self,
        record: &ComplianceRecord,
        _node: &mut ResourceNode,
    ) -> anyhow::Result<()> {
        if self.verbose {
            self.reports.append(record)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("create report directory {}", self.out_dir))?;
        for report in self.reports.reports() {
            let path = self.out_dir.join(format!("{}.json", report.name));
            let file = JsonReportFile {
                lines: &report.records,
            };
            let mut body = serde_json::to_string_pretty(&file)
                .with_context(|| format!("serialize JSON report {}", report.name))?;
            body.push('\n');
            std::fs::write(&path, body).with_context(|| format!("write JSON report {path}"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackguard_types::Compliance;

    fn record() -> ComplianceRecord {
        ComplianceRecord {
            pack_name: "Pack".to_string(),
            rule_id: "Pack-Rule1".to_string(),
            rule_original_name: "Rule1".to_string(),
            resource_id: "Stack1/rResource".to_string(),
            compliance: Compliance::Suppressed,
            exception_reason: "quoted \"lorem\" ipsum".to_string(),
            rule_level: "Warning".to_string(),
            rule_info: "foo.".to_string(),
            rule_explanation: "bar.".to_string(),
            finding_id: String::new(),
        }
    }

    #[test]
    fn file_shape_is_a_lines_object_with_camel_case_keys() {
        let records = vec![record()];
        let body = serde_json::to_string(&JsonReportFile { lines: &records }).expect("serialize");
        let value: serde_json::Value = serde_json::from_str(&body).expect("parse");

        let line = &value["lines"][0];
        assert_eq!(line["ruleId"], "Pack-Rule1");
        assert_eq!(line["compliance"], "Suppressed");
        // Embedded quotes are preserved verbatim, not escaped as CSV would.
        assert_eq!(line["exceptionReason"], "quoted \"lorem\" ipsum");
    }

    #[test]
    fn zero_record_unit_still_writes_an_empty_lines_file() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let out_dir = camino::Utf8Path::from_path(tmp.path()).expect("utf8 path");

        let mut sink = JsonSink::new(out_dir, vec!["Pack".to_string()], false);
        sink.begin_unit(&Stack::new("Stack1")).expect("begin");
        sink.finish().expect("flush");

        let written =
            std::fs::read_to_string(out_dir.join("Pack-Stack1.json")).expect("read report");
        let value: serde_json::Value = serde_json::from_str(&written).expect("parse");
        assert_eq!(value["lines"], serde_json::json!([]));
    }

    #[test]
    fn multibyte_reasons_round_trip_verbatim() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let out_dir = camino::Utf8Path::from_path(tmp.path()).expect("utf8 path");

        let mut r = record();
        r.exception_reason = "riesgo aceptado según auditoría".to_string();
        let mut sink = JsonSink::new(out_dir, vec!["Pack".to_string()], false);
        let mut node = ResourceNode::new("rResource", "AWS::S3::Bucket");
        sink.begin_unit(&Stack::new("Stack1")).expect("begin");
        sink.on_suppressed(&r, &mut node).expect("append");
        sink.finish().expect("flush");

        let written =
            std::fs::read_to_string(out_dir.join("Pack-Stack1.json")).expect("read report");
        let value: serde_json::Value = serde_json::from_str(&written).expect("parse");
        assert_eq!(
            value["lines"][0]["exceptionReason"],
            "riesgo aceptado según auditoría"
        );
    }
}
