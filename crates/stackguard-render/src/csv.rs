use anyhow::Context;
use camino::Utf8PathBuf;
use stackguard_domain::Sink;
use stackguard_tree::{ResourceNode, Stack};
use stackguard_types::ComplianceRecord;

use crate::report::{Report, ReportSet};

/// Fixed header of every CSV report.
pub const CSV_HEADER: &str = "Rule ID,Resource ID,Compliance,Exception Reason,Rule Level,Rule Info";

/// Writes one `{pack}-{unit}.csv` per template unit under the output
/// directory, flushed once after the full tree has been visited.
pub struct CsvSink {
    out_dir: Utf8PathBuf,
    reports: ReportSet,
    verbose: bool,
}

impl CsvSink {
    pub fn new<P: Into<Utf8PathBuf>>(out_dir: P, pack_names: Vec<String>, verbose: bool) -> Self {
        Self {
            out_dir: out_dir.into(),
            reports: ReportSet::new(pack_names),
            verbose,
        }
    }
}

/// RFC4180 quoting: every field is wrapped in double quotes with internal
/// quotes doubled, so commas, quotes, and multi-byte text pass through
/// unharmed.
fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn csv_line(record: &ComplianceRecord) -> String {
    [
        record.rule_id.as_str(),
        record.resource_id.as_str(),
        record.compliance.as_str(),
        record.exception_reason.as_str(),
        record.rule_level.as_str(),
        record.rule_info.as_str(),
    ]
    .map(csv_field)
    .join(",")
}

fn render(report: &Report) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for record in &report.records {
        out.push_str(&csv_line(record));
        out.push('\n');
    }
    out
}

impl Sink for CsvSink {
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
            let path = self.out_dir.join(format!("{}.csv", report.name));
            std::fs::write(&path, render(report))
                .with_context(|| format!("write CSV report {path}"))?;
        }
        Ok(())
    }
}
