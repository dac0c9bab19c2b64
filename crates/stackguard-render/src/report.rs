use stackguard_tree::Stack;
use stackguard_types::ComplianceRecord;

/// Derive a file-system-safe report name from a unit's tree path.
///
/// Unresolved deferred tokens (`${...}` spans) are stripped entirely, so a
/// nested unit never inherits placeholder noise from its parent; every other
/// character outside `[A-Za-z0-9._-]`, including the path separators,
/// becomes `-`.
pub fn sanitize_unit_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut rest = name;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find('}') {
            Some(end) => rest = &rest[start + 2 + end + 1..],
            // An unterminated token swallows the remainder.
            None => rest = "",
        }
    }
    out.push_str(rest);

    let mut sanitized: String = out
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();
    while sanitized.ends_with('-') {
        sanitized.pop();
    }
    sanitized
}

/// One per-unit, per-pack report: an ordered record list under a sanitized
/// name. The file sinks share this accumulation model and differ only in how
/// they serialize it.
pub(crate) struct Report {
    pub name: String,
    pub records: Vec<ComplianceRecord>,
}

/// Report accumulation shared by the CSV and JSON sinks.
///
/// `begin_unit` opens one report per registered pack for the unit, so a unit
/// with zero findings still flushes a file per pack. Records are routed to
/// `{pack}-{sanitized unit path}` using the record's own pack name; keying
/// on the full path keeps same-named units under different parents apart.
pub(crate) struct ReportSet {
    pack_names: Vec<String>,
    reports: Vec<Report>,
    current_unit: Option<String>,
}

impl ReportSet {
    pub fn new(pack_names: Vec<String>) -> Self {
        Self {
            pack_names,
            reports: Vec::new(),
            current_unit: None,
        }
    }

    pub fn begin_unit(&mut self, unit: &Stack) {
        let unit_name = sanitize_unit_name(unit.path());
        let names: Vec<String> = self
            .pack_names
            .iter()
            .map(|pack| format!("{pack}-{unit_name}"))
            .collect();
        for name in &names {
            self.ensure(name);
        }
        self.current_unit = Some(unit_name);
    }

    pub fn append(&mut self, record: &ComplianceRecord) -> anyhow::Result<()> {
        let unit = self
            .current_unit
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("record received before any unit was opened"))?;
        let name = format!("{}-{}", record.pack_name, unit);
        let idx = self.ensure(&name);
        self.reports[idx].records.push(record.clone());
        Ok(())
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    fn ensure(&mut self, name: &str) -> usize {
        match self.reports.iter().position(|r| r.name == name) {
            Some(idx) => idx,
            None => {
                self.reports.push(Report {
                    name: name.to_string(),
                    records: Vec::new(),
                });
                self.reports.len() - 1
            }
        }
    }
}
