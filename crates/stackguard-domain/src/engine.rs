use crate::rule::{RegisteredRule, RulePack, RuleResult};
use crate::sink::Sink;
use crate::summary::RunSummary;
use anyhow::Context;
use stackguard_suppressions::collect;
use stackguard_tree::{Metadata, ResourceNode, Stack};
use stackguard_types::{Compliance, ComplianceRecord, RuleLevel, ids};
use thiserror::Error;

/// Terminal failure raised when a pack with `fail_on_error` sees an
/// unsuppressed error-level finding. Raised after every sink has received
/// the record.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("rule '{rule_id}' reported an unsuppressed error-level finding on '{resource_id}'")]
pub struct EvaluationFailed {
    pub rule_id: String,
    pub resource_id: String,
}

/// The rule orchestrator: walks the construct tree, applies every registered
/// rule to every node, classifies outcomes, consults suppressions, and fans
/// records out to the registered sinks.
///
/// Evaluation is synchronous and non-overlapping: all emissions for one
/// (rule, node) pair complete before the next rule runs.
#[derive(Default)]
pub struct Engine {
    packs: Vec<RulePack>,
    sinks: Vec<Box<dyn Sink>>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pack(mut self, pack: RulePack) -> Self {
        self.packs.push(pack);
        self
    }

    pub fn with_sink(mut self, sink: Box<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Evaluate every pack against every node under `root`, then flush the
    /// sinks. Sinks are flushed even when the run halts on an error-level
    /// finding, so reports still reflect everything evaluated up to the
    /// halt.
    pub fn run(&mut self, root: &mut Stack) -> anyhow::Result<RunSummary> {
        let mut summary = RunSummary::default();
        let outcome = visit_stack(&self.packs, &mut self.sinks, root, &mut summary);
        for sink in &mut self.sinks {
            sink.finish()?;
        }
        outcome?;
        Ok(summary)
    }
}

fn visit_stack(
    packs: &[RulePack],
    sinks: &mut [Box<dyn Sink>],
    stack: &mut Stack,
    summary: &mut RunSummary,
) -> anyhow::Result<()> {
    for sink in sinks.iter_mut() {
        sink.begin_unit(stack)?;
    }
    {
        // Unit metadata is only written by attachment calls, which happen
        // before the run; reading it per node keeps lookups current.
        let unit_meta = &stack.metadata;
        for node in stack.resources.iter_mut() {
            visit_node(packs, sinks, node, unit_meta, summary)?;
        }
    }
    for nested in stack.nested_mut() {
        visit_stack(packs, sinks, nested, summary)?;
    }
    Ok(())
}

fn visit_node(
    packs: &[RulePack],
    sinks: &mut [Box<dyn Sink>],
    node: &mut ResourceNode,
    unit_meta: &Metadata,
    summary: &mut RunSummary,
) -> anyhow::Result<()> {
    for pack in packs {
        for rule in pack.rules() {
            apply_rule(pack, rule, sinks, node, unit_meta, summary)?;
        }
    }
    for child in node.children_mut() {
        visit_node(packs, sinks, child, unit_meta, summary)?;
    }
    Ok(())
}

/// One (rule, node) evaluation: four terminal states, each fully emitted
/// before returning.
fn apply_rule(
    pack: &RulePack,
    rule: &RegisteredRule,
    sinks: &mut [Box<dyn Sink>],
    node: &mut ResourceNode,
    unit_meta: &Metadata,
    summary: &mut RunSummary,
) -> anyhow::Result<()> {
    let rule_id = pack.rule_id(rule);

    match (rule.check)(&*node) {
        Ok(RuleResult::Compliant) => {
            summary.compliant += 1;
            let record = base_record(
                pack,
                rule,
                &rule_id,
                node.path(),
                Compliance::Compliant,
                String::new(),
                ids::NO_EXCEPTION_REASON.to_string(),
                rule.level,
            );
            dispatch(sinks, node, |sink, n| sink.on_compliance(&record, n))
        }
        Ok(RuleResult::NotApplicable) => {
            summary.not_applicable += 1;
            let record = base_record(
                pack,
                rule,
                &rule_id,
                node.path(),
                Compliance::NotApplicable,
                String::new(),
                ids::NO_EXCEPTION_REASON.to_string(),
                rule.level,
            );
            dispatch(sinks, node, |sink, n| sink.on_not_applicable(&record, n))
        }
        Ok(RuleResult::NonCompliant(finding_ids)) => {
            // One anonymous finding when the rule reports no explicit ids.
            let findings = if finding_ids.is_empty() {
                vec![String::new()]
            } else {
                finding_ids
            };
            let sups = collect(&*node, unit_meta)
                .with_context(|| format!("read suppressions for '{}'", node.path()))?;

            for finding_id in findings {
                match sups.iter().find(|s| s.matches(&rule_id, &finding_id)) {
                    Some(s) => {
                        summary.suppressed += 1;
                        let record = base_record(
                            pack,
                            rule,
                            &rule_id,
                            node.path(),
                            Compliance::Suppressed,
                            finding_id,
                            s.reason.clone(),
                            rule.level,
                        );
                        dispatch(sinks, node, |sink, n| sink.on_suppressed(&record, n))?;
                    }
                    None => {
                        summary.non_compliant += 1;
                        let record = base_record(
                            pack,
                            rule,
                            &rule_id,
                            node.path(),
                            Compliance::NonCompliant,
                            finding_id,
                            ids::NO_EXCEPTION_REASON.to_string(),
                            rule.level,
                        );
                        dispatch(sinks, node, |sink, n| sink.on_non_compliance(&record, n))?;
                        if rule.level == RuleLevel::Error && pack.fail_on_error {
                            return Err(EvaluationFailed {
                                rule_id,
                                resource_id: node.path().to_string(),
                            }
                            .into());
                        }
                    }
                }
            }
            Ok(())
        }
        Err(err) => {
            // The predicate failed; the finding cannot be classified. The
            // lookup runs against the reserved validation-failure id, with
            // the failing rule's id as the finding id, so operators can
            // suppress spurious failures per rule.
            let sups = collect(&*node, unit_meta)
                .with_context(|| format!("read suppressions for '{}'", node.path()))?;
            match sups
                .iter()
                .find(|s| s.matches(ids::VALIDATION_FAILURE_ID, &rule_id))
            {
                Some(s) => {
                    summary.suppressed_errors += 1;
                    let record = base_record(
                        pack,
                        rule,
                        &rule_id,
                        node.path(),
                        Compliance::Suppressed,
                        String::new(),
                        s.reason.clone(),
                        RuleLevel::Error,
                    );
                    dispatch(sinks, node, |sink, n| sink.on_suppressed_error(&record, n))
                }
                None => {
                    summary.errors += 1;
                    let message = err.to_string();
                    let reason = if message.is_empty() {
                        "validation failure".to_string()
                    } else {
                        message
                    };
                    let record = base_record(
                        pack,
                        rule,
                        &rule_id,
                        node.path(),
                        Compliance::Unknown,
                        String::new(),
                        reason,
                        RuleLevel::Error,
                    );
                    dispatch(sinks, node, |sink, n| sink.on_error(&record, n))?;
                    if pack.fail_on_error {
                        return Err(EvaluationFailed {
                            rule_id,
                            resource_id: node.path().to_string(),
                        }
                        .into());
                    }
                    Ok(())
                }
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn base_record(
    pack: &RulePack,
    rule: &RegisteredRule,
    rule_id: &str,
    resource_id: &str,
    compliance: Compliance,
    finding_id: String,
    exception_reason: String,
    level: RuleLevel,
) -> ComplianceRecord {
    ComplianceRecord {
        pack_name: pack.name().to_string(),
        rule_id: rule_id.to_string(),
        rule_original_name: rule.name.clone(),
        resource_id: resource_id.to_string(),
        compliance,
        exception_reason,
        rule_level: level.as_str().to_string(),
        rule_info: rule.info.clone(),
        rule_explanation: rule.explanation.clone(),
        finding_id,
    }
}

fn dispatch<F>(
    sinks: &mut [Box<dyn Sink>],
    node: &mut ResourceNode,
    mut f: F,
) -> anyhow::Result<()>
where
    F: FnMut(&mut dyn Sink, &mut ResourceNode) -> anyhow::Result<()>,
{
    for sink in sinks {
        f(sink.as_mut(), node)?;
    }
    Ok(())
}
