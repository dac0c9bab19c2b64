use stackguard_tree::{ResourceNode, Stack};
use stackguard_types::ComplianceRecord;

/// A reporting surface the engine fans compliance records out to.
///
/// The engine drives sinks strictly in traversal order: `begin_unit` for a
/// stack, then every record for that stack's own resources, then its nested
/// stacks, and `finish` exactly once after the whole tree. A unit with zero
/// relevant resources still sees `begin_unit`, so absence of findings stays
/// distinguishable from absence of evaluation.
///
/// No sink depends on another's state; records arrive by reference and are
/// never mutated.
pub trait Sink {
    fn begin_unit(&mut self, unit: &Stack) -> anyhow::Result<()> {
        let _ = unit;
        Ok(())
    }

    fn on_compliance(
        &mut self,
        record: &ComplianceRecord,
        node: &mut ResourceNode,
    ) -> anyhow::Result<()>;

    fn on_non_compliance(
        &mut self,
        record: &ComplianceRecord,
        node: &mut ResourceNode,
    ) -> anyhow::Result<()>;

    fn on_suppressed(
        &mut self,
        record: &ComplianceRecord,
        node: &mut ResourceNode,
    ) -> anyhow::Result<()>;

    fn on_error(
        &mut self,
        record: &ComplianceRecord,
        node: &mut ResourceNode,
    ) -> anyhow::Result<()>;

    fn on_suppressed_error(
        &mut self,
        record: &ComplianceRecord,
        node: &mut ResourceNode,
    ) -> anyhow::Result<()>;

    fn on_not_applicable(
        &mut self,
        record: &ComplianceRecord,
        node: &mut ResourceNode,
    ) -> anyhow::Result<()>;

    /// Final flush, called once after the full tree has been visited.
    fn finish(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}
