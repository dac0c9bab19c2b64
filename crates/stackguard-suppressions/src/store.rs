use crate::errors::SuppressionFormatError;
use crate::model::Suppression;
use crate::validate::validate;
use stackguard_tree::{Metadata, ResourceNode};
use stackguard_types::ids::SUPPRESSIONS_KEY;

/// Read the suppressions stored on a metadata bag, re-validating on every
/// read so mutations after attachment cannot slip past validation.
///
/// An absent key is an empty set, not an error.
pub fn suppressions_of(metadata: &Metadata) -> Result<Vec<Suppression>, SuppressionFormatError> {
    let Some(value) = metadata.get(SUPPRESSIONS_KEY) else {
        return Ok(Vec::new());
    };
    let suppressions: Vec<Suppression> = serde_json::from_value(value.clone()).map_err(|e| {
        SuppressionFormatError::MalformedEntry {
            detail: e.to_string(),
        }
    })?;
    validate(&suppressions)?;
    Ok(suppressions)
}

/// Replace the suppressions stored on a metadata bag, validating first.
pub fn set_suppressions(
    metadata: &mut Metadata,
    suppressions: &[Suppression],
) -> Result<(), SuppressionFormatError> {
    validate(suppressions)?;
    let value = serde_json::to_value(suppressions).map_err(|e| {
        SuppressionFormatError::MalformedEntry {
            detail: e.to_string(),
        }
    })?;
    metadata.set(SUPPRESSIONS_KEY, value);
    Ok(())
}

/// Suppressions in effect for one node: the node's own, then the enclosing
/// unit's. Always re-reads current metadata; nothing is cached across the
/// traversal.
pub fn collect(
    node: &ResourceNode,
    unit_metadata: &Metadata,
) -> Result<Vec<Suppression>, SuppressionFormatError> {
    let mut suppressions = suppressions_of(&node.metadata)?;
    suppressions.extend(suppressions_of(unit_metadata)?);
    Ok(suppressions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stackguard_tree::Stack;

    #[test]
    fn absent_key_reads_as_empty() {
        let meta = Metadata::new();
        assert_eq!(suppressions_of(&meta).expect("empty"), Vec::new());
    }

    #[test]
    fn set_then_read_round_trips() {
        let mut meta = Metadata::new();
        let sups = vec![Suppression::new("Pack-Rule1", "valid reason here")];
        set_suppressions(&mut meta, &sups).expect("attach");
        assert_eq!(suppressions_of(&meta).expect("read"), sups);
    }

    #[test]
    fn read_back_revalidates_mutated_metadata() {
        let mut meta = Metadata::new();
        let sups = vec![Suppression::new("Pack-Rule1", "valid reason here")];
        set_suppressions(&mut meta, &sups).expect("attach");

        // Simulate a tree mutation that shortens the reason below the
        // minimum after attachment.
        meta.set(
            SUPPRESSIONS_KEY,
            json!([{"rule_id": "Pack-Rule1", "reason": "short"}]),
        );
        let err = suppressions_of(&meta).expect_err("read-time validation");
        assert!(matches!(err, SuppressionFormatError::ShortReason { .. }));
    }

    #[test]
    fn unexpected_shape_is_a_format_error() {
        let mut meta = Metadata::new();
        meta.set(SUPPRESSIONS_KEY, json!({"rule_id": "not-a-list"}));
        let err = suppressions_of(&meta).expect_err("wrong shape");
        assert!(matches!(err, SuppressionFormatError::MalformedEntry { .. }));
    }

    #[test]
    fn collect_concatenates_node_then_unit() {
        let mut stack = Stack::new("Stack1");
        set_suppressions(
            &mut stack.metadata,
            &[Suppression::new("Pack-Rule2", "unit level reason")],
        )
        .expect("stack attach");

        let node = stack.add_resource(ResourceNode::new("rBucket", "AWS::S3::Bucket"));
        set_suppressions(
            &mut node.metadata,
            &[Suppression::new("Pack-Rule1", "node level reason")],
        )
        .expect("node attach");

        let node = &stack.resources[0];
        let collected = collect(node, &stack.metadata).expect("collect");
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].rule_id, "Pack-Rule1");
        assert_eq!(collected[1].rule_id, "Pack-Rule2");
    }
}
