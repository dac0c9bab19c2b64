use crate::errors::{PathNotFoundError, SuppressionError, SuppressionFormatError};
use crate::model::Suppression;
use crate::store::{set_suppressions, suppressions_of};
use crate::validate::validate;
use stackguard_tree::{Metadata, ResourceNode, Stack};

/// Attach suppressions to one resource node, optionally cascading to every
/// descendant node. Validates before anything reaches storage.
pub fn add_resource_suppressions(
    node: &mut ResourceNode,
    suppressions: &[Suppression],
    apply_to_children: bool,
) -> Result<(), SuppressionFormatError> {
    validate(suppressions)?;
    merge_into(&mut node.metadata, suppressions)?;
    if apply_to_children {
        for child in node.children_mut() {
            add_resource_suppressions(child, suppressions, true)?;
        }
    }
    Ok(())
}

/// Attach suppressions to the node(s) at `path` inside `stack` (including
/// its nested stacks).
///
/// A path matches a node whose tree path equals it exactly, or equals it
/// plus the conventional synthesized child segment `/Resource` -- nothing
/// broader, so a loose path cannot silently suppress unintended resources.
pub fn add_resource_suppressions_by_path(
    stack: &mut Stack,
    path: &str,
    suppressions: &[Suppression],
    apply_to_children: bool,
) -> Result<(), SuppressionError> {
    validate(suppressions)?;

    let with_resource_child = format!("{path}/Resource");
    let mut matched = 0usize;
    visit_nodes(stack, &mut |node| {
        if node.path() == path || node.path() == with_resource_child {
            add_resource_suppressions(node, suppressions, apply_to_children)?;
            matched += 1;
        }
        Ok(())
    })?;

    if matched == 0 {
        return Err(PathNotFoundError {
            path: path.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Attach suppressions to a whole template unit, optionally cascading to
/// nested units. Unit-level suppressions apply to every node in the unit.
pub fn add_stack_suppressions(
    stack: &mut Stack,
    suppressions: &[Suppression],
    apply_to_nested_stacks: bool,
) -> Result<(), SuppressionFormatError> {
    validate(suppressions)?;
    merge_into(&mut stack.metadata, suppressions)?;
    if apply_to_nested_stacks {
        for nested in stack.nested_mut() {
            add_stack_suppressions(nested, suppressions, true)?;
        }
    }
    Ok(())
}

/// Merge new suppressions into a metadata bag, deduplicating on the
/// serialized suppression.
fn merge_into(
    metadata: &mut Metadata,
    new: &[Suppression],
) -> Result<(), SuppressionFormatError> {
    let mut merged = suppressions_of(metadata)?;
    let mut seen: Vec<String> = merged.iter().map(Suppression::canonical).collect();
    for s in new {
        let canonical = s.canonical();
        if !seen.contains(&canonical) {
            merged.push(s.clone());
            seen.push(canonical);
        }
    }
    set_suppressions(metadata, &merged)
}

fn visit_nodes<F>(stack: &mut Stack, f: &mut F) -> Result<(), SuppressionError>
where
    F: FnMut(&mut ResourceNode) -> Result<(), SuppressionFormatError>,
{
    fn walk<F>(node: &mut ResourceNode, f: &mut F) -> Result<(), SuppressionError>
    where
        F: FnMut(&mut ResourceNode) -> Result<(), SuppressionFormatError>,
    {
        f(node)?;
        for child in node.children_mut() {
            walk(child, f)?;
        }
        Ok(())
    }

    for node in &mut stack.resources {
        walk(node, f)?;
    }
    for nested in stack.nested_mut() {
        visit_nodes(nested, f)?;
    }
    Ok(())
}
