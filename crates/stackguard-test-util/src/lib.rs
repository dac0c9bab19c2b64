//! Shared test fixtures for the stackguard workspace.
//!
//! This crate exists because the render and app integration tests build the
//! same small trees and packs; a `#[cfg(test)]` module inside one crate would
//! not be visible to the others.

#![forbid(unsafe_code)]

use stackguard_domain::{RegisteredRule, RuleFn, RulePack, RuleResult};
use stackguard_tree::{ResourceNode, Stack};
use stackguard_types::RuleLevel;

/// A stack named `Stack1` holding one `rResource` bucket node.
pub fn single_resource_stack() -> Stack {
    let mut stack = Stack::new("Stack1");
    stack.add_resource(ResourceNode::new("rResource", "AWS::S3::Bucket"));
    stack
}

/// A root stack with one resource of its own and a nested stack with one
/// resource, for exercising per-unit reporting.
pub fn nested_stack_tree() -> Stack {
    let mut root = Stack::new("Root");
    root.add_resource(ResourceNode::new("rTop", "AWS::S3::Bucket"));
    let mut child = Stack::new("Child");
    child.add_resource(ResourceNode::new("rInner", "AWS::SQS::Queue"));
    root.add_nested_stack(child);
    root
}

/// A rule whose predicate always returns the given result.
pub fn fixed_rule(name: &str, level: RuleLevel, result: RuleResult) -> RegisteredRule {
    let check: RuleFn = Box::new(move |_| Ok(result.clone()));
    RegisteredRule::new(name, level, check)
}

/// A rule whose predicate always fails with the given message.
pub fn failing_rule(name: &str, level: RuleLevel, message: &str) -> RegisteredRule {
    let message = message.to_string();
    let check: RuleFn = Box::new(move |_| Err(anyhow::anyhow!("{message}")));
    RegisteredRule::new(name, level, check)
}

/// A rule that flags nodes of the given resource type and passes the rest.
pub fn type_flagging_rule(name: &str, level: RuleLevel, flagged_type: &str) -> RegisteredRule {
    let flagged_type = flagged_type.to_string();
    let check: RuleFn = Box::new(move |node| {
        Ok((node.resource_type() != flagged_type).into())
    });
    RegisteredRule::new(name, level, check)
}

/// A one-rule pack named `Pack`.
pub fn single_rule_pack(rule: RegisteredRule) -> RulePack {
    RulePack::new("Pack").register(rule)
}
