use stackguard_tree::ResourceNode;
use stackguard_types::RuleLevel;

/// Outcome of one rule predicate against one node.
///
/// `NonCompliant` may carry finding ids distinguishing several independent
/// violations one rule reports for one node (enabling granular suppression);
/// an empty list means one anonymous finding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleResult {
    Compliant,
    NonCompliant(Vec<String>),
    NotApplicable,
}

/// Boolean shorthand for simple rules: `true` is compliant, `false` is one
/// anonymous non-compliant finding. Internal logic only ever handles the
/// enum; the adapter lives here at the boundary.
impl From<bool> for RuleResult {
    fn from(compliant: bool) -> Self {
        if compliant {
            RuleResult::Compliant
        } else {
            RuleResult::NonCompliant(Vec::new())
        }
    }
}

/// A rule predicate. Read-only over node content; an `Err` is the evaluation
/// failure path, contained per (rule, node) by the engine.
pub type RuleFn = Box<dyn Fn(&ResourceNode) -> anyhow::Result<RuleResult>>;

/// One rule registered into a pack.
pub struct RegisteredRule {
    /// The predicate's own name, preserved in `ruleOriginalName`.
    pub name: String,
    /// Stable short id used in place of `name` when forming the rule id.
    pub suffix_override: Option<String>,
    pub level: RuleLevel,
    pub info: String,
    pub explanation: String,
    pub check: RuleFn,
}

impl RegisteredRule {
    pub fn new<N: Into<String>>(name: N, level: RuleLevel, check: RuleFn) -> Self {
        Self {
            name: name.into(),
            suffix_override: None,
            level,
            info: String::new(),
            explanation: String::new(),
            check,
        }
    }

    pub fn info<S: Into<String>>(mut self, info: S) -> Self {
        self.info = info.into();
        self
    }

    pub fn explanation<S: Into<String>>(mut self, explanation: S) -> Self {
        self.explanation = explanation.into();
        self
    }

    pub fn suffix<S: Into<String>>(mut self, suffix: S) -> Self {
        self.suffix_override = Some(suffix.into());
        self
    }
}

/// A named set of rules. The pack name prefixes every rule id, so finding
/// identifiers stay stable across packs.
pub struct RulePack {
    name: String,
    /// Halt the run when an unsuppressed error-level finding is emitted.
    pub fail_on_error: bool,
    rules: Vec<RegisteredRule>,
}

impl RulePack {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            fail_on_error: false,
            rules: Vec::new(),
        }
    }

    pub fn fail_on_error(mut self, fail_on_error: bool) -> Self {
        self.fail_on_error = fail_on_error;
        self
    }

    pub fn register(mut self, rule: RegisteredRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rules in registration order; the engine applies them to a node in
    /// exactly this order.
    pub fn rules(&self) -> &[RegisteredRule] {
        &self.rules
    }

    /// `{pack}-{suffix}`: the id findings and suppressions refer to.
    pub fn rule_id(&self, rule: &RegisteredRule) -> String {
        let suffix = rule.suffix_override.as_deref().unwrap_or(&rule.name);
        format!("{}-{}", self.name, suffix)
    }
}
