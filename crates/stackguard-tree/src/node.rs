use serde_json::Value as JsonValue;

/// Ordered key/value bag attached to stacks and resource nodes.
///
/// Keys are dotted namespaces; a key may appear once (typed state such as
/// suppressions) or many times (appended annotations). Accessors keep both
/// uses explicit so callers never reach into the raw entry list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metadata {
    entries: Vec<MetadataEntry>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MetadataEntry {
    pub key: String,
    pub value: JsonValue,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// First value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.entries.iter().find(|e| e.key == key).map(|e| &e.value)
    }

    /// Replace the first entry under `key`, or insert one.
    pub fn set(&mut self, key: &str, value: JsonValue) {
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.value = value,
            None => self.entries.push(MetadataEntry {
                key: key.to_string(),
                value,
            }),
        }
    }

    /// Append an entry under `key`, keeping existing entries.
    pub fn push(&mut self, key: &str, value: JsonValue) {
        self.entries.push(MetadataEntry {
            key: key.to_string(),
            value,
        });
    }

    /// All values stored under `key`, in attachment order.
    pub fn all(&self, key: &str) -> Vec<&JsonValue> {
        self.entries
            .iter()
            .filter(|e| e.key == key)
            .map(|e| &e.value)
            .collect()
    }

    pub fn entries(&self) -> &[MetadataEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One typed resource declaration in the construct tree.
///
/// Wrapper nodes own synthesized children; by convention the concrete
/// declaration behind a wrapper is the child named `Resource`.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceNode {
    id: String,
    path: String,
    resource_type: String,
    pub metadata: Metadata,
    children: Vec<ResourceNode>,
}

impl ResourceNode {
    pub fn new<I: Into<String>, T: Into<String>>(id: I, resource_type: T) -> Self {
        let id = id.into();
        Self {
            path: id.clone(),
            id,
            resource_type: resource_type.into(),
            metadata: Metadata::new(),
            children: Vec::new(),
        }
    }

    /// Logical id: the last segment of the tree path.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Stable slash-joined tree path, rooted at the top-level stack.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn children(&self) -> &[ResourceNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [ResourceNode] {
        &mut self.children
    }

    /// Attach a synthesized child; its subtree paths are re-rooted under this
    /// node.
    pub fn add_child(&mut self, mut child: ResourceNode) -> &mut ResourceNode {
        child.reroot(&self.path);
        let idx = self.children.len();
        self.children.push(child);
        &mut self.children[idx]
    }

    fn reroot(&mut self, parent_path: &str) {
        self.path = format!("{}/{}", parent_path, self.id);
        let base = self.path.clone();
        for child in &mut self.children {
            child.reroot(&base);
        }
    }
}

/// One template unit: an independently-deployable collection of resource
/// nodes. Stacks may nest.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stack {
    name: String,
    path: String,
    pub metadata: Metadata,
    pub resources: Vec<ResourceNode>,
    nested: Vec<Stack>,
}

impl Stack {
    pub fn new<S: Into<String>>(name: S) -> Self {
        let name = name.into();
        Self {
            path: name.clone(),
            name,
            metadata: Metadata::new(),
            resources: Vec::new(),
            nested: Vec::new(),
        }
    }

    /// Display name as given, possibly containing `${...}` tokens.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn add_resource(&mut self, mut node: ResourceNode) -> &mut ResourceNode {
        node.reroot(&self.path);
        let idx = self.resources.len();
        self.resources.push(node);
        &mut self.resources[idx]
    }

    pub fn add_nested_stack(&mut self, mut stack: Stack) -> &mut Stack {
        stack.reroot(&self.path);
        let idx = self.nested.len();
        self.nested.push(stack);
        &mut self.nested[idx]
    }

    fn reroot(&mut self, parent_path: &str) {
        self.path = format!("{}/{}", parent_path, self.name);
        let base = self.path.clone();
        for node in &mut self.resources {
            node.reroot(&base);
        }
        for nested in &mut self.nested {
            nested.reroot(&base);
        }
    }

    pub fn nested(&self) -> &[Stack] {
        &self.nested
    }

    pub fn nested_mut(&mut self) -> &mut [Stack] {
        &mut self.nested
    }
}
