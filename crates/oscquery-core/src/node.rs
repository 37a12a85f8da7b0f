//! Address-space nodes and method metadata

use std::collections::BTreeMap;

use rosc::OscType;

use crate::{Access, ArgType, ClipMode, Error, Result};

/// Value range constraint for one argument slot.
///
/// `vals`, when present, is a discrete set of allowed values.
#[derive(Debug, Clone, Default)]
pub struct Range {
    pub min: Option<OscType>,
    pub max: Option<OscType>,
    pub vals: Option<Vec<OscType>>,
}

impl Range {
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none() && self.vals.is_none()
    }
}

/// One typed argument slot of a method.
#[derive(Debug, Clone)]
pub struct Argument {
    pub arg_type: ArgType,
    /// Present-or-absent value slot; absence omits the VALUE entry
    pub value: Option<OscType>,
    pub range: Option<Range>,
    pub clip_mode: Option<ClipMode>,
}

impl Argument {
    pub fn new(arg_type: impl Into<ArgType>) -> Self {
        Self {
            arg_type: arg_type.into(),
            value: None,
            range: None,
            clip_mode: None,
        }
    }

    pub fn with_value(mut self, value: OscType) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_clip_mode(mut self, clip_mode: ClipMode) -> Self {
        self.clip_mode = Some(clip_mode);
        self
    }
}

/// Metadata assigned to a node when a method is registered.
///
/// Every field is independently optional; registering over an existing
/// method replaces its metadata without touching children.
#[derive(Debug, Clone, Default)]
pub struct MethodSpec {
    pub description: Option<String>,
    pub access: Option<Access>,
    pub tags: Option<Vec<String>>,
    pub critical: Option<bool>,
    pub arguments: Option<Vec<Argument>>,
}

/// A single point in the OSC address space.
///
/// A node is a container (children, no arguments), a method (arguments
/// present), or empty (neither). Empty nodes only exist transiently: they
/// are created while inserting a deep path and pruned when a method is
/// removed. Children are owned exclusively by their parent; full paths are
/// assembled by carrying the path down during traversal, so there are no
/// back-references.
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) access: Option<Access>,
    pub(crate) tags: Option<Vec<String>>,
    pub(crate) critical: Option<bool>,
    pub(crate) arguments: Option<Vec<Argument>>,
    pub(crate) children: BTreeMap<String, Node>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The last path segment; empty for the root
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn access(&self) -> Option<Access> {
        self.access
    }

    pub fn tags(&self) -> Option<&[String]> {
        self.tags.as_deref()
    }

    pub fn critical(&self) -> Option<bool> {
        self.critical
    }

    pub fn arguments(&self) -> Option<&[Argument]> {
        self.arguments.as_deref()
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Insert a child node, keyed by its name.
    ///
    /// Path-based insertion never reaches this error (it reuses existing
    /// children); it is surfaced for direct tree manipulation.
    pub fn add_child(&mut self, child: Node) -> Result<&mut Node> {
        if self.children.contains_key(&child.name) {
            return Err(Error::DuplicateChild(child.name));
        }
        let name = child.name.clone();
        Ok(self.children.entry(name).or_insert(child))
    }

    pub(crate) fn get_or_create_child(&mut self, name: &str) -> &mut Node {
        self.children
            .entry(name.to_string())
            .or_insert_with(|| Node::new(name))
    }

    pub fn is_container(&self) -> bool {
        self.arguments.is_none() && !self.children.is_empty()
    }

    pub fn is_method(&self) -> bool {
        self.arguments.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_none() && self.children.is_empty()
    }

    /// Replace this node's metadata with the given registration
    pub(crate) fn apply(&mut self, spec: MethodSpec) {
        self.description = spec.description;
        self.access = spec.access;
        self.tags = spec.tags;
        self.critical = spec.critical;
        self.arguments = spec.arguments;
    }

    /// Clear all metadata, including arguments; children are untouched
    pub(crate) fn clear_metadata(&mut self) {
        self.description = None;
        self.access = None;
        self.tags = None;
        self.critical = None;
        self.arguments = None;
    }

    pub fn value(&self, index: usize) -> Option<&OscType> {
        self.arguments
            .as_ref()
            .and_then(|args| args.get(index))
            .and_then(|arg| arg.value.as_ref())
    }

    pub(crate) fn set_value(&mut self, index: usize, value: OscType) -> Result<()> {
        self.value_slot(index)?.replace(value);
        Ok(())
    }

    pub(crate) fn unset_value(&mut self, index: usize) -> Result<()> {
        self.value_slot(index)?.take();
        Ok(())
    }

    fn value_slot(&mut self, index: usize) -> Result<&mut Option<OscType>> {
        self.arguments
            .as_mut()
            .and_then(|args| args.get_mut(index))
            .map(|arg| &mut arg.value)
            .ok_or(Error::IndexOutOfRange(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeCode;

    #[test]
    fn test_classification() {
        let mut node = Node::new("x");
        assert!(node.is_empty());
        assert!(!node.is_container());
        assert!(!node.is_method());

        node.add_child(Node::new("y")).unwrap();
        assert!(node.is_container());

        node.arguments = Some(vec![Argument::new(TypeCode::Int32)]);
        assert!(node.is_method());
        assert!(!node.is_container());
    }

    #[test]
    fn test_duplicate_child() {
        let mut node = Node::new("x");
        node.add_child(Node::new("y")).unwrap();
        assert!(matches!(
            node.add_child(Node::new("y")),
            Err(Error::DuplicateChild(_))
        ));
    }

    #[test]
    fn test_value_slots() {
        let mut node = Node::new("m");
        node.arguments = Some(vec![
            Argument::new(TypeCode::Float32),
            Argument::new(TypeCode::OscString),
        ]);

        node.set_value(0, OscType::Float(0.5)).unwrap();
        assert_eq!(node.value(0), Some(&OscType::Float(0.5)));
        assert_eq!(node.value(1), None);

        node.unset_value(0).unwrap();
        assert_eq!(node.value(0), None);

        assert!(matches!(
            node.set_value(2, OscType::Nil),
            Err(Error::IndexOutOfRange(2))
        ));
    }
}
