//! Path-based operations over the address space

use rosc::OscType;

use crate::{MethodSpec, Node, Result};

/// The address-space tree.
///
/// Owns the root node (whose name is the empty string) and exposes
/// path-based registration, lookup, and value operations. Paths split on
/// `/`; empty segments from leading, trailing, or doubled slashes are
/// dropped, so `/a/b`, `a/b/`, and `//a//b` address the same node.
///
/// All operations are synchronous and finite; concurrency control lives in
/// the caller (the server holds this behind a reader-writer lock).
#[derive(Debug, Clone, Default)]
pub struct AddressSpace {
    root: Node,
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

impl AddressSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct with a description on the root node; the root advertises
    /// `NoValue` access
    pub fn with_root_description(description: impl Into<String>) -> Self {
        let mut root = Node::default();
        root.description = Some(description.into());
        root.access = Some(crate::Access::NoValue);
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Register a method at `path`, creating missing containers along the
    /// way. Re-registering replaces the node's metadata but leaves its
    /// children alone.
    pub fn add_method(&mut self, path: &str, spec: MethodSpec) {
        let mut node = &mut self.root;
        for segment in segments(path) {
            node = node.get_or_create_child(segment);
        }
        node.apply(spec);
    }

    /// Remove the method at `path`: clear its metadata, then prune every
    /// node left with no arguments and no children, walking back toward the
    /// root (which itself is never removed). Unknown paths are a no-op.
    pub fn remove_method(&mut self, path: &str) {
        let segs: Vec<&str> = segments(path).collect();
        prune(&mut self.root, &segs);
    }

    /// Store a value in an argument slot. Unknown paths return without
    /// effect; a missing slot on an existing node is an error.
    pub fn set_value(&mut self, path: &str, index: usize, value: OscType) -> Result<()> {
        match self.lookup_mut(path) {
            Some(node) => node.set_value(index, value),
            None => Ok(()),
        }
    }

    /// Clear an argument slot's value, with the same resolution rules as
    /// [`set_value`](Self::set_value)
    pub fn unset_value(&mut self, path: &str, index: usize) -> Result<()> {
        match self.lookup_mut(path) {
            Some(node) => node.unset_value(index),
            None => Ok(()),
        }
    }

    /// Read a stored value; absent for unknown paths or empty slots
    pub fn get_value(&self, path: &str, index: usize) -> Option<&OscType> {
        self.lookup(path).and_then(|node| node.value(index))
    }

    pub fn lookup(&self, path: &str) -> Option<&Node> {
        let mut node = &self.root;
        for segment in segments(path) {
            node = node.child(segment)?;
        }
        Some(node)
    }

    fn lookup_mut(&mut self, path: &str) -> Option<&mut Node> {
        let mut node = &mut self.root;
        for segment in segments(path) {
            node = node.children.get_mut(segment)?;
        }
        Some(node)
    }
}

/// Descend along `segs`, clear the terminal node's metadata, and remove
/// empty nodes on the way back up.
fn prune(node: &mut Node, segs: &[&str]) {
    match segs.split_first() {
        None => node.clear_metadata(),
        Some((head, rest)) => {
            let now_empty = match node.children.get_mut(*head) {
                Some(child) => {
                    prune(child, rest);
                    child.is_empty()
                }
                None => return,
            };
            if now_empty {
                node.children.remove(*head);
            }
        }
    }
}
