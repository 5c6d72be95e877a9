//! Ordered hierarchical key-value store.
//!
//! A key is a sequence of string components such as
//! `["ifaces", "lan1", "prefix", "fd00::/64", "src", "valid"]`. Every node
//! remembers the order in which its children were first inserted, so callers
//! can enumerate interfaces and prefixes deterministically with
//! [`Store::nth_child`] instead of relying on hash iteration order.
//!
//! # Contract
//!
//! - **Idempotent set**: setting an existing path overwrites the value and
//!   leaves child order untouched.
//! - **Empty values are ignored**: `set(path, "")` never creates a node.
//! - **Absence-safe get**: lookups of unknown paths return `None`.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

/// Iterator over the child components of a node.
pub type Children<'a> = std::iter::Map<std::slice::Iter<'a, String>, fn(&String) -> &str>;

/// A node in the tree: an optional value plus children by component.
#[derive(Debug, Default, Clone)]
struct Node {
    value: Option<String>,
    /// Child components in first-insertion order.
    order: Vec<String>,
    children: HashMap<String, Node>,
}

impl Node {
    /// Returns the child named `component`, creating it at the end of the
    /// order if it does not exist yet.
    fn child_mut(&mut self, component: &str) -> &mut Self {
        let Self {
            order, children, ..
        } = self;
        match children.entry(component.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                order.push(component.to_string());
                entry.insert(Self::default())
            }
        }
    }
}

/// Ordered hierarchical key-value container.
///
/// Inserting a path creates every missing ancestor, so an intermediate
/// path appears in its parent's child list even if it never holds a value.
#[derive(Debug, Default, Clone)]
pub struct Store {
    root: Node,
}

impl Store {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value at `path`.
    ///
    /// Overwrites an existing value in place. Setting an empty value, or using
    /// an empty path, is a no-op.
    pub fn set<S: AsRef<str>>(&mut self, path: &[S], value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() || path.is_empty() {
            return;
        }

        let node = path
            .iter()
            .fold(&mut self.root, |node, component| node.child_mut(component.as_ref()));
        node.value = Some(value);
    }

    /// Returns the value stored at `path`, if any.
    #[must_use]
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&str> {
        self.find(path).and_then(|node| node.value.as_deref())
    }

    /// Returns the child component inserted at position `index` under `parent`.
    ///
    /// Positions follow first-insertion order and are 0-based.
    #[must_use]
    pub fn nth_child<S: AsRef<str>>(&self, parent: &[S], index: usize) -> Option<&str> {
        self.find(parent)
            .and_then(|node| node.order.get(index))
            .map(String::as_str)
    }

    /// Iterates over the children of `parent` in insertion order.
    ///
    /// The iterator borrows only the store, not `parent`.
    #[must_use]
    pub fn children<S: AsRef<str>>(&self, parent: &[S]) -> Children<'_> {
        let children = self
            .find(parent)
            .map_or(&[][..], |node| node.order.as_slice());
        children.iter().map(String::as_str as fn(&String) -> &str)
    }

    /// Returns the number of children under `parent`.
    #[must_use]
    pub fn child_count<S: AsRef<str>>(&self, parent: &[S]) -> usize {
        self.find(parent).map_or(0, |node| node.order.len())
    }

    /// Returns true if `path` exists, with or without a value.
    #[must_use]
    pub fn contains<S: AsRef<str>>(&self, path: &[S]) -> bool {
        self.find(path).is_some()
    }

    /// Walks `path` from the root without allocating.
    fn find<S: AsRef<str>>(&self, path: &[S]) -> Option<&Node> {
        path.iter()
            .try_fold(&self.root, |node, component| node.children.get(component.as_ref()))
    }
}
