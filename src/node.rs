//! Node implementation for the copy-on-write trie.
//!
//! This module contains the `TrieNode` structure that forms the backbone
//! of the trie. `TrieNode` instances are always wrapped in an `Arc` once they
//! become reachable from a `Trie`, and are never mutated after that point.

use std::any::{self, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

/// Type-erased value payload of a value node.
///
/// The concrete type is only recovered by a typed lookup. The type name is
/// kept alongside for diagnostics.
#[derive(Clone)]
pub(crate) struct ValueSlot {
    data: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl ValueSlot {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        ValueSlot {
            data: Arc::new(value),
            type_name: any::type_name::<T>(),
        }
    }

    /// Returns the payload if it is exactly a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.data).downcast_ref::<T>()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// A single trie node.
///
/// Each node maps the next key byte to a shared child, and optionally stores
/// the value of the key that ends here. A node holding a value is a value
/// node; the two can never disagree since the flag is derived from the slot.
pub struct TrieNode {
    /// Children indexed by the next key byte
    pub(crate) children: HashMap<u8, Arc<TrieNode>>,

    /// The value stored at this node, if any
    pub(crate) value: Option<ValueSlot>,

    /// Number of values stored in this subtree, computed on first use.
    value_count: OnceCell<usize>,
}

impl TrieNode {
    /// Creates a new node with no children and no value.
    pub fn new() -> Self {
        Self::with_children(HashMap::new())
    }

    /// Creates a leaf value node.
    pub fn with_value<T: Any + Send + Sync>(value: T) -> Self {
        Self::with_children_and_value(HashMap::new(), ValueSlot::new(value))
    }

    /// Creates a non-value node carrying the given children.
    pub(crate) fn with_children(children: HashMap<u8, Arc<TrieNode>>) -> Self {
        TrieNode {
            children,
            value: None,
            value_count: OnceCell::new(),
        }
    }

    pub(crate) fn with_children_and_value(
        children: HashMap<u8, Arc<TrieNode>>,
        value: ValueSlot,
    ) -> Self {
        TrieNode {
            children,
            value: Some(value),
            value_count: OnceCell::new(),
        }
    }

    /// Returns whether this node terminates a stored key.
    pub fn is_value_node(&self) -> bool {
        self.value.is_some()
    }

    /// Returns whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns the child reached by `byte`, if any.
    pub fn child(&self, byte: u8) -> Option<&Arc<TrieNode>> {
        self.children.get(&byte)
    }

    /// Returns the children of this node.
    pub fn children(&self) -> &HashMap<u8, Arc<TrieNode>> {
        &self.children
    }

    /// Returns the stored value if this is a value node holding a `T`.
    pub fn value<T: Any>(&self) -> Option<&T> {
        self.value.as_ref().and_then(|slot| slot.downcast_ref::<T>())
    }

    /// Returns the type name of the stored value, if any.
    pub fn value_type_name(&self) -> Option<&'static str> {
        self.value.as_ref().map(ValueSlot::type_name)
    }

    /// Returns the number of values stored in this subtree.
    ///
    /// The count is computed once per node and cached, which is sound because
    /// a node never changes after it has been shared.
    pub fn value_count(&self) -> usize {
        if let Some(&count) = self.value_count.get() {
            return count;
        }

        // Fill the caches bottom-up with an explicit stack; a node is revisited
        // (`true`) once all of its children have been counted.
        let mut total = 0;
        let mut stack: Vec<(&TrieNode, bool)> = vec![(self, false)];
        while let Some((node, children_counted)) = stack.pop() {
            if children_counted {
                let own = if node.is_value_node() { 1 } else { 0 };
                total = own
                    + node
                        .children
                        .values()
                        .map(|child| child.value_count.get().copied().unwrap_or(0))
                        .sum::<usize>();
                let _ = node.value_count.set(total);
            } else if node.value_count.get().is_none() {
                stack.push((node, true));
                stack.extend(node.children.values().map(|child| (&**child, false)));
            }
        }

        // `self` is the last node finished
        total
    }

    /// Children sorted by key byte.
    pub(crate) fn sorted_children(&self) -> Vec<(u8, &Arc<TrieNode>)> {
        let mut children: Vec<(u8, &Arc<TrieNode>)> =
            self.children.iter().map(|(byte, child)| (*byte, child)).collect();
        children.sort_by_key(|&(byte, _)| byte);
        children
    }
}

impl Default for TrieNode {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TrieNode {
    /// Shallow copy: child `Arc`s and the value payload are shared.
    fn clone(&self) -> Self {
        TrieNode {
            children: self.children.clone(),
            value: self.value.clone(),
            value_count: OnceCell::new(), // the clone is about to be rewritten
        }
    }
}

impl Drop for TrieNode {
    // Unlinks uniquely owned descendants one at a time, so dropping a long
    // chain never nests one destructor call per level.
    fn drop(&mut self) {
        let mut stack: Vec<Arc<TrieNode>> =
            self.children.drain().map(|(_, child)| child).collect();
        while let Some(child) = stack.pop() {
            if let Ok(mut node) = Arc::try_unwrap(child) {
                stack.extend(node.children.drain().map(|(_, child)| child));
            }
        }
    }
}

impl fmt::Debug for TrieNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let children: Vec<u8> = self.sorted_children().into_iter().map(|(b, _)| b).collect();
        f.debug_struct("TrieNode")
            .field("value_type", &self.value_type_name())
            .field("children", &children)
            .finish()
    }
}
