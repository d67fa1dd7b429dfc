//! Prefix view into a trie.
//!
//! This module provides the `PrefixView` type, which allows read-only access
//! to the subtrie below a key prefix, and cheap detection of subtries shared
//! between snapshots.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::iter::Keys;
use crate::node::TrieNode;
use crate::trie::KeyBytes;
use crate::Trie;

/// A lightweight view into a subtrie defined by a key prefix.
///
/// The view holds its own snapshot of the trie, so it stays valid and
/// unchanged no matter what is derived from the original afterwards.
///
/// # Examples
///
/// ```
/// use cow_trie::Trie;
///
/// let trie1 = Trie::new().put("hello", 1u32).put("help", 2u32);
/// let trie2 = trie1.put("world", 3u32);
///
/// let view1 = trie1.view_subtrie("hel");
/// let view2 = trie2.view_subtrie("hel");
///
/// // The "hel" subtrie was not touched, so both snapshots share it
/// assert!(view1.shares_subtrie(&view2));
///
/// assert!(view1.contains_key("hello"));
/// assert!(!view2.contains_key("world"));
/// ```
#[derive(Clone)]
pub struct PrefixView {
    /// The source trie for this view
    trie: Trie,

    /// The key prefix defining this view
    prefix: Vec<u8>,

    /// The subtrie node at the prefix, if it exists
    subtrie_node: Option<Arc<TrieNode>>,
}

impl PrefixView {
    /// Creates a new prefix view for the given trie and prefix.
    pub fn new(trie: Trie, prefix: Vec<u8>) -> Self {
        let subtrie_node = trie.find_node(&prefix).cloned();

        PrefixView {
            trie,
            prefix,
            subtrie_node,
        }
    }

    /// Returns the key prefix for this view.
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// Returns the underlying trie.
    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    /// Returns whether any stored key passes through the prefix.
    pub fn exists(&self) -> bool {
        self.subtrie_node.is_some()
    }

    /// Returns the number of values stored under the prefix.
    pub fn len(&self) -> usize {
        self.subtrie_node.as_ref().map_or(0, |node| node.value_count())
    }

    /// Returns whether this view contains no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks if the view contains a value for `key`.
    ///
    /// Only returns true if `key` starts with the prefix.
    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.find_in_subtrie(key.as_ref()).map_or(false, |node| node.is_value_node())
    }

    /// Gets the value for `key` if it is a `T` and `key` starts with the prefix.
    pub fn get<T: Any>(&self, key: impl AsRef<[u8]>) -> Option<&T> {
        self.find_in_subtrie(key.as_ref()).and_then(|node| node.value::<T>())
    }

    /// Returns an iterator over the full keys stored under the prefix, in
    /// lexicographic order.
    pub fn keys(&self) -> Keys<'_> {
        Keys::new(self.subtrie_node.as_deref(), self.prefix.clone())
    }

    /// Returns `true` if both views resolve to the very same subtrie node.
    ///
    /// Unlike a content comparison this is O(1); two views into snapshots
    /// that never rewrote the prefix's path below it share the node.
    pub fn shares_subtrie(&self, other: &PrefixView) -> bool {
        match (&self.subtrie_node, &other.subtrie_node) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    // Walks the part of `key` past the prefix, starting at the subtrie node.
    fn find_in_subtrie(&self, key: &[u8]) -> Option<&Arc<TrieNode>> {
        if !key.starts_with(&self.prefix) {
            return None;
        }

        let mut current = self.subtrie_node.as_ref()?;
        for byte in &key[self.prefix.len()..] {
            current = current.child(*byte)?;
        }
        Some(current)
    }
}

impl fmt::Debug for PrefixView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefixView")
            .field("prefix", &KeyBytes(self.prefix.clone()))
            .field("len", &self.len())
            .finish()
    }
}
