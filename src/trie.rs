//! The main trie implementation.
//!
//! This module contains the `Trie` type, which provides the primary API for working
//! with the copy-on-write trie.

use std::any::{self, Any};
use std::ascii;
use std::fmt;
use std::iter::FromIterator;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::iter::{Entries, Keys, ValueNodes};
use crate::node::{TrieNode, ValueSlot};
use crate::prefix_view::PrefixView;

/// A persistent trie with structural sharing.
///
/// Keys are byte sequences, values may be of any `Send + Sync` type and
/// different keys may hold values of different types.
///
/// Every operation that would modify the trie returns a new trie instead,
/// sharing all untouched nodes with the original via `Arc`. Old snapshots stay
/// valid and readable for as long as they are held, from any thread.
#[derive(Clone, Default)]
pub struct Trie {
    /// The root node of the trie, absent for an empty trie
    pub(crate) root: Option<Arc<TrieNode>>,
}

impl Trie {
    /// Creates a new, empty trie.
    ///
    /// # Examples
    ///
    /// ```
    /// use cow_trie::Trie;
    ///
    /// let trie = Trie::new();
    /// assert!(trie.is_empty());
    /// ```
    pub fn new() -> Self {
        Trie { root: None }
    }

    /// Wraps an existing root node.
    ///
    /// This is how a versioned store holding bare roots turns them back into
    /// readable snapshots.
    pub fn from_root(root: Option<Arc<TrieNode>>) -> Self {
        Trie { root }
    }

    /// Returns the root node of this snapshot.
    pub fn root(&self) -> Option<&Arc<TrieNode>> {
        self.root.as_ref()
    }

    /// Returns the number of values stored in the trie.
    ///
    /// # Examples
    ///
    /// ```
    /// use cow_trie::Trie;
    ///
    /// let trie = Trie::new();
    /// assert_eq!(trie.len(), 0);
    ///
    /// let trie = trie.put("hello", 42u32);
    /// assert_eq!(trie.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.value_count())
    }

    /// Returns `true` if the trie contains no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if both snapshots share the same root instance.
    pub fn ptr_eq(&self, other: &Trie) -> bool {
        match (&self.root, &other.root) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Walks `key` from the root and returns the node it ends at.
    pub(crate) fn find_node(&self, key: &[u8]) -> Option<&Arc<TrieNode>> {
        let mut current = self.root.as_ref()?;
        for byte in key {
            current = current.children.get(byte)?;
        }
        Some(current)
    }

    /// Retrieves a reference to the value stored for `key`, if it is a `T`.
    ///
    /// A value stored with another type is treated as absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use cow_trie::Trie;
    ///
    /// let trie = Trie::new().put("hello", 42u32);
    ///
    /// assert_eq!(trie.get::<u32>("hello"), Some(&42));
    /// assert_eq!(trie.get::<u32>("world"), None);
    /// assert_eq!(trie.get::<String>("hello"), None);
    /// ```
    pub fn get<T: Any>(&self, key: impl AsRef<[u8]>) -> Option<&T> {
        self.try_get(key).ok()
    }

    /// Retrieves the value stored for `key`, reporting why a lookup failed.
    ///
    /// # Examples
    ///
    /// ```
    /// use cow_trie::{Error, Trie};
    ///
    /// let trie = Trie::new().put("hello", 42u32);
    ///
    /// assert_eq!(trie.try_get::<u32>("hello"), Ok(&42));
    /// assert_eq!(trie.try_get::<u32>("help"), Err(Error::KeyNotFound));
    /// assert!(matches!(
    ///     trie.try_get::<u64>("hello"),
    ///     Err(Error::TypeMismatch { .. })
    /// ));
    /// ```
    pub fn try_get<T: Any>(&self, key: impl AsRef<[u8]>) -> Result<&T> {
        let node = self.find_node(key.as_ref()).ok_or(Error::KeyNotFound)?;
        let slot = node.value.as_ref().ok_or(Error::KeyNotFound)?;

        slot.downcast_ref::<T>().ok_or_else(|| Error::TypeMismatch {
            expected: any::type_name::<T>(),
            found: slot.type_name(),
        })
    }

    /// Returns `true` if a value of any type is stored for `key`.
    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.find_node(key.as_ref()).map_or(false, |node| node.is_value_node())
    }

    /// Returns the type name of the value stored for `key`.
    pub fn value_type_name(&self, key: impl AsRef<[u8]>) -> Option<&'static str> {
        self.find_node(key.as_ref()).and_then(|node| node.value_type_name())
    }

    /// Stores `value` under `key`, returning a new trie.
    ///
    /// If the key already holds a value it is replaced, whatever its type.
    /// Keys extending `key` are kept. The value is moved in, so it does not
    /// need to be `Clone`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cow_trie::Trie;
    ///
    /// let trie1 = Trie::new();
    /// let trie2 = trie1.put("hello", 42u32);
    ///
    /// assert!(trie1.is_empty());
    /// assert_eq!(trie2.get::<u32>("hello"), Some(&42));
    /// ```
    pub fn put<T: Any + Send + Sync>(&self, key: impl AsRef<[u8]>, value: T) -> Trie {
        let key = key.as_ref();
        trace!(
            key_len = key.len(),
            value_type = any::type_name::<T>(),
            "put"
        );

        let root = put_path(self.root.as_ref(), key, ValueSlot::new(value));
        Trie::from_root(Some(root))
    }

    /// Removes the value stored under `key`, returning a new trie.
    ///
    /// Nodes left with neither a value nor children are pruned all the way up.
    /// Removing a key that holds no value yields an equivalent trie.
    ///
    /// # Examples
    ///
    /// ```
    /// use cow_trie::Trie;
    ///
    /// let trie1 = Trie::new().put("hello", 42u32);
    /// let trie2 = trie1.remove("hello");
    ///
    /// assert!(trie2.is_empty());
    /// assert_eq!(trie1.get::<u32>("hello"), Some(&42));
    /// ```
    pub fn remove(&self, key: impl AsRef<[u8]>) -> Trie {
        let key = key.as_ref();
        trace!(key_len = key.len(), "remove");

        let root = match &self.root {
            Some(root) => root,
            None => {
                debug!(key_len = key.len(), "remove on empty trie");
                return Trie::new();
            }
        };

        Trie::from_root(remove_path(root, key))
    }

    /// Returns an iterator over all stored keys in lexicographic order.
    ///
    /// # Examples
    ///
    /// ```
    /// use cow_trie::Trie;
    ///
    /// let trie = Trie::new().put("b", 1u32).put("a", 2u32).put("ab", 3u32);
    /// let keys: Vec<Vec<u8>> = trie.keys().collect();
    ///
    /// assert_eq!(keys, vec![b"a".to_vec(), b"ab".to_vec(), b"b".to_vec()]);
    /// ```
    pub fn keys(&self) -> Keys<'_> {
        Keys::new(self.root.as_deref(), Vec::new())
    }

    /// Returns an iterator over the `(key, value)` pairs whose value is a `T`.
    pub fn entries<T: Any>(&self) -> Entries<'_, T> {
        Entries::new(self.root.as_deref(), Vec::new())
    }

    /// Creates a view of the subtrie at the given key prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// use cow_trie::Trie;
    ///
    /// let trie = Trie::new().put("hello", 1u32).put("help", 2u32);
    ///
    /// let view = trie.view_subtrie("hel");
    ///
    /// assert!(view.contains_key("hello"));
    /// assert_eq!(view.get::<u32>("help"), Some(&2));
    /// ```
    pub fn view_subtrie(&self, prefix: impl AsRef<[u8]>) -> PrefixView {
        PrefixView::new(self.clone(), prefix.as_ref().to_vec())
    }
}

// Rebuilds the path for `key` below `root`, installing `value` at its end.
fn put_path(root: Option<&Arc<TrieNode>>, key: &[u8], value: ValueSlot) -> Arc<TrieNode> {
    // Clones of every node above the target, root first
    let mut path: Vec<TrieNode> = Vec::with_capacity(key.len());
    let mut current = root;
    for byte in key {
        path.push(current.map(|node| (**node).clone()).unwrap_or_default());
        current = current.and_then(|node| node.children.get(byte));
    }

    // Overwriting a value keeps everything stored below it
    let children = current.map(|node| node.children.clone()).unwrap_or_default();
    let mut new_node = Arc::new(TrieNode::with_children_and_value(children, value));

    for (mut parent, byte) in path.into_iter().rev().zip(key.iter().rev()) {
        parent.children.insert(*byte, new_node);
        new_node = Arc::new(parent);
    }
    new_node
}

// Clones every node on the path of `key`, removes its value, and returns the
// new root, or `None` once pruning has emptied the whole trie.
fn remove_path(root: &Arc<TrieNode>, key: &[u8]) -> Option<Arc<TrieNode>> {
    let mut path: Vec<TrieNode> = Vec::with_capacity(key.len());
    let mut current = root;

    for (depth, byte) in key.iter().enumerate() {
        path.push((**current).clone());
        let is_last = depth + 1 == key.len();

        match current.children.get(byte) {
            Some(child) if !is_last => current = child,
            Some(child) if child.is_value_node() => return relink(path, key, demote(child)),
            _ => {
                debug!(key_len = key.len(), "remove of absent key");
                let unchanged = path.pop().map(Arc::new);
                return relink(path, key, unchanged);
            }
        }
    }

    // Only the empty key gets here: the root itself is the target
    if root.is_value_node() {
        demote(root)
    } else {
        debug!("remove of empty key without value");
        Some(Arc::new((**root).clone()))
    }
}

// Unwinds the cloned `path`, linking `child` under the last node and every
// rebuilt node under its parent. Nodes left with neither a value nor children
// are dropped from their parent instead.
fn relink(
    mut path: Vec<TrieNode>,
    key: &[u8],
    mut child: Option<Arc<TrieNode>>,
) -> Option<Arc<TrieNode>> {
    while let Some(mut node) = path.pop() {
        let byte = key[path.len()];
        match child {
            Some(child) => {
                node.children.insert(byte, child);
            }
            None => {
                node.children.remove(&byte);
            }
        }

        child = if node.is_leaf() && !node.is_value_node() {
            None
        } else {
            Some(Arc::new(node))
        };
    }
    child
}

// Drops the value of `node`, keeping its children. A childless node goes away.
fn demote(node: &Arc<TrieNode>) -> Option<Arc<TrieNode>> {
    if node.is_leaf() {
        None
    } else {
        Some(Arc::new(TrieNode::with_children(node.children.clone())))
    }
}

impl<K, V> FromIterator<(K, V)> for Trie
where
    K: AsRef<[u8]>,
    V: Any + Send + Sync,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter().fold(Trie::new(), |trie, (key, value)| trie.put(key, value))
    }
}

/// Formats a key as an escaped byte string literal, e.g. `b"ab\xff"`.
pub(crate) struct KeyBytes(pub(crate) Vec<u8>);

impl fmt::Debug for KeyBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("b\"")?;
        for byte in &self.0 {
            write!(f, "{}", ascii::escape_default(*byte))?;
        }
        f.write_str("\"")
    }
}

impl fmt::Debug for Trie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = ValueNodes::new(self.root.as_deref(), Vec::new())
            .map(|(key, node)| (KeyBytes(key), node.value_type_name().unwrap_or_default()));
        f.debug_map().entries(entries).finish()
    }
}
