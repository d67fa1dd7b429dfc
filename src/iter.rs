//! Iterators over the keys and values of a trie.
//!
//! Traversal is depth-first with children visited in byte order, so keys come
//! out in lexicographic order: a key is always yielded before the keys it
//! prefixes.

use std::any::Any;
use std::marker::PhantomData;

use crate::node::TrieNode;

/// Depth-first walk yielding every value node together with its full key.
pub(crate) struct ValueNodes<'a> {
    /// Nodes still to visit, each with the key bytes leading to it
    stack: Vec<(&'a TrieNode, Vec<u8>)>,
}

impl<'a> ValueNodes<'a> {
    pub(crate) fn new(start: Option<&'a TrieNode>, prefix: Vec<u8>) -> Self {
        let mut stack = Vec::new();
        if let Some(node) = start {
            stack.push((node, prefix));
        }
        ValueNodes { stack }
    }
}

impl<'a> Iterator for ValueNodes<'a> {
    type Item = (Vec<u8>, &'a TrieNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, key)) = self.stack.pop() {
            // Push in reverse so the smallest byte is popped first
            for (byte, child) in node.sorted_children().into_iter().rev() {
                let mut child_key = key.clone();
                child_key.push(byte);
                self.stack.push((&**child, child_key));
            }

            if node.is_value_node() {
                return Some((key, node));
            }
        }

        None
    }
}

/// An iterator over the stored keys of a trie or prefix view.
///
/// Created by [`Trie::keys`](crate::Trie::keys) and
/// [`PrefixView::keys`](crate::PrefixView::keys).
pub struct Keys<'a> {
    walk: ValueNodes<'a>,
}

impl<'a> Keys<'a> {
    pub(crate) fn new(start: Option<&'a TrieNode>, prefix: Vec<u8>) -> Self {
        Keys {
            walk: ValueNodes::new(start, prefix),
        }
    }
}

impl<'a> Iterator for Keys<'a> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        self.walk.next().map(|(key, _)| key)
    }
}

/// An iterator over `(key, &T)` pairs for every value of type `T`.
///
/// Values stored with another type are skipped. Created by
/// [`Trie::entries`](crate::Trie::entries).
pub struct Entries<'a, T> {
    walk: ValueNodes<'a>,
    _value_type: PhantomData<fn() -> T>,
}

impl<'a, T> Entries<'a, T> {
    pub(crate) fn new(start: Option<&'a TrieNode>, prefix: Vec<u8>) -> Self {
        Entries {
            walk: ValueNodes::new(start, prefix),
            _value_type: PhantomData,
        }
    }
}

impl<'a, T: Any> Iterator for Entries<'a, T> {
    type Item = (Vec<u8>, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (key, node) = self.walk.next()?;
            if let Some(value) = node.value::<T>() {
                return Some((key, value));
            }
        }
    }
}
