//! # Copy-on-write Trie
//!
//! A persistent trie keyed by byte sequences, with structural sharing and
//! type-erased values.
//!
//! Every modifying operation returns a new trie and leaves the original
//! untouched. Unchanged subtrees are shared between versions via `Arc`, so
//! deriving a new version only allocates the nodes along the modified key's
//! path. Snapshots are immutable and `Send + Sync`: any number of threads can
//! read them while others derive new versions, without locking.
//!
//! ## Features
//!
//! - **Immutable API**: `put` and `remove` return a new trie instance
//! - **Structural Sharing**: untouched subtrees are shared, never copied
//! - **Heterogeneous Values**: each key may hold a value of any type, recovered by typed lookup
//! - **Move-only Values**: values are moved in and never need to be `Clone`
//! - **Prefix Views**: lightweight read-only views of the subtrie below a prefix
//!
//! ## Example
//!
//! ```rust
//! use cow_trie::Trie;
//!
//! // Create a new trie
//! let trie = Trie::new();
//!
//! // Insert some values (each operation returns a new trie)
//! let trie1 = trie.put("hello", 1u32);
//! let trie2 = trie1.put("world", "two".to_string());
//!
//! // Lookup values with the type they were stored with
//! assert_eq!(trie2.get::<u32>("hello"), Some(&1));
//! assert_eq!(trie2.get::<String>("world").map(String::as_str), Some("two"));
//!
//! // Asking for another type finds nothing
//! assert_eq!(trie2.get::<u64>("hello"), None);
//!
//! // Older versions are unaffected
//! assert_eq!(trie1.get::<String>("world"), None);
//! ```

mod error;
mod iter;
pub mod node;
mod prefix_view;
mod trie;

// Re-export public types
pub use crate::error::{Error, Result};
pub use crate::iter::{Entries, Keys};
pub use crate::node::TrieNode;
pub use crate::prefix_view::PrefixView;
pub use crate::trie::Trie;
