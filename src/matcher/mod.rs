//! Path pattern matching.
//!
//! [`PathTree`] stores one payload per path pattern in a tree of path segments.
//! Patterns are made of literal segments and `{name}` / `{name:type}` placeholders
//! (`string`, `digit`, `alnum`, `alpha`, `path` or an inline regular expression).
//! Lookups prefer literal segments over placeholders and backtrack when a branch
//! dead-ends. Traversal follows a character-level prefix tree over the patterns, so
//! `/test` is listed before `/test2` whichever was registered first.

pub(crate) mod pattern;
mod tree;

pub use tree::{Iter, Match, PathTree};

/// Values bound to the placeholders of a matched pattern, in pattern order.
pub type Params = indexmap::IndexMap<String, String>;
