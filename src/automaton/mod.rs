//! Aho-Corasick automaton with leftmost-longest match selection.
//!
//! The components, leaves first:
//!
//! - `Node`: a single automaton state - dense byte transition table, fail
//!   link, depth, and the matches terminating there
//! - `Trainer`: builds the node array from a pattern list (trie layout,
//!   base-state completion, breadth-first failure-link resolution)
//! - `LeftmostLongest`: the compiled automaton and its search loop
//!
//! Training is the only phase that mutates nodes; a trained automaton is
//! read-only and may be shared freely by queries.

mod leftmost;
mod node;
mod trainer;

pub(crate) use leftmost::LeftmostLongest;
