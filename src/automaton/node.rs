//! Automaton states and their identifiers.

use smallvec::SmallVec;

use crate::Match;

/// Identifier of a node in the automaton's arena - a bare index that can
/// be copied freely.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct NodeId(u32);

impl NodeId {
    /// Sentinel transition value meaning "no transition recorded". The node
    /// at index 0 is allocated but never entered, so a zeroed transition
    /// table starts out meaning "no transition" on every byte.
    pub(crate) const FAIL: NodeId = NodeId(0);
    /// Absorbing sink, entered once the outcome of a search is decided.
    pub(crate) const DEAD: NodeId = NodeId(1);
    /// Initial state of every search.
    pub(crate) const START: NodeId = NodeId(2);

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn from_index(index: usize) -> Self {
        NodeId(index as u32)
    }
}

/// A single automaton state.
#[derive(Clone)]
pub(crate) struct Node {
    /// Dense byte-indexed transition table.
    transitions: [NodeId; 256],
    /// State consulted when a byte has no recorded transition.
    pub(crate) fail: NodeId,
    /// Distance in bytes from START along the trie edges that created this node.
    pub(crate) depth: usize,
    /// Matches terminating at this state. The first entry is the longest:
    /// it is the one recorded during trie construction, and every later
    /// entry arrives from failure-link merging as a strictly shorter suffix.
    pub(crate) matches: SmallVec<[Match; 2]>,
}

impl Node {
    pub(crate) fn new(fail: NodeId, depth: usize) -> Self {
        Self {
            transitions: [NodeId::FAIL; 256],
            fail,
            depth,
            matches: SmallVec::new(),
        }
    }

    /// Target of the transition on `byte`; FAIL when none is recorded.
    #[inline]
    pub(crate) fn transition(&self, byte: u8) -> NodeId {
        self.transitions[byte as usize]
    }

    pub(crate) fn set_transition(&mut self, byte: u8, target: NodeId) {
        self.transitions[byte as usize] = target;
    }

    /// Length of the longest match terminating here, if any.
    pub(crate) fn longest_match_len(&self) -> Option<usize> {
        self.matches.first().map(|m| m.pattern_len)
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("fail", &self.fail)
            .field("depth", &self.depth)
            .field("matches", &self.matches)
            .finish()
    }
}
