//! The compiled automaton and its search loop.

use super::node::{Node, NodeId};
use super::trainer::Trainer;
use crate::{Location, Pattern};

/// Aho-Corasick automaton conditioned for leftmost-longest matching.
///
/// Immutable once trained: every query walks the shared node array with
/// stack-local state only, so a trained automaton can be used from any
/// number of readers at once.
#[derive(Clone, Debug)]
pub(crate) struct LeftmostLongest {
    nodes: Vec<Node>,
}

impl LeftmostLongest {
    pub(crate) fn new(patterns: &[Pattern<'_>]) -> Self {
        Self {
            nodes: Trainer::train(patterns),
        }
    }

    /// Return the leftmost-longest match whose beginning is at or after
    /// `at`, or `None` when no pattern occurs in `text[at..]`.
    ///
    /// The loop keeps the most recent candidate and lets the trained fail
    /// links decide when it is final: reaching DEAD means no longer match
    /// can begin at or before the candidate's beginning, so the candidate
    /// is returned without scanning the rest of the text.
    pub(crate) fn find(&self, text: &[u8], at: usize) -> Option<Location> {
        let mut last = self.location_at(NodeId::START, at);
        let mut current = NodeId::START;
        let mut i = at;
        while i < text.len() {
            current = self.follow(current, text[i]);
            debug_assert_ne!(
                current,
                NodeId::FAIL,
                "search must never enter the FAIL placeholder"
            );
            i += 1;
            if current == NodeId::DEAD {
                debug_assert!(
                    last.is_some(),
                    "DEAD is reachable only after a match was recorded"
                );
                return last;
            }
            if let Some(location) = self.location_at(current, i) {
                last = Some(location);
            }
        }
        last
    }

    /// The longest match terminating at `id`, projected to a location
    /// ending at `end`. `None` when the node holds no matches.
    fn location_at(&self, id: NodeId, end: usize) -> Option<Location> {
        self.nodes[id.index()]
            .matches
            .first()
            .map(|&matched| Location { matched, end })
    }

    /// Step from `id` on `byte`, walking fail links until a recorded
    /// transition appears. Terminates because START is byte-complete.
    #[inline]
    fn follow(&self, mut id: NodeId, byte: u8) -> NodeId {
        loop {
            let next = self.nodes[id.index()].transition(byte);
            if next != NodeId::FAIL {
                return next;
            }
            id = self.nodes[id.index()].fail;
        }
    }
}
