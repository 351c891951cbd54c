//! Automaton construction.
//!
//! Training runs in fixed phases over a growing node arena: lay down the
//! trie, byte-complete the START and DEAD base states, resolve failure
//! links breadth-first with leftmost-longest conditioning, and finally
//! clamp START into DEAD when START itself carries a match. Nodes are only
//! ever appended and are referenced by index, so no reference into the
//! arena outlives a push.

use std::collections::VecDeque;

use super::node::{Node, NodeId};
use crate::{Match, Pattern};

/// Pending item of the failure-resolution sweep: a node, plus the depth at
/// which the longest match seen along the path to it began, if any.
struct Position {
    id: NodeId,
    pending_match_depth: Option<usize>,
}

/// Builds the node array for a leftmost-longest automaton.
pub(crate) struct Trainer {
    nodes: Vec<Node>,
}

impl Trainer {
    pub(crate) fn train(patterns: &[Pattern<'_>]) -> Vec<Node> {
        let mut trainer = Trainer { nodes: Vec::new() };
        trainer.build_trie(patterns);
        trainer.complete_start();
        trainer.complete_dead();
        trainer.resolve_failures();
        if !trainer.nodes[NodeId::START.index()].matches.is_empty() {
            trainer.redirect_start_to_dead();
        }
        trainer.nodes
    }

    /// Append a fresh node and return its id.
    fn alloc(&mut self, depth: usize) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(Node::new(NodeId::START, depth));
        id
    }

    /// Lay down one chain of nodes per pattern, sharing prefixes. The
    /// terminal node of each chain records the pattern as a match; on a
    /// duplicate pattern the earliest-declared id lands first and stays
    /// first.
    fn build_trie(&mut self, patterns: &[Pattern<'_>]) {
        // The reserved base states, in id order: FAIL, DEAD, START.
        for _ in 0..3 {
            self.alloc(0);
        }
        for pattern in patterns {
            let mut current = NodeId::START;
            for (position, &byte) in pattern.value.iter().enumerate() {
                let existing = self.nodes[current.index()].transition(byte);
                if existing == NodeId::FAIL {
                    let created = self.alloc(position + 1);
                    self.nodes[current.index()].set_transition(byte, created);
                    current = created;
                } else {
                    current = existing;
                }
            }
            self.nodes[current.index()].matches.push(Match {
                pattern_id: pattern.id,
                pattern_len: pattern.value.len(),
            });
        }
    }

    /// Make START absorb every byte that begins no pattern.
    fn complete_start(&mut self) {
        let start = &mut self.nodes[NodeId::START.index()];
        for byte in 0..=u8::MAX {
            if start.transition(byte) == NodeId::FAIL {
                start.set_transition(byte, NodeId::START);
            }
        }
    }

    /// Make DEAD absorb every byte.
    fn complete_dead(&mut self) {
        let dead = &mut self.nodes[NodeId::DEAD.index()];
        for byte in 0..=u8::MAX {
            dead.set_transition(byte, NodeId::DEAD);
        }
    }

    /// Reroute the START self-loops into DEAD. Only invoked when START
    /// itself carries a match (an empty pattern): any byte that extends no
    /// pattern must then commit to that match instead of scanning on.
    fn redirect_start_to_dead(&mut self) {
        let start = &mut self.nodes[NodeId::START.index()];
        for byte in 0..=u8::MAX {
            if start.transition(byte) == NodeId::START {
                start.set_transition(byte, NodeId::DEAD);
            }
        }
    }

    /// Resolve every node's failure link breadth-first, conditioning the
    /// links for leftmost-longest selection: a link that would let a later,
    /// shorter match outlive a longer pending one is severed to DEAD, and a
    /// match state with no extensions falls into DEAD rather than back into
    /// the automaton.
    fn resolve_failures(&mut self) {
        let mut queue: VecDeque<Position> = VecDeque::new();

        // Seed with every real transition out of START, skipping the
        // self-loops added by completion.
        let start_has_match = !self.nodes[NodeId::START.index()].matches.is_empty();
        for byte in 0..=u8::MAX {
            let seed = self.nodes[NodeId::START.index()].transition(byte);
            if seed == NodeId::START {
                continue;
            }
            let pending_match_depth = if start_has_match {
                Some(0)
            } else {
                let node = &self.nodes[seed.index()];
                node.longest_match_len().map(|len| node.depth - len + 1)
            };
            queue.push_back(Position {
                id: seed,
                pending_match_depth,
            });

            // A one-byte pattern fires right here; the automaton must
            // commit to it rather than resume scanning from this state.
            if !self.nodes[seed.index()].matches.is_empty() {
                self.nodes[seed.index()].fail = NodeId::DEAD;
            }
        }

        while let Some(position) = queue.pop_front() {
            let mut extended = false;
            for byte in 0..=u8::MAX {
                let successor = self.nodes[position.id.index()].transition(byte);
                if successor == NodeId::FAIL {
                    continue;
                }

                // Depth at which the longest match pending on this path
                // began: inherited from the parent, or started by the
                // successor's own match.
                let pending_match_depth = match position.pending_match_depth {
                    Some(depth) => Some(depth),
                    None => {
                        let node = &self.nodes[successor.index()];
                        node.longest_match_len().map(|len| node.depth - len + 1)
                    }
                };
                queue.push_back(Position {
                    id: successor,
                    pending_match_depth,
                });
                extended = true;

                // Where the successor backs off to: one step through the
                // parent's fail state. START and DEAD are byte-complete, so
                // the lookup never needs to recurse.
                let parent_fail = self.nodes[position.id.index()].fail;
                let fallback = self.nodes[parent_fail.index()].transition(byte);

                if let Some(match_depth) = pending_match_depth {
                    let extent = self.nodes[successor.index()].depth - match_depth + 1;
                    if extent > self.nodes[fallback.index()].depth {
                        // Backing off would restart inside the pending
                        // match and let a shorter overlap win. Sever.
                        self.nodes[successor.index()].fail = NodeId::DEAD;
                        continue;
                    }
                    debug_assert_ne!(
                        fallback,
                        NodeId::START,
                        "a pending-match state never backs off to START"
                    );
                }
                debug_assert_ne!(fallback, successor);
                self.nodes[successor.index()].fail = fallback;
                self.merge_matches(fallback, successor);
            }

            // A match state with no extensions must not re-enter the
            // automaton.
            if !extended && !self.nodes[position.id.index()].matches.is_empty() {
                self.nodes[position.id.index()].fail = NodeId::DEAD;
            }
        }
    }

    /// Append `from`'s matches to `into`'s, preserving order. Both nodes
    /// live in the same arena, so split it into disjoint halves to read one
    /// while extending the other.
    fn merge_matches(&mut self, from: NodeId, into: NodeId) {
        let (from_node, into_node) = if from.index() < into.index() {
            let (left, right) = self.nodes.split_at_mut(into.index());
            (&left[from.index()], &mut right[0])
        } else {
            let (left, right) = self.nodes.split_at_mut(from.index());
            (&right[0], &mut left[into.index()])
        };
        into_node.matches.extend_from_slice(&from_node.matches);
    }
}
