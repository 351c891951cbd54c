//! patternset: multi-pattern substring search over byte texts.
//!
//! A fixed set of byte patterns is compiled into a finite automaton once;
//! the compiled [`PatternSet`] then answers three queries against any text:
//! the next match from an offset ([`next`](PatternSet::next)), every
//! non-overlapping match from an offset forward ([`all`](PatternSet::all)),
//! and whether a pattern begins exactly at an offset
//! ([`starts`](PatternSet::starts)).
//!
//! Match selection is leftmost-longest: among the candidates that could
//! begin at the earliest position, the longest wins, and ties between
//! patterns of equal length go to the earliest-declared one.

mod automaton;

use std::fmt;

use automaton::LeftmostLongest;

/// A byte pattern to search for.
///
/// The `id` is an opaque label handed back with every match. Ids need not
/// be unique, and the same value may appear more than once; where ties
/// arise, the earliest-declared pattern wins.
#[derive(Clone, Copy, Debug)]
pub struct Pattern<'a> {
    pub id: usize,
    /// The bytes to match. Must be non-empty.
    pub value: &'a [u8],
}

/// A located pattern: which pattern, and how long it is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    /// Id of the originating pattern.
    pub pattern_id: usize,
    /// Byte length of the originating pattern.
    pub pattern_len: usize,
}

/// A match found in a searched text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
    pub matched: Match,
    /// Offset of the first byte after the match.
    pub end: usize,
}

impl Location {
    /// Offset of the first byte of the match.
    pub fn beginning(&self) -> usize {
        self.end - self.matched.pattern_len
    }
}

/// Match-selection algorithm a [`PatternSet`] is compiled with.
///
/// Currently a single choice; the enumeration exists so a future variant
/// (standard leftmost-first, say, or overlapping matches) can slot in
/// without changing the query surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Algorithm {
    /// Aho-Corasick conditioned for leftmost-longest selection.
    #[default]
    AhoCorasickLeftmost,
}

/// Errors that can occur while compiling a pattern set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatternSetError {
    /// A pattern's value was empty; carries the offending pattern id.
    EmptyPattern { id: usize },
}

impl fmt::Display for PatternSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternSetError::EmptyPattern { id } => {
                write!(f, "empty value for pattern {}", id)
            }
        }
    }
}

impl std::error::Error for PatternSetError {}

/// A compiled set of patterns.
///
/// Compilation happens once, in [`PatternSet::new`]; afterwards the set is
/// immutable and every query reads shared state only, so a set can be
/// cloned as a snapshot or shared across threads:
///
/// ```
/// # use patternset::{Algorithm, Pattern, PatternSet};
/// use std::sync::Arc;
///
/// let patterns = [Pattern { id: 0, value: b"needle" }];
/// let set = Arc::new(PatternSet::new(Algorithm::AhoCorasickLeftmost, &patterns).unwrap());
/// let set_clone = Arc::clone(&set);
/// // Both handles can now search concurrently.
/// ```
#[derive(Clone, Debug)]
pub struct PatternSet {
    algorithm: Algorithm,
    pattern_count: usize,
    engine: Engine,
}

/// The compiled engine behind a pattern set, tagged by algorithm.
#[derive(Clone, Debug)]
enum Engine {
    LeftmostLongest(LeftmostLongest),
}

impl PatternSet {
    /// Compile `patterns` with the given algorithm.
    ///
    /// Patterns with empty values are rejected; everything else - an empty
    /// pattern list, duplicate values, arbitrary non-UTF-8 bytes - is
    /// accepted.
    ///
    /// ```
    /// use patternset::{Algorithm, Pattern, PatternSet};
    ///
    /// let patterns = [Pattern { id: 0, value: b"needle" }];
    /// let set = PatternSet::new(Algorithm::AhoCorasickLeftmost, &patterns).unwrap();
    /// let hit = set.next(b"a needle in a haystack", 0).unwrap();
    /// assert_eq!(hit.beginning(), 2);
    /// assert_eq!(hit.end, 8);
    /// ```
    pub fn new(algorithm: Algorithm, patterns: &[Pattern<'_>]) -> Result<Self, PatternSetError> {
        if let Some(pattern) = patterns.iter().find(|p| p.value.is_empty()) {
            return Err(PatternSetError::EmptyPattern { id: pattern.id });
        }
        let engine = match algorithm {
            Algorithm::AhoCorasickLeftmost => {
                Engine::LeftmostLongest(LeftmostLongest::new(patterns))
            }
        };
        Ok(Self {
            algorithm,
            pattern_count: patterns.len(),
            engine,
        })
    }

    /// Find the leftmost-longest match beginning at or after byte offset
    /// `at`. `at == text.len()` is legal and yields `None`.
    pub fn next(&self, text: &[u8], at: usize) -> Option<Location> {
        match &self.engine {
            Engine::LeftmostLongest(automaton) => automaton.find(text, at),
        }
    }

    /// Collect every non-overlapping match from `at` forward, in text
    /// order. The returned buffer is owned by the caller; `next` and
    /// `starts` allocate nothing.
    pub fn all(&self, text: &[u8], at: usize) -> Vec<Location> {
        let mut locations = Vec::new();
        let mut pos = at;
        while pos < text.len() {
            match self.next(text, pos) {
                Some(location) => {
                    // Always move forward, even on a zero-width result.
                    pos = location.end.max(pos + 1);
                    locations.push(location);
                }
                None => break,
            }
        }
        locations
    }

    /// Return the pattern beginning exactly at `at`, if any. Under
    /// leftmost-longest selection this is the longest such pattern.
    pub fn starts(&self, text: &[u8], at: usize) -> Option<Match> {
        self.next(text, at)
            .filter(|location| location.beginning() == at)
            .map(|location| location.matched)
    }

    /// Number of patterns compiled into this set.
    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// True when the set was compiled over an empty pattern list.
    pub fn is_empty(&self) -> bool {
        self.pattern_count == 0
    }

    /// The algorithm this set was compiled with.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(patterns: &[Pattern<'_>]) -> PatternSet {
        PatternSet::new(Algorithm::AhoCorasickLeftmost, patterns).unwrap()
    }

    #[test]
    fn empty_pattern_value_is_rejected() {
        let patterns = [
            Pattern { id: 0, value: b"a" },
            Pattern { id: 7, value: b"" },
        ];
        let err = PatternSet::new(Algorithm::AhoCorasickLeftmost, &patterns).unwrap_err();
        assert_eq!(err, PatternSetError::EmptyPattern { id: 7 });
    }

    #[test]
    fn empty_pattern_list_is_accepted() {
        let set = compile(&[]);
        assert!(set.is_empty());
        assert_eq!(set.pattern_count(), 0);
        assert_eq!(set.next(b"anything", 0), None);
        assert!(set.all(b"anything", 0).is_empty());
        assert_eq!(set.starts(b"anything", 0), None);
    }

    #[test]
    fn pattern_count_reflects_input() {
        let patterns = [
            Pattern { id: 0, value: b"ab" },
            Pattern { id: 1, value: b"ab" },
            Pattern { id: 2, value: b"cd" },
        ];
        let set = compile(&patterns);
        assert!(!set.is_empty());
        assert_eq!(set.pattern_count(), 3);
    }

    #[test]
    fn all_collects_non_overlapping_matches() {
        let patterns = [
            Pattern { id: 0, value: b"bc" },
            Pattern {
                id: 1,
                value: b"ghi",
            },
            Pattern {
                id: 2,
                value: b"o p",
            },
            Pattern { id: 3, value: b"qr" },
        ];
        let set = compile(&patterns);
        let text = b"abc def ghi jkl mno pqr abc";

        let ends: Vec<(usize, usize)> = set
            .all(text, 0)
            .iter()
            .map(|l| (l.matched.pattern_id, l.end))
            .collect();
        assert_eq!(ends, [(0, 3), (1, 11), (2, 21), (3, 23), (0, 27)]);

        // Starting mid-text skips everything that begins earlier.
        let later: Vec<(usize, usize)> = set
            .all(text, 3)
            .iter()
            .map(|l| (l.matched.pattern_id, l.end))
            .collect();
        assert_eq!(later, [(1, 11), (2, 21), (3, 23), (0, 27)]);

        assert!(set.all(text, text.len()).is_empty());
    }

    #[test]
    fn starts_requires_exact_beginning() {
        let patterns = [
            Pattern { id: 0, value: b"ab" },
            Pattern {
                id: 1,
                value: b"abcd",
            },
        ];
        let set = compile(&patterns);
        let text = b"zabcd";

        assert_eq!(set.starts(text, 0), None);
        assert_eq!(
            set.starts(text, 1),
            Some(Match {
                pattern_id: 1,
                pattern_len: 4
            }),
            "the longest pattern beginning at offset 1 is abcd"
        );
        assert_eq!(set.starts(text, 2), None);
        assert_eq!(set.starts(text, text.len()), None);
    }

    #[test]
    fn starts_agrees_with_next() {
        let patterns = [
            Pattern { id: 0, value: b"bc" },
            Pattern {
                id: 1,
                value: b"cde",
            },
            Pattern { id: 2, value: b"e" },
        ];
        let set = compile(&patterns);
        let text = b"abcdebce";

        for at in 0..=text.len() {
            let from_next = set
                .next(text, at)
                .filter(|location| location.beginning() == at)
                .map(|location| location.matched);
            assert_eq!(
                set.starts(text, at),
                from_next,
                "starts and next disagree at offset {}",
                at
            );
        }
    }

    #[test]
    fn clone_is_an_equivalent_snapshot() {
        let patterns = [Pattern {
            id: 0,
            value: b"abc",
        }];
        let set = compile(&patterns);
        let snapshot = set.clone();

        let text = b"xxabcxx";
        assert_eq!(set.next(text, 0), snapshot.next(text, 0));
        assert_eq!(set.all(text, 0), snapshot.all(text, 0));
    }

    #[test]
    fn default_algorithm_is_leftmost_longest() {
        assert_eq!(Algorithm::default(), Algorithm::AhoCorasickLeftmost);
    }

    #[test]
    fn error_display_names_the_pattern() {
        let err = PatternSetError::EmptyPattern { id: 3 };
        assert_eq!(err.to_string(), "empty value for pattern 3");
    }

    #[test]
    fn test_send_sync() {
        // A compiled set is shareable across threads as-is.
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PatternSet>();
    }
}
