//! Fuzzy name matchers
//!
//! A [`NameMatcher`] scores one query against one name. Scores are
//! dissimilarities in [0, 1]: 0 is an exact match, and a candidate scoring
//! above the matcher's threshold is not a match at all.
//!
//! Two implementations:
//! - [`EditDistanceMatcher`]: approximate substring matching where every edit
//!   and every character of offset from the start of the name costs score
//! - [`NucleoMatcher`]: Smith-Waterman scoring via nucleo-matcher (used in
//!   Helix editor), normalized against the query's self-match, falling back
//!   to edit distance for names that are not a subsequence match
//!
//! Match spans are char offsets into the name as given, before any
//! normalization.

use nucleo_matcher::{Config, Matcher, Utf32Str};
use serde::{Deserialize, Serialize};
use unicode_normalization::char::canonical_combining_class;
use unicode_normalization::UnicodeNormalization;

/// Maximum dissimilarity a candidate may have and still match
pub const DEFAULT_THRESHOLD: f64 = 0.4;

/// Offset (in characters) from the start of the name that costs as much as a
/// fully mismatched query
pub const DEFAULT_DISTANCE: f64 = 100.0;

/// Floor for inexact matches, so only identical strings score 0
const MIN_INEXACT_SCORE: f64 = 0.001;

/// Matched character range in the name, `end` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

/// Result of matching a query against one name
#[derive(Debug, Clone, PartialEq)]
pub struct NameMatch {
    /// Dissimilarity in [0, 1], 0 = exact
    pub score: f64,
    /// Character ranges of the name used by the match
    pub spans: Vec<MatchSpan>,
}

impl NameMatch {
    fn exact(len: usize) -> Self {
        Self {
            score: 0.0,
            spans: vec![MatchSpan { start: 0, end: len }],
        }
    }
}

/// Scores a query against a single name
pub trait NameMatcher {
    /// Returns `None` when the name does not match within the threshold
    fn match_name(&mut self, query: &str, name: &str) -> Option<NameMatch>;
}

/// Which matcher implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MatcherKind {
    #[default]
    EditDistance,
    Nucleo,
}

impl MatcherKind {
    pub fn build(self) -> Box<dyn NameMatcher + Send> {
        match self {
            MatcherKind::EditDistance => Box::new(EditDistanceMatcher::default()),
            MatcherKind::Nucleo => Box::new(NucleoMatcher::default()),
        }
    }
}

/// Name text prepared for matching.
///
/// Each entry of `chars` remembers the range of original chars it came
/// from, so match positions can be reported against the name as given.
struct Normalized {
    chars: Vec<char>,
    origin: Vec<(usize, usize)>,
    source_len: usize,
}

impl Normalized {
    /// NFC-normalize and lowercase.
    ///
    /// The text is normalized one combining sequence (a starter and the
    /// marks following it) at a time, which keeps the origin of every output
    /// char exact.
    fn new(text: &str) -> Self {
        let source: Vec<char> = text.chars().collect();
        let mut chars = Vec::with_capacity(source.len());
        let mut origin = Vec::with_capacity(source.len());

        let mut start = 0;
        while start < source.len() {
            let mut end = start + 1;
            while end < source.len() && canonical_combining_class(source[end]) != 0 {
                end += 1;
            }

            let sequence: String = source[start..end].iter().collect();
            for c in sequence.nfc().flat_map(char::to_lowercase) {
                chars.push(c);
                origin.push((start, end));
            }
            start = end;
        }

        Self {
            chars,
            origin,
            source_len: source.len(),
        }
    }

    /// Map a span over normalized chars back to original char offsets
    fn original_span(&self, span: MatchSpan) -> MatchSpan {
        let at = |i: usize| self.origin.get(i).map_or(self.source_len, |&(s, _)| s);
        if span.end <= span.start {
            let start = at(span.start);
            return MatchSpan { start, end: start };
        }

        MatchSpan {
            start: at(span.start),
            end: self.origin[span.end - 1].1,
        }
    }
}

/// Approximate substring matcher.
///
/// For every start offset in the name, finds the fewest edits turning the
/// query into a substring beginning there. The score of a start offset is
/// `edits / query_len + offset / distance`; the best offset wins.
#[derive(Debug, Clone)]
pub struct EditDistanceMatcher {
    threshold: f64,
    distance: f64,
}

impl Default for EditDistanceMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD, DEFAULT_DISTANCE)
    }
}

impl EditDistanceMatcher {
    pub fn new(threshold: f64, distance: f64) -> Self {
        Self {
            threshold,
            distance,
        }
    }

    /// Fewest edits aligning `pattern` with a prefix of `text`.
    ///
    /// Returns (edits, prefix length). Ties keep the shortest prefix.
    fn align_prefix(pattern: &[char], text: &[char]) -> (usize, usize) {
        let m = pattern.len();
        // prev[i]: edits between pattern[..i] and text[..j-1]
        let mut prev: Vec<usize> = (0..=m).collect();
        let mut cur = vec![0usize; m + 1];
        let mut best = (prev[m], 0);

        for (j, &tc) in text.iter().enumerate() {
            cur[0] = j + 1;
            for i in 1..=m {
                let substitution = prev[i - 1] + usize::from(pattern[i - 1] != tc);
                cur[i] = substitution.min(prev[i] + 1).min(cur[i - 1] + 1);
            }
            if cur[m] < best.0 {
                best = (cur[m], j + 1);
            }
            std::mem::swap(&mut prev, &mut cur);
        }

        best
    }

    fn match_normalized(&self, query: &Normalized, name: &Normalized) -> Option<NameMatch> {
        let pattern = &query.chars;
        let text = &name.chars;

        if pattern.is_empty() {
            return None;
        }
        if pattern == text {
            return Some(NameMatch::exact(name.source_len));
        }

        let query_len = pattern.len() as f64;
        let mut best: Option<(f64, MatchSpan)> = None;

        for start in 0..text.len() {
            let offset_cost = start as f64 / self.distance;
            // Later offsets only cost more
            if offset_cost > self.threshold {
                break;
            }

            let (edits, len) = Self::align_prefix(pattern, &text[start..]);
            let score = edits as f64 / query_len + offset_cost;

            if best.is_none_or(|(best_score, _)| score < best_score) {
                best = Some((
                    score,
                    MatchSpan {
                        start,
                        end: start + len,
                    },
                ));
            }
        }

        let (score, span) = best?;
        if score > self.threshold {
            return None;
        }

        Some(NameMatch {
            score: score.max(MIN_INEXACT_SCORE),
            spans: vec![name.original_span(span)],
        })
    }
}

impl NameMatcher for EditDistanceMatcher {
    fn match_name(&mut self, query: &str, name: &str) -> Option<NameMatch> {
        self.match_normalized(&Normalized::new(query), &Normalized::new(name))
    }
}

/// Smith-Waterman matcher backed by nucleo-matcher.
///
/// nucleo scores are unbounded, so each score is divided by the score the
/// query gets against itself and the remainder is used as the dissimilarity.
/// nucleo only matches subsequences; names it rejects are retried with the
/// edit-distance matcher so typos and transposed letters still match.
pub struct NucleoMatcher {
    matcher: Matcher,
    threshold: f64,
    indices: Vec<u32>,
    fallback: EditDistanceMatcher,
}

impl Default for NucleoMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl NucleoMatcher {
    pub fn new(threshold: f64) -> Self {
        Self {
            matcher: Matcher::new(Config::DEFAULT),
            threshold,
            indices: Vec::new(),
            fallback: EditDistanceMatcher::new(threshold, DEFAULT_DISTANCE),
        }
    }

    /// Collapse matched char indices into contiguous spans
    fn spans_from_indices(indices: &mut [u32]) -> Vec<MatchSpan> {
        indices.sort_unstable();
        let mut spans: Vec<MatchSpan> = Vec::new();
        for &idx in indices.iter() {
            let idx = idx as usize;
            match spans.last_mut() {
                Some(last) if last.end == idx => last.end = idx + 1,
                Some(last) if last.end > idx => {}
                _ => spans.push(MatchSpan {
                    start: idx,
                    end: idx + 1,
                }),
            }
        }
        spans
    }

    /// Subsequence match scored by nucleo, `None` when out of threshold
    fn match_subsequence(&mut self, needle: &Normalized, haystack: &Normalized) -> Option<NameMatch> {
        // Char slices keep nucleo's indices aligned with `haystack.chars`
        let needle_str = Utf32Str::Unicode(&needle.chars);
        let haystack_str = Utf32Str::Unicode(&haystack.chars);

        let perfect = self.matcher.fuzzy_match(needle_str, needle_str)?;

        self.indices.clear();
        let score = self
            .matcher
            .fuzzy_indices(haystack_str, needle_str, &mut self.indices)?;

        let similarity = (score as f64 / f64::from(perfect.max(1))).min(1.0);
        let dissimilarity = (1.0 - similarity).max(MIN_INEXACT_SCORE);
        if dissimilarity > self.threshold {
            return None;
        }

        let spans = Self::spans_from_indices(&mut self.indices)
            .into_iter()
            .map(|span| haystack.original_span(span))
            .collect();
        Some(NameMatch {
            score: dissimilarity,
            spans,
        })
    }
}

impl NameMatcher for NucleoMatcher {
    fn match_name(&mut self, query: &str, name: &str) -> Option<NameMatch> {
        let needle = Normalized::new(query);
        let haystack = Normalized::new(name);

        if needle.chars.is_empty() {
            return None;
        }
        if needle.chars == haystack.chars {
            return Some(NameMatch::exact(haystack.source_len));
        }

        self.match_subsequence(&needle, &haystack)
            .or_else(|| self.fallback.match_normalized(&needle, &haystack))
    }
}
