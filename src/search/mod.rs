//! Name search over the record store
//!
//! Query normalization, pluggable fuzzy name matching, and ranking into
//! confidence-scored results.

pub mod fuzzy;
pub mod index;
pub mod ranking;

pub use fuzzy::{EditDistanceMatcher, MatchSpan, MatcherKind, NameMatch, NameMatcher, NucleoMatcher};
pub use index::{SearchIndex, SearchResult};
