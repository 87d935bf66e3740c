//! Ranking & Scoring
//!
//! Turns a matcher's raw dissimilarity into the final score used for ordering
//! and the confidence percentage shown to callers.

/// Field-length norm: names with more tokens make a partial match worth less.
///
/// `1 / sqrt(tokens)`, rounded to three decimals. Tokens are space-delimited.
pub fn field_norm(name: &str) -> f64 {
    let tokens = name.split(' ').filter(|t| !t.is_empty()).count().max(1);
    let norm = 1.0 / (tokens as f64).sqrt();
    (norm * 1000.0).round() / 1000.0
}

/// Apply the field norm to a raw score. Lower is better.
///
/// An exact match (0) is lifted to `f64::EPSILON` so it still ranks by norm.
pub fn final_score(raw: f64, norm: f64) -> f64 {
    let base = if raw == 0.0 { f64::EPSILON } else { raw };
    base.powf(norm)
}

/// Confidence percentage for a final score
pub fn confidence(score: f64) -> u8 {
    ((1.0 - score) * 100.0).round().clamp(0.0, 100.0) as u8
}
