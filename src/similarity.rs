//! Similarity Scoring Module
//!
//! Cosine similarity between fixed-length song feature vectors. Pure and
//! stateless, safe to call from any number of tasks at once.

use serde::{Deserialize, Serialize};

/// Ordered feature descriptor of a song. Two vectors are only comparable
/// when they have the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f32>);

impl FeatureVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Cosine similarity against another vector.
    pub fn similarity(&self, other: &FeatureVector) -> SimilarityScore {
        SimilarityScore(cosine_similarity(&self.0, &other.0))
    }
}

/// Result of comparing two feature vectors. Zero is a valid answer, not an
/// error marker.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct SimilarityScore(f32);

impl SimilarityScore {
    pub fn value(self) -> f32 {
        self.0
    }

    /// Rounded percentage, as shown next to a comparison.
    pub fn as_percent(self) -> u8 {
        (self.0.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

/// Compute cosine similarity between two feature vectors.
///
/// Returns 0 when the lengths differ or either vector has zero magnitude.
/// Sums are kept in `f64` so squared norms of any finite `f32` input neither
/// overflow nor underflow.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let (dot, norm_a, norm_b) = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| (f64::from(x), f64::from(y)))
        .fold((0.0f64, 0.0f64, 0.0f64), |(dot, na, nb), (x, y)| {
            (dot + x * y, na + x * x, nb + y * y)
        });

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let score = dot / (norm_a.sqrt() * norm_b.sqrt());
    if !score.is_finite() {
        return 0.0;
    }
    score.clamp(-1.0, 1.0) as f32
}
