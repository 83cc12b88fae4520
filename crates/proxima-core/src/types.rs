//! Core data types shared across the store and search modules

use serde::{Deserialize, Serialize};

/// A vector to be stored: an identifier plus its payload.
///
/// The identifier is an opaque non-empty string; the payload length must
/// equal the owning store's fixed dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    /// Opaque identifier; routes the vector to its shard
    pub id: String,
    /// Payload of exactly `dimension` components
    pub data: Vec<f32>,
}

impl Vector {
    /// Convenience constructor
    pub fn new(id: impl Into<String>, data: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

/// A single search hit.
///
/// The meaning of `distance` depends on the metric that produced it, but
/// lower always means closer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Identifier of the matched vector
    pub id: String,
    /// Distance to the query under the search metric
    pub distance: f32,
}

/// Distance metric selector for [`crate::VectorStore::search_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// True L2 distance (scanned as squared L2, square-rooted on output)
    Euclidean,
    /// Cosine distance, `1 - cosine_similarity`, in [0, 2]
    Cosine,
    /// Dot product, reported as a negated dot so lower means closer
    Dot,
}
