//! Sharded in-memory vector store with a Structure-of-Arrays layout.
//!
//! The store holds 16 independently lockable shards. Each shard keeps its
//! resident vectors in one contiguous `f32` buffer (row `i` occupies
//! `data[i * dim..(i + 1) * dim]`), an ordered id list, and an id-to-row
//! map, all guarded as a unit by the shard's reader/writer lock. Vectors
//! route to shards by a 32-bit FNV-1a hash of the id, so placement is
//! deterministic for a given identifier.
//!
//! Mutations lock exactly one shard; queries take per-shard read locks one
//! at a time, so concurrent searches share scan access and a writer only
//! blocks readers of its own shard.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::error::{ProximaError, Result};
use crate::search::{self, ScanMetric};
use crate::types::{DistanceMetric, SearchResult, Vector};

/// Number of shards. Fixed so that id-to-shard placement never changes.
pub(crate) const NUM_SHARDS: usize = 16;

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// 32-bit FNV-1a over raw bytes.
#[inline]
fn fnv1a32(bytes: &[u8]) -> u32 {
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in bytes {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// One shard's resident vectors.
///
/// Invariants, under the shard's lock:
/// - `ids.len() * dim == data.len()`
/// - `id_index[ids[i]] == i` for every row `i`, and vice versa
/// - no id appears twice
#[derive(Debug, Default)]
pub(crate) struct Shard {
    pub(crate) ids: Vec<String>,
    pub(crate) data: Vec<f32>,
    pub(crate) id_index: FxHashMap<String, usize>,
}

/// In-memory vector store supporting exact k-NN search.
///
/// The dimension is fixed at construction; every payload must have exactly
/// that many components.
pub struct VectorStore {
    shards: [RwLock<Shard>; NUM_SHARDS],
    dimension: usize,
}

impl VectorStore {
    /// Creates an empty store for vectors of the given dimension.
    ///
    /// # Panics
    ///
    /// Panics if `dimension` is zero.
    pub fn new(dimension: usize) -> Self {
        assert!(dimension >= 1, "dimension must be at least 1");
        tracing::debug!(dimension, "creating vector store");
        Self {
            shards: std::array::from_fn(|_| RwLock::new(Shard::default())),
            dimension,
        }
    }

    #[inline]
    fn shard_for(id: &str) -> usize {
        (fnv1a32(id.as_bytes()) % NUM_SHARDS as u32) as usize
    }

    pub(crate) fn shard(&self, index: usize) -> &RwLock<Shard> {
        &self.shards[index]
    }

    /// Inserts a vector, overwriting the payload in place if the id is
    /// already present (upsert).
    pub fn insert(&self, vector: Vector) -> Result<()> {
        if vector.id.is_empty() {
            return Err(ProximaError::EmptyId);
        }
        if vector.data.len() != self.dimension {
            return Err(ProximaError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.data.len(),
            });
        }

        let dim = self.dimension;
        let mut shard = self.shards[Self::shard_for(&vector.id)].write();

        if let Some(&row) = shard.id_index.get(&vector.id) {
            let start = row * dim;
            shard.data[start..start + dim].copy_from_slice(&vector.data);
            return Ok(());
        }

        let row = shard.ids.len();
        shard.id_index.insert(vector.id.clone(), row);
        shard.ids.push(vector.id);
        shard.data.extend_from_slice(&vector.data);
        Ok(())
    }

    /// Removes a vector by id.
    ///
    /// Uses swap-with-last to keep the data buffer densely packed: the
    /// final row moves into the freed slot, so row indices are not stable
    /// across deletes. The id is the only stable key.
    pub fn delete(&self, id: &str) -> Result<()> {
        let dim = self.dimension;
        let mut shard = self.shards[Self::shard_for(id)].write();

        let Some(row) = shard.id_index.remove(id) else {
            return Err(ProximaError::NotFound(id.to_string()));
        };

        let last = shard.ids.len() - 1;
        if row != last {
            shard.ids.swap(row, last);
            shard.data.copy_within(last * dim..(last + 1) * dim, row * dim);
            let moved = shard.ids[row].clone();
            shard.id_index.insert(moved, row);
        }
        shard.ids.truncate(last);
        shard.data.truncate(last * dim);
        Ok(())
    }

    /// Number of vectors currently resident.
    ///
    /// Each shard is read-locked briefly in turn; the sum is consistent
    /// per shard but does not correspond to a single global instant.
    pub fn count(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().ids.len()).sum()
    }

    /// Whether the store holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// The fixed dimension of this store.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn validate_query(&self, query: &[f32]) -> Result<()> {
        if query.len() != self.dimension {
            return Err(ProximaError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        Ok(())
    }

    /// Returns the `k` nearest vectors by Euclidean distance, closest
    /// first. Distances are true L2, not squared.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        self.validate_query(query)?;
        let mut results = search::parallel_search(self, query, k, ScanMetric::SquaredEuclidean);
        // The scan ranks by squared L2; surface the true distance.
        for result in &mut results {
            result.distance = result.distance.sqrt();
        }
        Ok(results)
    }

    /// Returns the `k` nearest vectors by cosine distance
    /// (`1 - cosine_similarity`, in [0, 2]), closest first.
    pub fn search_cosine(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        self.validate_query(query)?;
        Ok(search::parallel_search(self, query, k, ScanMetric::Cosine))
    }

    /// Returns the `k` vectors with the highest dot product against the
    /// query. Reported distances are the negated dot product, so lower
    /// still means closer and results stay in ascending order.
    pub fn search_dot(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        self.validate_query(query)?;
        Ok(search::parallel_search(self, query, k, ScanMetric::NegatedDot))
    }

    /// Searches under the given metric. See the per-metric methods for the
    /// meaning of the returned distances.
    pub fn search_with(
        &self,
        query: &[f32],
        k: usize,
        metric: DistanceMetric,
    ) -> Result<Vec<SearchResult>> {
        match metric {
            DistanceMetric::Euclidean => self.search(query, k),
            DistanceMetric::Cosine => self.search_cosine(query, k),
            DistanceMetric::Dot => self.search_dot(query, k),
        }
    }
}
