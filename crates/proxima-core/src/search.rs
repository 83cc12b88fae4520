//! Parallel k-NN search across the shard set.
//!
//! A query fans out to W = min(pool threads, 16) workers, each scanning a
//! contiguous group of shards under their read locks while maintaining a
//! bounded max-heap of the k best candidates seen. After a barrier join, a
//! single-threaded merge runs the same bounded-heap procedure over the at
//! most W * k survivors, so the merge needs no shard locks and stays
//! O(16 * k) in the worst case.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rayon::prelude::*;

use crate::distance;
use crate::store::{VectorStore, NUM_SHARDS};
use crate::types::SearchResult;

/// Metric evaluated in the inner scan loop. Lower is always closer.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ScanMetric {
    /// Squared L2. Monotone in true L2; callers square-root the final k.
    SquaredEuclidean,
    /// Cosine distance, used directly.
    Cosine,
    /// Negated dot product, so the shared max-heap machinery applies.
    NegatedDot,
}

impl ScanMetric {
    #[inline]
    fn eval(self, query: &[f32], row: &[f32]) -> f32 {
        match self {
            ScanMetric::SquaredEuclidean => distance::squared_euclidean(query, row),
            ScanMetric::Cosine => distance::cosine_distance(query, row),
            ScanMetric::NegatedDot => -distance::dot(query, row),
        }
    }
}

/// Heap entry. Ordered by distance (then id, purely to make the order
/// total); ties between equal distances are broken arbitrarily.
#[derive(Debug)]
struct Candidate {
    id: String,
    distance: f32,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Bounded max-heap over candidates: the root is the worst retained
/// distance, evicted when a strictly better candidate arrives at capacity.
struct TopK {
    k: usize,
    heap: BinaryHeap<Candidate>,
}

impl TopK {
    fn new(k: usize) -> Self {
        Self {
            k,
            heap: BinaryHeap::new(),
        }
    }

    /// Offers a candidate by reference; the id is cloned only when the
    /// candidate is actually retained.
    fn offer(&mut self, id: &str, distance: f32) {
        if self.heap.len() < self.k {
            self.heap.push(Candidate {
                id: id.to_owned(),
                distance,
            });
        } else if let Some(worst) = self.heap.peek() {
            if distance < worst.distance {
                self.heap.pop();
                self.heap.push(Candidate {
                    id: id.to_owned(),
                    distance,
                });
            }
        }
    }

    /// Offers an already-owned candidate (merge path).
    fn offer_candidate(&mut self, candidate: Candidate) {
        if self.heap.len() < self.k {
            self.heap.push(candidate);
        } else if let Some(worst) = self.heap.peek() {
            if candidate.distance < worst.distance {
                self.heap.pop();
                self.heap.push(candidate);
            }
        }
    }

    fn into_candidates(self) -> Vec<Candidate> {
        self.heap.into_vec()
    }

    /// Drains into ascending-distance order.
    fn into_results(self) -> Vec<SearchResult> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|candidate| SearchResult {
                id: candidate.id,
                distance: candidate.distance,
            })
            .collect()
    }
}

/// Scans every shard with W workers and merges their local top-k heaps
/// into the globally best k, ascending by distance.
pub(crate) fn parallel_search(
    store: &VectorStore,
    query: &[f32],
    k: usize,
    metric: ScanMetric,
) -> Vec<SearchResult> {
    if k == 0 {
        return Vec::new();
    }

    let workers = rayon::current_num_threads().min(NUM_SHARDS);
    let group_size = NUM_SHARDS.div_ceil(workers);
    let dim = store.dimension();

    let locals: Vec<Vec<Candidate>> = (0..workers)
        .into_par_iter()
        .map(|worker| {
            let mut top = TopK::new(k);
            let start = worker * group_size;
            let end = NUM_SHARDS.min(start + group_size);
            for index in start..end {
                let shard = store.shard(index).read();
                for (row, id) in shard.ids.iter().enumerate() {
                    let payload = &shard.data[row * dim..(row + 1) * dim];
                    top.offer(id, metric.eval(query, payload));
                }
            }
            top.into_candidates()
        })
        .collect();

    let mut merged = TopK::new(k);
    for candidate in locals.into_iter().flatten() {
        merged.offer_candidate(candidate);
    }
    merged.into_results()
}
