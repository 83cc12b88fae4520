//! # Proxima Core
//!
//! Embeddable, in-memory brute-force k-nearest-neighbor engine over
//! fixed-dimension `f32` vectors.
//!
//! Three pieces combine for interactive latency on ~100k vectors at ~100
//! dimensions:
//!
//! - **SIMD distance kernels** ([`distance`]): squared Euclidean, dot
//!   product, and cosine metrics with 128-bit four-lane kernels and
//!   four-accumulator unrolling, dispatched once per process.
//! - **Sharded SoA store** ([`store`]): 16 independently locked shards,
//!   each packing payloads into one contiguous buffer so scans stream
//!   through memory.
//! - **Parallel top-k search**: per-worker bounded max-heaps over shard
//!   groups, merged into the global best k.
//!
//! Search is exact; there is no recall approximation, persistence, or
//! network surface.
//!
//! ```
//! use proxima_core::{Vector, VectorStore};
//!
//! let store = VectorStore::new(2);
//! store.insert(Vector::new("origin", vec![0.0, 0.0]))?;
//! store.insert(Vector::new("far", vec![10.0, 10.0]))?;
//!
//! let results = store.search(&[1.0, 0.0], 1)?;
//! assert_eq!(results[0].id, "origin");
//! # Ok::<(), proxima_core::ProximaError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod distance;
pub mod error;
mod search;
pub mod store;
pub mod types;

pub use error::{ProximaError, Result};
pub use store::VectorStore;
pub use types::{DistanceMetric, SearchResult, Vector};
