//! Distance metrics over `f32` vectors.
//!
//! Each metric has a portable scalar definition in [`scalar`] and, on CPUs
//! with 128-bit four-lane float SIMD, a vectorized kernel in the `simd`
//! module. The best kernel per metric is resolved once at first use and
//! cached as a plain `fn` pointer, so the hot path pays a single indirect
//! call with no per-call feature branching.
//!
//! All functions require equal-length inputs. Lengths are checked with
//! `debug_assert!` only; the store validates dimensions before calling in.

pub mod scalar;

#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
mod simd;

use once_cell::sync::Lazy;

type DistanceFn = fn(&[f32], &[f32]) -> f32;

/// Kernel table resolved once per process.
struct KernelTable {
    dot: DistanceFn,
    squared_euclidean: DistanceFn,
}

static KERNELS: Lazy<KernelTable> = Lazy::new(KernelTable::detect);

impl KernelTable {
    /// Picks the best available kernel pair for the host CPU.
    fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            if is_x86_feature_detected!("fma") {
                Self {
                    dot: simd::dot_fma,
                    squared_euclidean: simd::squared_euclidean_fma,
                }
            } else {
                // SSE2 is part of the x86_64 baseline.
                Self {
                    dot: simd::dot_sse2,
                    squared_euclidean: simd::squared_euclidean_sse2,
                }
            }
        }

        #[cfg(target_arch = "aarch64")]
        {
            Self {
                dot: simd::dot_neon,
                squared_euclidean: simd::squared_euclidean_neon,
            }
        }

        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        {
            Self {
                dot: scalar::dot,
                squared_euclidean: scalar::squared_euclidean,
            }
        }
    }
}

/// Dot product of two equal-length vectors.
#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    (KERNELS.dot)(a, b)
}

/// Squared Euclidean distance between two equal-length vectors.
///
/// Monotone in the true L2 distance, so k-NN scans use it directly and
/// square-root only the final k results.
#[inline]
pub fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    (KERNELS.squared_euclidean)(a, b)
}

/// Euclidean (L2) distance between two equal-length vectors.
#[inline]
pub fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    squared_euclidean(a, b).sqrt()
}

/// L2 norm of a vector.
#[inline]
pub fn magnitude(v: &[f32]) -> f32 {
    dot(v, v).sqrt()
}

/// Cosine similarity in [-1, 1]. Returns 0 when either vector has zero
/// magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mag_a = magnitude(a);
    let mag_b = magnitude(b);
    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    dot(a, b) / (mag_a * mag_b)
}

/// Cosine distance, `1 - cosine_similarity`, in [0, 2].
#[inline]
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    1.0 - cosine_similarity(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean_345() {
        assert_eq!(euclidean(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
    }

    #[test]
    fn test_dot_matches_scalar_definition() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [5.0, 6.0, 7.0, 8.0];
        assert_eq!(dot(&a, &b), 70.0);
        assert_eq!(squared_euclidean(&a, &b), 64.0);
    }

    #[test]
    fn test_magnitude() {
        assert_eq!(magnitude(&[3.0, 4.0]), 5.0);
        assert_eq!(magnitude(&[0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_cosine_similarity_directions() {
        let e1 = [1.0, 0.0];
        let e2 = [0.0, 1.0];
        let neg = [-1.0, 0.0];

        assert!((cosine_similarity(&e1, &e1) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&e1, &e2).abs() < 1e-6);
        assert!((cosine_similarity(&e1, &neg) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_vector_guard() {
        let zero = [0.0, 0.0, 0.0];
        let v = [1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&zero, &v), 0.0);
        assert_eq!(cosine_distance(&zero, &v), 1.0);
    }

    #[test]
    fn test_self_distance_exactly_zero() {
        let v: Vec<f32> = (0..37).map(|i| (i as f32) * 0.31 - 5.0).collect();
        assert_eq!(squared_euclidean(&v, &v), 0.0);
        assert_eq!(euclidean(&v, &v), 0.0);
    }
}
