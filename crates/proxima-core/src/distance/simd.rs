//! 128-bit four-lane SIMD distance kernels.
//!
//! Each kernel processes 16 lanes per main-loop iteration into four
//! independent accumulators, so four fused-multiply-add dependency chains
//! run in parallel and the FMA latency is hidden by instruction-level
//! parallelism. A 4-lane tail loop feeds the first accumulator, the four
//! accumulators are reduced pairwise and horizontally summed, and up to
//! three leftover lanes are handled by a scalar epilogue.
//!
//! The safe wrappers fall back to [`super::scalar`] for operands shorter
//! than one SIMD register. Kernel selection is done once by
//! [`super::KernelTable::detect`]; the FMA wrappers must only be installed
//! after runtime feature detection.

#[allow(unused_imports)]
use super::scalar;

// ============================================================================
// x86_64: SSE2 baseline, FMA when detected
// ============================================================================

#[cfg(target_arch = "x86_64")]
mod x86 {
    use super::scalar;
    use std::arch::x86_64::*;

    /// Horizontal sum of the four lanes of an SSE register. SSE2-only ops.
    #[inline]
    unsafe fn hsum(v: __m128) -> f32 {
        let hi = _mm_movehl_ps(v, v);
        let pair = _mm_add_ps(v, hi);
        let lane1 = _mm_shuffle_ps(pair, pair, 0x55);
        _mm_cvtss_f32(_mm_add_ss(pair, lane1))
    }

    /// Dot product on the SSE2 baseline (multiply then add).
    pub fn dot_sse2(a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len());
        if a.len() < 4 {
            return scalar::dot(a, b);
        }
        // SAFETY: SSE2 is part of the x86_64 baseline; bounds are tracked
        // by the remaining-lane counter.
        unsafe { dot_sse2_impl(a, b) }
    }

    unsafe fn dot_sse2_impl(a: &[f32], b: &[f32]) -> f32 {
        let mut ap = a.as_ptr();
        let mut bp = b.as_ptr();
        let mut remaining = a.len();

        let mut acc0 = _mm_setzero_ps();
        let mut acc1 = _mm_setzero_ps();
        let mut acc2 = _mm_setzero_ps();
        let mut acc3 = _mm_setzero_ps();

        while remaining >= 16 {
            acc0 = _mm_add_ps(acc0, _mm_mul_ps(_mm_loadu_ps(ap), _mm_loadu_ps(bp)));
            acc1 = _mm_add_ps(
                acc1,
                _mm_mul_ps(_mm_loadu_ps(ap.add(4)), _mm_loadu_ps(bp.add(4))),
            );
            acc2 = _mm_add_ps(
                acc2,
                _mm_mul_ps(_mm_loadu_ps(ap.add(8)), _mm_loadu_ps(bp.add(8))),
            );
            acc3 = _mm_add_ps(
                acc3,
                _mm_mul_ps(_mm_loadu_ps(ap.add(12)), _mm_loadu_ps(bp.add(12))),
            );
            ap = ap.add(16);
            bp = bp.add(16);
            remaining -= 16;
        }

        while remaining >= 4 {
            acc0 = _mm_add_ps(acc0, _mm_mul_ps(_mm_loadu_ps(ap), _mm_loadu_ps(bp)));
            ap = ap.add(4);
            bp = bp.add(4);
            remaining -= 4;
        }

        acc0 = _mm_add_ps(acc0, acc1);
        acc2 = _mm_add_ps(acc2, acc3);
        let mut sum = hsum(_mm_add_ps(acc0, acc2));

        for i in 0..remaining {
            sum += *ap.add(i) * *bp.add(i);
        }
        sum
    }

    /// Squared Euclidean distance on the SSE2 baseline.
    pub fn squared_euclidean_sse2(a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len());
        if a.len() < 4 {
            return scalar::squared_euclidean(a, b);
        }
        // SAFETY: SSE2 is part of the x86_64 baseline; bounds are tracked
        // by the remaining-lane counter.
        unsafe { squared_euclidean_sse2_impl(a, b) }
    }

    unsafe fn squared_euclidean_sse2_impl(a: &[f32], b: &[f32]) -> f32 {
        let mut ap = a.as_ptr();
        let mut bp = b.as_ptr();
        let mut remaining = a.len();

        let mut acc0 = _mm_setzero_ps();
        let mut acc1 = _mm_setzero_ps();
        let mut acc2 = _mm_setzero_ps();
        let mut acc3 = _mm_setzero_ps();

        while remaining >= 16 {
            let d0 = _mm_sub_ps(_mm_loadu_ps(ap), _mm_loadu_ps(bp));
            let d1 = _mm_sub_ps(_mm_loadu_ps(ap.add(4)), _mm_loadu_ps(bp.add(4)));
            let d2 = _mm_sub_ps(_mm_loadu_ps(ap.add(8)), _mm_loadu_ps(bp.add(8)));
            let d3 = _mm_sub_ps(_mm_loadu_ps(ap.add(12)), _mm_loadu_ps(bp.add(12)));
            acc0 = _mm_add_ps(acc0, _mm_mul_ps(d0, d0));
            acc1 = _mm_add_ps(acc1, _mm_mul_ps(d1, d1));
            acc2 = _mm_add_ps(acc2, _mm_mul_ps(d2, d2));
            acc3 = _mm_add_ps(acc3, _mm_mul_ps(d3, d3));
            ap = ap.add(16);
            bp = bp.add(16);
            remaining -= 16;
        }

        while remaining >= 4 {
            let d = _mm_sub_ps(_mm_loadu_ps(ap), _mm_loadu_ps(bp));
            acc0 = _mm_add_ps(acc0, _mm_mul_ps(d, d));
            ap = ap.add(4);
            bp = bp.add(4);
            remaining -= 4;
        }

        acc0 = _mm_add_ps(acc0, acc1);
        acc2 = _mm_add_ps(acc2, acc3);
        let mut sum = hsum(_mm_add_ps(acc0, acc2));

        for i in 0..remaining {
            let d = *ap.add(i) - *bp.add(i);
            sum += d * d;
        }
        sum
    }

    /// Dot product using fused multiply-add.
    pub fn dot_fma(a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len());
        if a.len() < 4 {
            return scalar::dot(a, b);
        }
        // SAFETY: this wrapper is installed in the kernel table only after
        // `is_x86_feature_detected!("fma")` succeeded.
        unsafe { dot_fma_impl(a, b) }
    }

    #[target_feature(enable = "fma")]
    unsafe fn dot_fma_impl(a: &[f32], b: &[f32]) -> f32 {
        let mut ap = a.as_ptr();
        let mut bp = b.as_ptr();
        let mut remaining = a.len();

        let mut acc0 = _mm_setzero_ps();
        let mut acc1 = _mm_setzero_ps();
        let mut acc2 = _mm_setzero_ps();
        let mut acc3 = _mm_setzero_ps();

        while remaining >= 16 {
            acc0 = _mm_fmadd_ps(_mm_loadu_ps(ap), _mm_loadu_ps(bp), acc0);
            acc1 = _mm_fmadd_ps(_mm_loadu_ps(ap.add(4)), _mm_loadu_ps(bp.add(4)), acc1);
            acc2 = _mm_fmadd_ps(_mm_loadu_ps(ap.add(8)), _mm_loadu_ps(bp.add(8)), acc2);
            acc3 = _mm_fmadd_ps(_mm_loadu_ps(ap.add(12)), _mm_loadu_ps(bp.add(12)), acc3);
            ap = ap.add(16);
            bp = bp.add(16);
            remaining -= 16;
        }

        while remaining >= 4 {
            acc0 = _mm_fmadd_ps(_mm_loadu_ps(ap), _mm_loadu_ps(bp), acc0);
            ap = ap.add(4);
            bp = bp.add(4);
            remaining -= 4;
        }

        acc0 = _mm_add_ps(acc0, acc1);
        acc2 = _mm_add_ps(acc2, acc3);
        let mut sum = hsum(_mm_add_ps(acc0, acc2));

        for i in 0..remaining {
            sum += *ap.add(i) * *bp.add(i);
        }
        sum
    }

    /// Squared Euclidean distance using fused multiply-add.
    pub fn squared_euclidean_fma(a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len());
        if a.len() < 4 {
            return scalar::squared_euclidean(a, b);
        }
        // SAFETY: this wrapper is installed in the kernel table only after
        // `is_x86_feature_detected!("fma")` succeeded.
        unsafe { squared_euclidean_fma_impl(a, b) }
    }

    #[target_feature(enable = "fma")]
    unsafe fn squared_euclidean_fma_impl(a: &[f32], b: &[f32]) -> f32 {
        let mut ap = a.as_ptr();
        let mut bp = b.as_ptr();
        let mut remaining = a.len();

        let mut acc0 = _mm_setzero_ps();
        let mut acc1 = _mm_setzero_ps();
        let mut acc2 = _mm_setzero_ps();
        let mut acc3 = _mm_setzero_ps();

        while remaining >= 16 {
            let d0 = _mm_sub_ps(_mm_loadu_ps(ap), _mm_loadu_ps(bp));
            let d1 = _mm_sub_ps(_mm_loadu_ps(ap.add(4)), _mm_loadu_ps(bp.add(4)));
            let d2 = _mm_sub_ps(_mm_loadu_ps(ap.add(8)), _mm_loadu_ps(bp.add(8)));
            let d3 = _mm_sub_ps(_mm_loadu_ps(ap.add(12)), _mm_loadu_ps(bp.add(12)));
            acc0 = _mm_fmadd_ps(d0, d0, acc0);
            acc1 = _mm_fmadd_ps(d1, d1, acc1);
            acc2 = _mm_fmadd_ps(d2, d2, acc2);
            acc3 = _mm_fmadd_ps(d3, d3, acc3);
            ap = ap.add(16);
            bp = bp.add(16);
            remaining -= 16;
        }

        while remaining >= 4 {
            let d = _mm_sub_ps(_mm_loadu_ps(ap), _mm_loadu_ps(bp));
            acc0 = _mm_fmadd_ps(d, d, acc0);
            ap = ap.add(4);
            bp = bp.add(4);
            remaining -= 4;
        }

        acc0 = _mm_add_ps(acc0, acc1);
        acc2 = _mm_add_ps(acc2, acc3);
        let mut sum = hsum(_mm_add_ps(acc0, acc2));

        for i in 0..remaining {
            let d = *ap.add(i) - *bp.add(i);
            sum += d * d;
        }
        sum
    }
}

#[cfg(target_arch = "x86_64")]
pub use x86::{dot_fma, dot_sse2, squared_euclidean_fma, squared_euclidean_sse2};

// ============================================================================
// aarch64: NEON (part of the baseline, always available)
// ============================================================================

#[cfg(target_arch = "aarch64")]
mod neon {
    use super::scalar;
    use std::arch::aarch64::*;

    /// NEON dot product.
    pub fn dot_neon(a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len());
        if a.len() < 4 {
            return scalar::dot(a, b);
        }
        // SAFETY: NEON is part of the aarch64 baseline; bounds are tracked
        // by the remaining-lane counter.
        unsafe { dot_neon_impl(a, b) }
    }

    unsafe fn dot_neon_impl(a: &[f32], b: &[f32]) -> f32 {
        let mut ap = a.as_ptr();
        let mut bp = b.as_ptr();
        let mut remaining = a.len();

        let mut acc0 = vdupq_n_f32(0.0);
        let mut acc1 = vdupq_n_f32(0.0);
        let mut acc2 = vdupq_n_f32(0.0);
        let mut acc3 = vdupq_n_f32(0.0);

        while remaining >= 16 {
            acc0 = vfmaq_f32(acc0, vld1q_f32(ap), vld1q_f32(bp));
            acc1 = vfmaq_f32(acc1, vld1q_f32(ap.add(4)), vld1q_f32(bp.add(4)));
            acc2 = vfmaq_f32(acc2, vld1q_f32(ap.add(8)), vld1q_f32(bp.add(8)));
            acc3 = vfmaq_f32(acc3, vld1q_f32(ap.add(12)), vld1q_f32(bp.add(12)));
            ap = ap.add(16);
            bp = bp.add(16);
            remaining -= 16;
        }

        while remaining >= 4 {
            acc0 = vfmaq_f32(acc0, vld1q_f32(ap), vld1q_f32(bp));
            ap = ap.add(4);
            bp = bp.add(4);
            remaining -= 4;
        }

        let sum01 = vaddq_f32(acc0, acc1);
        let sum23 = vaddq_f32(acc2, acc3);
        let mut sum = vaddvq_f32(vaddq_f32(sum01, sum23));

        for i in 0..remaining {
            sum += *ap.add(i) * *bp.add(i);
        }
        sum
    }

    /// NEON squared Euclidean distance.
    pub fn squared_euclidean_neon(a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len());
        if a.len() < 4 {
            return scalar::squared_euclidean(a, b);
        }
        // SAFETY: NEON is part of the aarch64 baseline; bounds are tracked
        // by the remaining-lane counter.
        unsafe { squared_euclidean_neon_impl(a, b) }
    }

    unsafe fn squared_euclidean_neon_impl(a: &[f32], b: &[f32]) -> f32 {
        let mut ap = a.as_ptr();
        let mut bp = b.as_ptr();
        let mut remaining = a.len();

        let mut acc0 = vdupq_n_f32(0.0);
        let mut acc1 = vdupq_n_f32(0.0);
        let mut acc2 = vdupq_n_f32(0.0);
        let mut acc3 = vdupq_n_f32(0.0);

        while remaining >= 16 {
            let d0 = vsubq_f32(vld1q_f32(ap), vld1q_f32(bp));
            let d1 = vsubq_f32(vld1q_f32(ap.add(4)), vld1q_f32(bp.add(4)));
            let d2 = vsubq_f32(vld1q_f32(ap.add(8)), vld1q_f32(bp.add(8)));
            let d3 = vsubq_f32(vld1q_f32(ap.add(12)), vld1q_f32(bp.add(12)));
            acc0 = vfmaq_f32(acc0, d0, d0);
            acc1 = vfmaq_f32(acc1, d1, d1);
            acc2 = vfmaq_f32(acc2, d2, d2);
            acc3 = vfmaq_f32(acc3, d3, d3);
            ap = ap.add(16);
            bp = bp.add(16);
            remaining -= 16;
        }

        while remaining >= 4 {
            let d = vsubq_f32(vld1q_f32(ap), vld1q_f32(bp));
            acc0 = vfmaq_f32(acc0, d, d);
            ap = ap.add(4);
            bp = bp.add(4);
            remaining -= 4;
        }

        let sum01 = vaddq_f32(acc0, acc1);
        let sum23 = vaddq_f32(acc2, acc3);
        let mut sum = vaddvq_f32(vaddq_f32(sum01, sum23));

        for i in 0..remaining {
            let d = *ap.add(i) - *bp.add(i);
            sum += d * d;
        }
        sum
    }
}

#[cfg(target_arch = "aarch64")]
pub use neon::{dot_neon, squared_euclidean_neon};
