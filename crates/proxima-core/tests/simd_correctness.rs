//! Verifies that the dispatched (SIMD where available) distance kernels
//! agree with the scalar reference implementations across dimensions and
//! edge cases.

use proxima_core::distance::{self, scalar};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn generate_vector(dim: usize, rng: &mut StdRng) -> Vec<f32> {
    (0..dim).map(|_| rng.gen_range(-1.0f32..1.0)).collect()
}

fn rel_error(got: f32, want: f32) -> f32 {
    (got - want).abs() / want.abs().max(1.0)
}

#[test]
fn test_squared_euclidean_matches_scalar() {
    let mut rng = StdRng::seed_from_u64(42);
    for dim in [4, 8, 16, 32, 64, 128, 256] {
        let a = generate_vector(dim, &mut rng);
        let b = generate_vector(dim, &mut rng);

        let got = distance::squared_euclidean(&a, &b);
        let want = scalar::squared_euclidean(&a, &b);
        assert!(
            rel_error(got, want) <= 1e-5,
            "dim={dim}: dispatched={got}, scalar={want}"
        );
    }
}

#[test]
fn test_dot_matches_scalar() {
    let mut rng = StdRng::seed_from_u64(42);
    for dim in [4, 8, 16, 32, 64, 128, 256] {
        let a = generate_vector(dim, &mut rng);
        let b = generate_vector(dim, &mut rng);

        let got = distance::dot(&a, &b);
        let want = scalar::dot(&a, &b);
        assert!(
            rel_error(got, want) <= 1e-5,
            "dim={dim}: dispatched={got}, scalar={want}"
        );
    }
}

#[test]
fn test_non_multiple_of_lane_width() {
    // Exercise every bulk/tail/epilogue combination around the 16- and
    // 4-lane boundaries.
    let mut rng = StdRng::seed_from_u64(7);
    for dim in [4, 5, 6, 7, 9, 15, 17, 19, 31, 33, 63, 65, 127, 129] {
        let a = generate_vector(dim, &mut rng);
        let b = generate_vector(dim, &mut rng);

        assert!(rel_error(distance::dot(&a, &b), scalar::dot(&a, &b)) <= 1e-5);
        assert!(
            rel_error(
                distance::squared_euclidean(&a, &b),
                scalar::squared_euclidean(&a, &b)
            ) <= 1e-5
        );
    }
}

#[test]
fn test_small_vectors_take_scalar_path() {
    // Below four lanes the dispatcher must produce the scalar result bit
    // for bit.
    let a = vec![3.0];
    let b = vec![1.0];
    assert_eq!(distance::squared_euclidean(&a, &b), 4.0);
    assert_eq!(distance::dot(&a, &b), 3.0);

    let a3 = vec![1.0, 2.0, 3.0];
    let b3 = vec![4.0, 5.0, 6.0];
    assert_eq!(distance::dot(&a3, &b3), 32.0);
}

#[test]
fn test_minimum_simd_width_exact() {
    let a = vec![1.0, 2.0, 3.0, 4.0];
    let b = vec![5.0, 6.0, 7.0, 8.0];
    assert_eq!(distance::dot(&a, &b), 70.0);
    assert_eq!(distance::squared_euclidean(&a, &b), 64.0);
}

#[test]
fn test_zero_vectors() {
    let a = vec![0.0; 128];
    let b = vec![0.0; 128];
    assert_eq!(distance::squared_euclidean(&a, &b), 0.0);
    assert_eq!(distance::dot(&a, &b), 0.0);
}

#[test]
fn test_self_distance_exactly_zero() {
    let mut rng = StdRng::seed_from_u64(9);
    for dim in [1, 4, 17, 128] {
        let v = generate_vector(dim, &mut rng);
        assert_eq!(distance::squared_euclidean(&v, &v), 0.0);
    }
}

#[test]
fn test_magnitude_matches_scalar() {
    let mut rng = StdRng::seed_from_u64(42);
    let v = generate_vector(128, &mut rng);

    let want = scalar::dot(&v, &v).sqrt();
    assert!(rel_error(distance::magnitude(&v), want) <= 1e-5);
}

#[test]
fn test_cosine_similarity_matches_scalar() {
    let mut rng = StdRng::seed_from_u64(42);
    let a = generate_vector(128, &mut rng);
    let b = generate_vector(128, &mut rng);

    let want = scalar::dot(&a, &b)
        / (scalar::dot(&a, &a).sqrt() * scalar::dot(&b, &b).sqrt());
    assert!(rel_error(distance::cosine_similarity(&a, &b), want) <= 1e-5);
}

#[test]
fn test_cosine_distance_bounds() {
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..50 {
        let a = generate_vector(64, &mut rng);
        let b = generate_vector(64, &mut rng);
        let d = distance::cosine_distance(&a, &b);
        assert!((-1e-5..=2.0 + 1e-5).contains(&d), "cosine distance {d} out of range");
    }
}

#[test]
fn test_euclidean_is_sqrt_of_squared() {
    let a = vec![0.0, 0.0];
    let b = vec![3.0, 4.0];
    assert_eq!(distance::euclidean(&a, &b), 5.0);
}
