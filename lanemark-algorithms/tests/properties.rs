use std::collections::HashSet;

use lanemark_algorithms::{classify_lanes, LaneConfig, LineSegment};

/// Deterministic segment soup: two noisy lanes plus some clutter.
fn generate(seed: u64, count: usize) -> Vec<LineSegment> {
    let mut state = seed;
    let mut next = move |modulo: i32| {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        ((state >> 33) % u64::from(modulo.unsigned_abs())) as i32
    };

    (0..count)
        .map(|i| {
            let x = next(600);
            let y = next(400);
            let dx = 20 + next(80);
            let dy = match i % 3 {
                0 => -(dx * (60 + next(20))) / 100,
                1 => (dx * (60 + next(20))) / 100,
                _ => next(2 * dx) - dx,
            };
            LineSegment::new(x, y, x + dx, y + dy)
        })
        .collect()
}

fn config(ratio: f64) -> LaneConfig {
    LaneConfig::new().with_n_lines(4).with_cluster_thresh_ratio(ratio)
}

#[test]
fn test_clusters_only_contain_input_segments() {
    for seed in 1..20 {
        let lines = generate(seed, 30);
        let result = classify_lanes(&config(0.7), &lines);
        for segment in result.left.iter().chain(&result.right) {
            assert!(lines.contains(segment), "seed {seed}: {segment} not in input");
        }
    }
}

#[test]
fn test_clusters_are_disjoint() {
    for seed in 1..20 {
        let lines = generate(seed, 30);
        let result = classify_lanes(&config(0.85), &lines);

        let left: HashSet<_> = result.left.iter().collect();
        assert!(
            result.right.iter().all(|s| !left.contains(s)),
            "seed {seed}: clusters overlap"
        );
        if let (Some(l), Some(r)) = (result.left.last(), result.right.last()) {
            assert!(l.slope().unwrap() < r.slope().unwrap());
        }
    }
}

#[test]
fn test_raising_ratio_never_grows_clusters() {
    let ratios = [0.05, 0.2, 0.4, 0.6, 0.75, 0.85, 0.95, 1.0];
    for seed in 1..20 {
        let lines = generate(seed, 40);
        let sizes: Vec<_> = ratios
            .iter()
            .map(|&ratio| {
                let result = classify_lanes(&config(ratio), &lines);
                (result.left.len(), result.right.len())
            })
            .collect();

        for pair in sizes.windows(2) {
            assert!(pair[1].0 <= pair[0].0, "seed {seed}: left grew {sizes:?}");
            assert!(pair[1].1 <= pair[0].1, "seed {seed}: right grew {sizes:?}");
        }
    }
}

#[test]
fn test_classification_is_repeatable() {
    for seed in 1..10 {
        let lines = generate(seed, 25);
        let first = classify_lanes(&config(0.85), &lines);
        let second = classify_lanes(&config(0.85), &lines);
        assert_eq!(first, second);
        assert_eq!(
            first.mean_slope.map(f64::to_bits),
            second.mean_slope.map(f64::to_bits)
        );
    }
}

#[test]
fn test_below_guard_is_always_empty() {
    for count in 0..8 {
        let lines = generate(7, count);
        let result = classify_lanes(&config(0.85), &lines);
        assert!(result.is_empty(), "{count} segments should not be classified");
    }
}

#[test]
fn test_duplicates_are_preserved() {
    let a = LineSegment::new(0, 100, 100, 20);
    let b = LineSegment::new(300, 20, 400, 100);
    let lines = vec![a, a, a, b, b, b, LineSegment::new(0, 0, 100, 10), a, b];
    let result = classify_lanes(&config(0.85), &lines);

    assert_eq!(result.left, vec![a; 4]);
    assert_eq!(result.right, vec![b; 4]);
}
