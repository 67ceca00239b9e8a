//! Property checks over seeded random detector outputs.

use detpost::{non_max_suppression, postprocess, DetectionSet, OwnedTensor, PostprocessConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SEEDS: [u64; 6] = [1, 7, 42, 1234, 9001, 65535];

/// Clustered boxes so that suppression actually has work to do.
fn make_tensor(rng: &mut StdRng, anchors: usize) -> OwnedTensor {
    let clusters: Vec<(f32, f32)> = (0..6)
        .map(|_| (rng.random_range(0.1..0.9), rng.random_range(0.1..0.9)))
        .collect();
    let mut records = Vec::with_capacity(anchors);
    for _ in 0..anchors {
        let (cx, cy) = clusters[rng.random_range(0..clusters.len())];
        records.push([
            cx + rng.random_range(-0.03..0.03),
            cy + rng.random_range(-0.03..0.03),
            rng.random_range(0.02..0.25),
            rng.random_range(0.02..0.25),
            rng.random::<f32>(),
        ]);
    }
    OwnedTensor::from_records(&records).unwrap()
}

fn cfg(confidence_threshold: f32, iou_threshold: f32, max_output_size: usize) -> PostprocessConfig {
    PostprocessConfig {
        confidence_threshold,
        iou_threshold,
        max_output_size,
        ..PostprocessConfig::default()
    }
}

fn bits(set: &DetectionSet) -> Vec<(usize, u32, [u32; 4])> {
    set.iter()
        .map(|d| (d.anchor, d.score.to_bits(), d.bbox.to_array().map(f32::to_bits)))
        .collect()
}

#[test]
fn output_has_no_pair_at_or_above_iou_threshold() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let tensor = make_tensor(&mut rng, 400);
        for iou in [0.1f32, 0.3, 0.5, 0.7] {
            let set = postprocess(tensor.view(), &cfg(0.2, iou, 100)).unwrap();
            let dets = set.as_slice();
            for i in 0..dets.len() {
                for j in (i + 1)..dets.len() {
                    assert!(dets[i].bbox.iou(&dets[j].bbox) < iou, "seed {seed}");
                }
            }
        }
    }
}

#[test]
fn output_is_sorted_and_above_confidence() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let tensor = make_tensor(&mut rng, 400);
        let set = postprocess(tensor.view(), &cfg(0.6, 0.5, 100)).unwrap();
        for d in set.iter() {
            assert!(d.score >= 0.6);
        }
        for pair in set.as_slice().windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }
}

#[test]
fn suppression_is_idempotent() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let tensor = make_tensor(&mut rng, 400);
        let first = postprocess(tensor.view(), &cfg(0.1, 0.45, 100))
            .unwrap()
            .into_vec();
        let mut again = first.clone();
        let second = non_max_suppression(&mut again, 100, 0.45);
        assert_eq!(first, second, "seed {seed}");
    }
}

#[test]
fn raising_confidence_never_grows_the_output() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let tensor = make_tensor(&mut rng, 400);
        let mut prev = usize::MAX;
        for step in 0..=20 {
            let threshold = step as f32 / 20.0;
            let set = postprocess(tensor.view(), &cfg(threshold, 0.5, 100)).unwrap();
            assert!(set.len() <= prev, "seed {seed} threshold {threshold}");
            prev = set.len();
        }
    }
}

#[test]
fn cap_is_respected() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let tensor = make_tensor(&mut rng, 400);
        let uncapped = postprocess(tensor.view(), &cfg(0.0, 0.9, 400)).unwrap();
        for cap in [1usize, 2, 5, 17] {
            let set = postprocess(tensor.view(), &cfg(0.0, 0.9, cap)).unwrap();
            assert!(set.len() <= cap);
            // Capping only truncates the uncapped selection.
            assert_eq!(set.as_slice(), &uncapped.as_slice()[..set.len()]);
        }
    }
}

#[test]
fn repeated_runs_are_bit_identical() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let tensor = make_tensor(&mut rng, 1000);
        let a = postprocess(tensor.view(), &cfg(0.3, 0.5, 100)).unwrap();
        let b = postprocess(tensor.clone().view(), &cfg(0.3, 0.5, 100)).unwrap();
        assert_eq!(bits(&a), bits(&b));
    }
}
