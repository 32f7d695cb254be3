use fit_core::error::{FitError, FitResult};
use fit_core::points::PointSet;

use crate::cache::{RmsdSeriesCache, SeriesKind};
use crate::config::FitConfig;
use crate::modifier::{FitModifier, BASE_NAME};
use crate::pipeline::{FrameSource, ParticleFrame};

struct InMemorySource {
    frames: Vec<ParticleFrame>,
}

impl InMemorySource {
    fn new(frames: Vec<ParticleFrame>) -> Self {
        Self { frames }
    }
}

impl FrameSource for InMemorySource {
    fn n_frames(&self) -> usize {
        self.frames.len()
    }

    fn compute(&self, frame: usize) -> FitResult<ParticleFrame> {
        self.frames
            .get(frame)
            .cloned()
            .ok_or_else(|| FitError::Invalid(format!("frame index {frame} out of range")))
    }
}

fn unit_square() -> Vec<[f64; 3]> {
    vec![
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
    ]
}

fn rotate_z(p: [f64; 3], degrees: f64) -> [f64; 3] {
    let (s, c) = degrees.to_radians().sin_cos();
    [c * p[0] - s * p[1], s * p[0] + c * p[1], p[2]]
}

fn translate(p: [f64; 3], t: [f64; 3]) -> [f64; 3] {
    [p[0] + t[0], p[1] + t[1], p[2] + t[2]]
}

fn frame_from(positions: Vec<[f64; 3]>, ids: Vec<i64>) -> ParticleFrame {
    ParticleFrame::new(PointSet::new(positions).with_identifiers(ids))
}

fn full_set_config() -> FitConfig {
    FitConfig {
        selected_only: false,
        reference_frame: 0,
    }
}

#[test]
fn aligns_rotated_translated_square_onto_reference() {
    let reference = frame_from(unit_square(), vec![1, 2, 3, 4]);
    let moved: Vec<[f64; 3]> = unit_square()
        .into_iter()
        .map(|p| translate(rotate_z(p, 90.0), [5.0, 0.0, 0.0]))
        .collect();
    let source = InMemorySource::new(vec![reference, frame_from(moved, vec![1, 2, 3, 4])]);
    let cache = RmsdSeriesCache::new();
    let modifier = FitModifier::new(full_set_config());

    let mut data = source.compute(1).unwrap();
    modifier.evaluate(&mut data, 1, &source, &cache).unwrap();

    for (aligned, expected) in data.points.positions.iter().zip(unit_square()) {
        for axis in 0..3 {
            assert!((aligned[axis] - expected[axis]).abs() < 1e-9);
        }
    }
    assert!(data.attributes["Fit.RMSD"].abs() < 1e-12);
    assert!(data.attributes["Fit.RMSD_all"].abs() < 1e-12);
    let per_point = &data.properties["RMSD"];
    assert_eq!(per_point.len(), 4);
    assert!(per_point.iter().all(|v| v.abs() < 1e-12));

    let table = &data.tables["Fit.RMSD"];
    assert_eq!(table.x.len(), 2);
    assert!(table.y[0].is_nan());
    assert!(table.y[1].abs() < 1e-12);
    assert!(cache.snapshot("Fit", SeriesKind::Rmsd).unwrap()[0].is_nan());
}

#[test]
fn subset_alignment_reports_unselected_deviation_in_whole_set_error() {
    let mut ref_positions = unit_square();
    ref_positions.push([2.0, 2.0, 0.0]);
    let mut reference = frame_from(ref_positions.clone(), vec![1, 2, 3, 4, 5]);
    reference.points.selection = Some(vec![true, true, true, true, false]);

    // Rigidly move the whole frame, then push the unselected point one
    // unit out of plane so only the whole-set error sees it.
    let mut moved: Vec<[f64; 3]> = ref_positions
        .iter()
        .map(|&p| translate(rotate_z(p, 90.0), [5.0, -1.0, 2.0]))
        .collect();
    moved[4][2] += 1.0;
    let mut current = frame_from(moved, vec![1, 2, 3, 4, 5]);
    current.points.selection = Some(vec![true, true, true, true, false]);

    let source = InMemorySource::new(vec![reference, current]);
    let cache = RmsdSeriesCache::new();
    let modifier = FitModifier::new(FitConfig::default());

    let mut data = source.compute(1).unwrap();
    modifier.evaluate(&mut data, 1, &source, &cache).unwrap();

    assert!(data.attributes["Fit.RMSD"].abs() < 1e-12);
    // One squared unit of deviation spread over 5 points x 3 components.
    assert!((data.attributes["Fit.RMSD_all"] - 1.0 / 15.0).abs() < 1e-9);
    let per_point = &data.properties["RMSD"];
    assert!(per_point[..4].iter().all(|v| v.abs() < 1e-12));
    assert!((per_point[4] - 1.0 / 3.0).abs() < 1e-9);
}

#[test]
fn selected_only_without_flags_fails_and_leaves_cache_empty() {
    let source = InMemorySource::new(vec![
        frame_from(unit_square(), vec![1, 2, 3, 4]),
        frame_from(unit_square(), vec![1, 2, 3, 4]),
    ]);
    let cache = RmsdSeriesCache::new();
    let modifier = FitModifier::new(FitConfig::default());

    let mut data = source.compute(1).unwrap();
    let err = modifier.evaluate(&mut data, 1, &source, &cache).unwrap_err();
    assert!(matches!(err, FitError::MissingSelection(_)));
    assert!(!cache.contains(BASE_NAME));
}

#[test]
fn identifier_set_mismatch_fails_and_leaves_cache_empty() {
    let source = InMemorySource::new(vec![
        frame_from(unit_square(), vec![1, 2, 4, 5]),
        frame_from(unit_square(), vec![1, 2, 3, 5]),
    ]);
    let cache = RmsdSeriesCache::new();
    let modifier = FitModifier::new(full_set_config());

    let mut data = source.compute(1).unwrap();
    let err = modifier.evaluate(&mut data, 1, &source, &cache).unwrap_err();
    assert!(matches!(err, FitError::CorrespondenceMismatch(_)));
    assert!(!cache.contains(BASE_NAME));
}

#[test]
fn empty_selection_is_degenerate() {
    let mut reference = frame_from(unit_square(), vec![1, 2, 3, 4]);
    reference.points.selection = Some(vec![false; 4]);
    let mut current = frame_from(unit_square(), vec![1, 2, 3, 4]);
    current.points.selection = Some(vec![false; 4]);
    let source = InMemorySource::new(vec![reference, current]);
    let cache = RmsdSeriesCache::new();
    let modifier = FitModifier::new(FitConfig::default());

    let mut data = source.compute(1).unwrap();
    let err = modifier.evaluate(&mut data, 1, &source, &cache).unwrap_err();
    assert!(matches!(err, FitError::DegenerateInput(_)));
}

#[test]
fn frames_may_be_evaluated_in_any_order_and_repeatedly() {
    let frames: Vec<ParticleFrame> = (0..4)
        .map(|k| {
            let positions = unit_square()
                .into_iter()
                .map(|p| translate(p, [k as f64, 0.0, 0.0]))
                .collect();
            frame_from(positions, vec![1, 2, 3, 4])
        })
        .collect();
    let source = InMemorySource::new(frames);
    let cache = RmsdSeriesCache::new();
    let modifier = FitModifier::new(full_set_config());

    for &frame in &[3usize, 1, 3] {
        let mut data = source.compute(frame).unwrap();
        modifier.evaluate(&mut data, frame, &source, &cache).unwrap();
    }

    let series = cache.snapshot("Fit", SeriesKind::Rmsd).unwrap();
    assert_eq!(series.len(), 4);
    assert!(series[0].is_nan() && series[2].is_nan());
    assert!(series[1].abs() < 1e-12 && series[3].abs() < 1e-12);
}

#[test]
fn error_value_ignores_storage_order() {
    // Non-rigid per-identifier perturbation so the residual is nonzero.
    let offsets = [
        [0.01, 0.0, 0.0],
        [0.0, 0.02, 0.0],
        [0.0, 0.0, 0.03],
        [-0.01, 0.01, 0.0],
    ];
    let perturbed: Vec<[f64; 3]> = unit_square()
        .into_iter()
        .zip(offsets)
        .map(|(p, d)| translate(p, d))
        .collect();

    let in_order = frame_from(perturbed.clone(), vec![1, 2, 3, 4]);
    let permuted = frame_from(
        vec![perturbed[2], perturbed[0], perturbed[3], perturbed[1]],
        vec![3, 1, 4, 2],
    );

    let mut results = Vec::new();
    for current in [in_order, permuted] {
        let source = InMemorySource::new(vec![
            frame_from(unit_square(), vec![1, 2, 3, 4]),
            current,
        ]);
        let cache = RmsdSeriesCache::new();
        let modifier = FitModifier::new(full_set_config());
        let mut data = source.compute(1).unwrap();
        modifier.evaluate(&mut data, 1, &source, &cache).unwrap();
        results.push((data.attributes["Fit.RMSD"], data.attributes["Fit.RMSD_all"]));
    }
    assert!((results[0].0 - results[1].0).abs() < 1e-12);
    assert!((results[0].1 - results[1].1).abs() < 1e-12);
    assert!(results[0].0 > 0.0);
}

#[test]
fn sibling_instances_claim_suffixed_namespaces() {
    let source = InMemorySource::new(vec![
        frame_from(unit_square(), vec![1, 2, 3, 4]),
        frame_from(unit_square(), vec![1, 2, 3, 4]),
    ]);
    let cache = RmsdSeriesCache::new();
    let modifier = FitModifier::new(full_set_config());

    let mut data = source.compute(1).unwrap();
    data.set_attribute("Fit.RMSD", 0.0);
    data.set_attribute("Fit.RMSD.1", 0.0);
    modifier.evaluate(&mut data, 1, &source, &cache).unwrap();

    assert!(data.attributes.contains_key("Fit.2.RMSD"));
    assert!(data.attributes.contains_key("Fit.2.RMSD_all"));
    assert!(cache.contains("Fit.2"));
    assert!(data.tables.contains_key("Fit.2.RMSD_all"));
}

#[test]
fn host_assigned_namespace_bypasses_the_scan() {
    let source = InMemorySource::new(vec![
        frame_from(unit_square(), vec![1, 2, 3, 4]),
        frame_from(unit_square(), vec![1, 2, 3, 4]),
    ]);
    let cache = RmsdSeriesCache::new();
    let modifier = FitModifier::new(full_set_config()).with_namespace("ChainFit");

    let mut data = source.compute(1).unwrap();
    data.set_attribute("ChainFit.RMSD", 0.0);
    modifier.evaluate(&mut data, 1, &source, &cache).unwrap();

    assert!(cache.contains("ChainFit"));
    assert!(!cache.contains("ChainFit.1"));
}

#[test]
fn missing_identifiers_fall_back_to_storage_index() {
    let moved: Vec<[f64; 3]> = unit_square()
        .into_iter()
        .map(|p| translate(p, [0.0, 0.0, 4.0]))
        .collect();
    let source = InMemorySource::new(vec![
        ParticleFrame::new(PointSet::new(unit_square())),
        ParticleFrame::new(PointSet::new(moved)),
    ]);
    let cache = RmsdSeriesCache::new();
    let modifier = FitModifier::new(full_set_config());

    let mut data = source.compute(1).unwrap();
    modifier.evaluate(&mut data, 1, &source, &cache).unwrap();
    assert_eq!(data.points.ids().unwrap(), &[0, 1, 2, 3]);
    assert!(data.attributes["Fit.RMSD"].abs() < 1e-12);
}

#[test]
fn caching_hints_name_reference_and_requested_frame() {
    let modifier = FitModifier::new(FitConfig {
        selected_only: true,
        reference_frame: 3,
    });
    assert_eq!(modifier.input_caching_hints(7), [3, 7]);
}
