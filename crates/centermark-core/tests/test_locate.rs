#[allow(dead_code)]
mod common;

use nalgebra::{Point3, Vector3};
use ndarray::Array3;

use centermark_core::error::Result;
use centermark_core::locate::{
    combined_label, midpoint, run_locate, run_locate_with_sink, LocateConfig,
};
use centermark_core::marker::{Fiducial, MarkerSink, MarkerStyle};
use centermark_core::transform::IjkToWorld;
use centermark_core::volume::LabelVolume;

/// Sink that records every placement for inspection.
#[derive(Default)]
struct RecordingSink {
    placements: Vec<(Fiducial, MarkerStyle)>,
}

impl MarkerSink for RecordingSink {
    fn place_fiducial(&mut self, fiducial: &Fiducial, style: &MarkerStyle) -> Result<()> {
        self.placements.push((fiducial.clone(), *style));
        Ok(())
    }
}

fn single_voxel_volume(name: &str, at: (i32, i32, i32)) -> LabelVolume {
    common::volume_from_fn(name, 8, 8, 8, move |x, y, z| {
        if (x, y, z) == at {
            1.0
        } else {
            0.0
        }
    })
}

#[test]
fn test_midpoint_is_per_axis_mean() {
    let a = Point3::new(1.0, 2.0, 3.0);
    let b = Point3::new(3.0, 4.0, 5.0);

    let m = midpoint(&a, &b);

    assert!((m.x - 2.0).abs() < 1e-12);
    assert!((m.y - 3.0).abs() < 1e-12);
    assert!((m.z - 4.0).abs() < 1e-12);
}

#[test]
fn test_combined_label_format() {
    assert_eq!(combined_label("liver", "tumor"), "COM: liver, tumor");
}

#[test]
fn test_locate_two_volumes() {
    let a = single_voxel_volume("liver", (2, 2, 2));
    let b = single_voxel_volume("tumor", (6, 2, 2));

    let report = run_locate(&a, &b, &LocateConfig::default()).unwrap();

    assert_eq!(report.label, "COM: liver, tumor");
    assert!((report.first.world.x - 2.0).abs() < 1e-12);
    assert!((report.second.world.x - 6.0).abs() < 1e-12);
    assert!((report.midpoint.x - 4.0).abs() < 1e-12);
    assert!((report.midpoint.y - 2.0).abs() < 1e-12);
    assert!((report.midpoint.z - 2.0).abs() < 1e-12);
}

#[test]
fn test_each_volume_uses_its_own_affine() {
    let mut data = Array3::<f32>::zeros((1, 1, 1));
    data[[0, 0, 0]] = 1.0;

    let a = LabelVolume::new("a", data.clone(), IjkToWorld::identity());
    let b = LabelVolume::new(
        "b",
        data,
        IjkToWorld::from_origin_spacing(
            Vector3::new(10.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 1.0),
        ),
    );

    let report = run_locate(&a, &b, &LocateConfig::default()).unwrap();

    assert!((report.first.world.x - 0.0).abs() < 1e-12);
    assert!((report.second.world.x - 10.0).abs() < 1e-12);
    assert!((report.midpoint.x - 5.0).abs() < 1e-12);
}

#[test]
fn test_identical_volumes_midpoint_equals_center() {
    let a = single_voxel_volume("a", (4, 4, 4));
    let b = single_voxel_volume("b", (4, 4, 4));

    let report = run_locate(&a, &b, &LocateConfig::default()).unwrap();

    // (c + c) / 2 is exact in IEEE arithmetic.
    assert_eq!(report.midpoint, report.first.world);
    assert_eq!(report.midpoint, report.second.world);
}

#[test]
fn test_empty_volume_center_maps_origin_through_affine() {
    let data = Array3::<f32>::zeros((4, 4, 4));
    let empty = LabelVolume::new(
        "empty",
        data,
        IjkToWorld::from_origin_spacing(
            Vector3::new(5.0, 6.0, 7.0),
            Vector3::new(1.0, 1.0, 1.0),
        ),
    );
    let other = single_voxel_volume("other", (0, 0, 0));

    let report = run_locate(&empty, &other, &LocateConfig::default()).unwrap();

    assert!(report.first.centroid.is_fallback());
    assert!((report.first.world.x - 5.0).abs() < 1e-12);
    assert!((report.first.world.y - 6.0).abs() < 1e-12);
    assert!((report.first.world.z - 7.0).abs() < 1e-12);
}

#[test]
fn test_sink_receives_labeled_fiducial() {
    let a = single_voxel_volume("first", (0, 0, 0));
    let b = single_voxel_volume("second", (4, 0, 0));

    let mut config = LocateConfig::default();
    config.style.glyph_scale = 7.5;

    let mut sink = RecordingSink::default();
    let report = run_locate_with_sink(&a, &b, &config, &mut sink).unwrap();

    assert_eq!(sink.placements.len(), 1);
    let (fiducial, style) = &sink.placements[0];
    assert_eq!(fiducial.label, report.label);
    assert_eq!(fiducial.position, report.midpoint);
    assert!((style.glyph_scale - 7.5).abs() < 1e-12);
}

#[test]
fn test_run_locate_matches_sink_variant() {
    let a = single_voxel_volume("a", (2, 4, 6));
    let b = single_voxel_volume("b", (6, 4, 2));

    let config = LocateConfig::default();
    let without_sink = run_locate(&a, &b, &config).unwrap();

    let mut sink = RecordingSink::default();
    let with_sink = run_locate_with_sink(&a, &b, &config, &mut sink).unwrap();

    assert_eq!(without_sink.midpoint, with_sink.midpoint);
    assert_eq!(without_sink.label, with_sink.label);
}
