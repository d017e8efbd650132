#[allow(dead_code)]
mod common;

use std::fs;

use serde_json::Value;
use tempfile::TempDir;

use centermark_core::centroid::CentroidConfig;
use centermark_core::io::markups::MarkupsFile;
use centermark_core::io::nrrd::read_nrrd;
use centermark_core::locate::{run_locate, run_locate_with_sink, volume_center, LocateConfig};

/// Build an 8x8x8 uchar NRRD with a filled axis-aligned box labeled 1.
fn build_box_nrrd(name: &str, lo: usize, hi: usize) -> Vec<u8> {
    let mut data = vec![0u8; 8 * 8 * 8];
    for z in lo..=hi {
        for y in lo..=hi {
            for x in lo..=hi {
                data[z * 64 + y * 8 + x] = 1;
            }
        }
    }
    let content = format!("content: {}", name);
    common::build_nrrd(
        &[
            "type: uchar",
            "dimension: 3",
            "sizes: 8 8 8",
            "encoding: raw",
            &content,
        ],
        &data,
    )
}

#[test]
fn test_locate_pipeline_end_to_end() {
    let first = common::write_test_nrrd(&build_box_nrrd("liver", 2, 3));
    let second = common::write_test_nrrd(&build_box_nrrd("tumor", 4, 5));

    let a = read_nrrd(first.path()).unwrap();
    let b = read_nrrd(second.path()).unwrap();

    let mut markups = MarkupsFile::new();
    let report = run_locate_with_sink(&a, &b, &LocateConfig::default(), &mut markups).unwrap();

    // Stride 2 samples only (2,2,2) of the first box and (4,4,4) of the
    // second.
    assert_eq!(report.label, "COM: liver, tumor");
    assert!((report.first.world.x - 2.0).abs() < 1e-12);
    assert!((report.second.world.x - 4.0).abs() < 1e-12);
    assert!((report.midpoint.x - 3.0).abs() < 1e-12);
    assert!((report.midpoint.y - 3.0).abs() < 1e-12);
    assert!((report.midpoint.z - 3.0).abs() < 1e-12);

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("center-of-mass.mrk.json");
    markups.save(&path).unwrap();

    let doc: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let cp = &doc["markups"][0]["controlPoints"][0];
    assert_eq!(cp["label"], "COM: liver, tumor");
    assert_eq!(cp["position"][0], 3.0);
    assert_eq!(cp["position"][1], 3.0);
    assert_eq!(cp["position"][2], 3.0);
}

#[test]
fn test_dense_stride_uses_every_voxel() {
    let file = common::write_test_nrrd(&build_box_nrrd("box", 2, 3));
    let volume = read_nrrd(file.path()).unwrap();

    let mut config = LocateConfig::default();
    config.sampling.stride = 1;
    let report = run_locate(&volume, &volume, &config).unwrap();

    assert_eq!(report.first.centroid.structure_voxels, 8);
    assert!((report.first.world.x - 2.5).abs() < 1e-12);
    assert_eq!(report.midpoint, report.first.world);
}

#[test]
fn test_slicer_style_gzip_header() {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let mut data = vec![0u8; 8 * 8 * 8];
    for z in 2..=3usize {
        for y in 2..=3usize {
            for x in 2..=3usize {
                data[z * 64 + y * 8 + x] = 1;
            }
        }
    }
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&data).unwrap();
    let compressed = encoder.finish().unwrap();

    let nrrd = common::build_nrrd(
        &[
            "# Complete NRRD file format specification at:",
            "# http://teem.sourceforge.net/nrrd/format.html",
            "type: unsigned char",
            "dimension: 3",
            "space: left-posterior-superior",
            "sizes: 8 8 8",
            "space directions: (1,0,0) (0,1,0) (0,0,1)",
            "kinds: domain domain domain",
            "endian: little",
            "encoding: gzip",
            "space origin: (0,0,0)",
            "content: segment",
        ],
        &compressed,
    );
    let file = common::write_test_nrrd(&nrrd);

    let volume = read_nrrd(file.path()).unwrap();
    let center = volume_center(&volume, &CentroidConfig { stride: 1 });

    // LPS negates the first two world axes.
    assert_eq!(center.name, "segment");
    assert_eq!(center.centroid.structure_voxels, 8);
    assert!((center.world.x - -2.5).abs() < 1e-12);
    assert!((center.world.y - -2.5).abs() < 1e-12);
    assert!((center.world.z - 2.5).abs() < 1e-12);
}
