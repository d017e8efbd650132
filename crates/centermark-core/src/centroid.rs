//! Center-of-mass estimation for label-map volumes.
//!
//! Scans the volume's index extent with a fixed per-axis stride and averages
//! the coordinates of voxels whose value is positive. Voxels count equally;
//! the scalar value only gates membership.

use nalgebra::Point3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_SAMPLE_STRIDE, PARALLEL_VOXEL_THRESHOLD};
use crate::volume::{Extent, VolumeHandle};

/// Voxel scan parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CentroidConfig {
    /// Per-axis sampling stride. At 2, every other voxel is visited along
    /// each axis, trading accuracy for scan speed.
    pub stride: usize,
}

impl Default for CentroidConfig {
    fn default() -> Self {
        Self {
            stride: DEFAULT_SAMPLE_STRIDE,
        }
    }
}

/// Index-space center of mass of the structure voxels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Centroid {
    /// Mean sampled coordinate, or the origin if no voxel qualified.
    pub ijk: Point3<f64>,
    /// Number of sampled voxels with a positive value.
    pub structure_voxels: usize,
}

impl Centroid {
    /// True when no sampled voxel had a positive value and the coordinate is
    /// the deterministic origin fallback.
    pub fn is_fallback(&self) -> bool {
        self.structure_voxels == 0
    }
}

/// Accumulated (sum_x, sum_y, sum_z, count) over qualifying voxels.
type ScanSums = (f64, f64, f64, usize);

/// Compute the center of mass of a volume's positive voxels.
///
/// The scan runs over the inclusive extent along z, then y, then x with the
/// configured stride. A volume whose sampled grid holds no positive voxel
/// yields the origin as a deterministic fallback, not an error.
pub fn compute_centroid<V: VolumeHandle + ?Sized>(volume: &V, config: &CentroidConfig) -> Centroid {
    // A stride of 0 would never advance; treat it as dense sampling.
    let stride = config.stride.max(1);
    let extent = volume.extent();

    let sums = if extent.sampled_voxels(stride) >= PARALLEL_VOXEL_THRESHOLD {
        scan_parallel(volume, &extent, stride)
    } else {
        scan_sequential(volume, &extent, stride)
    };

    centroid_from_sums(sums)
}

/// Sequential triple-loop scan.
fn scan_sequential<V: VolumeHandle + ?Sized>(
    volume: &V,
    extent: &Extent,
    stride: usize,
) -> ScanSums {
    let mut sum_x = 0.0f64;
    let mut sum_y = 0.0f64;
    let mut sum_z = 0.0f64;
    let mut count = 0usize;

    for z in (extent.z_min..=extent.z_max).step_by(stride) {
        for y in (extent.y_min..=extent.y_max).step_by(stride) {
            for x in (extent.x_min..=extent.x_max).step_by(stride) {
                if volume.value(x, y, z) > 0.0 {
                    sum_x += x as f64;
                    sum_y += y as f64;
                    sum_z += z as f64;
                    count += 1;
                }
            }
        }
    }

    (sum_x, sum_y, sum_z, count)
}

/// Slab-parallel scan using Rayon: one task per sampled z slice, partial sums
/// combined in slice order so the result matches the sequential path.
fn scan_parallel<V: VolumeHandle + ?Sized>(volume: &V, extent: &Extent, stride: usize) -> ScanSums {
    let slices: Vec<i32> = (extent.z_min..=extent.z_max).step_by(stride).collect();

    let partials: Vec<ScanSums> = slices
        .into_par_iter()
        .map(|z| {
            let mut sum_x = 0.0f64;
            let mut sum_y = 0.0f64;
            let mut sum_z = 0.0f64;
            let mut count = 0usize;
            for y in (extent.y_min..=extent.y_max).step_by(stride) {
                for x in (extent.x_min..=extent.x_max).step_by(stride) {
                    if volume.value(x, y, z) > 0.0 {
                        sum_x += x as f64;
                        sum_y += y as f64;
                        sum_z += z as f64;
                        count += 1;
                    }
                }
            }
            (sum_x, sum_y, sum_z, count)
        })
        .collect();

    partials
        .into_iter()
        .fold((0.0, 0.0, 0.0, 0), |(ax, ay, az, ac), (x, y, z, c)| {
            (ax + x, ay + y, az + z, ac + c)
        })
}

fn centroid_from_sums((sum_x, sum_y, sum_z, count): ScanSums) -> Centroid {
    if count == 0 {
        return Centroid {
            ijk: Point3::origin(),
            structure_voxels: 0,
        };
    }
    let n = count as f64;
    Centroid {
        ijk: Point3::new(sum_x / n, sum_y / n, sum_z / n),
        structure_voxels: count,
    }
}
